use crate::ast::{ASTNode, Operator, Parser};
use crate::config::EngineConfig;
use crate::error::{ensure_finite, FormulaError, NonFiniteCause};
use crate::functions::{self, constants};
use log::{debug, trace, warn};
use lru::LruCache;
use rayon::prelude::*;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Variable name to value. Names are case-sensitive.
pub type Bindings = HashMap<String, f64>;

/// Parses and evaluates formulas.
///
/// Evaluation itself is pure. The only state is an optional cache of parsed
/// trees keyed by formula text, which never changes a result. An `Evaluator`
/// is `Sync` and can be shared between threads.
pub struct Evaluator {
    config: EngineConfig,
    cache: Option<Mutex<LruCache<String, Arc<ASTNode>>>>,
}

impl Evaluator {
    pub fn new(config: EngineConfig) -> Self {
        let cache = NonZeroUsize::new(config.cache_capacity)
            .map(|capacity| Mutex::new(LruCache::new(capacity)));
        Self { config, cache }
    }

    /// An evaluator that keeps nothing between calls.
    pub fn uncached() -> Self {
        Self::new(EngineConfig::uncached())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse an expression string into an AST, reusing a cached tree when possible.
    pub fn parse_expression(&self, expression: &str) -> Result<Arc<ASTNode>, FormulaError> {
        let Some(cache) = &self.cache else {
            return Parser::parse_with_depth(expression, self.config.max_depth).map(Arc::new);
        };

        if let Some(ast) = lock(cache).get(expression) {
            debug!("Parse cache hit: {}", expression);
            return Ok(Arc::clone(ast));
        }

        debug!("Parse cache miss: {}", expression);
        let ast = Arc::new(Parser::parse_with_depth(expression, self.config.max_depth)?);
        lock(cache).put(expression.to_string(), Arc::clone(&ast));
        Ok(ast)
    }

    /// Evaluates a formula against a set of variable bindings.
    ///
    /// # Returns
    ///
    /// * `Ok(f64)`, always finite.
    /// * `Err(FormulaError::Syntax)` when the formula does not parse.
    /// * `Err(FormulaError::UnboundVariable)` naming every missing variable.
    /// * `Err(FormulaError::NonFiniteResult)` when any step leaves the reals.
    pub fn evaluate_expression(
        &self,
        expression: &str,
        bindings: &Bindings,
    ) -> Result<f64, FormulaError> {
        let ast = self.parse_expression(expression)?;
        self.evaluate_ast(&ast, bindings)
    }

    /// Evaluates an already parsed tree.
    ///
    /// Trees from [`Evaluator::parse_expression`] are depth-bounded; a
    /// hand-built tree is walked as is.
    pub fn evaluate_ast(&self, ast: &ASTNode, bindings: &Bindings) -> Result<f64, FormulaError> {
        let missing: Vec<String> = ast
            .variables()
            .into_iter()
            .filter(|name| !bindings.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(FormulaError::UnboundVariable(missing));
        }

        let value = self.evaluate(ast, bindings)?;
        ensure_finite("result", value)
    }

    /// Whether the formula evaluates with every listed name bound to `1`.
    pub fn validate<S: AsRef<str>>(&self, expression: &str, variable_names: &[S]) -> bool {
        let bindings: Bindings = variable_names
            .iter()
            .map(|name| (name.as_ref().to_string(), 1.0))
            .collect();

        match self.evaluate_expression(expression, &bindings) {
            Ok(_) => true,
            Err(err) => {
                debug!("Formula {:?} failed validation: {}", expression, err);
                false
            }
        }
    }

    /// Parses once, then evaluates every binding set in parallel.
    ///
    /// A syntax error fails the whole batch; other failures are reported per
    /// binding set, in input order.
    pub fn evaluate_batch(
        &self,
        expression: &str,
        contexts: &[Bindings],
    ) -> Result<Vec<Result<f64, FormulaError>>, FormulaError> {
        let ast = self.parse_expression(expression)?;
        debug!(
            "Evaluating {:?} against {} binding sets",
            expression,
            contexts.len()
        );
        Ok(contexts
            .par_iter()
            .map(|bindings| self.evaluate_ast(&ast, bindings))
            .collect())
    }

    fn evaluate(&self, ast: &ASTNode, bindings: &Bindings) -> Result<f64, FormulaError> {
        match ast {
            ASTNode::Number(n) => Ok(*n),

            ASTNode::Identifier(name) => resolve(name, bindings),

            ASTNode::Chain { first, rest } => {
                let mut value = self.evaluate(first, bindings)?;
                if !rest.is_empty() && rest.iter().all(|(op, _)| *op == Operator::Power) {
                    let mut exponents = Vec::with_capacity(rest.len());
                    for (_, operand) in rest {
                        exponents.push(self.evaluate(operand, bindings)?);
                    }
                    let mut exponent = exponents.pop().unwrap_or(1.0);
                    while let Some(base) = exponents.pop() {
                        exponent = Operator::Power.apply(base, exponent)?;
                    }
                    return Operator::Power.apply(value, exponent);
                }
                for (operator, operand) in rest {
                    value = operator.apply(value, self.evaluate(operand, bindings)?)?;
                }
                Ok(value)
            }

            ASTNode::Negate(inner) => Ok(-self.evaluate(inner, bindings)?),

            ASTNode::FunctionCall { name, args } => {
                let function = functions::lookup(name).ok_or_else(|| FormulaError::Syntax {
                    message: format!("unknown function '{}'", name),
                    position: None,
                })?;
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg, bindings))
                    .collect::<Result<Vec<f64>, FormulaError>>()?;
                let result = function.call(&values);
                trace!("{}({:?}) = {:?}", name, values, result);
                result
            }
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn resolve(name: &str, bindings: &Bindings) -> Result<f64, FormulaError> {
    match bindings.get(name) {
        Some(value) if value.is_finite() => Ok(*value),
        Some(_) => Err(FormulaError::non_finite(
            name,
            NonFiniteCause::NonFiniteBinding,
        )),
        None => constants::constant(name)
            .ok_or_else(|| FormulaError::UnboundVariable(vec![name.to_string()])),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("Parse cache lock was poisoned, recovering");
        poisoned.into_inner()
    })
}
