use crate::ast::token::check_nesting;
use crate::ast::{ASTNode, Operator, SpannedToken, Token};
use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::FormulaError;
use crate::functions;
use log::{debug, trace};
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "ast/formula.pest"]
pub struct FormulaParser;

impl FormulaParser {
    /// Splits a formula into tokens, rejecting any character outside the
    /// formula alphabet.
    ///
    /// A literal too large for `f64` still tokenizes (as infinity); only
    /// parsing rejects it.
    pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, FormulaError> {
        let root = FormulaParser::parse(Rule::tokens, input)
            .map_err(|e| unrecognized_character(input, e))?
            .next()
            .ok_or_else(|| FormulaError::syntax("failed to tokenize formula", 0))?;

        let mut tokens = Vec::new();
        for pair in root.into_inner() {
            let position = pair.as_span().start();
            let token = match pair.as_rule() {
                Rule::number => Token::Number(number_value(&pair)?),
                Rule::identifier => Token::Identifier(pair.as_str().to_string()),
                Rule::lparen => Token::LeftParen,
                Rule::rparen => Token::RightParen,
                Rule::comma => Token::Comma,
                Rule::EOI => continue,
                rule => Token::Operator(operator_for(rule).ok_or_else(|| unexpected(&pair))?),
            };
            tokens.push(SpannedToken { token, position });
        }
        trace!("Tokenized {:?} into {} tokens", input, tokens.len());
        Ok(tokens)
    }

    pub fn parse_expression(input: &str) -> Result<ASTNode, FormulaError> {
        Self::parse_with_depth(input, DEFAULT_MAX_DEPTH)
    }

    /// Parses one arithmetic expression, refusing parentheses (including
    /// those of function calls) nested deeper than `max_depth`.
    ///
    /// Every nesting level costs a few stack frames while the tree is built,
    /// so `max_depth` has to fit the calling thread's stack.
    pub fn parse_with_depth(input: &str, max_depth: usize) -> Result<ASTNode, FormulaError> {
        debug!("Parsing formula: {}", input);
        let tokens = Self::tokenize(input)?;
        if tokens.is_empty() {
            return Err(FormulaError::syntax("formula is empty", 0));
        }
        // Parentheses are the only recursion in the grammar and in the tree
        // builder below.
        check_nesting(&tokens, max_depth)
            .map_err(|(message, position)| FormulaError::syntax(message, position))?;

        let root = FormulaParser::parse(Rule::formula, input)
            .map_err(grammar_error)?
            .next()
            .ok_or_else(|| FormulaError::syntax("formula is empty", 0))?;

        let ast = Self::build_formula(root)?;
        debug!("Parsed {} tokens into a formula tree", tokens.len());
        Ok(ast)
    }

    fn build_formula(pair: Pair<Rule>) -> Result<ASTNode, FormulaError> {
        let start = pair.as_span().start();
        let sum = pair
            .into_inner()
            .find(|inner| inner.as_rule() == Rule::sum)
            .ok_or_else(|| FormulaError::syntax("expected an expression", start))?;
        Self::build_chain(sum)
    }

    /// Builds a `sum`, `product` or `exponent` rule into one flat chain.
    ///
    /// A rule with a single operand yields that operand unchanged, so
    /// precedence levels that add no operator add no tree depth.
    fn build_chain(pair: Pair<Rule>) -> Result<ASTNode, FormulaError> {
        let start = pair.as_span().start();
        let mut first = None;
        let mut rest = Vec::new();
        let mut pending: Option<(Operator, usize)> = None;

        for inner in pair.into_inner() {
            let position = inner.as_span().start();
            if let Some(operator) = operator_for(inner.as_rule()) {
                pending = Some((operator, position));
                continue;
            }

            let operand = match inner.as_rule() {
                Rule::product | Rule::exponent => Self::build_chain(inner)?,
                Rule::unary => Self::build_unary(inner)?,
                _ => return Err(unexpected(&inner)),
            };
            match (pending.take(), first.is_some()) {
                (Some((operator, _)), true) => rest.push((operator, operand)),
                (None, false) => first = Some(operand),
                _ => return Err(FormulaError::syntax("expected an operator", position)),
            }
        }

        if let Some((_, position)) = pending {
            return Err(FormulaError::syntax("incomplete expression", position));
        }
        let first = first.ok_or_else(|| FormulaError::syntax("expected an operand", start))?;
        if rest.is_empty() {
            return Ok(first);
        }
        Ok(ASTNode::Chain {
            first: Box::new(first),
            rest,
        })
    }

    /// `-` is exact, so a run of them keeps only its parity: `--x` is `x`.
    fn build_unary(pair: Pair<Rule>) -> Result<ASTNode, FormulaError> {
        let start = pair.as_span().start();
        let mut negated = false;
        let mut operand = None;

        for inner in pair.into_inner() {
            let position = inner.as_span().start();
            let node = match inner.as_rule() {
                Rule::negate => {
                    negated = !negated;
                    continue;
                }
                Rule::number => ASTNode::Number(literal(&inner)?),
                Rule::identifier => {
                    let name = inner.as_str();
                    if functions::is_function(name) {
                        return Err(FormulaError::syntax(
                            format!("function '{}' must be called with arguments", name),
                            position,
                        ));
                    }
                    ASTNode::Identifier(name.to_string())
                }
                Rule::group => {
                    let sum = inner
                        .into_inner()
                        .find(|part| part.as_rule() == Rule::sum)
                        .ok_or_else(|| FormulaError::syntax("expected an expression", position))?;
                    Self::build_chain(sum)?
                }
                Rule::call => Self::build_function_call(inner)?,
                _ => return Err(unexpected(&inner)),
            };
            operand = Some(node);
        }

        let operand = operand.ok_or_else(|| FormulaError::syntax("expected an operand", start))?;
        if negated {
            return Ok(ASTNode::Negate(Box::new(operand)));
        }
        Ok(operand)
    }

    fn build_function_call(pair: Pair<Rule>) -> Result<ASTNode, FormulaError> {
        let position = pair.as_span().start();
        let mut inner = pair.into_inner();
        let name = next_pair(&mut inner, position)?.as_str();
        let function = functions::lookup(name).ok_or_else(|| {
            FormulaError::syntax(format!("unknown function '{}'", name), position)
        })?;
        trace!("Building call to {}", name);

        let mut args = Vec::new();
        for part in inner {
            if part.as_rule() != Rule::arguments {
                continue;
            }
            for argument in part.into_inner().filter(|p| p.as_rule() == Rule::sum) {
                args.push(Self::build_chain(argument)?);
            }
        }

        if args.len() != function.arity {
            return Err(FormulaError::arity(
                name,
                function.arity,
                args.len(),
                Some(position),
            ));
        }

        Ok(ASTNode::FunctionCall {
            name: name.to_string(),
            args,
        })
    }
}

fn operator_for(rule: Rule) -> Option<Operator> {
    match rule {
        Rule::add => Some(Operator::Add),
        Rule::subtract => Some(Operator::Subtract),
        Rule::multiply => Some(Operator::Multiply),
        Rule::divide => Some(Operator::Divide),
        Rule::power => Some(Operator::Power),
        _ => None,
    }
}

fn number_value(pair: &Pair<Rule>) -> Result<f64, FormulaError> {
    pair.as_str().parse::<f64>().map_err(|e| {
        FormulaError::syntax(format!("invalid number: {}", e), pair.as_span().start())
    })
}

fn literal(pair: &Pair<Rule>) -> Result<f64, FormulaError> {
    let value = number_value(pair)?;
    if !value.is_finite() {
        return Err(FormulaError::syntax(
            "number literal is too large",
            pair.as_span().start(),
        ));
    }
    Ok(value)
}

fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    position: usize,
) -> Result<Pair<'i, Rule>, FormulaError> {
    pairs
        .next()
        .ok_or_else(|| FormulaError::syntax("incomplete expression", position))
}

fn unexpected(pair: &Pair<Rule>) -> FormulaError {
    FormulaError::syntax(
        format!(
            "unexpected {} '{}'",
            describe_rule(&pair.as_rule()),
            pair.as_str()
        ),
        pair.as_span().start(),
    )
}

fn error_position(location: &InputLocation) -> usize {
    match location {
        InputLocation::Pos(position) => *position,
        InputLocation::Span((start, _)) => *start,
    }
}

fn unrecognized_character(input: &str, error: pest::error::Error<Rule>) -> FormulaError {
    let position = error_position(&error.location);
    match input.get(position..).and_then(|rest| rest.chars().next()) {
        Some(c) => FormulaError::syntax(format!("unrecognized character {:?}", c), position),
        None => grammar_error(error),
    }
}

fn grammar_error(error: pest::error::Error<Rule>) -> FormulaError {
    let position = error_position(&error.location);
    let error = error.renamed_rules(describe_rule);
    FormulaError::syntax(error.variant.message().into_owned(), position)
}

fn describe_rule(rule: &Rule) -> String {
    let description = match rule {
        Rule::number => "number",
        Rule::identifier => "variable",
        Rule::call => "function call",
        Rule::group => "parenthesized expression",
        Rule::arguments => "argument list",
        Rule::sum | Rule::product | Rule::exponent | Rule::unary => "operand",
        Rule::add => "'+'",
        Rule::subtract | Rule::negate => "'-'",
        Rule::multiply => "'*'",
        Rule::divide => "'/'",
        Rule::power => "'^'",
        Rule::lparen => "'('",
        Rule::rparen => "')'",
        Rule::comma => "','",
        Rule::EOI => "end of formula",
        _ => "expression",
    };
    description.to_string()
}
