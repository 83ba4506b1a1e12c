use crate::error::{ensure_finite, FormulaError, NonFiniteCause};
use crate::functions::{self, constants};
use std::fmt;

mod evaluator;
mod parser;
mod token;

pub use evaluator::*;
pub use parser::FormulaParser as Parser;
pub use token::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Identifier(String),
    /// Operands of one precedence level. `+ - * /` fold from the left; a
    /// chain made only of `^` folds from the right.
    Chain {
        first: Box<ASTNode>,
        rest: Vec<(Operator, ASTNode)>,
    },
    Negate(Box<ASTNode>),
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
}

impl ASTNode {
    pub fn binary(left: ASTNode, operator: Operator, right: ASTNode) -> Self {
        ASTNode::Chain {
            first: Box::new(left),
            rest: vec![(operator, right)],
        }
    }

    /// Variable names referenced by the tree, in first-occurrence order.
    ///
    /// Reserved constants are left out; they resolve without a binding.
    pub fn variables(&self) -> Vec<String> {
        let mut seen = Vec::new();
        self.collect_variables(&mut seen);
        seen.into_iter().map(str::to_string).collect()
    }

    fn collect_variables<'a>(&'a self, seen: &mut Vec<&'a str>) {
        match self {
            ASTNode::Number(_) => {}
            ASTNode::Identifier(name) => {
                if !constants::is_constant(name) && !seen.contains(&name.as_str()) {
                    seen.push(name);
                }
            }
            ASTNode::Chain { first, rest } => {
                first.collect_variables(seen);
                for (_, operand) in rest {
                    operand.collect_variables(seen);
                }
            }
            ASTNode::Negate(inner) => inner.collect_variables(seen),
            ASTNode::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(seen);
                }
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Power => "^",
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> Result<f64, FormulaError> {
        let value = match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    return Err(FormulaError::non_finite(
                        self.symbol(),
                        NonFiniteCause::DivisionByZero,
                    ));
                }
                left / right
            }
            Operator::Power => return functions::power(self.symbol(), left, right),
        };
        ensure_finite(self.symbol(), value)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "^" => Ok(Operator::Power),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}
