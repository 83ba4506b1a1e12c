use std::fmt;
use thiserror::Error;

/// Broad category of a [`FormulaError`], for callers that only branch on kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    UnboundVariable,
    NonFiniteResult,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "SyntaxError"),
            ErrorKind::UnboundVariable => write!(f, "UnboundVariableError"),
            ErrorKind::NonFiniteResult => write!(f, "NonFiniteResultError"),
        }
    }
}

/// Why an operation failed to produce a finite number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
pub enum NonFiniteCause {
    #[error("division by zero")]
    DivisionByZero,
    #[error("argument outside the function's domain")]
    Domain,
    #[error("result too large to represent")]
    Overflow,
    #[error("bound value is not a finite number")]
    NonFiniteBinding,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormulaError {
    /// Position is a byte offset into the formula, when one is known.
    #[error("syntax error{}: {message}", .position.map(|p| format!(" at offset {p}")).unwrap_or_default())]
    Syntax {
        message: String,
        position: Option<usize>,
    },

    #[error("unbound variable(s): {}", .0.join(", "))]
    UnboundVariable(Vec<String>),

    #[error("'{operation}' produced a non-finite result: {cause}")]
    NonFiniteResult {
        operation: String,
        cause: NonFiniteCause,
    },
}

impl FormulaError {
    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        FormulaError::Syntax {
            message: message.into(),
            position: Some(position),
        }
    }

    pub fn arity(function: &str, expected: usize, found: usize, position: Option<usize>) -> Self {
        FormulaError::Syntax {
            message: format!(
                "function '{}' takes {} argument{}, but {} were given",
                function,
                expected,
                if expected == 1 { "" } else { "s" },
                found
            ),
            position,
        }
    }

    pub fn non_finite(operation: impl Into<String>, cause: NonFiniteCause) -> Self {
        FormulaError::NonFiniteResult {
            operation: operation.into(),
            cause,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FormulaError::Syntax { .. } => ErrorKind::Syntax,
            FormulaError::UnboundVariable(_) => ErrorKind::UnboundVariable,
            FormulaError::NonFiniteResult { .. } => ErrorKind::NonFiniteResult,
        }
    }

    /// Identifiers missing from the bindings, empty for other kinds.
    pub fn unbound_names(&self) -> &[String] {
        match self {
            FormulaError::UnboundVariable(names) => names,
            _ => &[],
        }
    }
}

/// Checks a freshly computed value, naming the operation that produced it.
///
/// NaN is a domain failure (`sqrt(-1)`, `(-8) ^ 0.5`), infinity an overflow.
pub(crate) fn ensure_finite(operation: &str, value: f64) -> Result<f64, FormulaError> {
    if value.is_finite() {
        Ok(value)
    } else if value.is_nan() {
        Err(FormulaError::non_finite(operation, NonFiniteCause::Domain))
    } else {
        Err(FormulaError::non_finite(operation, NonFiniteCause::Overflow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_display_with_position() {
        let err = FormulaError::syntax("unexpected ')'", 4);
        assert_eq!(err.to_string(), "syntax error at offset 4: unexpected ')'");
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_arity_display_without_position() {
        let err = FormulaError::arity("sqrt", 1, 2, None);
        assert_eq!(
            err.to_string(),
            "syntax error: function 'sqrt' takes 1 argument, but 2 were given"
        );
    }

    #[test]
    fn test_unbound_lists_every_name() {
        let err = FormulaError::UnboundVariable(vec!["B".to_string(), "C".to_string()]);
        assert_eq!(err.to_string(), "unbound variable(s): B, C");
        assert_eq!(err.unbound_names(), ["B".to_string(), "C".to_string()]);
        assert_eq!(err.kind().to_string(), "UnboundVariableError");
    }

    #[test]
    fn test_ensure_finite_classifies() {
        assert_eq!(ensure_finite("x", 2.5), Ok(2.5));
        assert_eq!(
            ensure_finite("sqrt", f64::NAN),
            Err(FormulaError::non_finite("sqrt", NonFiniteCause::Domain))
        );
        assert_eq!(
            ensure_finite("*", f64::INFINITY),
            Err(FormulaError::non_finite("*", NonFiniteCause::Overflow))
        );
        assert_eq!(
            ensure_finite("-", f64::NEG_INFINITY),
            Err(FormulaError::non_finite("-", NonFiniteCause::Overflow))
        );
    }
}
