pub mod ast;
pub mod calculator;
pub mod config;
pub mod error;
pub mod functions;
pub mod prebuilt;

use ast::{variable_names, Parser};

pub use ast::{Bindings, Evaluator};
pub use calculator::{Calculator, CalculatorError, CalculatorTemplate, DefinitionIssue, InputField};
pub use config::EngineConfig;
pub use error::{ErrorKind, FormulaError, NonFiniteCause};

/// Evaluates `formula` with the given variable bindings.
///
/// The result is always finite; see [`FormulaError`] for the ways this fails.
pub fn evaluate(formula: &str, bindings: &Bindings) -> Result<f64, FormulaError> {
    Evaluator::uncached().evaluate_expression(formula, bindings)
}

/// Whether `formula` evaluates successfully with every name in
/// `variable_names` bound to `1`.
pub fn validate<S: AsRef<str>>(formula: &str, variable_names: &[S]) -> bool {
    Evaluator::uncached().validate(formula, variable_names)
}

/// Names the formula reads as variables, in first-occurrence order.
///
/// Only tokenization is required, so an otherwise malformed formula still
/// reports its identifiers. Function names and constants are never included.
pub fn extract_variables(formula: &str) -> Result<Vec<String>, FormulaError> {
    let tokens = Parser::tokenize(formula)?;
    Ok(variable_names(&tokens))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, f64)]) -> Bindings {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_extract_variables() {
        assert_eq!(
            extract_variables("Weight / (Height * Height)").unwrap(),
            vec!["Weight", "Height"]
        );
        assert_eq!(
            extract_variables("pow(X, 2) + max(Y, Z)").unwrap(),
            vec!["X", "Y", "Z"]
        );
        assert_eq!(extract_variables("Max(X,2)").unwrap(), vec!["X"]);
        assert_eq!(extract_variables("2 * PI * r").unwrap(), vec!["r"]);
        assert!(extract_variables("3 + 4").unwrap().is_empty());
    }

    #[test]
    fn test_extract_variables_from_malformed_formula() {
        assert_eq!(extract_variables("(A + B").unwrap(), vec!["A", "B"]);
        assert_eq!(
            extract_variables("A # B").unwrap_err().kind(),
            ErrorKind::Syntax
        );
    }

    #[test]
    fn test_evaluate() {
        let result = evaluate(
            "Weight / (Height * Height)",
            &bindings(&[("Weight", 70.0), ("Height", 1.75)]),
        )
        .unwrap();
        assert!((result - 22.857142857142858).abs() < 1e-12);

        assert_eq!(
            evaluate("X / 0", &bindings(&[("X", 5.0)])),
            Err(FormulaError::non_finite("/", NonFiniteCause::DivisionByZero))
        );
        assert_eq!(
            evaluate("sqrt(X)", &bindings(&[("X", -4.0)]))
                .unwrap_err()
                .kind(),
            ErrorKind::NonFiniteResult
        );
        assert_eq!(
            evaluate("A + B", &bindings(&[("A", 1.0)])),
            Err(FormulaError::UnboundVariable(vec!["B".to_string()]))
        );
        assert_eq!(
            evaluate("(1 + 2", &Bindings::new()).unwrap_err().kind(),
            ErrorKind::Syntax
        );
    }

    #[test]
    fn test_validate() {
        assert!(validate("Miles / Gallons", &["Miles", "Gallons"]));
        assert!(validate(
            "Miles / Gallons",
            &["Miles".to_string(), "Gallons".to_string()]
        ));
        assert!(!validate("Miles / Gallons", &["Miles"]));
        assert!(!validate("Miles / ", &["Miles"]));
    }

    #[test]
    fn test_deep_nesting_is_a_syntax_error() {
        let deep = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            evaluate(&deep, &Bindings::new()).unwrap_err().kind(),
            ErrorKind::Syntax
        );

        let past_limit = format!(
            "{}1{}",
            "abs(".repeat(config::DEFAULT_MAX_DEPTH + 1),
            ")".repeat(config::DEFAULT_MAX_DEPTH + 1)
        );
        assert_eq!(
            evaluate(&past_limit, &Bindings::new()).unwrap_err().kind(),
            ErrorKind::Syntax
        );
    }

    #[test]
    fn test_nesting_up_to_the_limit_evaluates() {
        let depth = config::DEFAULT_MAX_DEPTH;
        let groups = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(evaluate(&groups, &Bindings::new()), Ok(1.0));

        let calls = format!("{}1{}", "abs(".repeat(depth), ")".repeat(depth));
        assert_eq!(evaluate(&calls, &Bindings::new()), Ok(1.0));
        assert_eq!(extract_variables(&calls).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_long_flat_expressions_evaluate() {
        let long_chain = vec!["1"; 10_000].join(" + ");
        assert_eq!(evaluate(&long_chain, &Bindings::new()), Ok(10_000.0));

        let negations = format!("{}1", "-".repeat(10_000));
        assert_eq!(evaluate(&negations, &Bindings::new()), Ok(1.0));
    }

    #[test]
    fn test_unicode_whitespace_between_tokens() {
        let context = bindings(&[("X", 2.0)]);
        assert_eq!(evaluate("1 +\u{000C}X", &context), Ok(3.0));
        assert_eq!(evaluate("1\u{000B}* X", &context), Ok(2.0));
        assert_eq!(evaluate("\u{00A0}X ^ 2\u{2028}", &context), Ok(4.0));
        assert!(validate("A\u{000B}+\u{000C}B", &["A", "B"]));
    }

    #[test]
    fn test_extract_variables_ignores_literal_size() {
        let formula = format!("1{} + X", "0".repeat(400));
        assert_eq!(extract_variables(&formula).unwrap(), vec!["X"]);
        assert_eq!(
            evaluate(&formula, &bindings(&[("X", 1.0)])).unwrap_err().kind(),
            ErrorKind::Syntax
        );
    }

    #[test]
    fn test_syntax_errors_read_naturally() {
        let err = evaluate("max(1,)", &Bindings::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(!err.to_string().contains("unary"), "{err}");
        assert!(!err.to_string().contains("sum"), "{err}");
    }
}
