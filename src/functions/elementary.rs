use crate::error::{ensure_finite, FormulaError, NonFiniteCause};
use formulary_macros::formula_fn;

/// Real exponentiation shared by the `^` operator and `pow`.
///
/// A zero base with a negative exponent is reported as a division by zero
/// rather than the overflow `powf` would suggest.
pub(crate) fn power(operation: &str, base: f64, exponent: f64) -> Result<f64, FormulaError> {
    if base == 0.0 && exponent < 0.0 {
        return Err(FormulaError::non_finite(
            operation,
            NonFiniteCause::DivisionByZero,
        ));
    }
    ensure_finite(operation, base.powf(exponent))
}

/// Natural logarithm.
#[formula_fn]
pub(crate) fn log(x: f64) -> Result<f64, FormulaError> {
    if x <= 0.0 {
        return Err(FormulaError::non_finite("log", NonFiniteCause::Domain));
    }
    Ok(x.ln())
}

#[formula_fn]
pub(crate) fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[formula_fn]
pub(crate) fn abs(x: f64) -> f64 {
    x.abs()
}

#[formula_fn]
pub(crate) fn pow(base: f64, exponent: f64) -> Result<f64, FormulaError> {
    power("pow", base, exponent)
}
