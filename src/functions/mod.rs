pub mod constants;
mod elementary;
mod extrema;
mod trig;

use crate::error::{ensure_finite, FormulaError};
use std::fmt;

pub(crate) use elementary::power;

/// A fixed-arity math function callable from a formula.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub apply: fn(&[f64]) -> Result<f64, FormulaError>,
}

impl Builtin {
    /// Applies the function and rejects a non-finite result.
    pub fn call(&self, args: &[f64]) -> Result<f64, FormulaError> {
        let value = (self.apply)(args)?;
        ensure_finite(self.name, value)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Every function a formula may call. Read-only for the life of the process.
pub static FUNCTIONS: [Builtin; 9] = [
    trig::SIN,
    trig::COS,
    trig::TAN,
    elementary::LOG,
    elementary::SQRT,
    elementary::ABS,
    elementary::POW,
    extrema::MAX,
    extrema::MIN,
];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    FUNCTIONS.iter().find(|function| function.name == name)
}

pub fn is_function(name: &str) -> bool {
    lookup(name).is_some()
}
