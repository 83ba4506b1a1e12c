use formulary_macros::formula_fn;

#[formula_fn]
pub(crate) fn sin(x: f64) -> f64 {
    x.sin()
}

#[formula_fn]
pub(crate) fn cos(x: f64) -> f64 {
    x.cos()
}

#[formula_fn]
pub(crate) fn tan(x: f64) -> f64 {
    x.tan()
}
