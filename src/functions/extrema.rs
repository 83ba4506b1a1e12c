use formulary_macros::formula_fn;

#[formula_fn]
pub(crate) fn max(a: f64, b: f64) -> f64 {
    a.max(b)
}

#[formula_fn]
pub(crate) fn min(a: f64, b: f64) -> f64 {
    a.min(b)
}
