//! One-double-input math functions.
//!
//! These are the plainest shape in the library: one numeric argument, double
//! result. `abs` overrides the result rule and preserves the input's numeric
//! subtype. `sqrt` of a negative value returns NaN (IEEE 754 semantics), not
//! an error.

use super::bases::{one_numeric, one_numeric_preserving};
use super::FunctionRegistry;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(one_numeric_preserving(
        "abs",
        "functions.math.abs",
        f64::abs,
    ));
    registry.register(one_numeric("sqrt", "functions.math.sqrt", f64::sqrt));
    registry.register(one_numeric("exp", "functions.math.exp", f64::exp));
    registry.register(one_numeric("ln", "functions.math.ln", f64::ln));
    registry.register(one_numeric("log10", "functions.math.log10", f64::log10));
}
