//! Statistical functions: arbitrary-arity reducers and the binomial
//! coefficient.
//!
//! Reducers accept any number of numeric arguments, including zero. An empty
//! argument list is not an error: `min`/`max`/`avg` return NaN by policy,
//! `sum` returns 0. NaN propagates through every reducer, never silently
//! ignored.

use super::bases::{expect_all_numeric, numeric_reducer, two_numeric_fallible};
use super::{FunctionRegistry, TypeRule};
use crate::errors::{EvalError, ExpressionError};
use crate::types::ExprType;
use std::sync::Arc;

fn reduce_min(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn reduce_max(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn reduce_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn reduce_avg(values: &[f64]) -> f64 {
    // 0/0 for the empty list, i.e. NaN.
    reduce_sum(values) / values.len() as f64
}

/// Binomial coefficient "n choose k", computed multiplicatively.
///
/// `k > n` returns 0; NaN or infinite input returns NaN; negative `n` or `k`
/// is a non-negative-argument expression error.
fn binomial(n: f64, k: f64) -> Result<f64, EvalError> {
    if n.is_nan() || k.is_nan() || n.is_infinite() || k.is_infinite() {
        return Ok(f64::NAN);
    }
    let n = n.trunc() as i64;
    let k = k.trunc() as i64;
    if n < 0 || k < 0 {
        return Err(ExpressionError::NonNegativeArgument {
            function: "binomial".to_string(),
        }
        .into());
    }
    if k > n {
        return Ok(0.0);
    }
    let k = k.min(n - k);
    let mut acc = 1.0f64;
    for i in 0..k {
        acc = acc * (n - i) as f64 / (i + 1) as f64;
    }
    Ok(acc.round())
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(numeric_reducer("min", "functions.statistical.min", reduce_min));
    registry.register(numeric_reducer("max", "functions.statistical.max", reduce_max));
    registry.register(numeric_reducer("sum", "functions.statistical.sum", reduce_sum));
    registry.register(numeric_reducer("avg", "functions.statistical.avg", reduce_avg));

    let numeric_pair: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        Ok(ExprType::Double)
    });
    registry.register(two_numeric_fallible(
        "binomial",
        "functions.statistical.binomial",
        numeric_pair,
        binomial,
    ));
}

#[cfg(test)]
#[path = "statistical_test.rs"]
mod statistical_test;
