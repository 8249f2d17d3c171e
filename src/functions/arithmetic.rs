//! Arithmetic operators.
//!
//! Integer pairs stay integer except for division, which always returns
//! double: `4 / 2` has type double and value `2.0`. Subtraction is both the
//! binary minus and the unary negate, selected by arity.

use super::bases::{
    binary_or_unary_numeric, expect_all_numeric, two_numeric, two_numeric_with_rule,
};
use super::{FunctionRegistry, TypeRule};
use crate::types::ExprType;
use std::sync::Arc;

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(two_numeric(
        "+",
        "functions.arithmetic.add",
        |a, b| a + b,
    ));
    registry.register(binary_or_unary_numeric(
        "-",
        "functions.arithmetic.subtract",
        |a| -a,
        |a, b| a - b,
    ));
    registry.register(two_numeric(
        "*",
        "functions.arithmetic.multiply",
        |a, b| a * b,
    ));

    // Division overrides the promotion rule: always double, even for two
    // integers. Division by zero yields infinity or NaN, not an error.
    let always_double: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        Ok(ExprType::Double)
    });
    registry.register(two_numeric_with_rule(
        "/",
        "functions.arithmetic.divide",
        always_double,
        |a, b| a / b,
    ));

    registry.register(two_numeric(
        "%",
        "functions.arithmetic.modulus",
        |a, b| a % b,
    ));
    registry.register(two_numeric(
        "^",
        "functions.arithmetic.power",
        |a, b| a.powf(b),
    ));
    registry.register(two_numeric(
        "pow",
        "functions.arithmetic.power",
        |a, b| a.powf(b),
    ));
}

#[cfg(test)]
#[path = "arithmetic_test.rs"]
mod arithmetic_test;
