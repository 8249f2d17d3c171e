//! Comparison operators.
//!
//! Ordering comparisons require two numeric inputs. Equality additionally
//! accepts text and boolean pairs. The result is always boolean; a missing
//! operand makes the result missing, except through NaN which follows IEEE
//! semantics (`NaN == NaN` is false).

use super::bases::{expect_all_numeric, into_two};
use super::{Arity, FunctionDescriptor, FunctionRegistry, KernelBuilder, TypeRule};
use crate::evaluator::{BooleanFn, Callable, Evaluator};
use crate::types::ExprType;
use std::rc::Rc;
use std::sync::Arc;

fn ordering(
    name: &'static str,
    doc_key: &'static str,
    kernel: fn(f64, f64) -> bool,
) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        Ok(ExprType::Boolean)
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let (left, right) = into_two(args);
        let f: BooleanFn =
            Rc::new(move || Ok(Some(kernel(left.call_numeric()?, right.call_numeric()?))));
        Ok(Evaluator::new(ty, false, Callable::Boolean(f)))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Exactly(2), type_rule, builder)
}

fn equality(name: &'static str, doc_key: &'static str, negated: bool) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        let comparable = (inputs[0].is_numeric() && inputs[1].is_numeric())
            || (inputs[0] == inputs[1]
                && matches!(inputs[0], ExprType::Text | ExprType::Boolean));
        if !comparable {
            let found = if inputs[0].is_numeric() || inputs[0] == inputs[1] {
                inputs[1]
            } else {
                inputs[0]
            };
            return Err(desc.wrong_type("numerical, text or boolean", found));
        }
        Ok(ExprType::Boolean)
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let (left, right) = into_two(args);
        let f: BooleanFn = if left.ty().is_numeric() {
            Rc::new(move || {
                let equal = left.call_numeric()? == right.call_numeric()?;
                Ok(Some(equal != negated))
            })
        } else if left.ty() == ExprType::Text {
            Rc::new(move || {
                let (a, b) = (left.call_text()?, right.call_text()?);
                Ok(match (a, b) {
                    (Some(a), Some(b)) => Some((a == b) != negated),
                    _ => None,
                })
            })
        } else {
            Rc::new(move || {
                let (a, b) = (left.call_boolean()?, right.call_boolean()?);
                Ok(match (a, b) {
                    (Some(a), Some(b)) => Some((a == b) != negated),
                    _ => None,
                })
            })
        };
        Ok(Evaluator::new(ty, false, Callable::Boolean(f)))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Exactly(2), type_rule, builder)
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(equality("==", "functions.comparison.equals", false));
    registry.register(equality("!=", "functions.comparison.not_equals", true));
    registry.register(ordering("<", "functions.comparison.less", |a, b| a < b));
    registry.register(ordering("<=", "functions.comparison.less_equals", |a, b| {
        a <= b
    }));
    registry.register(ordering(">", "functions.comparison.greater", |a, b| a > b));
    registry.register(ordering(
        ">=",
        "functions.comparison.greater_equals",
        |a, b| a >= b,
    ));
}
