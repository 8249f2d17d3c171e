//! Logical operators over nullable booleans.
//!
//! Three-valued semantics: `false && missing` is false, `true || missing` is
//! true; otherwise a missing operand makes the result missing.

use super::bases::{expect_all_boolean, into_one, into_two};
use super::{Arity, FunctionDescriptor, FunctionRegistry, KernelBuilder, TypeRule};
use crate::evaluator::{BooleanFn, Callable, Evaluator};
use crate::types::ExprType;
use std::rc::Rc;
use std::sync::Arc;

fn boolean_rule() -> TypeRule {
    Arc::new(|desc, inputs| {
        expect_all_boolean(desc, inputs)?;
        Ok(ExprType::Boolean)
    })
}

fn and() -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let (left, right) = into_two(args);
        let f: BooleanFn = Rc::new(move || {
            Ok(match (left.call_boolean()?, right.call_boolean()?) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            })
        });
        Ok(Evaluator::new(ty, false, Callable::Boolean(f)))
    });
    FunctionDescriptor::new(
        "&&",
        "functions.logical.and",
        Arity::Exactly(2),
        boolean_rule(),
        builder,
    )
}

fn or() -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let (left, right) = into_two(args);
        let f: BooleanFn = Rc::new(move || {
            Ok(match (left.call_boolean()?, right.call_boolean()?) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            })
        });
        Ok(Evaluator::new(ty, false, Callable::Boolean(f)))
    });
    FunctionDescriptor::new(
        "||",
        "functions.logical.or",
        Arity::Exactly(2),
        boolean_rule(),
        builder,
    )
}

fn not() -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let arg = into_one(args);
        let f: BooleanFn = Rc::new(move || Ok(arg.call_boolean()?.map(|v| !v)));
        Ok(Evaluator::new(ty, false, Callable::Boolean(f)))
    });
    FunctionDescriptor::new(
        "!",
        "functions.logical.not",
        Arity::Exactly(1),
        boolean_rule(),
        builder,
    )
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(and());
    registry.register(or());
    registry.register(not());
}
