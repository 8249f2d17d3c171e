//! Bitwise functions.
//!
//! Strictly integer: applying any of these to a non-integer input is a type
//! error naming the function and the "integer" family, never a silent cast.

use super::bases::{expect_all_integer, into_one, into_two};
use super::{Arity, FunctionDescriptor, FunctionRegistry, KernelBuilder, TypeRule};
use crate::evaluator::{Callable, Evaluator, NumericFn};
use crate::types::ExprType;
use std::rc::Rc;
use std::sync::Arc;

fn two_integer(
    name: &'static str,
    doc_key: &'static str,
    kernel: fn(i64, i64) -> i64,
) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_integer(desc, inputs)?;
        Ok(ExprType::Integer)
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let (left, right) = into_two(args);
        // Integer-typed evaluators hold exact integers in the numeric channel.
        let f: NumericFn = Rc::new(move || {
            let a = left.call_numeric()? as i64;
            let b = right.call_numeric()? as i64;
            Ok(kernel(a, b) as f64)
        });
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Exactly(2), type_rule, builder)
}

fn bit_not() -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_integer(desc, inputs)?;
        Ok(ExprType::Integer)
    });
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let arg = into_one(args);
        let f: NumericFn = Rc::new(move || Ok(!(arg.call_numeric()? as i64) as f64));
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(
        "bit_not",
        "functions.bitwise.not",
        Arity::Exactly(1),
        type_rule,
        builder,
    )
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(two_integer("bit_and", "functions.bitwise.and", |a, b| a & b));
    registry.register(two_integer("bit_or", "functions.bitwise.or", |a, b| a | b));
    registry.register(two_integer("bit_xor", "functions.bitwise.xor", |a, b| a ^ b));
    registry.register(bit_not());
}
