//! Rounding functions.
//!
//! `floor`, `ceil` and one-argument `round` return integer; the two-argument
//! `round(x, digits)` returns double. `round` selects its type rule by the
//! arity actually seen, not a fixed signature.

use super::bases::{expect_all_numeric, into_one, into_two, one_numeric_preserving};
use super::{Arity, FunctionDescriptor, FunctionRegistry, KernelBuilder, TypeRule};
use crate::evaluator::{Callable, Evaluator, NumericFn};
use crate::types::ExprType;
use std::rc::Rc;
use std::sync::Arc;

fn to_integer(
    name: &'static str,
    doc_key: &'static str,
    kernel: fn(f64) -> f64,
) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        Ok(ExprType::Integer)
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let arg = into_one(args);
        let f: NumericFn = Rc::new(move || Ok(kernel(arg.call_numeric()?)));
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Exactly(1), type_rule, builder)
}

fn round() -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        match inputs.len() {
            1 => Ok(ExprType::Integer),
            _ => Ok(ExprType::Double),
        }
    });
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let f: NumericFn = if args.len() == 1 {
            let arg = into_one(args);
            Rc::new(move || Ok(arg.call_numeric()?.round()))
        } else {
            let (value, digits) = into_two(args);
            Rc::new(move || {
                let scale = 10f64.powi(digits.call_numeric()? as i32);
                Ok((value.call_numeric()? * scale).round() / scale)
            })
        };
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(
        "round",
        "functions.rounding.round",
        Arity::Between(1, 2),
        type_rule,
        builder,
    )
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(to_integer("floor", "functions.rounding.floor", f64::floor));
    registry.register(to_integer("ceil", "functions.rounding.ceil", f64::ceil));
    registry.register(round());
    // Round half to even, preserving the numeric subtype.
    registry.register(one_numeric_preserving(
        "rint",
        "functions.rounding.rint",
        |v| {
            let rounded = v.round();
            if (v - v.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
                rounded - v.signum()
            } else {
                rounded
            }
        },
    ));
}
