//! Text functions.
//!
//! A missing input makes the result missing; `len` reports a missing text as
//! NaN through the numeric channel.

use super::bases::{expect_all_text, into_one, into_two};
use super::{Arity, FunctionDescriptor, FunctionRegistry, KernelBuilder, TypeRule};
use crate::evaluator::{BooleanFn, Callable, Evaluator, NumericFn, TextFn};
use crate::types::ExprType;
use std::rc::Rc;
use std::sync::Arc;

fn text_rule(result: ExprType) -> TypeRule {
    Arc::new(move |desc, inputs| {
        expect_all_text(desc, inputs)?;
        Ok(result)
    })
}

fn one_text(
    name: &'static str,
    doc_key: &'static str,
    kernel: fn(&str) -> String,
) -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let arg = into_one(args);
        let f: TextFn = Rc::new(move || Ok(arg.call_text()?.map(|s| kernel(&s))));
        Ok(Evaluator::new(ty, false, Callable::Text(f)))
    });
    FunctionDescriptor::new(
        name,
        doc_key,
        Arity::Exactly(1),
        text_rule(ExprType::Text),
        builder,
    )
}

fn concat() -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let args: Vec<Evaluator> = args.into_vec();
        let f: TextFn = Rc::new(move || {
            let mut out = String::new();
            for arg in &args {
                match arg.call_text()? {
                    Some(s) => out.push_str(&s),
                    None => return Ok(None),
                }
            }
            Ok(Some(out))
        });
        Ok(Evaluator::new(ty, false, Callable::Text(f)))
    });
    FunctionDescriptor::new(
        "concat",
        "functions.text.concat",
        Arity::Any,
        text_rule(ExprType::Text),
        builder,
    )
}

fn len() -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let arg = into_one(args);
        let f: NumericFn = Rc::new(move || {
            Ok(arg
                .call_text()?
                .map_or(f64::NAN, |s| s.chars().count() as f64))
        });
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(
        "len",
        "functions.text.len",
        Arity::Exactly(1),
        text_rule(ExprType::Integer),
        builder,
    )
}

fn contains() -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let (haystack, needle) = into_two(args);
        let f: BooleanFn = Rc::new(move || {
            Ok(match (haystack.call_text()?, needle.call_text()?) {
                (Some(h), Some(n)) => Some(h.contains(&n)),
                _ => None,
            })
        });
        Ok(Evaluator::new(ty, false, Callable::Boolean(f)))
    });
    FunctionDescriptor::new(
        "contains",
        "functions.text.contains",
        Arity::Exactly(2),
        text_rule(ExprType::Boolean),
        builder,
    )
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(one_text("upper", "functions.text.upper", |s| {
        s.to_uppercase()
    }));
    registry.register(one_text("lower", "functions.text.lower", |s| {
        s.to_lowercase()
    }));
    registry.register(one_text("trim", "functions.text.trim", |s| {
        s.trim().to_string()
    }));
    registry.register(concat());
    registry.register(len());
    registry.register(contains());
}
