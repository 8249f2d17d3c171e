//! Random-number generation: the documented exception to evaluation purity.
//!
//! `rand()` draws from a generator seeded once from entropy when the
//! expression is compiled; `rand(seed)` with a constant seed builds one
//! seeded generator at compile time and advances it per row. With a
//! non-constant seed a fresh generator is constructed for every row, which
//! is intentionally more expensive and not optimized away.
//!
//! The descriptor is non-deterministic: its nodes are never constant and
//! never folded, even with literal inputs.

use super::bases::{expect_all_numeric, into_one};
use super::{Arity, FunctionDescriptor, FunctionRegistry, KernelBuilder, TypeRule};
use crate::evaluator::{Callable, Evaluator, NumericFn};
use crate::types::ExprType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn rand_descriptor() -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        Ok(ExprType::Double)
    });
    let builder: KernelBuilder = Arc::new(|_desc, ty, args| {
        let f: NumericFn = if args.is_empty() {
            let rng = Rc::new(RefCell::new(StdRng::from_entropy()));
            Rc::new(move || Ok(rng.borrow_mut().r#gen::<f64>()))
        } else {
            let seed = into_one(args);
            if seed.is_constant() {
                let rng = Rc::new(RefCell::new(StdRng::seed_from_u64(
                    seed.call_numeric()? as u64,
                )));
                Rc::new(move || Ok(rng.borrow_mut().r#gen::<f64>()))
            } else {
                Rc::new(move || {
                    let mut rng = StdRng::seed_from_u64(seed.call_numeric()? as u64);
                    Ok(rng.r#gen::<f64>())
                })
            }
        };
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(
        "rand",
        "functions.random.rand",
        Arity::Between(0, 1),
        type_rule,
        builder,
    )
    .non_deterministic()
}

pub fn register(registry: &mut FunctionRegistry) {
    registry.register(rand_descriptor());
}
