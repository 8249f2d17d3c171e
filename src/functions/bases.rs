//! Composable constructors for the common function shapes.
//!
//! The library's functions fall into a handful of shapes: one double input,
//! two double inputs (fixed or unfixed arity), and arbitrary-arity numeric
//! reducers. Each shape is a constructor taking the numeric kernel, so
//! concrete functions are one-liners in their family modules.
//!
//! Two-input builders fold at operand granularity: per combination of which
//! operands are constant, the constant side is evaluated once at build time
//! and only the row-dependent side is deferred. This is finer-grained than
//! the compiler's whole-node folding and independent of it.

use super::{ArgVec, Arity, FunctionDescriptor, KernelBuilder, TypeRule};
use crate::errors::{EvalError, ExpressionError};
use crate::evaluator::{Callable, Evaluator, NumericFn};
use crate::types::{promote_numeric, ExprType};
use smallvec::SmallVec;
use std::rc::Rc;
use std::sync::Arc;

// ============================================================================
// Type-rule helpers
// ============================================================================

pub(crate) fn expect_all_numeric(
    desc: &FunctionDescriptor,
    inputs: &[ExprType],
) -> Result<(), ExpressionError> {
    for &ty in inputs {
        if !ty.is_numeric() {
            return Err(desc.wrong_type("numerical", ty));
        }
    }
    Ok(())
}

pub(crate) fn expect_all_integer(
    desc: &FunctionDescriptor,
    inputs: &[ExprType],
) -> Result<(), ExpressionError> {
    for &ty in inputs {
        if ty != ExprType::Integer {
            return Err(desc.wrong_type("integer", ty));
        }
    }
    Ok(())
}

pub(crate) fn expect_all_boolean(
    desc: &FunctionDescriptor,
    inputs: &[ExprType],
) -> Result<(), ExpressionError> {
    for &ty in inputs {
        if ty != ExprType::Boolean {
            return Err(desc.wrong_type("boolean", ty));
        }
    }
    Ok(())
}

pub(crate) fn expect_all_text(
    desc: &FunctionDescriptor,
    inputs: &[ExprType],
) -> Result<(), ExpressionError> {
    for &ty in inputs {
        if ty != ExprType::Text {
            return Err(desc.wrong_type("text", ty));
        }
    }
    Ok(())
}

/// Generic arithmetic promotion: integer pairs stay integer, any other
/// numeric combination widens to double.
pub(crate) fn promotion_rule(
    desc: &FunctionDescriptor,
    inputs: &[ExprType],
) -> Result<ExprType, ExpressionError> {
    expect_all_numeric(desc, inputs)?;
    Ok(promote_numeric(inputs[0], inputs[1]).expect("both inputs checked numeric"))
}

// ============================================================================
// One double input
// ============================================================================

/// One numeric argument, always returning double.
pub fn one_numeric(
    name: &'static str,
    doc_key: &'static str,
    kernel: fn(f64) -> f64,
) -> FunctionDescriptor {
    one_numeric_typed(name, doc_key, |_, _| Ok(ExprType::Double), kernel)
}

/// One numeric argument, preserving the input's numeric subtype (integer
/// stays integer). Used by `abs` and unary negation.
pub fn one_numeric_preserving(
    name: &'static str,
    doc_key: &'static str,
    kernel: fn(f64) -> f64,
) -> FunctionDescriptor {
    one_numeric_typed(name, doc_key, |_, inputs| Ok(inputs[0]), kernel)
}

fn one_numeric_typed(
    name: &'static str,
    doc_key: &'static str,
    result: fn(&FunctionDescriptor, &[ExprType]) -> Result<ExprType, ExpressionError>,
    kernel: fn(f64) -> f64,
) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(move |desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        result(desc, inputs)
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let arg = into_one(args);
        let f: NumericFn = Rc::new(move || Ok(kernel(arg.call_numeric()?)));
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Exactly(1), type_rule, builder)
}

// ============================================================================
// Two double inputs
// ============================================================================

/// Two numeric arguments with the generic promotion rule.
pub fn two_numeric(
    name: &'static str,
    doc_key: &'static str,
    kernel: fn(f64, f64) -> f64,
) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(promotion_rule);
    two_numeric_with_rule(name, doc_key, type_rule, kernel)
}

/// Two numeric arguments with a caller-supplied type rule. Division uses
/// this to always return double regardless of input subtypes.
pub fn two_numeric_with_rule(
    name: &'static str,
    doc_key: &'static str,
    type_rule: TypeRule,
    kernel: fn(f64, f64) -> f64,
) -> FunctionDescriptor {
    two_numeric_fallible(name, doc_key, type_rule, move |a, b| Ok(kernel(a, b)))
}

/// Two numeric arguments whose kernel can fail at row time (e.g. binomial's
/// non-negative check). Build-time pre-evaluation of constant operands
/// surfaces such failures at compile time.
pub fn two_numeric_fallible(
    name: &'static str,
    doc_key: &'static str,
    type_rule: TypeRule,
    kernel: impl Fn(f64, f64) -> Result<f64, EvalError> + Copy + Send + Sync + 'static,
) -> FunctionDescriptor {
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let (left, right) = into_two(args);
        Ok(Evaluator::new(
            ty,
            false,
            Callable::Numeric(build_two_numeric(kernel, left, right)?),
        ))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Exactly(2), type_rule, builder)
}

/// The per-operand folding core shared by the two-input shapes.
pub(crate) fn build_two_numeric(
    kernel: impl Fn(f64, f64) -> Result<f64, EvalError> + Copy + 'static,
    left: Evaluator,
    right: Evaluator,
) -> Result<NumericFn, EvalError> {
    let f: NumericFn = match (left.is_constant(), right.is_constant()) {
        (true, true) => {
            let value = kernel(left.call_numeric()?, right.call_numeric()?)?;
            Rc::new(move || Ok(value))
        }
        (true, false) => {
            let l = left.call_numeric()?;
            Rc::new(move || kernel(l, right.call_numeric()?))
        }
        (false, true) => {
            let r = right.call_numeric()?;
            Rc::new(move || kernel(left.call_numeric()?, r))
        }
        (false, false) => Rc::new(move || kernel(left.call_numeric()?, right.call_numeric()?)),
    };
    Ok(f)
}

/// Binary operator that doubles as a unary operator when applied to one
/// argument, selected by arity at dispatch time. Subtraction is the only
/// built-in of this shape: `7 - 3` and `-(5)` share one descriptor.
pub fn binary_or_unary_numeric(
    name: &'static str,
    doc_key: &'static str,
    unary_kernel: fn(f64) -> f64,
    binary_kernel: fn(f64, f64) -> f64,
) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        match inputs.len() {
            // Unary negation preserves the numeric subtype.
            1 => Ok(inputs[0]),
            _ => promotion_rule(desc, inputs),
        }
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let f = if args.len() == 1 {
            let arg = into_one(args);
            Rc::new(move || Ok(unary_kernel(arg.call_numeric()?))) as NumericFn
        } else {
            let (left, right) = into_two(args);
            build_two_numeric(move |a, b| Ok(binary_kernel(a, b)), left, right)?
        };
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Between(1, 2), type_rule, builder)
}

// ============================================================================
// Arbitrary-arity numeric input
// ============================================================================

/// Variable-length numeric argument list reduced by `reduce`. Zero arguments
/// are allowed; the reduction decides the empty-list value (NaN by policy for
/// min/max/avg, 0 for sum).
pub fn numeric_reducer(
    name: &'static str,
    doc_key: &'static str,
    reduce: fn(&[f64]) -> f64,
) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        expect_all_numeric(desc, inputs)?;
        Ok(ExprType::Double)
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, args| {
        let args: Vec<Evaluator> = args.into_vec();
        let f: NumericFn = Rc::new(move || {
            let mut values: SmallVec<[f64; 8]> = SmallVec::with_capacity(args.len());
            for arg in &args {
                values.push(arg.call_numeric()?);
            }
            Ok(reduce(&values))
        });
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(name, doc_key, Arity::Any, type_rule, builder)
}

// ============================================================================
// Argument plumbing
// ============================================================================

pub(crate) fn into_one(args: ArgVec) -> Evaluator {
    let mut iter = args.into_iter();
    iter.next().expect("arity checked before build")
}

pub(crate) fn into_two(args: ArgVec) -> (Evaluator, Evaluator) {
    let mut iter = args.into_iter();
    let left = iter.next().expect("arity checked before build");
    let right = iter.next().expect("arity checked before build");
    (left, right)
}
