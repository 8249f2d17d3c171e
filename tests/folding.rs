//! Constant-folding behavior observed through the public facade.

use formic::api::Engine;
use formic::context::ResolutionContext;
use formic::errors::{EvalError, ExpressionError};
use formic::evaluator::{Callable, Evaluator, NumericFn};
use formic::functions::{Arity, FunctionDescriptor, FunctionRegistry, KernelBuilder, TypeRule};
use formic::types::ExprType;
use formic::values::Value;
use pretty_assertions::assert_eq;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod common;
use common::{Column, Table};

fn empty_context() -> ResolutionContext {
    ResolutionContext::builder().build()
}

/// Registry with an extra `slow(x)` function whose kernel counts its
/// invocations, standing in for an expensive deterministic computation.
fn counting_registry() -> (Arc<FunctionRegistry>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let type_rule: TypeRule = Arc::new(|desc, inputs| {
        if inputs.iter().any(|ty| !ty.is_numeric()) {
            return Err(desc.wrong_type("numerical", inputs[0]));
        }
        Ok(ExprType::Double)
    });
    let builder: KernelBuilder = Arc::new(move |_desc, ty, mut args| {
        let arg = args.pop().ok_or_else(|| EvalError::fatal("missing argument"))?;
        let counter = Arc::clone(&counter);
        let f: NumericFn = Rc::new(move || {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(arg.call_numeric()? + 100.0)
        });
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });

    let mut registry = FunctionRegistry::with_builtins();
    registry.register(FunctionDescriptor::new(
        "slow",
        "tests.slow",
        Arity::Exactly(1),
        type_rule,
        builder,
    ));
    (Arc::new(registry), calls)
}

#[test]
fn literal_expressions_fold_to_constants() {
    let expr = Engine::default()
        .compile("sqrt(2) * (10 - 3)", &empty_context())
        .unwrap();
    assert!(expr.is_constant());
}

#[test]
fn variables_participate_in_folding() {
    let context = ResolutionContext::builder()
        .variable("base", Value::Integer(10))
        .build();
    let expr = Engine::default().compile("base * base", &context).unwrap();
    assert!(expr.is_constant());
    assert_eq!(expr.evaluate_numerical().unwrap(), 100.0);
}

#[test]
fn column_references_block_folding() {
    let table = Table::new(vec![("x", Column::Double(vec![1.0]))]);
    let context = ResolutionContext::builder().resolver(table).build();
    let expr = Engine::default().compile("x + 1", &context).unwrap();
    assert!(!expr.is_constant());
}

#[test]
fn constant_application_evaluates_once_at_compile_time() {
    let (registry, calls) = counting_registry();
    let expr = Engine::with_registry(registry)
        .compile("slow(1) + slow(2)", &empty_context())
        .unwrap();

    assert!(expr.is_constant());
    assert_eq!(calls.load(Ordering::Relaxed), 2);

    for _ in 0..10 {
        assert_eq!(expr.evaluate_numerical().unwrap(), 203.0);
    }
    assert_eq!(calls.load(Ordering::Relaxed), 2, "no per-row recomputation");
}

#[test]
fn constant_operand_of_a_dynamic_application_folds_too() {
    let table = Table::new(vec![("x", Column::Double(vec![5.0, 6.0]))]);
    let context = ResolutionContext::builder()
        .resolver(table.clone())
        .build();
    let (registry, calls) = counting_registry();

    let expr = Engine::with_registry(registry)
        .compile("x + slow(1)", &context)
        .unwrap();
    assert!(!expr.is_constant());
    assert_eq!(calls.load(Ordering::Relaxed), 1, "folded during compilation");

    table.seek(0);
    assert_eq!(expr.evaluate_numerical().unwrap(), 106.0);
    table.seek(1);
    assert_eq!(expr.evaluate_numerical().unwrap(), 107.0);
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn non_deterministic_functions_never_fold() {
    let expr = Engine::default()
        .compile("rand(3) + 0", &empty_context())
        .unwrap();
    assert!(!expr.is_constant());
    let a = expr.evaluate_numerical().unwrap();
    let b = expr.evaluate_numerical().unwrap();
    assert_ne!(a, b, "seeded stream advances per evaluation");
}

#[test]
fn type_errors_in_custom_functions_surface_at_compile_time() {
    let (registry, _) = counting_registry();
    let err = Engine::with_registry(registry)
        .compile("slow(\"text\")", &empty_context())
        .expect_err("should fail");
    assert!(matches!(
        err,
        formic::errors::Error::Expression(ExpressionError::WrongTypeOfArgument { .. })
    ));
}
