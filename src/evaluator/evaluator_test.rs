use super::*;
use pretty_assertions::assert_eq;
use std::cell::Cell;

#[test]
fn constant_evaluators_report_their_type() {
    let ev = Evaluator::constant(Value::Integer(5));
    assert_eq!(ev.ty(), ExprType::Integer);
    assert!(ev.is_constant());
    assert_eq!(ev.call_numeric().unwrap(), 5.0);
}

#[test]
fn wrong_callable_is_a_fatal_error() {
    let ev = Evaluator::constant(Value::Integer(5));
    let err = ev.call_boolean().expect_err("should fail");
    assert!(matches!(err, EvalError::Fatal(_)));
}

#[test]
fn folding_invokes_the_thunk_exactly_once() {
    let calls = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&calls);
    let ev = Evaluator::new(
        ExprType::Double,
        true,
        Callable::Numeric(Rc::new(move || {
            counter.set(counter.get() + 1);
            Ok(1.5)
        })),
    );

    let folded = ev.folded().expect("folding should succeed");
    assert_eq!(calls.get(), 1);

    for _ in 0..3 {
        assert_eq!(folded.call_numeric().unwrap(), 1.5);
    }
    assert_eq!(calls.get(), 1, "folded value must not recompute");
}

#[test]
fn debug_output_shows_type_and_constness() {
    let ev = Evaluator::constant(Value::Integer(5));
    let rendered = format!("{ev:?}");
    assert!(rendered.contains("Integer"));
    assert!(rendered.contains("constant: true"));
}

#[test]
fn folding_propagates_evaluation_errors() {
    let ev = Evaluator::new(
        ExprType::Double,
        true,
        Callable::Numeric(Rc::new(|| Err(EvalError::fatal("kernel defect")))),
    );
    assert!(ev.folded().is_err());
}
