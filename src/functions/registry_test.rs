use super::*;
use crate::errors::ExpressionError;
use crate::evaluator::{Callable, NumericFn};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn noop_descriptor(name: &str) -> FunctionDescriptor {
    let type_rule: TypeRule = Arc::new(|_, _| Ok(ExprType::Double));
    let builder: KernelBuilder = Arc::new(|_, ty, _| {
        let f: NumericFn = Rc::new(|| Ok(0.0));
        Ok(Evaluator::new(ty, false, Callable::Numeric(f)))
    });
    FunctionDescriptor::new(name, "test.noop", Arity::Exactly(0), type_rule, builder)
}

#[test]
fn lookup_is_case_sensitive() {
    let mut registry = FunctionRegistry::new();
    registry.register(noop_descriptor("Upper"));
    assert!(registry.lookup("Upper").is_some());
    assert!(registry.lookup("upper").is_none());
}

#[test]
fn registering_a_name_again_shadows_it() {
    let mut registry = FunctionRegistry::new();
    registry.register(noop_descriptor("f"));
    let first = registry.lookup("f").unwrap();
    assert!(first.is_deterministic());

    registry.register(noop_descriptor("f").non_deterministic());
    let second = registry.lookup("f").unwrap();
    assert!(!second.is_deterministic());
}

#[test]
fn builtins_cover_the_operator_set() {
    let registry = FunctionRegistry::with_builtins();
    for name in ["+", "-", "*", "/", "%", "^", "&&", "||", "!", "==", "<"] {
        assert!(registry.lookup(name).is_some(), "missing builtin '{name}'");
    }
    for name in ["min", "max", "binomial", "floor", "round", "abs", "upper", "rand"] {
        assert!(registry.lookup(name).is_some(), "missing builtin '{name}'");
    }
}

#[test]
fn default_registry_is_shared() {
    let a = default_registry();
    let b = default_registry();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn arity_bounds() {
    assert!(Arity::Exactly(2).accepts(2));
    assert!(!Arity::Exactly(2).accepts(1));
    assert!(Arity::Between(1, 2).accepts(1));
    assert!(Arity::Between(1, 2).accepts(2));
    assert!(!Arity::Between(1, 2).accepts(3));
    assert!(Arity::Any.accepts(0));
    assert_eq!(Arity::Between(1, 2).to_string(), "between 1 and 2");
}

#[test]
fn arity_violations_name_the_function() {
    let registry = FunctionRegistry::with_builtins();
    let floor = registry.lookup("floor").unwrap();
    let err = floor
        .resolve_type(&[ExprType::Integer, ExprType::Integer])
        .expect_err("floor takes one argument");
    assert_eq!(
        err,
        ExpressionError::WrongNumberOfArguments {
            function: "floor".to_string(),
            expected: "exactly 1".to_string(),
            found: 2,
        }
    );
}

#[test]
fn doc_keys_are_present_metadata() {
    let registry = FunctionRegistry::with_builtins();
    let max = registry.lookup("max").unwrap();
    assert_eq!(max.doc_key(), "functions.statistical.max");
}
