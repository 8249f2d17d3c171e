//! The constant-folding runtime: per-type callables invoked at row time.
//!
//! A compiled node is an [`Evaluator`]: its resolved type, a constant flag,
//! and exactly one populated [`Callable`] variant matching that type. A
//! callable is either a fixed precomputed value or a thunk recomputing from
//! child callables. Numeric covers both the double and integer types; integer
//! nodes evaluate through the numeric callable.
//!
//! Callables may close over child callables and over resolver handles, but
//! never mutate resolver state; only the caller advances the row cursor
//! between invocations.

use crate::errors::EvalError;
use crate::types::ExprType;
use crate::values::Value;
use chrono::{DateTime, NaiveTime, Utc};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

pub type NumericFn = Rc<dyn Fn() -> Result<f64, EvalError>>;
pub type BooleanFn = Rc<dyn Fn() -> Result<Option<bool>, EvalError>>;
pub type TextFn = Rc<dyn Fn() -> Result<Option<String>, EvalError>>;
pub type InstantFn = Rc<dyn Fn() -> Result<Option<DateTime<Utc>>, EvalError>>;
pub type LocalTimeFn = Rc<dyn Fn() -> Result<Option<NaiveTime>, EvalError>>;
pub type TextSetFn = Rc<dyn Fn() -> Result<Option<BTreeSet<String>>, EvalError>>;
pub type TextListFn = Rc<dyn Fn() -> Result<Option<Vec<String>>, EvalError>>;

/// The per-type callable of a compiled node.
#[derive(Clone)]
pub enum Callable {
    Numeric(NumericFn),
    Boolean(BooleanFn),
    Text(TextFn),
    Instant(InstantFn),
    LocalTime(LocalTimeFn),
    TextSet(TextSetFn),
    TextList(TextListFn),
}

/// A compiled, lazily-evaluated expression node.
#[derive(Clone)]
pub struct Evaluator {
    ty: ExprType,
    constant: bool,
    callable: Callable,
}

impl Evaluator {
    pub fn new(ty: ExprType, constant: bool, callable: Callable) -> Self {
        debug_assert!(callable_matches(ty, &callable));
        Self {
            ty,
            constant,
            callable,
        }
    }

    /// Build a fixed-value evaluator from a known constant.
    pub fn constant(value: Value) -> Self {
        let ty = value.expr_type();
        let callable = match value {
            Value::Double(v) => Callable::Numeric(Rc::new(move || Ok(v))),
            Value::Integer(v) => Callable::Numeric(Rc::new(move || Ok(v as f64))),
            Value::Boolean(v) => Callable::Boolean(Rc::new(move || Ok(v))),
            Value::Text(v) => Callable::Text(Rc::new(move || Ok(v.clone()))),
            Value::Instant(v) => Callable::Instant(Rc::new(move || Ok(v))),
            Value::LocalTime(v) => Callable::LocalTime(Rc::new(move || Ok(v))),
            Value::TextSet(v) => Callable::TextSet(Rc::new(move || Ok(v.clone()))),
            Value::TextList(v) => Callable::TextList(Rc::new(move || Ok(v.clone()))),
        };
        Self {
            ty,
            constant: true,
            callable,
        }
    }

    pub fn ty(&self) -> ExprType {
        self.ty
    }

    /// True iff the value cannot change across rows: all inputs were constant
    /// and the producing function is deterministic.
    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Mark the evaluator constant or row-dependent. Used by the compiler,
    /// which knows the producing function's determinism.
    pub(crate) fn set_constant(&mut self, constant: bool) {
        self.constant = constant;
    }

    /// Invoke the numeric callable. Internal callers only reach this after
    /// type resolution proved the node numeric; a mismatch is a defect.
    pub fn call_numeric(&self) -> Result<f64, EvalError> {
        match &self.callable {
            Callable::Numeric(f) => f(),
            _ => Err(self.mismatch("numeric")),
        }
    }

    pub fn call_boolean(&self) -> Result<Option<bool>, EvalError> {
        match &self.callable {
            Callable::Boolean(f) => f(),
            _ => Err(self.mismatch("boolean")),
        }
    }

    pub fn call_text(&self) -> Result<Option<String>, EvalError> {
        match &self.callable {
            Callable::Text(f) => f(),
            _ => Err(self.mismatch("text")),
        }
    }

    pub fn call_instant(&self) -> Result<Option<DateTime<Utc>>, EvalError> {
        match &self.callable {
            Callable::Instant(f) => f(),
            _ => Err(self.mismatch("instant")),
        }
    }

    pub fn call_local_time(&self) -> Result<Option<NaiveTime>, EvalError> {
        match &self.callable {
            Callable::LocalTime(f) => f(),
            _ => Err(self.mismatch("local-time")),
        }
    }

    pub fn call_text_set(&self) -> Result<Option<BTreeSet<String>>, EvalError> {
        match &self.callable {
            Callable::TextSet(f) => f(),
            _ => Err(self.mismatch("text-set")),
        }
    }

    pub fn call_text_list(&self) -> Result<Option<Vec<String>>, EvalError> {
        match &self.callable {
            Callable::TextList(f) => f(),
            _ => Err(self.mismatch("text-list")),
        }
    }

    /// Evaluate once and snapshot the result into a fixed-value evaluator of
    /// the same type. This is whole-node constant folding: arbitrarily deep
    /// constant sub-expressions collapse into O(1) row-time cost.
    pub fn folded(&self) -> Result<Evaluator, EvalError> {
        let ty = self.ty;
        let callable = match &self.callable {
            Callable::Numeric(f) => {
                let v = f()?;
                Callable::Numeric(Rc::new(move || Ok(v)))
            }
            Callable::Boolean(f) => {
                let v = f()?;
                Callable::Boolean(Rc::new(move || Ok(v)))
            }
            Callable::Text(f) => {
                let v = f()?;
                Callable::Text(Rc::new(move || Ok(v.clone())))
            }
            Callable::Instant(f) => {
                let v = f()?;
                Callable::Instant(Rc::new(move || Ok(v)))
            }
            Callable::LocalTime(f) => {
                let v = f()?;
                Callable::LocalTime(Rc::new(move || Ok(v)))
            }
            Callable::TextSet(f) => {
                let v = f()?;
                Callable::TextSet(Rc::new(move || Ok(v.clone())))
            }
            Callable::TextList(f) => {
                let v = f()?;
                Callable::TextList(Rc::new(move || Ok(v.clone())))
            }
        };
        Ok(Evaluator {
            ty,
            constant: true,
            callable,
        })
    }

    fn mismatch(&self, wanted: &str) -> EvalError {
        EvalError::fatal(format!(
            "evaluator of type {} invoked through the {wanted} callable",
            self.ty
        ))
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator")
            .field("ty", &self.ty)
            .field("constant", &self.constant)
            .finish_non_exhaustive()
    }
}

fn callable_matches(ty: ExprType, callable: &Callable) -> bool {
    matches!(
        (ty, callable),
        (ExprType::Double | ExprType::Integer, Callable::Numeric(_))
            | (ExprType::Boolean, Callable::Boolean(_))
            | (ExprType::Text, Callable::Text(_))
            | (ExprType::Instant, Callable::Instant(_))
            | (ExprType::LocalTime, Callable::LocalTime(_))
            | (ExprType::TextSet, Callable::TextSet(_))
            | (ExprType::TextList, Callable::TextList(_))
    )
}

#[cfg(test)]
#[path = "evaluator_test.rs"]
mod evaluator_test;
