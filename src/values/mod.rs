//! Typed, immutable value holders.
//!
//! Missing values are represented as `NaN` for doubles and `None` for the
//! nullable kinds; integers are never missing.

use crate::types::ExprType;
use chrono::{DateTime, NaiveTime, Utc};
use std::collections::BTreeSet;

/// A single typed value, as supplied by variable tables, scope constants and
/// constant folding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Integer(i64),
    Boolean(Option<bool>),
    Text(Option<String>),
    Instant(Option<DateTime<Utc>>),
    LocalTime(Option<NaiveTime>),
    TextSet(Option<BTreeSet<String>>),
    TextList(Option<Vec<String>>),
}

impl Value {
    pub fn expr_type(&self) -> ExprType {
        match self {
            Value::Double(_) => ExprType::Double,
            Value::Integer(_) => ExprType::Integer,
            Value::Boolean(_) => ExprType::Boolean,
            Value::Text(_) => ExprType::Text,
            Value::Instant(_) => ExprType::Instant,
            Value::LocalTime(_) => ExprType::LocalTime,
            Value::TextSet(_) => ExprType::TextSet,
            Value::TextList(_) => ExprType::TextList,
        }
    }

    /// Convenience constructor for a present text value.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(Some(s.into()))
    }

    /// The text payload, if this is a present text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(Some(s)) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(Some(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::text(v)
    }
}
