//! Compiled expression handle.

use crate::errors::Error;
use crate::evaluator::Evaluator;
use crate::types::ExprType;
use chrono::{DateTime, NaiveTime, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// A compiled, type-resolved formula.
///
/// The expression's type is fixed at compile time; callers inspect it with
/// [`expression_type`](Expression::expression_type) and then call the one
/// matching `evaluate_*` accessor once per row. Calling an accessor that
/// does not match the resolved type is a caller bug and fails with
/// [`Error::Usage`] without evaluating anything.
///
/// Numerical expressions (both `integer` and `real`) are read through
/// [`evaluate_numerical`](Expression::evaluate_numerical); a missing value
/// surfaces as NaN. The remaining accessors return `Option`, with `None` for
/// a missing value.
///
/// Evaluation reads "the current row" through the resolver captured at
/// compile time. Advancing the row cursor, and polling a
/// [`StopChecker`](crate::context::StopChecker) between rows, is the
/// caller's loop.
pub struct Expression {
    source: String,
    root: Evaluator,
}

impl Expression {
    pub(crate) fn new(source: String, root: Evaluator) -> Self {
        Self { source, root }
    }

    /// The formula text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The resolved result type.
    pub fn expression_type(&self) -> ExprType {
        self.root.ty()
    }

    /// Whether the whole formula folded to a constant at compile time.
    ///
    /// Constant expressions return the same value on every call without
    /// re-evaluating.
    pub fn is_constant(&self) -> bool {
        self.root.is_constant()
    }

    /// Evaluate a numerical (`real` or `integer`) expression at the current
    /// row. A missing value is NaN.
    pub fn evaluate_numerical(&self) -> Result<f64, Error> {
        match self.expression_type() {
            ExprType::Double | ExprType::Integer => Ok(self.root.call_numeric()?),
            other => Err(self.usage("numerical", other)),
        }
    }

    /// Evaluate a `boolean` expression at the current row.
    pub fn evaluate_boolean(&self) -> Result<Option<bool>, Error> {
        match self.expression_type() {
            ExprType::Boolean => Ok(self.root.call_boolean()?),
            other => Err(self.usage("boolean", other)),
        }
    }

    /// Evaluate a `text` expression at the current row.
    pub fn evaluate_text(&self) -> Result<Option<String>, Error> {
        match self.expression_type() {
            ExprType::Text => Ok(self.root.call_text()?),
            other => Err(self.usage("text", other)),
        }
    }

    /// Evaluate a `date-time` expression at the current row.
    pub fn evaluate_instant(&self) -> Result<Option<DateTime<Utc>>, Error> {
        match self.expression_type() {
            ExprType::Instant => Ok(self.root.call_instant()?),
            other => Err(self.usage("date-time", other)),
        }
    }

    /// Evaluate a `time` expression at the current row.
    pub fn evaluate_local_time(&self) -> Result<Option<NaiveTime>, Error> {
        match self.expression_type() {
            ExprType::LocalTime => Ok(self.root.call_local_time()?),
            other => Err(self.usage("time", other)),
        }
    }

    /// Evaluate a `text-set` expression at the current row.
    pub fn evaluate_text_set(&self) -> Result<Option<BTreeSet<String>>, Error> {
        match self.expression_type() {
            ExprType::TextSet => Ok(self.root.call_text_set()?),
            other => Err(self.usage("text-set", other)),
        }
    }

    /// Evaluate a `text-list` expression at the current row.
    pub fn evaluate_text_list(&self) -> Result<Option<Vec<String>>, Error> {
        match self.expression_type() {
            ExprType::TextList => Ok(self.root.call_text_list()?),
            other => Err(self.usage("text-list", other)),
        }
    }

    fn usage(&self, requested: &str, actual: ExprType) -> Error {
        Error::Usage(format!(
            "requested {requested} evaluation of a {actual} expression"
        ))
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("source", &self.source)
            .field("type", &self.expression_type())
            .field("constant", &self.is_constant())
            .finish()
    }
}
