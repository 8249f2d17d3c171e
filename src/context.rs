//! Identifier resolution context and cooperative cancellation.
//!
//! A [`ResolutionContext`] bundles the three lookup capabilities the compiler
//! consults, in order of node kind:
//!
//! 1. the column resolver ([`DynamicResolver`]), mapping a name to its type
//!    plus per-row typed reads,
//! 2. the variable table, mapping a name to a constant value,
//! 3. the scope-constant table, likewise by name, with an indirection
//!    form (`#{name}`: a scope constant whose value is itself a column name)
//!    resolved in two hops.

use crate::errors::EvalError;
use crate::types::ExprType;
use crate::values::Value;
use chrono::{DateTime, NaiveTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use std::sync::Arc;

/// Per-row data source for column-referencing identifiers.
///
/// Column reads always refer to "the value at the current row". The row
/// cursor is advanced exclusively by the caller, once per row, between
/// evaluator invocations; compiled evaluators are cursor-agnostic and never
/// mutate resolver state.
///
/// The typed read methods default to a fatal error so implementations only
/// provide the column kinds their table actually has; reaching an
/// unimplemented read signals a defect in the resolver, since the compiler
/// only emits reads for types the resolver itself reported.
pub trait DynamicResolver {
    /// Type of the named column, or `None` if no such column exists.
    fn column_type(&self, name: &str) -> Option<ExprType>;

    fn numeric(&self, name: &str) -> Result<f64, EvalError> {
        Err(self.unsupported(name, "numeric"))
    }

    fn boolean(&self, name: &str) -> Result<Option<bool>, EvalError> {
        Err(self.unsupported(name, "boolean"))
    }

    fn text(&self, name: &str) -> Result<Option<String>, EvalError> {
        Err(self.unsupported(name, "text"))
    }

    fn instant(&self, name: &str) -> Result<Option<DateTime<Utc>>, EvalError> {
        Err(self.unsupported(name, "instant"))
    }

    fn local_time(&self, name: &str) -> Result<Option<NaiveTime>, EvalError> {
        Err(self.unsupported(name, "local-time"))
    }

    fn text_set(&self, name: &str) -> Result<Option<BTreeSet<String>>, EvalError> {
        Err(self.unsupported(name, "text-set"))
    }

    fn text_list(&self, name: &str) -> Result<Option<Vec<String>>, EvalError> {
        Err(self.unsupported(name, "text-list"))
    }

    #[doc(hidden)]
    fn unsupported(&self, name: &str, kind: &str) -> EvalError {
        EvalError::fatal(format!(
            "resolver does not support {kind} reads for column '{name}'"
        ))
    }
}

/// The caller-supplied resolution context consulted during compilation.
pub struct ResolutionContext {
    resolver: Option<Rc<dyn DynamicResolver>>,
    variables: HashMap<String, Value>,
    scope_constants: HashMap<String, Value>,
}

impl ResolutionContext {
    pub fn builder() -> ResolutionContextBuilder {
        ResolutionContextBuilder::default()
    }

    pub fn resolver(&self) -> Option<&Rc<dyn DynamicResolver>> {
        self.resolver.as_ref()
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn scope_constant(&self, name: &str) -> Option<&Value> {
        self.scope_constants.get(name)
    }
}

/// Builder for [`ResolutionContext`].
///
/// # Example
///
/// ```ignore
/// let context = ResolutionContext::builder()
///     .resolver(Rc::new(table))
///     .variable("threshold", Value::Double(0.5))
///     .scope_constant("target", Value::text("label"))
///     .build();
/// ```
#[derive(Default)]
pub struct ResolutionContextBuilder {
    resolver: Option<Rc<dyn DynamicResolver>>,
    variables: HashMap<String, Value>,
    scope_constants: HashMap<String, Value>,
}

impl ResolutionContextBuilder {
    pub fn resolver(mut self, resolver: Rc<dyn DynamicResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn scope_constant(mut self, name: impl Into<String>, value: Value) -> Self {
        self.scope_constants.insert(name.into(), value);
        self
    }

    pub fn build(self) -> ResolutionContext {
        ResolutionContext {
            resolver: self.resolver,
            variables: self.variables,
            scope_constants: self.scope_constants,
        }
    }
}

/// Zero-argument cancellation probe for long row loops.
///
/// The expression engine never polls this itself: a single evaluation is
/// O(tree depth), not O(row count). The table-processing caller is expected
/// to poll between rows and stop the loop when `should_stop` returns true.
#[derive(Clone)]
pub struct StopChecker(Arc<dyn Fn() -> bool + Send + Sync>);

impl StopChecker {
    pub fn new(f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A checker that never requests cancellation.
    pub fn never() -> Self {
        Self(Arc::new(|| false))
    }

    pub fn should_stop(&self) -> bool {
        (self.0)()
    }
}
