//! The compilation engine.

use super::Expression;
use crate::compiler;
use crate::context::ResolutionContext;
use crate::errors::Error;
use crate::functions::{default_registry, FunctionRegistry};
use crate::parser;
use std::sync::Arc;
use tracing::debug;

/// Compiles formula text into [`Expression`] handles.
///
/// The engine owns the function registry consulted during compilation.
/// [`Engine::default`] shares the process-wide builtin registry;
/// [`Engine::with_registry`] takes a custom one, which is how callers add
/// their own functions or shadow builtins.
///
/// # Example
///
/// ```ignore
/// let engine = Engine::default();
/// let context = ResolutionContext::builder()
///     .variable("rate", Value::Double(0.2))
///     .build();
///
/// let expr = engine.compile("(1 + rate) * 100", &context)?;
/// assert!(expr.is_constant());
/// ```
pub struct Engine {
    registry: Arc<FunctionRegistry>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            registry: default_registry(),
        }
    }
}

impl Engine {
    /// Create an engine backed by a custom function registry.
    pub fn with_registry(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this engine compiles against.
    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    /// Parse and compile a formula against a resolution context.
    ///
    /// All parse and type errors surface here, before any row is touched.
    /// The returned expression is fully resolved: its type is fixed and its
    /// constant sub-expressions are already folded.
    pub fn compile(&self, source: &str, context: &ResolutionContext) -> Result<Expression, Error> {
        let parsed = parser::parse(source)?;
        let root = compiler::compile(&self.registry, context, &parsed)?;
        debug!(
            source,
            ty = %root.ty(),
            constant = root.is_constant(),
            "compiled formula"
        );
        Ok(Expression::new(source.to_string(), root))
    }
}
