//! Formic is a small typed formula language for table data: a formula like
//! `(a + b) * 2` or `upper(name)` compiles into a typed, constant-folded
//! evaluator that is invoked once per row with bounded cost. All type errors
//! are caught at compile time, before the first row is processed.
//!
//! # Example
//!
//! ```ignore
//! use formic::api::Engine;
//! use formic::context::ResolutionContext;
//!
//! let context = ResolutionContext::builder().build();
//! let engine = Engine::default();
//!
//! let expr = engine.compile("2 + 3 * 4", &context)?;
//! assert_eq!(expr.evaluate_numerical()?, 14.0);
//! ```

pub mod api;
pub mod compiler;
pub mod context;
pub mod errors;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod types;
pub mod values;

pub use api::{Engine, Expression};
pub use context::{DynamicResolver, ResolutionContext, StopChecker};
pub use errors::{Error, EvalError, ExpressionError, FatalError};
pub use functions::{FunctionDescriptor, FunctionRegistry};
pub use types::ExprType;
pub use values::Value;
