//! Public API for compiling and evaluating formulas.
//!
//! This is the stable outer surface of the crate. Callers build an [`Engine`]
//! once (optionally with a custom function registry), compile formula text
//! into [`Expression`] handles, and then call the typed `evaluate_*` accessor
//! matching the expression's resolved type once per row.
//!
//! # Example
//!
//! ```ignore
//! use formic::api::Engine;
//! use formic::context::ResolutionContext;
//! use formic::types::ExprType;
//!
//! let engine = Engine::default();
//! let context = ResolutionContext::builder().build();
//!
//! let expr = engine.compile("2 + 3 * 4", &context)?;
//! assert_eq!(expr.expression_type(), ExprType::Integer);
//! assert_eq!(expr.evaluate_numerical()?, 14.0);
//! ```
//!
//! Engines and expressions hold non-atomically reference-counted state and
//! are confined to the thread that created them. To evaluate the same
//! formula on several threads, compile it once per thread.

pub mod engine;
pub mod expression;

pub use engine::Engine;
pub use expression::Expression;
