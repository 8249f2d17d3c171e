//! Error taxonomy for compilation and row evaluation.
//!
//! Two tiers:
//!
//! - [`ExpressionError`]: expected, user-correctable mistakes in the formula
//!   or its context (unknown names, wrong arity, wrong type family, ...).
//!   Raised during compilation for structural errors, or during row
//!   evaluation for data-dependent conditions that cannot be detected
//!   statically.
//! - [`FatalError`]: unexpected internal failures from a registered function
//!   kernel or a context implementation. These signal a defect, not a
//!   user-correctable mistake, and are never silently swallowed.
//!
//! A division producing infinity is a defined result, not an error; only
//! type, arity and resolution violations are errors.

use crate::parser::{ParseError, Span};
use crate::types::ExprType;
use thiserror::Error;

/// Expected, user-correctable errors in a formula or its resolution context.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExpressionError {
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String, span: Option<Span> },

    #[error("unknown attribute '{name}'")]
    UnknownAttribute { name: String, span: Option<Span> },

    #[error("unknown scope constant '{name}'")]
    UnknownScopeConstant { name: String, span: Option<Span> },

    #[error("scope constant '{name}' does not hold a column name")]
    InvalidIndirection { name: String, span: Option<Span> },

    #[error("function '{function}' expects {expected} arguments, got {found}")]
    WrongNumberOfArguments {
        function: String,
        expected: String,
        found: usize,
    },

    #[error("function '{function}' expects {expected} arguments, got a {found} argument")]
    WrongTypeOfArgument {
        function: String,
        /// Name of the expected type family, e.g. "numerical" or "integer".
        expected: &'static str,
        found: ExprType,
    },

    #[error("function '{function}' requires non-negative arguments")]
    NonNegativeArgument { function: String },
}

impl ExpressionError {
    /// Source span of the offending node, where one is known.
    pub fn span(&self) -> Option<Span> {
        match self {
            ExpressionError::UnknownFunction { span, .. }
            | ExpressionError::UnknownAttribute { span, .. }
            | ExpressionError::UnknownScopeConstant { span, .. }
            | ExpressionError::InvalidIndirection { span, .. } => span.clone(),
            _ => None,
        }
    }
}

/// Internal defect tier: an unexpected failure inside a function kernel or a
/// context implementation.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("fatal expression error: {message}")]
pub struct FatalError {
    pub message: String,
}

impl FatalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error raised while invoking a compiled evaluator.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Fatal(#[from] FatalError),
}

impl EvalError {
    /// Shorthand for a fatal error with a formatted message.
    pub fn fatal(message: impl Into<String>) -> Self {
        EvalError::Fatal(FatalError::new(message))
    }
}

/// Public error type for all formic operations.
///
/// Internal error representations funnel into this at the api boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// The formula text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A user-correctable expression error (compile time or row time).
    #[error(transparent)]
    Expression(#[from] ExpressionError),

    /// An unexpected internal failure; see [`FatalError`].
    #[error(transparent)]
    Fatal(#[from] FatalError),

    /// Invalid api usage, e.g. calling the evaluation accessor that does not
    /// match the expression's inferred type. Distinct from data errors.
    #[error("usage error: {0}")]
    Usage(String),
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Expression(e) => Error::Expression(e),
            EvalError::Fatal(e) => Error::Fatal(e),
        }
    }
}
