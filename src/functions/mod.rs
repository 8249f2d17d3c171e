//! Function descriptors and the function registry.
//!
//! Concrete functions are data, not subclasses: a [`FunctionDescriptor`]
//! bundles a display name, an i18n documentation key, an arity, a
//! determinism flag, a type-inference rule and a kernel builder. The shared
//! shapes of the library (one-double-input, two-double-input with unfixed
//! arity, arbitrary-arity reducers) live in [`bases`] as composable
//! constructors.
//!
//! The registry maps names to descriptors with deterministic, case-sensitive
//! lookup. Registering a name again shadows the previous descriptor; this is
//! the supported override policy for extension modules.

use crate::errors::{EvalError, ExpressionError};
use crate::evaluator::Evaluator;
use crate::types::ExprType;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub mod bases;

pub mod arithmetic;
pub mod bitwise;
pub mod comparison;
pub mod logical;
pub mod math;
pub mod random;
pub mod rounding;
pub mod statistical;
pub mod text;

/// Compiled argument evaluators passed to a kernel builder. Most functions
/// take one or two arguments.
pub type ArgVec = SmallVec<[Evaluator; 2]>;

/// Bottom-up type-inference rule: given the function and the already-resolved
/// input types, produce the result type or a typed error.
pub type TypeRule =
    Arc<dyn Fn(&FunctionDescriptor, &[ExprType]) -> Result<ExprType, ExpressionError> + Send + Sync>;

/// Runtime rule: given the resolved result type and the argument evaluators,
/// produce the node's evaluator. Builders may eagerly pre-evaluate constant
/// operands; errors raised doing so surface at compile time.
pub type KernelBuilder = Arc<
    dyn Fn(&FunctionDescriptor, ExprType, ArgVec) -> Result<Evaluator, EvalError> + Send + Sync,
>;

/// Declared argument count of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// Unfixed within a closed range, e.g. subtraction (1 or 2) and round
    /// (1 or 2). The type rule selects its behaviour by the arity actually
    /// seen.
    Between(usize, usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    pub fn accepts(&self, found: usize) -> bool {
        match *self {
            Arity::Exactly(n) => found == n,
            Arity::Between(min, max) => (min..=max).contains(&found),
            Arity::AtLeast(min) => found >= min,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::Between(min, max) => write!(f, "between {min} and {max}"),
            Arity::AtLeast(min) => write!(f, "at least {min}"),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

/// Immutable description of one registered function.
#[derive(Clone)]
pub struct FunctionDescriptor {
    name: String,
    doc_key: String,
    arity: Arity,
    deterministic: bool,
    type_rule: TypeRule,
    builder: KernelBuilder,
}

impl FunctionDescriptor {
    pub fn new(
        name: impl Into<String>,
        doc_key: impl Into<String>,
        arity: Arity,
        type_rule: TypeRule,
        builder: KernelBuilder,
    ) -> Self {
        Self {
            name: name.into(),
            doc_key: doc_key.into(),
            arity,
            deterministic: true,
            type_rule,
            builder,
        }
    }

    /// Mark the function non-deterministic: its nodes are never constant,
    /// even with constant inputs, and are never folded.
    pub fn non_deterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Internationalization key for editor tooling (name/help/group text).
    /// Metadata only; no effect on type or value semantics.
    pub fn doc_key(&self) -> &str {
        &self.doc_key
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn is_deterministic(&self) -> bool {
        self.deterministic
    }

    /// Check arity, then run the type rule. Fails fast on the first
    /// incompatible combination.
    pub fn resolve_type(&self, inputs: &[ExprType]) -> Result<ExprType, ExpressionError> {
        if !self.arity.accepts(inputs.len()) {
            return Err(ExpressionError::WrongNumberOfArguments {
                function: self.name.clone(),
                expected: self.arity.to_string(),
                found: inputs.len(),
            });
        }
        (self.type_rule)(self, inputs)
    }

    /// Build the runtime evaluator for a node of this function.
    pub fn build(&self, result_type: ExprType, args: ArgVec) -> Result<Evaluator, EvalError> {
        (self.builder)(self, result_type, args)
    }

    /// Typed error for an input outside the expected type family.
    pub fn wrong_type(&self, expected: &'static str, found: ExprType) -> ExpressionError {
        ExpressionError::WrongTypeOfArgument {
            function: self.name.clone(),
            expected,
            found,
        }
    }
}

impl fmt::Debug for FunctionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDescriptor")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("deterministic", &self.deterministic)
            .finish_non_exhaustive()
    }
}

/// Name → descriptor map with deterministic, case-sensitive lookup.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<FunctionDescriptor>>,
}

impl FunctionRegistry {
    /// An empty registry. Useful for hermetic tests and restricted dialects.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the full built-in library.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        arithmetic::register(&mut registry);
        bitwise::register(&mut registry);
        statistical::register(&mut registry);
        rounding::register(&mut registry);
        math::register(&mut registry);
        comparison::register(&mut registry);
        logical::register(&mut registry);
        text::register(&mut registry);
        random::register(&mut registry);
        registry
    }

    /// Register a descriptor under its own name, shadowing any existing
    /// registration of that name.
    pub fn register(&mut self, descriptor: FunctionDescriptor) {
        self.functions
            .insert(descriptor.name.clone(), Arc::new(descriptor));
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<FunctionDescriptor>> {
        self.functions.get(name).cloned()
    }

    /// Registered names, for editor tooling. Order is unspecified.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

static DEFAULT_REGISTRY: Lazy<Arc<FunctionRegistry>> =
    Lazy::new(|| Arc::new(FunctionRegistry::with_builtins()));

/// The process-wide default registry, assembled lazily on first use.
///
/// Compilation always takes an explicit registry value; this instance exists
/// for convenience, not as the only access path.
pub fn default_registry() -> Arc<FunctionRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;
