//! The compilation pass: type resolution and evaluator building in one
//! bottom-up traversal.
//!
//! The syntax tree is walked exactly once. For every node the pass resolves
//! the result type through the function registry, builds the runtime
//! callable, and applies whole-node constant folding: if every input of a
//! deterministic function application is constant, the application is
//! evaluated once here and replaced by a fixed-value callable. Errors raised
//! by that eager evaluation are re-wrapped as fatal compile-time errors,
//! since the value is already known not to depend on row data and would fail
//! on every row.
//!
//! Resolution is strictly bottom-up with no backtracking: a child's type is
//! final before the parent's rule runs, and the first error aborts the pass
//! with no partial result.

use crate::context::ResolutionContext;
use crate::errors::{Error, EvalError, ExpressionError, FatalError};
use crate::evaluator::{Callable, Evaluator};
use crate::functions::{ArgVec, FunctionRegistry};
use crate::parser::{Expr, ExprKind, Literal, Span};
use crate::types::ExprType;
use crate::values::Value;
use std::rc::Rc;
use tracing::trace;

/// Compile a parsed tree against a registry and resolution context.
///
/// The tree is consumed conceptually: compilation reads it once and the
/// caller discards it afterwards.
pub fn compile(
    registry: &FunctionRegistry,
    context: &ResolutionContext,
    expr: &Expr,
) -> Result<Evaluator, Error> {
    Compiler { registry, context }.compile_node(expr)
}

struct Compiler<'a> {
    registry: &'a FunctionRegistry,
    context: &'a ResolutionContext,
}

impl Compiler<'_> {
    fn compile_node(&self, expr: &Expr) -> Result<Evaluator, Error> {
        match &expr.kind {
            ExprKind::Literal(literal) => Ok(Evaluator::constant(literal_value(literal))),

            // Bare identifiers resolve as a column first, then as a declared
            // variable.
            ExprKind::Identifier(name) => {
                if let Some(ev) = self.try_column(name)? {
                    return Ok(ev);
                }
                if let Some(value) = self.context.variable(name) {
                    return Ok(Evaluator::constant(value.clone()));
                }
                Err(ExpressionError::UnknownAttribute {
                    name: name.clone(),
                    span: Some(expr.span.clone()),
                }
                .into())
            }

            ExprKind::Column(name) => self
                .try_column(name)?
                .ok_or_else(|| unknown_attribute(name, &expr.span)),

            ExprKind::ScopeConstant(name) => match self.context.scope_constant(name) {
                Some(value) => Ok(Evaluator::constant(value.clone())),
                None => Err(ExpressionError::UnknownScopeConstant {
                    name: name.clone(),
                    span: Some(expr.span.clone()),
                }
                .into()),
            },

            // A scope constant whose value is itself a column name, resolved
            // in two hops.
            ExprKind::ColumnIndirect(name) => {
                let value = self.context.scope_constant(name).ok_or_else(|| {
                    Error::from(ExpressionError::UnknownScopeConstant {
                        name: name.clone(),
                        span: Some(expr.span.clone()),
                    })
                })?;
                let column = value.as_text().ok_or_else(|| {
                    Error::from(ExpressionError::InvalidIndirection {
                        name: name.clone(),
                        span: Some(expr.span.clone()),
                    })
                })?;
                self.try_column(column)?
                    .ok_or_else(|| unknown_attribute(column, &expr.span))
            }

            ExprKind::Unary { op, expr: inner } => {
                let mut args = ArgVec::new();
                args.push(self.compile_node(inner)?);
                self.apply(op.function_name(), &expr.span, args)
            }

            ExprKind::Binary { op, left, right } => {
                let mut args = ArgVec::new();
                args.push(self.compile_node(left)?);
                args.push(self.compile_node(right)?);
                self.apply(op.function_name(), &expr.span, args)
            }

            ExprKind::Call { name, args } => {
                let mut compiled = ArgVec::with_capacity(args.len());
                for arg in args {
                    compiled.push(self.compile_node(arg)?);
                }
                self.apply(name, &expr.span, compiled)
            }
        }
    }

    /// Apply a registered function to already-compiled arguments.
    fn apply(&self, name: &str, span: &Span, args: ArgVec) -> Result<Evaluator, Error> {
        let descriptor = self.registry.lookup(name).ok_or_else(|| {
            Error::from(ExpressionError::UnknownFunction {
                name: name.to_string(),
                span: Some(span.clone()),
            })
        })?;

        let input_types: Vec<ExprType> = args.iter().map(Evaluator::ty).collect();
        let result_type = descriptor.resolve_type(&input_types)?;

        let constant = descriptor.is_deterministic() && args.iter().all(Evaluator::is_constant);

        let mut evaluator = descriptor
            .build(result_type, args)
            .map_err(constant_evaluation_error)?;
        evaluator.set_constant(constant);

        if constant {
            trace!(function = name, "folding constant application");
            evaluator = evaluator.folded().map_err(constant_evaluation_error)?;
        }

        Ok(evaluator)
    }

    /// Compile a column reference if the resolver knows the name. Column
    /// nodes capture a resolver handle and read "the value at the current
    /// row" on every invocation; the cursor belongs to the caller.
    fn try_column(&self, name: &str) -> Result<Option<Evaluator>, Error> {
        let Some(resolver) = self.context.resolver() else {
            return Ok(None);
        };
        let Some(ty) = resolver.column_type(name) else {
            return Ok(None);
        };

        let r = Rc::clone(resolver);
        let n = name.to_string();
        let callable = match ty {
            ExprType::Double | ExprType::Integer => {
                Callable::Numeric(Rc::new(move || r.numeric(&n)))
            }
            ExprType::Boolean => Callable::Boolean(Rc::new(move || r.boolean(&n))),
            ExprType::Text => Callable::Text(Rc::new(move || r.text(&n))),
            ExprType::Instant => Callable::Instant(Rc::new(move || r.instant(&n))),
            ExprType::LocalTime => Callable::LocalTime(Rc::new(move || r.local_time(&n))),
            ExprType::TextSet => Callable::TextSet(Rc::new(move || r.text_set(&n))),
            ExprType::TextList => Callable::TextList(Rc::new(move || r.text_list(&n))),
        };
        Ok(Some(Evaluator::new(ty, false, callable)))
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Integer(v) => Value::Integer(*v),
        Literal::Double(v) => Value::Double(*v),
        Literal::Boolean(v) => Value::Boolean(Some(*v)),
        Literal::Text(v) => Value::text(v.clone()),
    }
}

fn unknown_attribute(name: &str, span: &Span) -> Error {
    ExpressionError::UnknownAttribute {
        name: name.to_string(),
        span: Some(span.clone()),
    }
    .into()
}

/// Promote an error raised while eagerly evaluating a constant
/// sub-expression: it would recur on every row, so it is a fatal
/// compile-time error rather than a row-time one.
fn constant_evaluation_error(err: EvalError) -> Error {
    Error::Fatal(FatalError::new(format!(
        "constant sub-expression failed during compilation: {err}"
    )))
}
