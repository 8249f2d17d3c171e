mod parsed_expr;
pub mod parser;
pub mod error;

pub use parser::{parse, FormulaParser, Rule};

pub use error::{ParseError, ParseErrorKind};
pub use parsed_expr::{BinaryOp, Expr, ExprKind, Literal, Span, UnaryOp};
