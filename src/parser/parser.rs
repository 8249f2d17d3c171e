//! The pest-based grammar front end.

use crate::parser::error::{convert_pest_error, ParseError, ParseErrorKind};
use crate::parser::parsed_expr::{BinaryOp, Expr, ExprKind, Literal, Span, UnaryOp};
use once_cell::sync::Lazy;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub struct FormulaParser;

static PRATT: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    // Lowest precedence first; prefix operators bind tightest.
    PrattParser::new()
        .op(Op::infix(Rule::or_op, Assoc::Left))
        .op(Op::infix(Rule::and_op, Assoc::Left))
        .op(Op::infix(Rule::eq, Assoc::Left)
            | Op::infix(Rule::ne, Assoc::Left)
            | Op::infix(Rule::lt, Assoc::Left)
            | Op::infix(Rule::le, Assoc::Left)
            | Op::infix(Rule::gt, Assoc::Left)
            | Op::infix(Rule::ge, Assoc::Left))
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::rem, Assoc::Left))
        .op(Op::infix(Rule::pow, Assoc::Right))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::not))
});

/// Parse a formula into its syntax tree.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let mut pairs =
        FormulaParser::parse(Rule::formula, source).map_err(convert_pest_error)?;
    let formula = pairs.next().expect("formula rule always yields one pair");
    let expr = formula
        .into_inner()
        .next()
        .expect("formula always contains an expr");
    build_expr(expr)
}

fn build_expr(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    debug_assert_eq!(pair.as_rule(), Rule::expr);
    PRATT
        .map_primary(build_primary)
        .map_prefix(|op, rhs| {
            let rhs = rhs?;
            let op_span: Span = op.as_span().into();
            let span = Span::combine(&op_span, &rhs.span);
            let op = match op.as_rule() {
                Rule::neg => UnaryOp::Neg,
                Rule::not => UnaryOp::Not,
                rule => unreachable!("unexpected prefix rule {rule:?}"),
            };
            Ok(Expr {
                kind: ExprKind::Unary {
                    op,
                    expr: Box::new(rhs),
                },
                span,
            })
        })
        .map_infix(|lhs, op, rhs| {
            let (lhs, rhs) = (lhs?, rhs?);
            let span = Span::combine(&lhs.span, &rhs.span);
            let op = match op.as_rule() {
                Rule::add => BinaryOp::Add,
                Rule::sub => BinaryOp::Sub,
                Rule::mul => BinaryOp::Mul,
                Rule::div => BinaryOp::Div,
                Rule::rem => BinaryOp::Rem,
                Rule::pow => BinaryOp::Pow,
                Rule::and_op => BinaryOp::And,
                Rule::or_op => BinaryOp::Or,
                Rule::eq => BinaryOp::Eq,
                Rule::ne => BinaryOp::Ne,
                Rule::lt => BinaryOp::Lt,
                Rule::le => BinaryOp::Le,
                Rule::gt => BinaryOp::Gt,
                Rule::ge => BinaryOp::Ge,
                rule => unreachable!("unexpected infix rule {rule:?}"),
            };
            Ok(Expr {
                kind: ExprKind::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                },
                span,
            })
        })
        .parse(pair.into_inner())
}

fn build_primary(pair: Pair<Rule>) -> Result<Expr, ParseError> {
    let span: Span = pair.as_span().into();
    let kind = match pair.as_rule() {
        Rule::integer => {
            let text = pair.as_str();
            let value = text.parse::<i64>().map_err(|_| {
                ParseError::new(
                    ParseErrorKind::InvalidNumber {
                        text: text.to_string(),
                    },
                    span.clone(),
                )
            })?;
            ExprKind::Literal(Literal::Integer(value))
        }
        Rule::float => {
            let text = pair.as_str();
            let value = text.parse::<f64>().map_err(|_| {
                ParseError::new(
                    ParseErrorKind::InvalidNumber {
                        text: text.to_string(),
                    },
                    span.clone(),
                )
            })?;
            ExprKind::Literal(Literal::Double(value))
        }
        Rule::boolean => ExprKind::Literal(Literal::Boolean(pair.as_str() == "true")),
        Rule::string => {
            let text = pair.as_str();
            ExprKind::Literal(Literal::Text(text[1..text.len() - 1].to_string()))
        }
        Rule::ident => ExprKind::Identifier(pair.as_str().to_string()),
        Rule::column => {
            let name = pair
                .into_inner()
                .next()
                .expect("column always contains a name");
            ExprKind::Column(name.as_str().trim().to_string())
        }
        Rule::scope_const => {
            let name = pair
                .into_inner()
                .next()
                .expect("scope_const always contains a name");
            ExprKind::ScopeConstant(name.as_str().to_string())
        }
        Rule::column_indirect => {
            let name = pair
                .into_inner()
                .next()
                .expect("column_indirect always contains a name");
            ExprKind::ColumnIndirect(name.as_str().to_string())
        }
        Rule::call => {
            let mut inner = pair.into_inner();
            let name = inner
                .next()
                .expect("call always starts with a name")
                .as_str()
                .to_string();
            let mut args = Vec::new();
            if let Some(arg_list) = inner.next() {
                for arg in arg_list.into_inner() {
                    args.push(build_expr(arg)?);
                }
            }
            ExprKind::Call { name, args }
        }
        Rule::grouped => {
            let inner = pair
                .into_inner()
                .next()
                .expect("grouped always contains an expr");
            return build_expr(inner);
        }
        rule => unreachable!("unexpected primary rule {rule:?}"),
    };
    Ok(Expr { kind, span })
}
