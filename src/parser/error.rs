//! Parse errors, converted from pest into a stable, human-readable form.

use crate::parser::parser::Rule;
use crate::parser::Span;
use thiserror::Error;

/// Parse error with source location.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    #[error("{message}")]
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Convert a pest error into a [`ParseError`] with readable rule names.
pub fn convert_pest_error(err: pest::error::Error<Rule>) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: format_found_rules(&negatives),
        },
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, span)
}

/// Group expected rules into higher-level concepts.
fn format_expected_rules(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "something else".to_string();
    }

    let mut concepts: Vec<&str> = Vec::new();
    let mut push = |concept| {
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    };

    for rule in rules {
        match rule {
            Rule::integer | Rule::float | Rule::boolean | Rule::string => push("literal"),
            Rule::ident | Rule::ident_name | Rule::call => push("identifier"),
            Rule::column | Rule::column_name => push("column reference"),
            Rule::scope_const | Rule::column_indirect => push("scope constant"),
            Rule::EOI => push("end of input"),
            _ => push("expression"),
        }
    }

    match concepts.len() {
        0 => "something else".to_string(),
        1 => concepts[0].to_string(),
        _ => {
            let last = concepts.pop().unwrap();
            format!("{} or {}", concepts.join(", "), last)
        }
    }
}

fn format_found_rules(rules: &[Rule]) -> String {
    match rules.first() {
        None => "unexpected token".to_string(),
        Some(Rule::integer) => "integer".to_string(),
        Some(Rule::float) => "floating-point number".to_string(),
        Some(Rule::boolean) => "boolean".to_string(),
        Some(Rule::string) => "string".to_string(),
        Some(Rule::ident) => "identifier".to_string(),
        Some(Rule::EOI) => "end of input".to_string(),
        Some(other) => format!("{other:?}"),
    }
}
