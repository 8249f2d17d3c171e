//! Per-row evaluation against a table: column references, identifier forms
//! and the caller-driven row loop.

use formic::api::Engine;
use formic::context::ResolutionContext;
use formic::errors::{Error, ExpressionError};
use formic::context::StopChecker;
use formic::types::ExprType;
use formic::values::Value;
use pretty_assertions::assert_eq;
use std::rc::Rc;

mod common;
use common::{Column, Table};

fn price_table() -> Rc<Table> {
    Table::new(vec![
        ("price", Column::Double(vec![10.0, 20.0, 30.0])),
        ("quantity", Column::Integer(vec![1, 2, 3])),
        (
            "unit price",
            Column::Double(vec![10.0, 10.0, 10.0]),
        ),
        (
            "name",
            Column::Text(vec![Some("bolt"), None, Some("NUT")]),
        ),
        (
            "in_stock",
            Column::Boolean(vec![Some(true), Some(false), None]),
        ),
    ])
}

#[test]
fn derived_column_over_all_rows() {
    let table = price_table();
    let context = ResolutionContext::builder()
        .resolver(table.clone())
        .build();

    let expr = Engine::default()
        .compile("price * quantity", &context)
        .unwrap();
    assert_eq!(expr.expression_type(), ExprType::Double);
    assert!(!expr.is_constant());

    let mut out = Vec::new();
    for row in 0..table.rows() {
        table.seek(row);
        out.push(expr.evaluate_numerical().unwrap());
    }
    assert_eq!(out, vec![10.0, 40.0, 90.0]);
}

#[test]
fn bracketed_names_reach_columns_with_spaces() {
    let table = price_table();
    let context = ResolutionContext::builder()
        .resolver(table.clone())
        .build();

    let expr = Engine::default()
        .compile("[unit price] * quantity", &context)
        .unwrap();
    table.seek(2);
    assert_eq!(expr.evaluate_numerical().unwrap(), 30.0);
}

#[test]
fn text_and_boolean_columns() {
    let table = price_table();
    let context = ResolutionContext::builder()
        .resolver(table.clone())
        .build();
    let engine = Engine::default();

    let upper = engine.compile("upper(name)", &context).unwrap();
    let stocked = engine.compile("in_stock", &context).unwrap();

    table.seek(0);
    assert_eq!(upper.evaluate_text().unwrap(), Some("BOLT".to_string()));
    assert_eq!(stocked.evaluate_boolean().unwrap(), Some(true));

    // Missing values stay missing through functions.
    table.seek(1);
    assert_eq!(upper.evaluate_text().unwrap(), None);
    table.seek(2);
    assert_eq!(stocked.evaluate_boolean().unwrap(), None);
}

#[test]
fn column_shadows_variable_of_the_same_name() {
    let table = price_table();
    let context = ResolutionContext::builder()
        .resolver(table.clone())
        .variable("price", Value::Double(999.0))
        .build();

    let expr = Engine::default().compile("price", &context).unwrap();
    table.seek(0);
    assert_eq!(expr.evaluate_numerical().unwrap(), 10.0);
}

#[test]
fn scope_constant_indirection_reads_the_named_column() {
    let table = price_table();
    let context = ResolutionContext::builder()
        .resolver(table.clone())
        .scope_constant("key_column", Value::text("price"))
        .build();

    let expr = Engine::default().compile("#{key_column} + 1", &context).unwrap();
    table.seek(1);
    assert_eq!(expr.evaluate_numerical().unwrap(), 21.0);
}

#[test]
fn unknown_column_is_a_compile_time_error() {
    let table = price_table();
    let context = ResolutionContext::builder()
        .resolver(table)
        .build();

    let err = Engine::default()
        .compile("pricee * 2", &context)
        .expect_err("should fail");
    match err {
        Error::Expression(ExpressionError::UnknownAttribute { name, .. }) => {
            assert_eq!(name, "pricee");
        }
        other => panic!("expected unknown attribute, got {other:?}"),
    }
}

#[test]
fn stop_checker_interrupts_the_row_loop() {
    let table = price_table();
    let context = ResolutionContext::builder()
        .resolver(table.clone())
        .build();
    let expr = Engine::default().compile("price + 1", &context).unwrap();

    // The caller polls between rows; here cancellation fires immediately
    // after the first row.
    let mut evaluated = 0;
    let checker = StopChecker::new(move || true);
    for row in 0..table.rows() {
        if row > 0 && checker.should_stop() {
            break;
        }
        table.seek(row);
        expr.evaluate_numerical().unwrap();
        evaluated += 1;
    }
    assert_eq!(evaluated, 1);

    let never = StopChecker::never();
    assert!(!never.should_stop());
}
