//! Shared fixtures: a small in-memory table acting as the row source.

use formic::context::DynamicResolver;
use formic::errors::EvalError;
use formic::types::ExprType;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

pub enum Column {
    Double(Vec<f64>),
    Integer(Vec<i64>),
    Boolean(Vec<Option<bool>>),
    Text(Vec<Option<&'static str>>),
}

impl Column {
    fn expr_type(&self) -> ExprType {
        match self {
            Column::Double(_) => ExprType::Double,
            Column::Integer(_) => ExprType::Integer,
            Column::Boolean(_) => ExprType::Boolean,
            Column::Text(_) => ExprType::Text,
        }
    }

    fn len(&self) -> usize {
        match self {
            Column::Double(v) => v.len(),
            Column::Integer(v) => v.len(),
            Column::Boolean(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }
}

/// Columnar table with an explicit row cursor. The evaluation loop in each
/// test advances the cursor; compiled expressions only ever read the current
/// row.
pub struct Table {
    columns: HashMap<&'static str, Column>,
    row: Cell<usize>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<(&'static str, Column)>) -> Rc<Self> {
        let rows = columns.first().map_or(0, |(_, c)| c.len());
        assert!(
            columns.iter().all(|(_, c)| c.len() == rows),
            "all columns must have the same row count"
        );
        Rc::new(Self {
            columns: columns.into_iter().collect(),
            row: Cell::new(0),
            rows,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn seek(&self, row: usize) {
        self.row.set(row);
    }

    fn column(&self, name: &str) -> Result<&Column, EvalError> {
        self.columns
            .get(name)
            .ok_or_else(|| EvalError::fatal(format!("no column '{name}'")))
    }
}

impl DynamicResolver for Table {
    fn column_type(&self, name: &str) -> Option<ExprType> {
        self.columns.get(name).map(Column::expr_type)
    }

    fn numeric(&self, name: &str) -> Result<f64, EvalError> {
        let row = self.row.get();
        match self.column(name)? {
            Column::Double(v) => Ok(v[row]),
            Column::Integer(v) => Ok(v[row] as f64),
            _ => Err(EvalError::fatal(format!("column '{name}' is not numeric"))),
        }
    }

    fn boolean(&self, name: &str) -> Result<Option<bool>, EvalError> {
        match self.column(name)? {
            Column::Boolean(v) => Ok(v[self.row.get()]),
            _ => Err(EvalError::fatal(format!("column '{name}' is not boolean"))),
        }
    }

    fn text(&self, name: &str) -> Result<Option<String>, EvalError> {
        match self.column(name)? {
            Column::Text(v) => Ok(v[self.row.get()].map(str::to_string)),
            _ => Err(EvalError::fatal(format!("column '{name}' is not text"))),
        }
    }
}
