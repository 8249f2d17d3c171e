//! The closed set of value types a formula can produce.

use core::fmt;

/// Result type of an expression node.
///
/// This is a closed enumeration: the language has exactly these eight value
/// kinds. There is no total promotion order between them; promotion rules are
/// declared per function (e.g. integer + integer → integer, but division
/// always yields a double).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprType {
    Double,
    Integer,
    Boolean,
    Text,
    /// A point in time (date plus time-of-day, UTC).
    Instant,
    /// A time-of-day without a date.
    LocalTime,
    TextSet,
    TextList,
}

impl ExprType {
    /// Whether this type belongs to the numerical family (double or integer).
    pub fn is_numeric(self) -> bool {
        matches!(self, ExprType::Double | ExprType::Integer)
    }

    /// Name used in error messages and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ExprType::Double => "real",
            ExprType::Integer => "integer",
            ExprType::Boolean => "boolean",
            ExprType::Text => "text",
            ExprType::Instant => "date-time",
            ExprType::LocalTime => "time",
            ExprType::TextSet => "text-set",
            ExprType::TextList => "text-list",
        }
    }
}

impl fmt::Display for ExprType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric promotion rule shared by the arithmetic functions: two integers
/// stay integer, any other numeric combination widens to double. Returns
/// `None` for non-numeric inputs.
pub fn promote_numeric(a: ExprType, b: ExprType) -> Option<ExprType> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    if a == ExprType::Integer && b == ExprType::Integer {
        Some(ExprType::Integer)
    } else {
        Some(ExprType::Double)
    }
}
