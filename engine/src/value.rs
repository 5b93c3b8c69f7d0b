//! FILENAME: engine/src/value.rs
//! PURPOSE: Defines the fundamental cell value and column type model.
//! CONTEXT: This file contains the `Value` enum and `ColumnType` enum.
//! A `Value` is one cell of a table; `ColumnType` is the type a whole
//! column was inferred to have at ingestion time. All coercion between
//! the two happens through the explicit methods here, never ad hoc.

use serde::{Deserialize, Serialize};

/// One cell of a table. `Null` represents a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the display text of the value as a String.
    /// Nulls render as the empty string; numbers render without
    /// unnecessary decimal places.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
        }
    }

    /// Explicit numeric coercion. Numbers pass through, text is parsed,
    /// nulls and unparseable text yield None.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_number(s),
        }
    }
}

/// Parses a string as a finite number, tolerating surrounding whitespace.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// The inferred type of a column, decided once when the column is
/// created (at ingestion, merge, or by a transform).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Every non-null value is a number or parses as one.
    Numeric,
    /// At least one non-null value does not parse as a number.
    Text,
    /// The column holds no non-null values yet.
    Unresolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_drops_trailing_zeroes() {
        assert_eq!(Value::Number(5.0).to_text(), "5");
        assert_eq!(Value::Number(5.25).to_text(), "5.25");
        assert_eq!(Value::Null.to_text(), "");
    }

    #[test]
    fn numeric_coercion_parses_text() {
        assert_eq!(Value::Text(" 42 ".to_string()).to_number(), Some(42.0));
        assert_eq!(Value::Text("abc".to_string()).to_number(), None);
        assert_eq!(Value::Null.to_number(), None);
    }

    #[test]
    fn parse_number_rejects_non_finite() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("-3.5"), Some(-3.5));
    }
}
