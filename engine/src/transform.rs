//! FILENAME: engine/src/transform.rs
//! PURPOSE: Column-level cleanup and derivation operations.
//! CONTEXT: Each operation takes the current table and returns a new
//! one; the caller replaces its working table with the result. Three
//! operations: column removal, null fill, calculated column.

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::table::{Column, Table};
use crate::value::{parse_number, ColumnType, Value};

/// Arithmetic operator for calculated columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

/// Drops the named column. Removing a column that does not exist is a
/// no-op, not an error.
pub fn remove_column(table: &Table, name: &str) -> Table {
    let mut result = table.clone();
    result.drop_column(name);
    result
}

/// Replaces every null cell in `column` with the given raw value. For a
/// numeric column the raw value must parse as a number.
pub fn fill_nulls(table: &Table, column: &str, raw: &str) -> Result<Table, TransformError> {
    let target = table
        .column(column)
        .ok_or_else(|| TransformError::MissingColumn(column.to_string()))?;

    let replacement = if target.ty == ColumnType::Numeric {
        let number = parse_number(raw).ok_or_else(|| TransformError::InvalidFillValue {
            column: column.to_string(),
            value: raw.to_string(),
        })?;
        Value::Number(number)
    } else {
        Value::Text(raw.to_string())
    };

    let values: Vec<Value> = target
        .values
        .iter()
        .map(|v| {
            if v.is_null() {
                replacement.clone()
            } else {
                v.clone()
            }
        })
        .collect();

    let mut result = table.clone();
    result.upsert_column(Column::with_type(target.name.clone(), target.ty, values));
    Ok(result)
}

/// Derives a numeric column from two operand columns. Both operands must
/// coerce to numeric in every non-null cell. A null operand yields a null
/// result for `+ - *`; for `/` every undefined outcome (divide by zero,
/// null operand, non-finite result) becomes 0. If `new_name` already
/// exists the column is overwritten in place.
pub fn compute_column(
    table: &Table,
    new_name: &str,
    left_operand: &str,
    right_operand: &str,
    operator: Operator,
) -> Result<Table, TransformError> {
    let lhs = coerce_operand(table, left_operand)?;
    let rhs = coerce_operand(table, right_operand)?;

    let values: Vec<Value> = lhs
        .iter()
        .zip(rhs.iter())
        .map(|(a, b)| apply(operator, *a, *b))
        .collect();

    let mut result = table.clone();
    result.upsert_column(Column::with_type(
        new_name.to_string(),
        ColumnType::Numeric,
        values,
    ));
    Ok(result)
}

/// Coerces every cell of an operand column to a number, keeping nulls.
fn coerce_operand(table: &Table, name: &str) -> Result<Vec<Option<f64>>, TransformError> {
    let column = table
        .column(name)
        .ok_or_else(|| TransformError::MissingColumn(name.to_string()))?;

    column
        .values
        .iter()
        .map(|v| {
            if v.is_null() {
                Ok(None)
            } else {
                v.to_number()
                    .map(Some)
                    .ok_or_else(|| TransformError::NonNumericOperand {
                        column: name.to_string(),
                        value: v.to_text(),
                    })
            }
        })
        .collect()
}

fn apply(operator: Operator, a: Option<f64>, b: Option<f64>) -> Value {
    match (a, b) {
        (Some(a), Some(b)) => match operator {
            Operator::Add => Value::Number(a + b),
            Operator::Sub => Value::Number(a - b),
            Operator::Mul => Value::Number(a * b),
            Operator::Div => {
                let result = a / b;
                // Infinities and NaN are folded to 0 so charts never see
                // them; a genuine zero result is indistinguishable.
                if result.is_finite() {
                    Value::Number(result)
                } else {
                    Value::Number(0.0)
                }
            }
        },
        _ => match operator {
            Operator::Div => Value::Number(0.0),
            _ => Value::Null,
        },
    }
}
