//! FILENAME: engine/src/table.rs
//! PURPOSE: The core in-memory tabular value all other components operate on.
//! CONTEXT: A `Table` is an ordered set of named, typed columns with rows
//! aligned by position. Column names are unique and row count is uniform
//! across columns; the constructor enforces both. Every transformation
//! produces a new Table value rather than mutating shared storage.

use serde::{Deserialize, Serialize};

use crate::error::TableError;
use crate::value::{ColumnType, Value};

// ============================================================================
// COLUMN
// ============================================================================

/// A single named column of cell values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<Value>,
}

impl Column {
    /// Creates a column and infers its type from the values.
    pub fn new(name: String, values: Vec<Value>) -> Self {
        let ty = infer_type(&values);
        Column { name, ty, values }
    }

    /// Creates a column with an explicitly declared type. Used by
    /// transforms that know the result type (e.g. a calculated column).
    pub fn with_type(name: String, ty: ColumnType, values: Vec<Value>) -> Self {
        Column { name, ty, values }
    }
}

/// Infers the column type from raw values: numeric if every non-null
/// value coerces to a number, unresolved if there are no non-null
/// values, text otherwise. A single non-numeric token degrades the
/// whole column to text.
pub fn infer_type(values: &[Value]) -> ColumnType {
    let mut saw_value = false;
    for value in values {
        if value.is_null() {
            continue;
        }
        saw_value = true;
        if value.to_number().is_none() {
            return ColumnType::Text;
        }
    }
    if saw_value {
        ColumnType::Numeric
    } else {
        ColumnType::Unresolved
    }
}

// ============================================================================
// TABLE
// ============================================================================

/// The core tabular value: rows by position, typed columns by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Assembles a table from columns already known to satisfy the
    /// invariants. Callers guarantee unique names and a uniform row
    /// count.
    pub(crate) fn from_parts(columns: Vec<Column>) -> Self {
        Table { columns }
    }

    /// Creates a table from columns, enforcing unique names and a
    /// uniform row count.
    pub fn new(columns: Vec<Column>) -> Result<Self, TableError> {
        let expected = columns.first().map_or(0, |c| c.values.len());

        for (i, column) in columns.iter().enumerate() {
            if column.values.len() != expected {
                return Err(TableError::RaggedColumn {
                    name: column.name.clone(),
                    actual: column.values.len(),
                    expected,
                });
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn(column.name.clone()));
            }
        }

        Ok(Table { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// All column names, in table order. Used by the service layer to
    /// populate axis/operand dropdowns.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of the numeric columns only, in table order.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.ty == ColumnType::Numeric)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Replaces an existing column in place, or appends a new one.
    /// The replacement keeps the original column's position.
    pub(crate) fn upsert_column(&mut self, column: Column) {
        match self.column_index(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
    }

    pub(crate) fn drop_column(&mut self, name: &str) {
        self.columns.retain(|c| c.name != name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales_table() -> Table {
        Table::new(vec![
            Column::new(
                "region".to_string(),
                vec![
                    Value::Text("A".to_string()),
                    Value::Text("A".to_string()),
                    Value::Text("B".to_string()),
                ],
            ),
            Column::new(
                "sales".to_string(),
                vec![
                    Value::Number(10.0),
                    Value::Number(20.0),
                    Value::Number(30.0),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn infers_column_types() {
        let table = sales_table();
        assert_eq!(table.column("region").unwrap().ty, ColumnType::Text);
        assert_eq!(table.column("sales").unwrap().ty, ColumnType::Numeric);
        assert_eq!(table.numeric_column_names(), vec!["sales".to_string()]);
    }

    #[test]
    fn non_numeric_token_degrades_to_text() {
        let values = vec![
            Value::Number(1.0),
            Value::Text("2".to_string()),
            Value::Text("n/a".to_string()),
        ];
        assert_eq!(infer_type(&values), ColumnType::Text);
    }

    #[test]
    fn all_null_column_is_unresolved() {
        assert_eq!(infer_type(&[Value::Null, Value::Null]), ColumnType::Unresolved);
    }

    #[test]
    fn rejects_duplicate_column_names() {
        let result = Table::new(vec![
            Column::new("a".to_string(), vec![Value::Number(1.0)]),
            Column::new("a".to_string(), vec![Value::Number(2.0)]),
        ]);
        assert!(matches!(result, Err(TableError::DuplicateColumn(_))));
    }

    #[test]
    fn rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::new("a".to_string(), vec![Value::Number(1.0)]),
            Column::new("b".to_string(), vec![]),
        ]);
        assert!(matches!(result, Err(TableError::RaggedColumn { .. })));
    }

    #[test]
    fn serde_round_trip_preserves_table() {
        let table = sales_table();
        let json = serde_json::to_string(&table).unwrap();
        let back: Table = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
