//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the tabular engine.
//! CONTEXT: Re-exports the Table value type, the merge engine and the
//! transform engine for use by other crates.

pub mod error;
pub mod merge;
pub mod table;
pub mod transform;
pub mod value;

// Re-export commonly used types at the crate root
pub use error::{MergeError, TableError, TransformError};
pub use merge::{merge, JoinKind, JoinSpec};
pub use table::{infer_type, Column, Table};
pub use transform::{compute_column, fill_nulls, remove_column, Operator};
pub use value::{parse_number, ColumnType, Value};

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Table {
        Table::new(vec![
            Column::new(
                "customer_id".to_string(),
                vec![Value::Number(1.0), Value::Number(2.0), Value::Number(2.0)],
            ),
            Column::new(
                "quantity".to_string(),
                vec![Value::Number(3.0), Value::Number(1.0), Value::Null],
            ),
            Column::new(
                "unit_price".to_string(),
                vec![Value::Number(2.5), Value::Number(10.0), Value::Number(4.0)],
            ),
        ])
        .unwrap()
    }

    fn customers() -> Table {
        Table::new(vec![
            Column::new(
                "id".to_string(),
                vec![Value::Text("1".to_string()), Value::Text("2".to_string())],
            ),
            Column::new(
                "region".to_string(),
                vec![Value::Text("North".to_string()), Value::Text("South".to_string())],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn integration_test_merge_then_prepare() {
        // Merge uploads on the cross-typed key, then clean and derive.
        let merged = merge(
            &orders(),
            &customers(),
            &JoinSpec {
                left_key: "customer_id".to_string(),
                right_key: "id".to_string(),
                kind: JoinKind::Inner,
            },
        )
        .unwrap();
        assert_eq!(merged.row_count(), 3);

        let filled = fill_nulls(&merged, "quantity", "0").unwrap();
        let prepared =
            compute_column(&filled, "revenue", "quantity", "unit_price", Operator::Mul).unwrap();
        let trimmed = remove_column(&prepared, "id");

        assert!(trimmed.column("id").is_none());
        assert_eq!(
            trimmed.column("revenue").unwrap().values,
            vec![Value::Number(7.5), Value::Number(10.0), Value::Number(0.0)]
        );
    }

    #[test]
    fn each_transform_returns_a_new_table() {
        let table = orders();
        let filled = fill_nulls(&table, "quantity", "9").unwrap();

        // The original working table is untouched.
        assert_eq!(table.column("quantity").unwrap().values[2], Value::Null);
        assert_eq!(
            filled.column("quantity").unwrap().values[2],
            Value::Number(9.0)
        );
    }
}
