//! FILENAME: engine/src/error.rs

use thiserror::Error;

/// Structural errors raised when constructing a table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Column '{name}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        name: String,
        actual: usize,
        expected: usize,
    },
}

/// Errors raised by the merge engine.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Join key '{key}' not found in {side} table")]
    MissingKey { key: String, side: &'static str },
}

/// Errors raised by the transform engine.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Column '{0}' not found")]
    MissingColumn(String),

    #[error("Fill value '{value}' must be a number for numeric column '{column}'")]
    InvalidFillValue { column: String, value: String },

    #[error("Column '{column}' contains non-numeric value '{value}'")]
    NonNumericOperand { column: String, value: String },
}
