//! FILENAME: persistence/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Could not parse table data: {0}")]
    Parse(String),
}
