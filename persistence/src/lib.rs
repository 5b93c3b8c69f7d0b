//! FILENAME: persistence/src/lib.rs
//! File ingestion and session storage.
//!
//! This crate owns everything that crosses the process boundary:
//! - `csv_reader` / `xlsx_reader`: turning uploaded bytes into tables
//! - session snapshots: JSON round-tripping of the working table
//! - `project`: naming rules for saved projects

pub mod error;
pub mod project;

mod csv_reader;
mod xlsx_reader;

use serde::{Deserialize, Serialize};

use engine::Table;

pub use error::IngestError;
pub use project::unique_project_name;

// ============================================================================
// File formats
// ============================================================================

/// Spreadsheet formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    /// Determines the format from a file name's extension
    /// (case-insensitive).
    pub fn from_name(file_name: &str) -> Result<Self, IngestError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "xlsx" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            _ => Err(IngestError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// Parses uploaded file bytes into a table.
pub fn parse_table(bytes: &[u8], format: FileFormat) -> Result<Table, IngestError> {
    log::debug!("parsing {} bytes as {:?}", bytes.len(), format);
    match format {
        FileFormat::Csv => csv_reader::read_csv(bytes),
        FileFormat::Xlsx => xlsx_reader::read_xlsx(bytes),
        FileFormat::Xls => xlsx_reader::read_xls(bytes),
    }
}

// ============================================================================
// Session snapshots
// ============================================================================

/// Serializes a table to its JSON session representation.
pub fn serialize_table(table: &Table) -> Result<String, IngestError> {
    serde_json::to_string(table).map_err(|e| IngestError::Parse(e.to_string()))
}

/// Restores a table from its JSON session representation.
pub fn deserialize_table(json: &str) -> Result<Table, IngestError> {
    serde_json::from_str(json).map_err(|e| IngestError::Parse(e.to_string()))
}

// ============================================================================
// Header normalization
// ============================================================================

/// Cleans up a header row so every column has a unique, non-empty name.
/// Blank headers become `Unnamed: {i}` (by position); repeated names get
/// a `.1`, `.2`, ... suffix in order of appearance.
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut names = Vec::with_capacity(raw.len());

    for (i, header) in raw.into_iter().enumerate() {
        let trimmed = header.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            trimmed.to_string()
        };

        let count = seen.entry(base.clone()).or_insert(0);
        let name = if *count == 0 {
            base
        } else {
            format!("{}.{}", base, count)
        };
        *count += 1;
        names.push(name);
    }

    names
}
