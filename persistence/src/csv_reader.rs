//! FILENAME: persistence/src/csv_reader.rs

use engine::{parse_number, Column, Table, Value};

use crate::error::IngestError;
use crate::normalize_headers;

/// Parses CSV bytes into a table. The first record is the header row;
/// ragged data rows are padded with nulls. Cell values that parse as
/// numbers are stored numerically so column types can be inferred.
pub(crate) fn read_csv(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| IngestError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::Parse("No header row found".to_string()));
    }

    let names = normalize_headers(headers);
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    for record in reader.records() {
        let record = record.map_err(|e| IngestError::Parse(e.to_string()))?;
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(parse_cell(record.get(i)));
        }
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Table::new(columns).map_err(|e| IngestError::Parse(e.to_string()))
}

fn parse_cell(raw: Option<&str>) -> Value {
    let raw = match raw {
        Some(r) if !r.trim().is_empty() => r,
        _ => return Value::Null,
    };
    match parse_number(raw) {
        Some(n) => Value::Number(n),
        None => Value::Text(raw.to_string()),
    }
}
