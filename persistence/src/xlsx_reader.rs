//! FILENAME: persistence/src/xlsx_reader.rs

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xls, Xlsx};
use engine::{Column, Table, Value};

use crate::error::IngestError;
use crate::normalize_headers;

/// Parses XLSX bytes into a table. Only the first worksheet is read;
/// its first row is the header.
pub(crate) fn read_xlsx(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).map_err(|e| IngestError::Parse(e.to_string()))?;
    let sheet_name = first_sheet_name(workbook.sheet_names().to_vec())?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Parse(e.to_string()))?;
    range_to_table(&range)
}

/// Legacy XLS variant of `read_xlsx`.
pub(crate) fn read_xls(bytes: &[u8]) -> Result<Table, IngestError> {
    let mut workbook: Xls<_> =
        Xls::new(Cursor::new(bytes)).map_err(|e| IngestError::Parse(e.to_string()))?;
    let sheet_name = first_sheet_name(workbook.sheet_names().to_vec())?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IngestError::Parse(e.to_string()))?;
    range_to_table(&range)
}

fn first_sheet_name(names: Vec<String>) -> Result<String, IngestError> {
    names
        .into_iter()
        .next()
        .ok_or_else(|| IngestError::Parse("Workbook contains no sheets".to_string()))
}

fn range_to_table(range: &Range<Data>) -> Result<Table, IngestError> {
    let mut rows = range.rows();

    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| IngestError::Parse("Worksheet is empty".to_string()))?
        .iter()
        .map(header_text)
        .collect();

    let names = normalize_headers(headers);
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    for row in rows {
        for (i, column) in columns.iter_mut().enumerate() {
            column.push(row.get(i).map_or(Value::Null, cell_value));
        }
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();

    Table::new(columns).map_err(|e| IngestError::Parse(e.to_string()))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => cell_value(other).to_text(),
    }
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => Value::Text(format!("#{:?}", e).to_uppercase()),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Value::Text(s.clone()),
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::ColumnType;

    #[test]
    fn cell_values_map_to_table_values() {
        assert_eq!(cell_value(&Data::Empty), Value::Null);
        assert_eq!(cell_value(&Data::Float(2.5)), Value::Number(2.5));
        assert_eq!(cell_value(&Data::Int(7)), Value::Number(7.0));
        assert_eq!(
            cell_value(&Data::Bool(true)),
            Value::Text("TRUE".to_string())
        );
        assert_eq!(
            cell_value(&Data::String("North".to_string())),
            Value::Text("North".to_string())
        );
    }

    #[test]
    fn builds_a_table_from_a_range() {
        let mut range = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("region".to_string()));
        range.set_value((0, 1), Data::String("sales".to_string()));
        range.set_value((1, 0), Data::String("North".to_string()));
        range.set_value((1, 1), Data::Float(100.0));
        range.set_value((2, 0), Data::String("South".to_string()));
        range.set_value((2, 1), Data::Int(200));

        let table = range_to_table(&range).unwrap();
        assert_eq!(table.column_names(), vec!["region", "sales"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("sales").unwrap().ty, ColumnType::Numeric);
        assert_eq!(
            table.column("sales").unwrap().values,
            vec![Value::Number(100.0), Value::Number(200.0)]
        );
    }

    #[test]
    fn invalid_bytes_are_a_parse_error() {
        assert!(matches!(
            read_xlsx(b"not a spreadsheet"),
            Err(IngestError::Parse(_))
        ));
    }
}
