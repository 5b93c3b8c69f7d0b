//! FILENAME: engine/src/merge.rs
//! PURPOSE: Joins two tables on key columns with declared join semantics.
//! CONTEXT: Both key columns are coerced to their text representation
//! before comparison, so an integer ID column joins a text ID column.
//! Values that stringify differently ("1" vs "1.0") do NOT match; this
//! is preserved behavior, not a bug.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::MergeError;
use crate::table::{Column, Table};
use crate::value::{ColumnType, Value};

/// Relational combination strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

/// Describes a join between two tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinSpec {
    pub left_key: String,
    pub right_key: String,
    pub kind: JoinKind,
}

/// Joins `left` and `right` according to `spec`. The result column set is all
/// left columns followed by all right columns; on a name collision both
/// are retained, suffixed `_x` (left) and `_y` (right). Key columns are
/// text-typed in the output.
pub fn merge(left: &Table, right: &Table, spec: &JoinSpec) -> Result<Table, MergeError> {
    let left_key_idx = left
        .column_index(&spec.left_key)
        .ok_or_else(|| MergeError::MissingKey {
            key: spec.left_key.clone(),
            side: "left",
        })?;
    let right_key_idx = right
        .column_index(&spec.right_key)
        .ok_or_else(|| MergeError::MissingKey {
            key: spec.right_key.clone(),
            side: "right",
        })?;

    let left_keys = text_keys(left, left_key_idx);
    let right_keys = text_keys(right, right_key_idx);

    // Row index pairs to emit; None on a side means that side's columns
    // are null for the row.
    let pairs = match spec.kind {
        JoinKind::Inner => join_rows(&left_keys, &right_keys, false, false),
        JoinKind::Left => join_rows(&left_keys, &right_keys, true, false),
        JoinKind::Right => {
            // Mirror of left: drive from the right table, then swap back.
            join_rows(&right_keys, &left_keys, true, false)
                .into_iter()
                .map(|(r, l)| (l, r))
                .collect()
        }
        JoinKind::Outer => join_rows(&left_keys, &right_keys, true, true),
    };

    let mut columns = Vec::with_capacity(left.column_count() + right.column_count());
    let mut used_names: HashSet<String> = HashSet::new();

    for (idx, column) in left.columns().iter().enumerate() {
        let name = disambiguate(&column.name, left, right, "_x");
        let name = dedupe_name(name, &mut used_names);
        let values: Vec<Value> = pairs
            .iter()
            .map(|(l, _)| l.map_or(Value::Null, |row| cell_for(column, row, idx == left_key_idx)))
            .collect();
        columns.push(merged_column(name, column, idx == left_key_idx, values));
    }

    for (idx, column) in right.columns().iter().enumerate() {
        let name = disambiguate(&column.name, left, right, "_y");
        let name = dedupe_name(name, &mut used_names);
        let values: Vec<Value> = pairs
            .iter()
            .map(|(_, r)| r.map_or(Value::Null, |row| cell_for(column, row, idx == right_key_idx)))
            .collect();
        columns.push(merged_column(name, column, idx == right_key_idx, values));
    }

    // Names are unique via dedupe_name and all columns share
    // pairs.len() rows, so the table invariants hold.
    Ok(Table::from_parts(columns))
}

/// The text rendering used for key comparison. Null keys stringify to
/// the sentinel "nan": they match each other and a literal "nan" text
/// key, but never a genuine empty-string cell. Nulls stay null in the
/// output.
fn text_keys(table: &Table, key_idx: usize) -> Vec<String> {
    table.columns()[key_idx]
        .values
        .iter()
        .map(|v| {
            if v.is_null() {
                "nan".to_string()
            } else {
                v.to_text()
            }
        })
        .collect()
}

/// Non-key columns keep their source type (nulls injected by outer
/// joins never change an inferred type); key columns become text to
/// reflect the comparison coercion.
fn merged_column(name: String, source: &Column, is_key: bool, values: Vec<Value>) -> Column {
    let ty = if is_key { ColumnType::Text } else { source.ty };
    Column::with_type(name, ty, values)
}

fn cell_for(column: &Column, row: usize, is_key: bool) -> Value {
    let value = column.values[row].clone();
    if is_key && !value.is_null() {
        Value::Text(value.to_text())
    } else {
        value
    }
}

/// Emits (left row, right row) pairs for a join driven from the first
/// argument. Matching rows multiply out per key multiplicity, preserving
/// driver-side order then match order.
fn join_rows(
    driver_keys: &[String],
    other_keys: &[String],
    keep_unmatched_driver: bool,
    keep_unmatched_other: bool,
) -> Vec<(Option<usize>, Option<usize>)> {
    let mut other_index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (row, key) in other_keys.iter().enumerate() {
        other_index.entry(key.as_str()).or_default().push(row);
    }

    let mut matched_other = vec![false; other_keys.len()];
    let mut pairs = Vec::new();

    for (row, key) in driver_keys.iter().enumerate() {
        match other_index.get(key.as_str()) {
            Some(matches) => {
                for &other_row in matches {
                    matched_other[other_row] = true;
                    pairs.push((Some(row), Some(other_row)));
                }
            }
            None => {
                if keep_unmatched_driver {
                    pairs.push((Some(row), None));
                }
            }
        }
    }

    if keep_unmatched_other {
        for (row, matched) in matched_other.iter().enumerate() {
            if !matched {
                pairs.push((None, Some(row)));
            }
        }
    }

    pairs
}

/// Appends the `_x`/`_y` collision suffix when a column name exists on
/// both sides.
fn disambiguate(name: &str, left: &Table, right: &Table, suffix: &str) -> String {
    if left.column(name).is_some() && right.column(name).is_some() {
        format!("{}{}", name, suffix)
    } else {
        name.to_string()
    }
}

/// Guards against a suffixed name colliding with a column that already
/// carried it (e.g. a pre-existing `v_y` next to a renamed `v`); a `.n`
/// counter is appended until the name is unique.
fn dedupe_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{}.{}", name, counter);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}
