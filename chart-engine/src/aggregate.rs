//! FILENAME: chart-engine/src/aggregate.rs
//! Aggregation/Filter engine - turns the working table into chart data.
//!
//! Two paths, dispatched on chart kind:
//! 1. Scatter: raw (x, y) coordinate passthrough for two numeric axes,
//!    with a Pearson correlation insight.
//! 2. Aggregated (bar, line, pie): group by x, sum y, plus summary
//!    insights (total, average, extremes, category count).
//! An optional drill-down filter is applied before either path.

use std::cmp::Ordering;

use engine::{ColumnType, Table, Value};
use rustc_hash::FxHashMap;

use crate::error::AggregationError;
use crate::request::{AggregationRequest, ChartKind, DrillFilter};
use crate::result::{format_amount, ChartPoint, ChartResult};

/// Insight shown when filtering leaves nothing to chart.
pub const NO_DATA_MESSAGE: &str = "No data available for this selection.";

const CORRELATION_NOTE: &str = "A value near +1 indicates a strong positive correlation, \
     -1 a strong negative, and 0 no correlation.";

// ============================================================================
// GROUP VALUES
// ============================================================================

/// Wrapper around f64 that implements Eq and Hash for use as a group
/// key. NaN values are treated as equal to each other.
#[derive(Debug, Clone, Copy)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            u64::MAX.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

/// A distinct x-axis value used as a grouping key. Numeric keys compare
/// numerically and sort before text keys, so group order is stable and
/// deterministic across calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupValue {
    Number(OrderedFloat),
    Text(String),
}

impl GroupValue {
    /// Builds a group key from an x-axis cell. Null cells carry no key
    /// and are excluded from grouping.
    fn from_cell(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => Some(GroupValue::Number(OrderedFloat(*n))),
            Value::Text(s) => Some(GroupValue::Text(s.clone())),
        }
    }

    /// Display label for the group.
    pub fn label(&self) -> String {
        match self {
            GroupValue::Number(n) => Value::Number(n.0).to_text(),
            GroupValue::Text(s) => s.clone(),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupValue::Number(a), GroupValue::Number(b)) => {
                a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal)
            }
            (GroupValue::Number(_), GroupValue::Text(_)) => Ordering::Less,
            (GroupValue::Text(_), GroupValue::Number(_)) => Ordering::Greater,
            (GroupValue::Text(a), GroupValue::Text(b)) => a.cmp(b),
        }
    }
}

// ============================================================================
// DRILL-DOWN FILTERING
// ============================================================================

/// Returns the indices of rows that pass the drill-down filter, in row
/// order. Without a filter every row passes. The filter value is first
/// coerced to the column's runtime type; if that coercion fails both
/// sides are compared as text, so a filter never hard-fails. Null cells
/// never match. A filter naming a missing column selects nothing.
fn selected_rows(table: &Table, filter: Option<&DrillFilter>) -> Vec<usize> {
    let filter = match filter {
        Some(f) => f,
        None => return (0..table.row_count()).collect(),
    };

    let column = match table.column(&filter.column) {
        Some(c) => c,
        None => {
            log::debug!("drill-down filter column '{}' not found", filter.column);
            return Vec::new();
        }
    };

    let numeric_value = if column.ty == ColumnType::Numeric {
        engine::parse_number(&filter.value)
    } else {
        None
    };

    if column.ty == ColumnType::Numeric && numeric_value.is_none() {
        log::warn!(
            "filter value '{}' does not coerce to numeric column '{}', \
             falling back to text comparison",
            filter.value,
            filter.column
        );
    }

    column
        .values
        .iter()
        .enumerate()
        .filter(|(_, cell)| {
            if cell.is_null() {
                return false;
            }
            match numeric_value {
                Some(v) => cell.to_number() == Some(v),
                None => cell.to_text() == filter.value,
            }
        })
        .map(|(i, _)| i)
        .collect()
}

// ============================================================================
// GROUPED SERIES
// ============================================================================

/// Groups the filtered rows by distinct x value and sums the y axis per
/// group, returning (group, sum) pairs sorted ascending by group. The y
/// axis coerces with null/unparseable cells as 0, so aggregation never
/// shrinks the selected row set; rows with a null x cell are excluded.
/// Returns None when either axis column is absent.
pub(crate) fn grouped_series(
    table: &Table,
    x_axis: &str,
    y_axis: &str,
    filter: Option<&DrillFilter>,
) -> Option<Vec<(GroupValue, f64)>> {
    let x_column = table.column(x_axis)?;
    let y_column = table.column(y_axis)?;

    let mut order: Vec<GroupValue> = Vec::new();
    let mut sums: FxHashMap<GroupValue, f64> = FxHashMap::default();

    for row in selected_rows(table, filter) {
        let key = match GroupValue::from_cell(&x_column.values[row]) {
            Some(key) => key,
            None => continue,
        };
        let y = y_column.values[row].to_number().unwrap_or(0.0);

        if let Some(sum) = sums.get_mut(&key) {
            *sum += y;
        } else {
            order.push(key.clone());
            sums.insert(key, y);
        }
    }

    order.sort_by(|a, b| a.compare(b));

    let series = order
        .into_iter()
        .map(|key| {
            let sum = sums[&key];
            (key, sum)
        })
        .collect();
    Some(series)
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Produces chart-ready data and insights for the request. Fails only
/// on a malformed request (empty axis field); every data-shape
/// irregularity degrades to a documented fallback.
pub fn aggregate(table: &Table, request: &AggregationRequest) -> Result<ChartResult, AggregationError> {
    if request.x_axis.trim().is_empty() {
        return Err(AggregationError::MissingAxis("x"));
    }
    if request.y_axis.trim().is_empty() {
        return Err(AggregationError::MissingAxis("y"));
    }

    if request.kind.is_aggregated() {
        Ok(aggregated_chart(table, request))
    } else {
        Ok(scatter_chart(table, request))
    }
}

/// Raw pair passthrough: a row survives only if both axes coerce to
/// numbers; surviving rows keep their order.
fn scatter_chart(table: &Table, request: &AggregationRequest) -> ChartResult {
    let mut points: Vec<(f64, f64)> = Vec::new();

    if let (Some(x_column), Some(y_column)) =
        (table.column(&request.x_axis), table.column(&request.y_axis))
    {
        for row in selected_rows(table, request.filter.as_ref()) {
            let x = x_column.values[row].to_number();
            let y = y_column.values[row].to_number();
            if let (Some(x), Some(y)) = (x, y) {
                points.push((x, y));
            }
        }
    } else {
        log::debug!(
            "scatter axis column missing ('{}' / '{}')",
            request.x_axis,
            request.y_axis
        );
    }

    let correlation = pearson(&points);

    let mut result = ChartResult {
        chart_data: points
            .iter()
            .map(|&(x, y)| ChartPoint::Xy { x, y })
            .collect(),
        insights: Vec::new(),
    };
    result.push_insight("Correlation Coefficient", format!("{:.4}", correlation));
    result.push_insight("Note", CORRELATION_NOTE);
    result
}

/// Pearson correlation coefficient of the surviving pairs; 0 when the
/// coefficient is undefined (no pairs, single pair, zero variance).
fn pearson(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }

    let nf = n as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / nf;

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for &(x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = (variance_x * variance_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    let r = covariance / denominator;
    if r.is_finite() {
        r
    } else {
        0.0
    }
}

/// Group-by summarization for bar/line/pie plus summary insights.
fn aggregated_chart(table: &Table, request: &AggregationRequest) -> ChartResult {
    let series = grouped_series(
        table,
        &request.x_axis,
        &request.y_axis,
        request.filter.as_ref(),
    )
    .unwrap_or_default();

    if series.is_empty() {
        let mut result = ChartResult {
            chart_data: Vec::new(),
            insights: Vec::new(),
        };
        result.push_insight("Message", NO_DATA_MESSAGE);
        return result;
    }

    let total: f64 = series.iter().map(|(_, v)| v).sum();
    let average = total / series.len() as f64;

    // Ties on an extreme go to the first group in group order.
    let (max_key, max_value) = series
        .iter()
        .fold(None::<(&GroupValue, f64)>, |best, (k, v)| match best {
            Some((_, bv)) if *v <= bv => best,
            _ => Some((k, *v)),
        })
        .map(|(k, v)| (k.label(), v))
        .unwrap_or_default();
    let (min_key, min_value) = series
        .iter()
        .fold(None::<(&GroupValue, f64)>, |best, (k, v)| match best {
            Some((_, bv)) if *v >= bv => best,
            _ => Some((k, *v)),
        })
        .map(|(k, v)| (k.label(), v))
        .unwrap_or_default();

    let mut result = ChartResult {
        chart_data: series
            .iter()
            .map(|(key, value)| ChartPoint::KeyValue {
                key: key.label(),
                value: *value,
            })
            .collect(),
        insights: Vec::new(),
    };

    result.push_insight("Total", format_amount(total));
    result.push_insight("Average", format_amount(average));
    result.push_insight(format!("Highest ({})", max_key), format_amount(max_value));
    result.push_insight(format!("Lowest ({})", min_key), format_amount(min_value));
    result.push_insight("Number of Categories", series.len().to_string());

    log::debug!(
        "aggregated {} rows into {} groups on '{}'",
        table.row_count(),
        series.len(),
        request.x_axis
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Column;

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
            Column::new(
                "units".to_string(),
                vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)],
            ),
        ])
        .unwrap()
    }

    fn bar_request() -> AggregationRequest {
        AggregationRequest {
            x_axis: "region".to_string(),
            y_axis: "sales".to_string(),
            kind: ChartKind::Bar,
            filter: None,
        }
    }

    #[test]
    fn bar_chart_groups_and_sums() {
        let result = aggregate(&sales_table(), &bar_request()).unwrap();

        assert_eq!(
            result.chart_data,
            vec![
                ChartPoint::KeyValue {
                    key: "A".to_string(),
                    value: 30.0
                },
                ChartPoint::KeyValue {
                    key: "B".to_string(),
                    value: 30.0
                },
            ]
        );
        assert_eq!(result.insight("Total"), Some("60.00"));
        assert_eq!(result.insight("Average"), Some("30.00"));
        assert_eq!(result.insight("Number of Categories"), Some("2"));
        // Tie on the extremes: the first group in order wins both.
        assert_eq!(result.insight("Highest (A)"), Some("30.00"));
        assert_eq!(result.insight("Lowest (A)"), Some("30.00"));
    }

    #[test]
    fn total_insight_equals_sum_of_chart_values() {
        let result = aggregate(&sales_table(), &bar_request()).unwrap();
        let sum: f64 = result
            .chart_data
            .iter()
            .map(|p| match p {
                ChartPoint::KeyValue { value, .. } => *value,
                ChartPoint::Xy { .. } => 0.0,
            })
            .sum();
        assert_eq!(result.insight("Total"), Some(format_amount(sum).as_str()));
    }

    #[test]
    fn unparseable_y_cells_count_as_zero_not_dropped() {
        let table = Table::new(vec![
            Column::new(
                "region".to_string(),
                vec![Value::Text("A".to_string()), Value::Text("A".to_string())],
            ),
            Column::new(
                "sales".to_string(),
                vec![Value::Number(10.0), Value::Text("n/a".to_string())],
            ),
        ])
        .unwrap();

        let result = aggregate(
            &table,
            &AggregationRequest {
                x_axis: "region".to_string(),
                y_axis: "sales".to_string(),
                kind: ChartKind::Pie,
                filter: None,
            },
        )
        .unwrap();

        assert_eq!(
            result.chart_data,
            vec![ChartPoint::KeyValue {
                key: "A".to_string(),
                value: 10.0
            }]
        );
    }

    #[test]
    fn numeric_group_keys_sort_numerically() {
        let table = Table::new(vec![
            Column::new(
                "year".to_string(),
                vec![Value::Number(10.0), Value::Number(9.0), Value::Number(10.0)],
            ),
            Column::new(
                "sales".to_string(),
                vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)],
            ),
        ])
        .unwrap();

        let result = aggregate(
            &table,
            &AggregationRequest {
                x_axis: "year".to_string(),
                y_axis: "sales".to_string(),
                kind: ChartKind::Line,
                filter: None,
            },
        )
        .unwrap();

        assert_eq!(
            result.chart_data,
            vec![
                ChartPoint::KeyValue {
                    key: "9".to_string(),
                    value: 2.0
                },
                ChartPoint::KeyValue {
                    key: "10".to_string(),
                    value: 4.0
                },
            ]
        );
    }

    #[test]
    fn drill_down_filter_coerces_to_column_type() {
        let table = Table::new(vec![
            Column::new(
                "year".to_string(),
                vec![Value::Number(2021.0), Value::Number(2022.0)],
            ),
            Column::new(
                "region".to_string(),
                vec![Value::Text("A".to_string()), Value::Text("B".to_string())],
            ),
            Column::new(
                "sales".to_string(),
                vec![Value::Number(5.0), Value::Number(7.0)],
            ),
        ])
        .unwrap();

        // "2022" arrives as text but the column is numeric; tier one
        // coercion matches it numerically.
        let mut request = bar_request();
        request.x_axis = "region".to_string();
        request.filter = Some(DrillFilter {
            column: "year".to_string(),
            value: "2022".to_string(),
        });

        let result = aggregate(&table, &request).unwrap();
        assert_eq!(
            result.chart_data,
            vec![ChartPoint::KeyValue {
                key: "B".to_string(),
                value: 7.0
            }]
        );
    }

    #[test]
    fn filter_matches_text_column_exactly() {
        let mut request = bar_request();
        request.filter = Some(DrillFilter {
            column: "region".to_string(),
            value: "B".to_string(),
        });

        let result = aggregate(&sales_table(), &request).unwrap();
        assert_eq!(
            result.chart_data,
            vec![ChartPoint::KeyValue {
                key: "B".to_string(),
                value: 30.0
            }]
        );
    }

    #[test]
    fn empty_selection_degrades_to_message_insight() {
        let mut request = bar_request();
        request.filter = Some(DrillFilter {
            column: "region".to_string(),
            value: "nowhere".to_string(),
        });

        let result = aggregate(&sales_table(), &request).unwrap();
        assert!(result.chart_data.is_empty());
        assert_eq!(result.insight("Message"), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn missing_axis_column_degrades_to_message_insight() {
        let mut request = bar_request();
        request.y_axis = "missing".to_string();

        let result = aggregate(&sales_table(), &request).unwrap();
        assert!(result.chart_data.is_empty());
        assert_eq!(result.insight("Message"), Some(NO_DATA_MESSAGE));
    }

    #[test]
    fn blank_axis_field_is_a_request_error() {
        let mut request = bar_request();
        request.x_axis = " ".to_string();
        assert!(matches!(
            aggregate(&sales_table(), &request),
            Err(AggregationError::MissingAxis("x"))
        ));
    }

    #[test]
    fn scatter_emits_pairs_in_row_order_and_drops_unparseable_rows() {
        let table = Table::new(vec![
            Column::new(
                "x".to_string(),
                vec![
                    Value::Number(1.0),
                    Value::Text("bad".to_string()),
                    Value::Number(3.0),
                ],
            ),
            Column::new(
                "y".to_string(),
                vec![Value::Number(2.0), Value::Number(9.0), Value::Number(6.0)],
            ),
        ])
        .unwrap();

        let result = aggregate(
            &table,
            &AggregationRequest {
                x_axis: "x".to_string(),
                y_axis: "y".to_string(),
                kind: ChartKind::Scatter,
                filter: None,
            },
        )
        .unwrap();

        assert_eq!(
            result.chart_data,
            vec![
                ChartPoint::Xy { x: 1.0, y: 2.0 },
                ChartPoint::Xy { x: 3.0, y: 6.0 },
            ]
        );
        // Perfectly collinear points: correlation is exactly 1.
        assert_eq!(result.insight("Correlation Coefficient"), Some("1.0000"));
    }

    #[test]
    fn scatter_with_no_surviving_rows_reports_zero_correlation() {
        let table = Table::new(vec![
            Column::new("x".to_string(), vec![Value::Text("a".to_string())]),
            Column::new("y".to_string(), vec![Value::Number(1.0)]),
        ])
        .unwrap();

        let result = aggregate(
            &table,
            &AggregationRequest {
                x_axis: "x".to_string(),
                y_axis: "y".to_string(),
                kind: ChartKind::Scatter,
                filter: None,
            },
        )
        .unwrap();

        assert!(result.chart_data.is_empty());
        assert_eq!(result.insight("Correlation Coefficient"), Some("0.0000"));
    }

    #[test]
    fn null_x_cells_are_excluded_from_grouping() {
        let table = Table::new(vec![
            Column::new(
                "region".to_string(),
                vec![Value::Null, Value::Text("A".to_string())],
            ),
            Column::new(
                "sales".to_string(),
                vec![Value::Number(100.0), Value::Number(5.0)],
            ),
        ])
        .unwrap();

        let result = aggregate(
            &table,
            &AggregationRequest {
                x_axis: "region".to_string(),
                y_axis: "sales".to_string(),
                kind: ChartKind::Bar,
                filter: None,
            },
        )
        .unwrap();

        assert_eq!(
            result.chart_data,
            vec![ChartPoint::KeyValue {
                key: "A".to_string(),
                value: 5.0
            }]
        );
    }
}
