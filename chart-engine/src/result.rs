//! FILENAME: chart-engine/src/result.rs
//! Chart result structures - the renderable output.
//!
//! `ChartResult` and `ForecastResult` are serialized as the response
//! body to the charting front end: plain JSON-shaped primitives, no
//! binary encoding.

use serde::{Deserialize, Serialize};

// ============================================================================
// CHART DATA
// ============================================================================

/// One emitted data point. Scatter charts emit raw `{x, y}` pairs;
/// aggregated charts emit `{key, value}` pairs, one per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartPoint {
    Xy { x: f64, y: f64 },
    KeyValue { key: String, value: f64 },
}

/// A computed insight shown next to the chart. Insights keep their
/// insertion order, which is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub label: String,
    pub value: String,
}

/// Chart-ready data plus computed insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartResult {
    pub chart_data: Vec<ChartPoint>,
    pub insights: Vec<Insight>,
}

impl ChartResult {
    /// Looks up an insight value by its label.
    pub fn insight(&self, label: &str) -> Option<&str> {
        self.insights
            .iter()
            .find(|i| i.label == label)
            .map(|i| i.value.as_str())
    }

    pub(crate) fn push_insight(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.insights.push(Insight {
            label: label.into(),
            value: value.into(),
        });
    }
}

/// An extrapolated series: one label and one value per future period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

// ============================================================================
// INSIGHT FORMATTING
// ============================================================================

/// Formats a numeric insight with thousands separators and two decimal
/// places, e.g. 1234567.8 -> "1,234,567.80".
pub(crate) fn format_amount(value: f64) -> String {
    add_thousands_separator(&format!("{:.2}", value))
}

/// Adds thousands separators to the integer part of a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    let mut formatted = if negative {
        format!("-{}", result)
    } else {
        result
    };
    if let Some(d) = decimal_part {
        formatted.push('.');
        formatted.push_str(d);
    }
    formatted
}
