//! FILENAME: chart-engine/src/request.rs
//! Chart request definitions - the serializable configuration.
//!
//! This module contains the types that DESCRIBE a chart or forecast.
//! They arrive as JSON from the chart builder front end and are
//! immutable snapshots of user intent.

use serde::{Deserialize, Serialize};

/// Which chart the front end is building. Scatter is raw pair
/// passthrough; bar, line and pie all aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    /// True for the chart kinds that group and sum the y axis.
    pub fn is_aggregated(&self) -> bool {
        !matches!(self, ChartKind::Scatter)
    }
}

/// A single column/value equality constraint applied before chart data
/// generation, supporting interactive drill-downs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillFilter {
    pub column: String,
    /// The raw value as sent by the front end; coerced to the column's
    /// runtime type at filter time.
    pub value: String,
}

/// A request for chart-ready data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub x_axis: String,
    pub y_axis: String,
    #[serde(rename = "chart_type")]
    pub kind: ChartKind,
    #[serde(default)]
    pub filter: Option<DrillFilter>,
}

/// A request for a linear trend projection over the aggregated series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub x_axis: String,
    pub y_axis: String,
    /// Count of future periods to extrapolate.
    #[serde(rename = "periods", default = "default_horizon")]
    pub horizon: usize,
}

fn default_horizon() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_front_end_payload() {
        let request: AggregationRequest = serde_json::from_str(
            r#"{"x_axis":"region","y_axis":"sales","chart_type":"bar"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, ChartKind::Bar);
        assert!(request.filter.is_none());
    }

    #[test]
    fn forecast_horizon_defaults_to_five() {
        let request: ForecastRequest =
            serde_json::from_str(r#"{"x_axis":"month","y_axis":"sales"}"#).unwrap();
        assert_eq!(request.horizon, 5);
    }
}
