//! FILENAME: chart-engine/src/forecast.rs
//! Forecast engine - naive linear trend projection.
//!
//! Reuses the aggregated-chart path (sum of y grouped by x) to build an
//! ordered series, fits a least-squares line over the integer positions
//! 0..N-1, and extrapolates `horizon` further positions. Deliberately
//! NOT a time-series model: no seasonality, no confidence intervals.

use engine::Table;

use crate::aggregate::{grouped_series, GroupValue};
use crate::error::ForecastError;
use crate::request::ForecastRequest;
use crate::result::ForecastResult;

/// Extrapolates the aggregated series `horizon` periods forward through
/// a fitted line. The grouping's sorted order is the implicit time axis.
pub fn forecast(table: &Table, request: &ForecastRequest) -> Result<ForecastResult, ForecastError> {
    if request.horizon == 0 {
        return Err(ForecastError::NonPositiveHorizon);
    }

    let series = grouped_series(table, &request.x_axis, &request.y_axis, None).unwrap_or_default();
    if series.len() < 2 {
        return Err(ForecastError::SeriesTooShort(series.len()));
    }

    let (slope, intercept) = fit_line(&series);

    let n = series.len();
    let values: Vec<f64> = (n..n + request.horizon)
        .map(|position| intercept + slope * position as f64)
        .collect();

    let labels = future_labels(&series, request.horizon);

    Ok(ForecastResult { labels, values })
}

/// Ordinary least squares over (position, summed value) points. The
/// positions 0..n-1 are distinct, so the denominator is never zero for
/// n >= 2.
fn fit_line(series: &[(GroupValue, f64)]) -> (f64, f64) {
    let n = series.len() as f64;

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (position, (_, y)) in series.iter().enumerate() {
        let x = position as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}

/// Labels for the projected periods: when the last group's key is an
/// integer, continue counting from it; otherwise use "Future 1"..
/// "Future horizon".
fn future_labels(series: &[(GroupValue, f64)], horizon: usize) -> Vec<String> {
    let last_integer = match series.last().map(|(key, _)| key) {
        Some(GroupValue::Number(n)) if n.0.fract() == 0.0 && n.0.abs() < 1e15 => Some(n.0 as i64),
        _ => None,
    };

    match last_integer {
        Some(base) => (1..=horizon as i64).map(|i| (base + i).to_string()).collect(),
        None => (1..=horizon).map(|i| format!("Future {}", i)).collect(),
    }
}
