//! FILENAME: chart-engine/src/error.rs

use thiserror::Error;

/// Raised only for malformed chart requests. Data-shape irregularities
/// (unparseable cells, empty selections) degrade gracefully instead.
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("Chart request is missing the {0} axis")]
    MissingAxis(&'static str),
}

/// Errors raised by the forecast engine.
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Forecast horizon must be a positive number of periods")]
    NonPositiveHorizon,

    #[error("Aggregated series has {0} group(s); at least 2 are required to fit a trend line")]
    SeriesTooShort(usize),
}
