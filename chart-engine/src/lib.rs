//! FILENAME: chart-engine/src/lib.rs
//! Chart data subsystem.
//!
//! This crate turns the working table into chart-ready datasets. It
//! depends on `engine` only for the Table value type.
//!
//! Layers:
//! - `request`: Serializable configuration (what the chart IS)
//! - `aggregate`: Filtering, grouping and insight calculation
//! - `forecast`: Linear extrapolation over the aggregated series
//! - `result`: Serializable output for the front end (what we SEND)

pub mod aggregate;
pub mod error;
pub mod forecast;
pub mod request;
pub mod result;

pub use aggregate::{aggregate, GroupValue, OrderedFloat, NO_DATA_MESSAGE};
pub use error::{AggregationError, ForecastError};
pub use forecast::forecast;
pub use request::{AggregationRequest, ChartKind, DrillFilter, ForecastRequest};
pub use result::{ChartPoint, ChartResult, ForecastResult, Insight};
