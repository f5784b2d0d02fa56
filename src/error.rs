use thiserror::Error;

use crate::api::ChartId;

pub type TimelineResult<T> = Result<T, TimelineError>;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("window length {length_ms}ms does not match any configured zoom level")]
    InvalidWindowLength { length_ms: i64 },

    #[error("invalid timeline width: {width}")]
    InvalidWidth { width: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown chart instance `{0}`")]
    UnknownChart(ChartId),

    #[error("chart instance `{0}` is already registered")]
    DuplicateChart(ChartId),

    #[error("unsupported environment: {0}")]
    EnvironmentUnsupported(String),

    #[error("timeline fetch failed: {0}")]
    FetchFailure(String),
}
