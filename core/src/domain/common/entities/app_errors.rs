use thiserror::Error;

use crate::domain::forecast::errors::ForecastError;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error("the file must be a CSV (got '{0}')")]
    InvalidFileExtension(String),

    #[error("failed to read the file: {0}")]
    MalformedUpload(String),

    #[error(
        "the file must contain the columns: {}; missing: {}",
        .required.join(", "),
        .missing.join(", ")
    )]
    MissingColumns {
        required: Vec<String>,
        missing: Vec<String>,
    },

    #[error("row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid quantity '{value}'")]
    InvalidQuantity { row: usize, value: String },

    #[error("the file contains no consumption records")]
    EmptyDataset,

    #[error("the dates cover {days} days; at most {max_days} are supported")]
    DateSpanTooLong { days: i64, max_days: i64 },

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("invalid chart name '{0}'")]
    InvalidChartName(String),

    #[error("chart '{0}' not found")]
    ChartNotFound(String),

    #[error("chart rendering failed: {0}")]
    RenderError(String),

    #[error("chart storage error: {0}")]
    StorageError(String),

    #[error("internal server error: {0}")]
    InternalServerError(String),
}
