use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid use of field '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation: {0}")]
    Validation(String),
}
