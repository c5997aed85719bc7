//! Error types for the fruit-quality analysis

use thiserror::Error;

/// Result type alias for fruitqc operations
pub type Result<T> = std::result::Result<T, FruitError>;

/// Main error type. Every variant is terminal for the run: this is a
/// one-shot batch analysis, so nothing is retried and no partial report
/// is emitted after a failure.
#[derive(Error, Debug)]
pub enum FruitError {
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Required column missing: {0}")]
    MissingColumn(String),

    #[error("Dataset is empty after cleaning")]
    EmptyDataset,

    #[error("Class '{label}' has {count} rows, need at least {needed} to stratify")]
    InsufficientData {
        label: String,
        count: usize,
        needed: usize,
    },

    #[error("Pipeline not fitted")]
    NotFitted,

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Data error: {0}")]
    DataError(String),
}

impl From<polars::error::PolarsError> for FruitError {
    fn from(err: polars::error::PolarsError) -> Self {
        FruitError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for FruitError {
    fn from(err: serde_json::Error) -> Self {
        FruitError::DataError(err.to_string())
    }
}
