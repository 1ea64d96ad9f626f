//! Crate-wide error types

use thiserror::Error;

/// Errors produced by the SOH prediction pipeline and its collaborators
#[derive(Debug, Error)]
pub enum CellHealthError {
    /// The data source could not be opened or read
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Expected columns are absent from the loaded table
    #[error("schema mismatch: missing columns {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    /// A required cell is missing or non-numeric
    #[error("malformed record: row {row}, column {column}")]
    MalformedRecord { row: usize, column: String },

    /// Split fraction out of range, or the dataset is too small to split
    #[error("invalid split fraction: {0}")]
    InvalidFraction(String),

    /// The regression design matrix is rank-deficient
    #[error("singular design: {0}")]
    SingularDesign(String),

    /// Prediction requested before the model was fitted
    #[error("model is not fitted")]
    ModelNotFitted,

    /// Array dimensions do not line up
    #[error("shape error: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    /// The generative assistant backend failed or returned garbage
    #[error("assistant request failed: {0}")]
    Assistant(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CellHealthError>;
