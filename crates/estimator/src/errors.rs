//! Error types for the estimator runtime

use thiserror::Error;

/// Errors raised while loading or evaluating an estimator graph
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// Artifact file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact is not valid JSON for the estimator schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Artifact parsed but its structure is inconsistent
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// A column required by a column group is not in the input frame
    #[error("Column not found in input: {0}")]
    MissingColumn(String),

    /// A categorical value was not seen during fitting
    #[error("Found unknown category {value:?} in column {column:?} during transform")]
    UnknownCategory { column: String, value: String },

    /// A numeric stage received text
    #[error("Could not convert {value:?} in column {column:?} to a number")]
    NonNumeric { column: String, value: String },

    /// A stage that cannot handle missing values received one
    #[error("Input contains NaN in column {column:?}")]
    NaNInput { column: String },

    /// Input width does not match what the stage was fitted on
    #[error("Shape mismatch in {stage}: expected {expected} columns, got {actual}")]
    ShapeMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    /// `predict` was called on a node that only transforms
    #[error("Estimator {0} does not implement predict")]
    NotARegressor(&'static str),

    /// `transform` was called on a node that only predicts
    #[error("Estimator {0} does not implement transform")]
    NotATransformer(&'static str),

    /// The artifact needs a runtime capability this build does not provide
    #[error(
        "Missing runtime capability `{capability}` (runtime {runtime_version}, artifact trained with {trained_with})"
    )]
    MissingCapability {
        capability: String,
        runtime_version: &'static str,
        trained_with: String,
    },
}

/// Result type for estimator operations
pub type Result<T> = std::result::Result<T, EstimatorError>;
