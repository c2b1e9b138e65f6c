//! Error types for the pricing core

use autoprice_estimator::EstimatorError;
use thiserror::Error;

/// Caller input that cannot be turned into a feature row
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Raw feature vector has the wrong length
    #[error("Expected {expected} features, got {actual}.")]
    LengthMismatch { expected: usize, actual: usize },

    /// Request carried neither `features` nor `record`
    #[error("Provide either 'record' or 'features'.")]
    MissingInput,

    /// Request carried both `features` and `record`
    #[error("Provide only one of 'record' or 'features', not both.")]
    AmbiguousInput,
}

/// Errors surfaced by the prediction service
#[derive(Error, Debug)]
pub enum PricingError {
    /// Caller input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Artifact needs a runtime capability this build lacks
    #[error(
        "Estimator compatibility error (missing capability `{capability}`). \
         Check your versions: autoprice-estimator={runtime_version}, \
         autoprice-pricing={pricing_version}, artifact trained with {trained_with}. \
         Pin them to match the training environment."
    )]
    EnvironmentMismatch {
        capability: String,
        runtime_version: &'static str,
        pricing_version: &'static str,
        trained_with: String,
    },

    /// Model artifact missing or unreadable
    #[error("Failed to load model artifact: {0}")]
    ArtifactLoad(String),

    /// Schema or fallback table is inconsistent
    #[error("Invalid feature schema: {0}")]
    InvalidSchema(String),

    /// Any other failure inside the model
    #[error("Inference failed: {0}")]
    Inference(#[from] EstimatorError),
}

impl PricingError {
    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            PricingError::Input(_) => 422,
            PricingError::EnvironmentMismatch { .. }
            | PricingError::ArtifactLoad(_)
            | PricingError::InvalidSchema(_)
            | PricingError::Inference(_) => 500,
        }
    }

    /// Message for the response body
    pub fn detail(&self) -> String {
        match self {
            PricingError::Input(e) => e.to_string(),
            other => format!("Inference error: {other}"),
        }
    }

    pub fn is_input_error(&self) -> bool {
        matches!(self, PricingError::Input(_))
    }
}

/// Result type for pricing operations
pub type Result<T> = std::result::Result<T, PricingError>;
