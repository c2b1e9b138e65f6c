//! Capabilities implemented by this build of the runtime
//!
//! Artifacts list the capabilities they need in `requires`. A model trained
//! against a newer runtime can name one this build does not have; that is
//! reported at inference time as [`EstimatorError::MissingCapability`].
//!
//! [`EstimatorError::MissingCapability`]: crate::errors::EstimatorError::MissingCapability

/// Version of the estimator runtime
pub const RUNTIME_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Artifact format written by [`crate::artifact::TrainedModel::save_json`]
pub const FORMAT_VERSION: u32 = 1;

/// Capability tags understood by this runtime
pub const CAPABILITIES: &[&str] = &[
    "pipeline",
    "column_transformer",
    "one_hot_encoder",
    "simple_imputer",
    "standard_scaler",
    "linear_regression",
    "gradient_boosting",
    "missing_value_routing",
];

pub fn supports(capability: &str) -> bool {
    CAPABILITIES.contains(&capability)
}

/// First capability in `requires` this runtime lacks
pub fn first_missing(requires: &[String]) -> Option<&str> {
    requires
        .iter()
        .map(String::as_str)
        .find(|cap| !supports(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_capabilities() {
        assert!(supports("one_hot_encoder"));
        assert!(!supports("estimator_tags"));
    }

    #[test]
    fn test_first_missing() {
        let requires = vec![
            "pipeline".to_string(),
            "estimator_tags".to_string(),
            "categorical_splits".to_string(),
        ];
        assert_eq!(first_missing(&requires), Some("estimator_tags"));
        assert_eq!(first_missing(&requires[..1]), None);
    }
}
