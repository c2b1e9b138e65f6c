//! Trained model artifacts
//!
//! An artifact wraps the root [`Estimator`] with the runtime information it
//! was produced under. Artifacts are stored as canonical JSON (sorted keys)
//! so that the Blake3 hash of a model is stable across machines.

use crate::errors::{EstimatorError, Result};
use crate::frame::Frame;
use crate::graph::{Estimator, Output};
use crate::runtime::{self, FORMAT_VERSION, RUNTIME_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A loaded, validated model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub format_version: u32,

    /// Runtime version the model was exported with
    #[serde(default)]
    pub trained_with: String,

    /// Runtime capabilities inference needs
    #[serde(default)]
    pub requires: Vec<String>,

    pub model: Estimator,

    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl TrainedModel {
    /// Wrap a graph produced by this runtime
    pub fn new(model: Estimator) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            trained_with: RUNTIME_VERSION.to_string(),
            requires: Vec::new(),
            model,
            metadata: BTreeMap::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.model.is_regressor() {
            return Err(EstimatorError::InvalidModel(format!(
                "root estimator {} does not end in a regressor",
                self.model.name()
            )));
        }
        self.model.validate()
    }

    /// Run inference, refusing when a required capability is missing
    pub fn predict(&self, frame: &Frame) -> Result<Output> {
        if let Some(capability) = runtime::first_missing(&self.requires) {
            return Err(EstimatorError::MissingCapability {
                capability: capability.to_string(),
                runtime_version: RUNTIME_VERSION,
                trained_with: self.trained_with.clone(),
            });
        }
        self.model.predict(frame)
    }

    /// Serialize to canonical JSON (sorted keys, no whitespace)
    pub fn to_canonical_json(&self) -> Result<String> {
        let value = canonicalize(serde_json::to_value(self)?);
        Ok(serde_json::to_string(&value)?)
    }

    /// Blake3 hash of the canonical JSON, hex encoded
    pub fn hash_hex(&self) -> Result<String> {
        let json = self.to_canonical_json()?;
        Ok(hex::encode(blake3::hash(json.as_bytes()).as_bytes()))
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_canonical_json()?)?;
        Ok(())
    }

    /// Load and validate an artifact
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let model: TrainedModel = serde_json::from_str(&json)?;
        model.validate()?;
        debug!(
            path = %path.as_ref().display(),
            format_version = model.format_version,
            trained_with = %model.trained_with,
            "Loaded model artifact"
        );
        Ok(model)
    }
}

/// Recursively sort object keys
fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
