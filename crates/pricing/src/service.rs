//! Prediction service
//!
//! Owns the model source, the lazily loaded model and the vocabulary
//! introspected from it. Both are initialized at most once per service and
//! shared read-only afterwards. A failed load is cached and reported on every
//! later call without retrying.

use crate::adapter::FeatureAdapter;
use crate::config::PricingSettings;
use crate::errors::{PricingError, Result};
use crate::fallbacks::{FallbackTable, CAR_PRICE_FALLBACKS};
use crate::schema::{FeatureSchema, CAR_PRICE_SCHEMA};
use crate::types::{FeatureInput, FeatureRow, PredictRequest, PredictResponse};
use crate::vocabulary::{extract_vocabulary, VocabularyMap};
use autoprice_estimator::{
    Estimator, EstimatorError, Frame, Output, TrainedModel, RUNTIME_VERSION,
};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// A trained model that can score frames
pub trait Regressor: Send + Sync {
    fn predict(&self, frame: &Frame) -> std::result::Result<Output, EstimatorError>;

    /// Estimator graph for vocabulary introspection, if the model has one
    fn graph(&self) -> Option<&Estimator> {
        None
    }
}

impl Regressor for TrainedModel {
    fn predict(&self, frame: &Frame) -> std::result::Result<Output, EstimatorError> {
        TrainedModel::predict(self, frame)
    }

    fn graph(&self) -> Option<&Estimator> {
        Some(&self.model)
    }
}

/// Where the service gets its model from
pub trait ModelSource: Send + Sync {
    fn load(&self) -> Result<Arc<dyn Regressor>>;

    /// Human readable origin, used in logs
    fn describe(&self) -> String {
        "in-process model".to_string()
    }
}

impl<F> ModelSource for F
where
    F: Fn() -> Result<Arc<dyn Regressor>> + Send + Sync,
{
    fn load(&self) -> Result<Arc<dyn Regressor>> {
        self()
    }
}

/// JSON model artifact on disk, optionally pinned to a Blake3 hash
#[derive(Debug, Clone)]
pub struct ArtifactSource {
    path: PathBuf,
    expected_hash: Option<String>,
}

impl ArtifactSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            expected_hash: None,
        }
    }

    /// Refuse to load an artifact whose canonical hash differs from `hash`
    pub fn with_expected_hash<H: Into<String>>(mut self, hash: H) -> Self {
        self.expected_hash = Some(hash.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for ArtifactSource {
    fn load(&self) -> Result<Arc<dyn Regressor>> {
        let load_error =
            |e: EstimatorError| PricingError::ArtifactLoad(format!("{}: {e}", self.path.display()));

        let model = TrainedModel::load_json(&self.path).map_err(load_error)?;
        let hash = model.hash_hex().map_err(load_error)?;

        if let Some(expected) = &self.expected_hash {
            if !expected.eq_ignore_ascii_case(&hash) {
                return Err(PricingError::ArtifactLoad(format!(
                    "{}: model hash mismatch, expected {expected}, got {hash}",
                    self.path.display()
                )));
            }
        }

        info!(
            path = %self.path.display(),
            hash = %hash,
            trained_with = %model.trained_with,
            runtime_version = RUNTIME_VERSION,
            pricing_version = crate::VERSION,
            "Model artifact loaded"
        );
        Ok(Arc::new(model))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

static GLOBAL: OnceCell<PredictionService> = OnceCell::new();

/// Adapts caller input and runs the cached model on it
pub struct PredictionService {
    source: Box<dyn ModelSource>,
    schema: FeatureSchema,
    fallbacks: FallbackTable,
    model: OnceCell<std::result::Result<Arc<dyn Regressor>, String>>,
    vocabulary: OnceCell<VocabularyMap>,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("source", &self.source.describe())
            .field("schema_len", &self.schema.len())
            .field("model_loaded", &self.model.get().map(|m| m.is_ok()))
            .field("vocabulary", &self.vocabulary.get().map(VocabularyMap::len))
            .finish()
    }
}

impl PredictionService {
    /// Service for the car price schema backed by `source`
    pub fn new<S: ModelSource + 'static>(source: S) -> Self {
        Self::build(Box::new(source), CAR_PRICE_SCHEMA, CAR_PRICE_FALLBACKS)
    }

    /// Service for a custom schema. Rejects duplicate feature names and
    /// fallbacks for features that are not categorical.
    pub fn with_schema<S: ModelSource + 'static>(
        source: S,
        schema: FeatureSchema,
        fallbacks: FallbackTable,
    ) -> Result<Self> {
        schema.validate().map_err(PricingError::InvalidSchema)?;
        fallbacks
            .validate(&schema)
            .map_err(PricingError::InvalidSchema)?;
        Ok(Self::build(Box::new(source), schema, fallbacks))
    }

    fn build(
        source: Box<dyn ModelSource>,
        schema: FeatureSchema,
        fallbacks: FallbackTable,
    ) -> Self {
        Self {
            source,
            schema,
            fallbacks,
            model: OnceCell::new(),
            vocabulary: OnceCell::new(),
        }
    }

    /// Service reading the artifact named by `settings.model_path`
    pub fn from_settings(settings: &PricingSettings) -> Self {
        let mut source = ArtifactSource::new(settings.model_path.clone());
        if let Some(hash) = &settings.model_hash {
            source = source.with_expected_hash(hash.clone());
        }
        Self::new(source)
    }

    /// Install the process-wide service. Fails if one is already installed.
    pub fn install(service: PredictionService) -> std::result::Result<(), PredictionService> {
        GLOBAL.set(service)
    }

    pub fn global() -> Option<&'static PredictionService> {
        GLOBAL.get()
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// The model, loading it on first use
    pub fn model(&self) -> Result<Arc<dyn Regressor>> {
        let cached = self.model.get_or_init(|| {
            debug!(source = %self.source.describe(), "Loading model");
            match self.source.load() {
                Ok(model) => {
                    if let Some(graph) = model.graph() {
                        if !graph.has_imputation() {
                            warn!(
                                root = graph.name(),
                                "Model graph has no imputation stage; rows with missing numerics will fail"
                            );
                        }
                    }
                    Ok(model)
                }
                Err(e) => {
                    warn!(source = %self.source.describe(), error = %e, "Model load failed");
                    Err(match e {
                        PricingError::ArtifactLoad(msg) => msg,
                        other => other.to_string(),
                    })
                }
            }
        });

        match cached {
            Ok(model) => Ok(Arc::clone(model)),
            Err(msg) => Err(PricingError::ArtifactLoad(msg.clone())),
        }
    }

    /// Vocabulary introspected from the loaded model
    pub fn vocabulary(&self) -> Result<&VocabularyMap> {
        if let Some(vocabulary) = self.vocabulary.get() {
            return Ok(vocabulary);
        }
        let model = self.model()?;
        Ok(self.vocabulary.get_or_init(|| {
            let vocabulary = model.graph().map(extract_vocabulary).unwrap_or_default();
            if vocabulary.is_empty() {
                info!("No encoder vocabulary found; using fallback categories");
            } else {
                debug!(features = vocabulary.len(), "Encoder vocabulary extracted");
            }
            vocabulary
        }))
    }

    pub fn build_row(&self, input: &FeatureInput) -> Result<FeatureRow> {
        let vocabulary = self.vocabulary()?;
        FeatureAdapter::new(&self.schema, vocabulary, &self.fallbacks).build_row(input)
    }

    /// Score adapted rows, one value per output cell in row-major order
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let model = self.model()?;
        let frame = FeatureRow::to_frame(rows)?;
        let output = model.predict(&frame).map_err(map_model_error)?;
        Ok(output.flatten())
    }

    /// Validate, adapt and score one request
    #[instrument(skip_all)]
    pub fn handle(&self, request: PredictRequest) -> Result<PredictResponse> {
        let input = request.into_input()?;
        let row = self.build_row(&input)?;
        debug!(record = ?row.to_record(), "Adapted feature row");
        let prediction = self.predict(std::slice::from_ref(&row))?;
        Ok(PredictResponse { prediction })
    }
}

fn map_model_error(err: EstimatorError) -> PricingError {
    match err {
        EstimatorError::MissingCapability {
            capability,
            runtime_version,
            trained_with,
        } => {
            warn!(%capability, %trained_with, "Model needs a capability this runtime lacks");
            PricingError::EnvironmentMismatch {
                capability,
                runtime_version,
                pricing_version: crate::VERSION,
                trained_with,
            }
        }
        other => PricingError::Inference(other),
    }
}
