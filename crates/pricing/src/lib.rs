//! Used-car price prediction core
//!
//! Turns loosely typed caller input into a complete feature row that matches
//! what the trained model saw, and runs the model on it.
//!
//! Modules:
//! - `schema`: Ordered feature names, categorical/numeric split
//! - `fallbacks`: Static defaults for categoricals without a vocabulary
//! - `vocabulary`: Category vocabularies introspected from the model graph
//! - `adapter`: Raw vector / sparse record to feature row
//! - `service`: Cached model loading and inference
//! - `types`: Requests, responses and feature rows
//! - `errors`: Input and service errors with their status codes
//! - `config`, `logging`: Settings and tracing setup

pub mod adapter;
pub mod config;
pub mod errors;
pub mod fallbacks;
pub mod logging;
pub mod schema;
pub mod service;
pub mod types;
pub mod vocabulary;

pub use adapter::FeatureAdapter;
pub use config::PricingSettings;
pub use errors::{InputError, PricingError, Result};
pub use fallbacks::{FallbackTable, CAR_PRICE_FALLBACKS};
pub use schema::{FeatureSchema, CAR_PRICE_SCHEMA, CATEGORICAL_COLUMNS, FEATURE_COLUMNS};
pub use service::{ArtifactSource, ModelSource, PredictionService, Regressor};
pub use types::{FeatureInput, FeatureRow, FeatureValue, PredictRequest, PredictResponse};
pub use vocabulary::{extract_vocabulary, VocabularyMap};

/// Crate version, reported alongside the estimator runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
