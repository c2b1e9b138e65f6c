//! Estimator runtime for the used-car price model
//!
//! Evaluates trained model graphs exported as JSON artifacts: pipelines,
//! column transformers, one-hot encoders, imputers, scalers, linear and
//! gradient boosted regressors.
//!
//! Modules:
//! - `frame`: Named tabular input
//! - `graph`: Estimator node kinds, traversal and dispatch
//! - `transform`: Fitted transformers
//! - `linear`, `tree`: Regressors
//! - `artifact`: Artifact loading, hashing and capability checks
//! - `runtime`: Runtime version and capability table

pub mod artifact;
pub mod errors;
pub mod frame;
pub mod graph;
pub mod linear;
pub mod runtime;
pub mod transform;
pub mod tree;

pub use artifact::TrainedModel;
pub use errors::{EstimatorError, Result};
pub use frame::{Cell, Frame};
pub use graph::{walk, Child, ColumnGroup, Estimator, NodeKind, Output, Remainder, Step, Visitor};
pub use linear::LinearRegression;
pub use runtime::{FORMAT_VERSION, RUNTIME_VERSION};
pub use transform::{HandleUnknown, OneHotEncoder, SimpleImputer, StandardScaler};
pub use tree::{GradientBoosting, Node, Tree};
