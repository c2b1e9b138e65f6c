//! Feature schema of the used-car price model
//!
//! The order of [`FEATURE_COLUMNS`] is the order the model was trained on.
//! Raw feature vectors are interpreted positionally against it.

use std::collections::HashSet;

/// All model features, in training order
pub const FEATURE_COLUMNS: &[&str] = &[
    "car_ID",
    "symboling",
    "CarName",
    "fueltype",
    "aspiration",
    "doornumber",
    "carbody",
    "drivewheel",
    "enginelocation",
    "wheelbase",
    "carlength",
    "carwidth",
    "carheight",
    "curbweight",
    "enginetype",
    "cylindernumber",
    "enginesize",
    "fuelsystem",
    "boreratio",
    "stroke",
    "compressionratio",
    "horsepower",
    "peakrpm",
    "citympg",
    "highwaympg",
];

/// Features whose values are discrete strings
pub const CATEGORICAL_COLUMNS: &[&str] = &[
    "CarName",
    "fueltype",
    "aspiration",
    "doornumber",
    "carbody",
    "drivewheel",
    "enginelocation",
    "enginetype",
    "cylindernumber",
    "fuelsystem",
];

/// Schema the car price model was trained with
pub const CAR_PRICE_SCHEMA: FeatureSchema = FeatureSchema::new(FEATURE_COLUMNS, CATEGORICAL_COLUMNS);

/// Ordered feature names split into categorical and numeric features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSchema {
    features: &'static [&'static str],
    categorical: &'static [&'static str],
}

impl FeatureSchema {
    pub const fn new(
        features: &'static [&'static str],
        categorical: &'static [&'static str],
    ) -> Self {
        Self {
            features,
            categorical,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &'static [&'static str] {
        self.features
    }

    pub fn categorical(&self) -> &'static [&'static str] {
        self.categorical
    }

    /// Numeric features, in schema order
    pub fn numeric(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.features
            .iter()
            .copied()
            .filter(|f| !self.categorical.contains(f))
    }

    pub fn is_categorical(&self, feature: &str) -> bool {
        self.categorical.contains(&feature)
    }

    pub fn position(&self, feature: &str) -> Option<usize> {
        self.features.iter().position(|f| *f == feature)
    }

    /// Check that names are unique and categoricals belong to the schema
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.features.len());
        for feature in self.features {
            if !seen.insert(*feature) {
                return Err(format!("Feature {feature:?} appears more than once"));
            }
        }
        for feature in self.categorical {
            if !seen.contains(feature) {
                return Err(format!(
                    "Categorical feature {feature:?} is not part of the schema"
                ));
            }
        }
        Ok(())
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        CAR_PRICE_SCHEMA
    }
}
