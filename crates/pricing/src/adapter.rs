//! Feature adapter
//!
//! Turns a raw feature vector or a sparse record into a complete
//! [`FeatureRow`] the model can consume:
//!
//! - categoricals outside the trained vocabulary (or absent) become the
//!   vocabulary's first category
//! - categoricals with no introspected vocabulary fall back to the static
//!   defaults when absent or empty
//! - numerics are parsed to `f64` or marked missing, never zero-filled
//!
//! Coercion never fails; the only errors are about the input's shape.

use crate::errors::{InputError, Result};
use crate::fallbacks::{FallbackTable, CAR_PRICE_FALLBACKS};
use crate::schema::{FeatureSchema, CAR_PRICE_SCHEMA};
use crate::types::{FeatureInput, FeatureRow, FeatureValue};
use crate::vocabulary::VocabularyMap;
use serde_json::Value;

/// Builds model-ready rows against one schema and vocabulary
#[derive(Debug, Clone, Copy)]
pub struct FeatureAdapter<'a> {
    schema: &'a FeatureSchema,
    vocabulary: &'a VocabularyMap,
    fallbacks: &'a FallbackTable,
}

impl<'a> FeatureAdapter<'a> {
    pub fn new(
        schema: &'a FeatureSchema,
        vocabulary: &'a VocabularyMap,
        fallbacks: &'a FallbackTable,
    ) -> Self {
        Self {
            schema,
            vocabulary,
            fallbacks,
        }
    }

    /// Adapter for the car price schema and its fallback table
    pub fn for_car_prices(vocabulary: &'a VocabularyMap) -> Self {
        Self::new(&CAR_PRICE_SCHEMA, vocabulary, &CAR_PRICE_FALLBACKS)
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.schema
    }

    pub fn build_row(&self, input: &FeatureInput) -> Result<FeatureRow> {
        let raw = self.assign(input)?;

        let entries = self
            .schema
            .features()
            .iter()
            .zip(raw)
            .map(|(&feature, value)| {
                let typed = if self.schema.is_categorical(feature) {
                    FeatureValue::Category(self.coerce_category(feature, value))
                } else {
                    FeatureValue::Numeric(coerce_number(value))
                };
                (feature.to_string(), typed)
            })
            .collect();

        Ok(FeatureRow::from_entries(entries))
    }

    /// Raw values in schema order, `None` where nothing was supplied
    fn assign<'v>(&self, input: &'v FeatureInput) -> Result<Vec<Option<&'v Value>>> {
        match input {
            FeatureInput::Features(values) => {
                if values.len() != self.schema.len() {
                    return Err(InputError::LengthMismatch {
                        expected: self.schema.len(),
                        actual: values.len(),
                    }
                    .into());
                }
                Ok(values.iter().map(Some).collect())
            }
            FeatureInput::Record(record) => Ok(self
                .schema
                .features()
                .iter()
                .map(|feature| record.get(*feature))
                .collect()),
        }
    }

    fn coerce_category(&self, feature: &str, value: Option<&Value>) -> Option<String> {
        let current = value.and_then(category_text);

        if let Some(known) = self.vocabulary.usable(feature) {
            return match current {
                Some(v) if known.contains(&v) => Some(v),
                _ => Some(known[0].clone()),
            };
        }

        match current {
            Some(v) if !v.is_empty() => Some(v),
            _ => self.fallbacks.get(feature).map(str::to_string),
        }
    }
}

/// Text form of a raw categorical value.
///
/// Numbers use their shortest decimal form so `6.0` and `6` both read as
/// `"6"`, matching how the estimator matches numeric cells to categories.
fn category_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(|f| f.to_string()).or_else(|| Some(n.to_string())),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric form of a raw value; anything unparsable or non-finite is missing
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}
