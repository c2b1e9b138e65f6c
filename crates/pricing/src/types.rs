//! Request, response and feature row types

use crate::errors::InputError;
use autoprice_estimator::{Cell, EstimatorError, Frame};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Loosely typed caller input, before adaptation
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureInput {
    /// Values aligned to schema order
    Features(Vec<Value>),
    /// Sparse feature name -> value record
    Record(Map<String, Value>),
}

/// Typed value of one feature; `None` is the missing marker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Numeric(Option<f64>),
    Category(Option<String>),
}

impl FeatureValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, FeatureValue::Numeric(None) | FeatureValue::Category(None))
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(v) => v.as_deref(),
            FeatureValue::Numeric(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Numeric(v) => *v,
            FeatureValue::Category(_) => None,
        }
    }

    pub fn to_cell(&self) -> Cell {
        match self {
            FeatureValue::Numeric(Some(n)) => Cell::Number(*n),
            FeatureValue::Category(Some(s)) => Cell::Text(s.clone()),
            _ => Cell::Missing,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FeatureValue::Numeric(Some(n)) => {
                Number::from_f64(*n).map(Value::Number).unwrap_or(Value::Null)
            }
            FeatureValue::Category(Some(s)) => Value::String(s.clone()),
            _ => Value::Null,
        }
    }
}

/// One complete, schema-ordered feature row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureRow {
    pub(crate) fn from_entries(entries: Vec<(String, FeatureValue)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == feature)
            .map(|(_, value)| value)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Sparse record view; missing values become `null`
    pub fn to_record(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }

    /// Stack rows into a frame with this row's column order
    pub fn to_frame(rows: &[FeatureRow]) -> Result<Frame, EstimatorError> {
        let Some(first) = rows.first() else {
            return Ok(Frame::default());
        };
        let mut frame = Frame::new(first.names());
        for row in rows {
            frame.push_row(row.entries.iter().map(|(_, v)| v.to_cell()).collect())?;
        }
        Ok(frame)
    }
}

/// Inbound prediction request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Full feature vector in schema order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Value>>,
    /// Partial or full feature record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<Map<String, Value>>,
}

impl PredictRequest {
    pub fn from_record(record: Map<String, Value>) -> Self {
        Self {
            features: None,
            record: Some(record),
        }
    }

    pub fn from_features(features: Vec<Value>) -> Self {
        Self {
            features: Some(features),
            record: None,
        }
    }

    /// Exactly one of `features` and `record` must be present
    pub fn into_input(self) -> Result<FeatureInput, InputError> {
        match (self.features, self.record) {
            (Some(features), None) => Ok(FeatureInput::Features(features)),
            (None, Some(record)) => Ok(FeatureInput::Record(record)),
            (None, None) => Err(InputError::MissingInput),
            (Some(_), Some(_)) => Err(InputError::AmbiguousInput),
        }
    }
}

/// Outbound prediction response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Vec<f64>,
}
