//! Fitted transformers: one-hot encoding, imputation and scaling

use crate::errors::{EstimatorError, Result};
use crate::frame::{Cell, Frame};
use serde::{Deserialize, Serialize};

/// What the encoder does with a value it was not fitted on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

/// One-hot encoder with per-column learned categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// One category list per input column, in input order
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub handle_unknown: HandleUnknown,
    /// Column names seen at fit time, when the encoder was fitted standalone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names_in: Option<Vec<String>>,
}

impl OneHotEncoder {
    pub fn new(categories: Vec<Vec<String>>) -> Self {
        Self {
            categories,
            handle_unknown: HandleUnknown::Error,
            feature_names_in: None,
        }
    }

    pub fn transform(&self, frame: &Frame) -> Result<Frame> {
        check_width("one_hot_encoder", self.categories.len(), frame.n_columns())?;

        let columns = frame
            .columns()
            .iter()
            .zip(&self.categories)
            .flat_map(|(column, cats)| cats.iter().map(move |cat| format!("{column}_{cat}")))
            .collect();

        let width: usize = self.categories.iter().map(Vec::len).sum();
        let mut matrix = Vec::with_capacity(frame.n_rows());
        for row in frame.rows() {
            let mut encoded = Vec::with_capacity(width);
            for ((cell, cats), column) in row.iter().zip(&self.categories).zip(frame.columns()) {
                let position = cell
                    .as_category()
                    .and_then(|value| cats.iter().position(|c| *c == value));
                match (position, self.handle_unknown) {
                    (Some(hit), _) => {
                        encoded.extend((0..cats.len()).map(|i| if i == hit { 1.0 } else { 0.0 }))
                    }
                    (None, HandleUnknown::Ignore) => {
                        encoded.extend(std::iter::repeat(0.0).take(cats.len()))
                    }
                    (None, HandleUnknown::Error) => {
                        return Err(EstimatorError::UnknownCategory {
                            column: column.clone(),
                            value: cell.as_category().unwrap_or_else(|| "None".to_string()),
                        })
                    }
                }
            }
            matrix.push(encoded);
        }

        Ok(Frame::from_matrix(columns, matrix))
    }
}

/// Replaces missing numeric values with fitted per-column statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleImputer {
    pub statistics: Vec<f64>,
}

impl SimpleImputer {
    pub fn transform(&self, frame: &Frame) -> Result<Frame> {
        check_width("simple_imputer", self.statistics.len(), frame.n_columns())?;

        let mut matrix = Vec::with_capacity(frame.n_rows());
        for row in frame.rows() {
            let filled = row
                .iter()
                .zip(frame.columns())
                .zip(&self.statistics)
                .map(|((cell, column), fill)| match cell {
                    c if c.is_missing() => Ok(*fill),
                    Cell::Number(n) => Ok(*n),
                    other => other.as_number(column),
                })
                .collect::<Result<Vec<_>>>()?;
            matrix.push(filled);
        }

        Ok(Frame::from_matrix(frame.columns().to_vec(), matrix))
    }
}

/// Standardizes each column with fitted mean and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn transform(&self, frame: &Frame) -> Result<Frame> {
        check_width("standard_scaler", self.mean.len(), frame.n_columns())?;

        let matrix = frame
            .to_matrix()?
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(self.mean.iter().zip(&self.scale))
                    .map(|(x, (mean, scale))| {
                        // zero variance columns were left unscaled at fit time
                        let scale = if *scale == 0.0 { 1.0 } else { *scale };
                        (x - mean) / scale
                    })
                    .collect()
            })
            .collect();

        Ok(Frame::from_matrix(frame.columns().to_vec(), matrix))
    }

    pub fn validate(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(EstimatorError::InvalidModel(format!(
                "standard_scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }
}

pub(crate) fn check_width(stage: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(EstimatorError::ShapeMismatch {
            stage,
            expected,
            actual,
        });
    }
    Ok(())
}
