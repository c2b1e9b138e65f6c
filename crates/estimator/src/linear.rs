//! Ordinary least squares regressor

use crate::errors::{EstimatorError, Result};
use crate::frame::Frame;
use crate::transform::check_width;
use serde::{Deserialize, Serialize};

/// Fitted linear model, one coefficient vector per target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
}

impl LinearRegression {
    /// Single-target model
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients: vec![coefficients],
            intercept: vec![intercept],
        }
    }

    pub fn n_targets(&self) -> usize {
        self.coefficients.len()
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.first().map(Vec::len).unwrap_or(0)
    }

    /// Predict every row; the result is row-major `[n_rows][n_targets]`
    pub fn predict(&self, frame: &Frame) -> Result<Vec<Vec<f64>>> {
        check_width("linear_regression", self.n_features(), frame.n_columns())?;

        let matrix = frame.to_matrix()?;
        let mut out = Vec::with_capacity(matrix.len());
        for row in matrix {
            if let Some(i) = row.iter().position(|x| x.is_nan()) {
                return Err(EstimatorError::NaNInput {
                    column: frame.columns()[i].clone(),
                });
            }
            out.push(
                self.coefficients
                    .iter()
                    .zip(&self.intercept)
                    .map(|(coef, b)| b + coef.iter().zip(&row).map(|(w, x)| w * x).sum::<f64>())
                    .collect(),
            );
        }
        Ok(out)
    }

    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(EstimatorError::InvalidModel(
                "linear_regression has no coefficients".to_string(),
            ));
        }
        if self.coefficients.len() != self.intercept.len() {
            return Err(EstimatorError::InvalidModel(format!(
                "linear_regression has {} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercept.len()
            )));
        }
        let width = self.n_features();
        if self.coefficients.iter().any(|c| c.len() != width) {
            return Err(EstimatorError::InvalidModel(
                "linear_regression coefficient rows differ in length".to_string(),
            ));
        }
        Ok(())
    }
}
