//! Tabular input for estimator graphs
//!
//! A [`Frame`] holds named columns and rows of loosely typed [`Cell`]s. Every
//! stage of a graph consumes a frame and the transforming stages produce a new
//! one, so column names survive as far as the stages keep them.

use crate::errors::{EstimatorError, Result};
use serde::{Deserialize, Serialize};

/// A single value in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Text form used when matching against fitted categories.
    ///
    /// Numbers compare by their shortest decimal form, so `4.0` matches `"4"`.
    pub fn as_category(&self) -> Option<String> {
        match self {
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.is_nan() => None,
            Cell::Number(n) => Some(n.to_string()),
            Cell::Missing => None,
        }
    }

    /// Numeric form; missing becomes `NaN`, text is rejected.
    pub fn as_number(&self, column: &str) -> Result<f64> {
        match self {
            Cell::Number(n) => Ok(*n),
            Cell::Missing => Ok(f64::NAN),
            Cell::Text(s) => Err(EstimatorError::NonNumeric {
                column: column.to_string(),
                value: s.clone(),
            }),
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Number(n) => n.is_nan(),
            Cell::Text(_) => false,
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map(Cell::Number).unwrap_or(Cell::Missing)
    }
}

/// Row-major table with named columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Frame {
    /// Create an empty frame with the given column names
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; its width must match the column count
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(EstimatorError::ShapeMismatch {
                stage: "frame",
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Project the frame onto `names`, in that order
    pub fn select(&self, names: &[String]) -> Result<Frame> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| EstimatorError::MissingColumn(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Frame {
            columns: names.to_vec(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Columns not listed in `used`, in frame order
    pub fn remaining_columns(&self, used: &[&String]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !used.contains(c))
            .cloned()
            .collect()
    }

    /// Join frames with the same row count side by side
    pub fn hconcat(parts: Vec<Frame>, n_rows: usize) -> Result<Frame> {
        let mut out = Frame {
            columns: Vec::new(),
            rows: vec![Vec::new(); n_rows],
        };
        for part in parts {
            if part.n_rows() != n_rows {
                return Err(EstimatorError::ShapeMismatch {
                    stage: "column_transformer",
                    expected: n_rows,
                    actual: part.n_rows(),
                });
            }
            out.columns.extend(part.columns);
            for (dst, src) in out.rows.iter_mut().zip(part.rows) {
                dst.extend(src);
            }
        }
        Ok(out)
    }

    /// Numeric view of the frame, one `Vec<f64>` per row
    pub fn to_matrix(&self) -> Result<Vec<Vec<f64>>> {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.columns)
                    .map(|(cell, column)| cell.as_number(column))
                    .collect()
            })
            .collect()
    }

    /// Build a numeric frame from a matrix, keeping the given column names
    pub(crate) fn from_matrix(columns: Vec<String>, matrix: Vec<Vec<f64>>) -> Frame {
        Frame {
            columns,
            rows: matrix
                .into_iter()
                .map(|row| row.into_iter().map(Cell::Number).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        let mut frame = Frame::new(["fueltype", "enginesize", "horsepower"]);
        frame
            .push_row(vec![Cell::from("gas"), Cell::from(130.0), Cell::Missing])
            .unwrap();
        frame
    }

    #[test]
    fn test_push_row_rejects_wrong_width() {
        let mut frame = Frame::new(["a", "b"]);
        let err = frame.push_row(vec![Cell::from(1.0)]).unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::ShapeMismatch { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn test_select_reorders_columns() {
        let frame = sample();
        let selected = frame
            .select(&["horsepower".to_string(), "fueltype".to_string()])
            .unwrap();
        assert_eq!(selected.columns(), &["horsepower", "fueltype"]);
        assert_eq!(selected.rows()[0], vec![Cell::Missing, Cell::from("gas")]);
    }

    #[test]
    fn test_select_missing_column() {
        let err = sample().select(&["stroke".to_string()]).unwrap_err();
        assert!(matches!(err, EstimatorError::MissingColumn(c) if c == "stroke"));
    }

    #[test]
    fn test_to_matrix_rejects_text() {
        let err = sample().to_matrix().unwrap_err();
        assert!(matches!(err, EstimatorError::NonNumeric { column, .. } if column == "fueltype"));
    }

    #[test]
    fn test_missing_becomes_nan() {
        let frame = sample()
            .select(&["enginesize".to_string(), "horsepower".to_string()])
            .unwrap();
        let matrix = frame.to_matrix().unwrap();
        assert_eq!(matrix[0][0], 130.0);
        assert!(matrix[0][1].is_nan());
    }

    #[test]
    fn test_category_text_for_numbers() {
        assert_eq!(Cell::from(4.0).as_category().as_deref(), Some("4"));
        assert_eq!(Cell::from(2.5).as_category().as_deref(), Some("2.5"));
        assert_eq!(Cell::Missing.as_category(), None);
    }

    #[test]
    fn test_hconcat_joins_columns() {
        let left = sample().select(&["fueltype".to_string()]).unwrap();
        let right = sample().select(&["enginesize".to_string()]).unwrap();
        let joined = Frame::hconcat(vec![left, right], 1).unwrap();
        assert_eq!(joined.columns(), &["fueltype", "enginesize"]);
        assert_eq!(joined.rows()[0].len(), 2);
    }
}
