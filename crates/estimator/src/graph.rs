//! Estimator composition graphs
//!
//! A trained model is a tree of [`Estimator`] nodes. Every node is one of
//! three kinds:
//!
//! - [`NodeKind::Sequential`]: a pipeline of named steps, applied in order
//! - [`NodeKind::ColumnDispatch`]: named column groups, each handed to its own
//!   sub-estimator, outputs concatenated side by side
//! - [`NodeKind::Leaf`]: encoders, imputers, scalers, regressors and the
//!   drop/passthrough markers
//!
//! [`walk`] visits the graph depth first in pre-order and carries the column
//! names of the enclosing column group down to the nodes below it.

use crate::errors::{EstimatorError, Result};
use crate::frame::Frame;
use crate::linear::LinearRegression;
use crate::transform::{check_width, OneHotEncoder, SimpleImputer, StandardScaler};
use crate::tree::GradientBoosting;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// Structural kind of a graph node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Sequential,
    ColumnDispatch,
    Leaf,
}

/// Named step of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    pub estimator: Estimator,
}

/// Named column group of a column transformer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub name: String,
    pub columns: Vec<String>,
    pub estimator: Estimator,
}

/// What a column transformer does with columns no group claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Remainder {
    #[default]
    Drop,
    Passthrough,
}

/// A node of a trained model graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Pipeline {
        steps: Vec<Step>,
    },
    ColumnTransformer {
        transformers: Vec<ColumnGroup>,
        #[serde(default)]
        remainder: Remainder,
    },
    OneHotEncoder(OneHotEncoder),
    SimpleImputer(SimpleImputer),
    StandardScaler(StandardScaler),
    LinearRegression(LinearRegression),
    GradientBoosting(GradientBoosting),
    Drop,
    Passthrough,
}

/// Borrowed view of a child node
#[derive(Debug, Clone, Copy)]
pub struct Child<'a> {
    pub name: &'a str,
    /// Columns routed to this child, set for column group members only
    pub columns: Option<&'a [String]>,
    pub node: &'a Estimator,
}

/// Model output before flattening
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// Row-major values
    pub values: Vec<f64>,
    /// `[n_rows]` for single-target models, `[n_rows, n_targets]` otherwise
    pub shape: Vec<usize>,
}

impl Output {
    pub fn flatten(self) -> Vec<f64> {
        self.values
    }
}

impl Estimator {
    pub fn name(&self) -> &'static str {
        match self {
            Estimator::Pipeline { .. } => "pipeline",
            Estimator::ColumnTransformer { .. } => "column_transformer",
            Estimator::OneHotEncoder(_) => "one_hot_encoder",
            Estimator::SimpleImputer(_) => "simple_imputer",
            Estimator::StandardScaler(_) => "standard_scaler",
            Estimator::LinearRegression(_) => "linear_regression",
            Estimator::GradientBoosting(_) => "gradient_boosting",
            Estimator::Drop => "drop",
            Estimator::Passthrough => "passthrough",
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Estimator::Pipeline { .. } => NodeKind::Sequential,
            Estimator::ColumnTransformer { .. } => NodeKind::ColumnDispatch,
            _ => NodeKind::Leaf,
        }
    }

    pub fn children(&self) -> Vec<Child<'_>> {
        match self {
            Estimator::Pipeline { steps } => steps
                .iter()
                .map(|s| Child {
                    name: &s.name,
                    columns: None,
                    node: &s.estimator,
                })
                .collect(),
            Estimator::ColumnTransformer { transformers, .. } => transformers
                .iter()
                .map(|g| Child {
                    name: &g.name,
                    columns: Some(&g.columns),
                    node: &g.estimator,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Learned category lists, if this node is a fitted categorical encoder
    pub fn fitted_categories(&self) -> Option<&[Vec<String>]> {
        match self {
            Estimator::OneHotEncoder(enc) if !enc.categories.is_empty() => Some(&enc.categories),
            _ => None,
        }
    }

    /// Column names the node recorded at fit time, if any
    pub fn feature_names_in(&self) -> Option<&[String]> {
        match self {
            Estimator::OneHotEncoder(enc) => enc.feature_names_in.as_deref(),
            _ => None,
        }
    }

    pub fn is_regressor(&self) -> bool {
        match self {
            Estimator::LinearRegression(_) | Estimator::GradientBoosting(_) => true,
            Estimator::Pipeline { steps } => steps.last().is_some_and(|s| s.estimator.is_regressor()),
            _ => false,
        }
    }

    /// Whether any node below (or at) this one imputes missing values
    pub fn has_imputation(&self) -> bool {
        let mut found = false;
        let _ = walk(self, &mut |node: &Estimator, _: Option<&[String]>| {
            if matches!(
                node,
                Estimator::SimpleImputer(_) | Estimator::GradientBoosting(_)
            ) {
                found = true;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });
        found
    }

    pub fn transform(&self, frame: &Frame) -> Result<Frame> {
        match self {
            Estimator::Pipeline { steps } => steps
                .iter()
                .try_fold(frame.clone(), |acc, step| step.estimator.transform(&acc)),
            Estimator::ColumnTransformer {
                transformers,
                remainder,
            } => {
                let mut parts = Vec::with_capacity(transformers.len() + 1);
                for group in transformers {
                    if matches!(group.estimator, Estimator::Drop) {
                        continue;
                    }
                    let selected = frame.select(&group.columns)?;
                    parts.push(group.estimator.transform(&selected)?);
                }
                if *remainder == Remainder::Passthrough {
                    let used: Vec<&String> =
                        transformers.iter().flat_map(|g| &g.columns).collect();
                    parts.push(frame.select(&frame.remaining_columns(&used))?);
                }
                Frame::hconcat(parts, frame.n_rows())
            }
            Estimator::OneHotEncoder(enc) => enc.transform(frame),
            Estimator::SimpleImputer(imp) => imp.transform(frame),
            Estimator::StandardScaler(scaler) => scaler.transform(frame),
            Estimator::Passthrough => Ok(frame.clone()),
            Estimator::Drop => Frame::hconcat(Vec::new(), frame.n_rows()),
            Estimator::LinearRegression(_) | Estimator::GradientBoosting(_) => {
                Err(EstimatorError::NotATransformer(self.name()))
            }
        }
    }

    pub fn predict(&self, frame: &Frame) -> Result<Output> {
        match self {
            Estimator::Pipeline { steps } => {
                let Some((last, head)) = steps.split_last() else {
                    return Err(EstimatorError::InvalidModel("empty pipeline".to_string()));
                };
                let transformed = head
                    .iter()
                    .try_fold(frame.clone(), |acc, step| step.estimator.transform(&acc))?;
                last.estimator.predict(&transformed)
            }
            Estimator::LinearRegression(model) => {
                let rows = model.predict(frame)?;
                let n_rows = rows.len();
                let shape = if model.n_targets() == 1 {
                    vec![n_rows]
                } else {
                    vec![n_rows, model.n_targets()]
                };
                Ok(Output {
                    values: rows.into_iter().flatten().collect(),
                    shape,
                })
            }
            Estimator::GradientBoosting(model) => {
                check_width(
                    "gradient_boosting",
                    model.n_features,
                    frame.n_columns(),
                )?;
                let values: Vec<f64> = frame
                    .to_matrix()?
                    .iter()
                    .map(|row| model.predict_row(row))
                    .collect();
                Ok(Output {
                    shape: vec![values.len()],
                    values,
                })
            }
            _ => Err(EstimatorError::NotARegressor(self.name())),
        }
    }

    /// Structural checks that do not need input data
    pub fn validate(&self) -> Result<()> {
        match self {
            Estimator::Pipeline { steps } if steps.is_empty() => {
                return Err(EstimatorError::InvalidModel("empty pipeline".to_string()))
            }
            Estimator::ColumnTransformer { transformers, .. } => {
                for group in transformers {
                    let expected = match &group.estimator {
                        Estimator::OneHotEncoder(enc) => Some(enc.categories.len()),
                        Estimator::SimpleImputer(imp) => Some(imp.statistics.len()),
                        Estimator::StandardScaler(s) => Some(s.mean.len()),
                        _ => None,
                    };
                    if let Some(expected) = expected {
                        if expected != group.columns.len() {
                            return Err(EstimatorError::InvalidModel(format!(
                                "column group {:?} routes {} columns to a {} fitted on {}",
                                group.name,
                                group.columns.len(),
                                group.estimator.name(),
                                expected
                            )));
                        }
                    }
                }
            }
            Estimator::StandardScaler(scaler) => scaler.validate()?,
            Estimator::LinearRegression(model) => model.validate()?,
            Estimator::GradientBoosting(model) => {
                model.validate().map_err(EstimatorError::InvalidModel)?
            }
            _ => {}
        }

        for child in self.children() {
            child.node.validate()?;
        }
        Ok(())
    }
}

/// Callback for [`walk`]
pub trait Visitor {
    /// Called once per node; `columns` is the enclosing column group's
    /// column list, if any. Return `Break` to stop the walk.
    fn visit(&mut self, node: &Estimator, columns: Option<&[String]>) -> ControlFlow<()>;
}

impl<F> Visitor for F
where
    F: FnMut(&Estimator, Option<&[String]>) -> ControlFlow<()>,
{
    fn visit(&mut self, node: &Estimator, columns: Option<&[String]>) -> ControlFlow<()> {
        self(node, columns)
    }
}

/// Depth-first pre-order walk over the graph rooted at `root`
pub fn walk<V: Visitor + ?Sized>(root: &Estimator, visitor: &mut V) -> ControlFlow<()> {
    walk_node(root, None, visitor)
}

fn walk_node<V: Visitor + ?Sized>(
    node: &Estimator,
    columns: Option<&[String]>,
    visitor: &mut V,
) -> ControlFlow<()> {
    visitor.visit(node, columns)?;
    for child in node.children() {
        walk_node(child.node, child.columns.or(columns), visitor)?;
    }
    ControlFlow::Continue(())
}
