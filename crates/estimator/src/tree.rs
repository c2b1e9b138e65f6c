//! Decision trees for gradient boosted regression
//!
//! Nodes are stored flat, node 0 is the root. Missing feature values follow
//! the node's `default_left` branch, the way the training library routed
//! them.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// Leaf nodes carry `leaf = Some(value)` and `feature_idx == -1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Left child index (-1 for leaf nodes)
    pub left: i32,

    /// Right child index (-1 for leaf nodes)
    pub right: i32,

    /// Feature index to split on (-1 for leaf nodes)
    #[serde(rename = "feature_idx", alias = "feature")]
    pub feature_idx: i32,

    /// Go left when `feature < threshold`
    #[serde(default)]
    pub threshold: f64,

    /// Branch taken by missing values
    #[serde(default = "default_left")]
    pub default_left: bool,

    /// Leaf value (Some for leaf nodes, None for internal nodes)
    #[serde(default)]
    pub leaf: Option<f64>,
}

fn default_left() -> bool {
    true
}

impl Node {
    pub fn internal(feature_idx: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            left,
            right,
            feature_idx,
            threshold,
            default_left: true,
            leaf: None,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Self {
            left: -1,
            right: -1,
            feature_idx: -1,
            threshold: 0.0,
            default_left: true,
            leaf: Some(value),
        }
    }

    /// Route missing values to the right branch instead
    pub fn missing_right(mut self) -> Self {
        self.default_left = false;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.feature_idx == -1 || self.leaf.is_some()
    }
}

/// A single regression tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,

    /// Multiplier applied to this tree's leaf value
    #[serde(default = "unit_weight")]
    pub weight: f64,
}

fn unit_weight() -> f64 {
    1.0
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes, weight: 1.0 }
    }

    /// Evaluate the tree on one feature row.
    ///
    /// Assumes the tree passed [`Tree::validate`] against the row width.
    pub fn evaluate(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;

        loop {
            let Some(node) = self.nodes.get(idx) else {
                return 0.0;
            };

            if node.is_leaf() {
                return node.leaf.unwrap_or(0.0) * self.weight;
            }

            let Some(&value) = features.get(node.feature_idx as usize) else {
                return 0.0;
            };

            let go_left = if value.is_nan() {
                node.default_left
            } else {
                value < node.threshold
            };

            idx = if go_left { node.left } else { node.right } as usize;
        }
    }

    /// Largest feature index referenced by a split
    pub fn max_feature_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter(|n| !n.is_leaf())
            .map(|n| n.feature_idx as usize)
            .max()
    }

    /// Check child links and leaf values
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }

        let len = self.nodes.len() as i32;
        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.leaf.is_none() {
                    return Err(format!("Leaf node {i} has no leaf value"));
                }
                continue;
            }
            // children must point forward, which also rules out cycles
            if node.left <= i as i32 || node.left >= len {
                return Err(format!("Node {} has invalid left child: {}", i, node.left));
            }
            if node.right <= i as i32 || node.right >= len {
                return Err(format!("Node {} has invalid right child: {}", i, node.right));
            }
            if node.feature_idx < 0 {
                return Err(format!(
                    "Internal node {} has invalid feature index: {}",
                    i, node.feature_idx
                ));
            }
        }

        Ok(())
    }
}

/// Gradient boosted tree ensemble
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradientBoosting {
    /// Starting prediction before any tree is added
    pub base_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<Tree>,
    /// Input width the ensemble was fitted on
    pub n_features: usize,
}

impl GradientBoosting {
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        self.base_score + self.learning_rate * sum
    }

    pub fn validate(&self) -> Result<(), String> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|e| format!("Tree {i} validation failed: {e}"))?;
            if let Some(max) = tree.max_feature_index() {
                if max >= self.n_features {
                    return Err(format!(
                        "Tree {i} splits on feature {max} but the model has {} features",
                        self.n_features
                    ));
                }
            }
        }
        Ok(())
    }
}
