//! Random forest of axis-aligned decision trees.
//!
//! Node layout follows the usual exported-tree convention: node 0 is the
//! root, a split sends `x[feature] <= threshold` left, and each leaf stores
//! per-class weights (counts or fractions) in the order of `classes`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};
use crate::model::classifier::{Classifier, argmax, check_width, default_classes};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Normalized class distribution of the leaf `x` lands in.
    pub fn leaf_distribution(&self, x: &[f64]) -> Result<Vec<f64>> {
        let mut index = 0;
        // children always sit after their parent, so this walk is bounded
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = x.get(*feature).ok_or_else(|| {
                        SegmentError::Prediction(format!("split on missing feature {feature}"))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => {
                    let total: f64 = value.iter().sum();
                    if total <= 0.0 {
                        return Err(SegmentError::Prediction(format!("empty leaf at node {index}")));
                    }
                    return Ok(value.iter().map(|v| v / total).collect());
                }
                None => {
                    return Err(SegmentError::Prediction(format!("node {index} out of range")));
                }
            }
        }
        Err(SegmentError::Prediction("tree walk did not reach a leaf".into()))
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    threshold,
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {i} splits on feature {feature} of {n_features}"));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {i} has a NaN threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {i} has invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "leaf {i} has {} weights for {n_classes} classes",
                            value.len()
                        ));
                    }
                    if value.iter().any(|v| *v < 0.0 || !v.is_finite()) {
                        return Err(format!("leaf {i} has a negative or non-finite weight"));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("leaf {i} has no weight"));
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        if self.classes.is_empty() {
            return Err("forest has no classes".into());
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.n_features {
                return Err(format!(
                    "{} feature names for {} features",
                    names.len(),
                    self.n_features
                ));
            }
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(())
    }

    /// Mean of the trees' leaf distributions.
    pub fn probabilities(&self, x: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features, x)?;
        let mut sum = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let dist = tree.leaf_distribution(x)?;
            if dist.len() != sum.len() {
                return Err(SegmentError::Prediction(format!(
                    "leaf has {} weights for {} classes",
                    dist.len(),
                    sum.len()
                )));
            }
            for (acc, p) in sum.iter_mut().zip(dist) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        Ok(sum.into_iter().map(|s| s / n).collect())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict(&self, x: &[f64]) -> Result<i64> {
        let probabilities = self.probabilities(x)?;
        argmax(&probabilities)
            .and_then(|index| self.classes.get(index).copied())
            .ok_or_else(|| SegmentError::Prediction("forest produced no class".into()))
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Result<Vec<f64>>> {
        Some(self.probabilities(x))
    }
}
