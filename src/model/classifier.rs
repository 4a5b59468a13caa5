use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};
use crate::model::forest::RandomForest;
use crate::model::network::NeuralNetwork;

/// What the predictor needs from a trained model.
pub trait Classifier {
    /// Number of inputs the model was trained on.
    fn n_features(&self) -> usize;

    /// Input names recorded at training time, if the artifact kept them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Class code for each output position.
    fn classes(&self) -> &[i64];

    fn predict(&self, x: &[f64]) -> Result<i64>;

    /// `None` when the model cannot estimate probabilities.
    fn predict_proba(&self, _x: &[f64]) -> Option<Result<Vec<f64>>> {
        None
    }
}

pub fn default_classes() -> Vec<i64> {
    vec![0, 1, 2, 3]
}

pub(crate) fn check_width(expected: usize, x: &[f64]) -> Result<()> {
    if x.len() != expected {
        return Err(SegmentError::Prediction(format!(
            "model expects {expected} features, got {}",
            x.len()
        )));
    }
    Ok(())
}

/// Index of the largest value; ties go to the first, NaN is ignored.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if current >= value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// A serialized segment model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentModel {
    RandomForest(RandomForest),
    NeuralNetwork(NeuralNetwork),
}

impl SegmentModel {
    pub fn kind(&self) -> &'static str {
        match self {
            SegmentModel::RandomForest(_) => "random_forest",
            SegmentModel::NeuralNetwork(_) => "neural_network",
        }
    }

    /// Structural checks; errors describe the first problem found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        match self {
            SegmentModel::RandomForest(m) => m.validate(),
            SegmentModel::NeuralNetwork(m) => m.validate(),
        }
    }

    fn inner(&self) -> &dyn Classifier {
        match self {
            SegmentModel::RandomForest(m) => m,
            SegmentModel::NeuralNetwork(m) => m,
        }
    }
}

impl Classifier for SegmentModel {
    fn n_features(&self) -> usize {
        self.inner().n_features()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.inner().feature_names()
    }

    fn classes(&self) -> &[i64] {
        self.inner().classes()
    }

    fn predict(&self, x: &[f64]) -> Result<i64> {
        self.inner().predict(x)
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Result<Vec<f64>>> {
        self.inner().predict_proba(x)
    }
}
