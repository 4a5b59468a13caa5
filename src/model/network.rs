use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};
use crate::model::classifier::{Classifier, argmax, check_width, default_classes};
use crate::model::layers::{relu, softmax};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// inputs × outputs
    pub weights: Array2<f64>,
    pub bias: Array1<f64>,
}

/// Feed-forward classifier: ReLU hidden layers, softmax output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuralNetwork {
    pub n_features: usize,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub layers: Vec<DenseLayer>,
}

impl NeuralNetwork {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.layers.is_empty() {
            return Err("network has no layers".into());
        }
        if self.classes.is_empty() {
            return Err("network has no classes".into());
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

        let mut width = self.n_features;
        for (i, layer) in self.layers.iter().enumerate() {
            let (rows, cols) = layer.weights.dim();
            if rows != width {
                return Err(format!("layer {i} takes {rows} inputs, previous layer gives {width}"));
            }
            if layer.bias.len() != cols {
                return Err(format!("layer {i} has {cols} outputs but {} biases", layer.bias.len()));
            }
            width = cols;
        }
        if width != self.classes.len() {
            return Err(format!(
                "output layer has {width} units for {} classes",
                self.classes.len()
            ));
        }
        Ok(())
    }

    pub fn forward(&self, x: &[f64]) -> Result<Array1<f64>> {
        check_width(self.n_features, x)?;

        let last = self.layers.len().saturating_sub(1);
        let mut activation = Array1::from(x.to_vec());
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.nrows() != activation.len() {
                return Err(SegmentError::Prediction(format!(
                    "layer {i} expects {} inputs, got {}",
                    layer.weights.nrows(),
                    activation.len()
                )));
            }
            let z = activation.dot(&layer.weights) + &layer.bias;
            activation = if i == last { softmax(&z) } else { relu(&z) };
        }
        Ok(activation)
    }
}

impl Classifier for NeuralNetwork {
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
        let output = self.forward(x)?;
        let probabilities = output.to_vec();
        argmax(&probabilities)
            .and_then(|index| self.classes.get(index).copied())
            .ok_or_else(|| SegmentError::Prediction("network produced no usable output".into()))
    }

    fn predict_proba(&self, x: &[f64]) -> Option<Result<Vec<f64>>> {
        Some(self.forward(x).map(|output| output.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Two inputs, one hidden layer; the output picks class 2 when the first
    /// input dominates and class 0 otherwise.
    fn network() -> NeuralNetwork {
        NeuralNetwork {
            n_features: 2,
            feature_names: None,
            classes: vec![0, 1, 2, 3],
            layers: vec![
                DenseLayer {
                    weights: array![[1.0, 0.0], [0.0, 1.0]],
                    bias: array![0.0, 0.0],
                },
                DenseLayer {
                    weights: array![[0.0, 0.0, 5.0, 0.0], [5.0, 0.0, 0.0, 0.0]],
                    bias: array![0.0, 0.0, 0.0, 0.0],
                },
            ],
        }
    }

    #[test]
    fn validates_layer_chain() {
        assert!(network().validate().is_ok());

        let mut broken = network();
        broken.layers[1].weights = array![[1.0, 0.0, 0.0, 0.0]];
        assert!(broken.validate().is_err());

        let mut wrong_output = network();
        wrong_output.classes = vec![0, 1];
        assert!(wrong_output.validate().is_err());
    }

    #[test]
    fn predicts_through_softmax() {
        let nn = network();
        assert_eq!(nn.predict(&[3.0, 0.0]).unwrap(), 2);
        assert_eq!(nn.predict(&[0.0, 3.0]).unwrap(), 0);

        let proba = nn.predict_proba(&[3.0, 0.0]).unwrap().unwrap();
        assert_eq!(proba.len(), 4);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wrong_width_is_reported_not_panicked() {
        let nn = network();
        assert!(matches!(
            nn.predict(&[1.0, 2.0, 3.0]),
            Err(SegmentError::Prediction(_))
        ));
    }
}
