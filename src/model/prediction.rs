use serde::{Deserialize, Serialize};

use crate::data::features::FeatureRow;
use crate::error::{Result, SegmentError};
use crate::model::classifier::Classifier;

/// Class code → segment tier, cheapest first.
pub const SEGMENT_LABELS: [(i64, &str); 4] = [
    (0, "Bình dân"),
    (1, "Trung cấp"),
    (2, "Cao cấp"),
    (3, "VIP"),
];

const PROBABILITY_TOLERANCE: f64 = 1e-6;
const BAR_WIDTH: usize = 30;

pub fn segment_label(code: i64) -> String {
    SEGMENT_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("Unknown({code})"))
}

pub fn is_known_segment(code: i64) -> bool {
    SEGMENT_LABELS.iter().any(|(c, _)| *c == code)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbability {
    pub code: i64,
    pub label: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_code: i64,
    pub label: String,
    pub probabilities: Option<Vec<ClassProbability>>,
}

impl Prediction {
    pub fn display(&self) {
        println!("\nPredicted segment: {}", self.label);
        if let Some(probabilities) = &self.probabilities {
            println!("\nConfidence:");
            for line in confidence_bars(probabilities) {
                println!("  {line}");
            }
        }
    }
}

/// One text bar per class, e.g. `VIP        ██████████            62.50%`.
pub fn confidence_bars(probabilities: &[ClassProbability]) -> Vec<String> {
    let label_width = probabilities
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    probabilities
        .iter()
        .map(|p| {
            let filled = (p.probability.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
            let pad = label_width - p.label.chars().count();
            format!(
                "{}{} {}{} {:>6.2}%",
                p.label,
                " ".repeat(pad),
                "█".repeat(filled),
                " ".repeat(BAR_WIDTH - filled),
                p.probability * 100.0
            )
        })
        .collect()
}

/// Run the model on a prepared row (schema order, scaled, leakage dropped).
pub fn predict(model: &dyn Classifier, row: &FeatureRow) -> Result<Prediction> {
    if let Some(expected) = model.feature_names() {
        let actual: Vec<&str> = row.names().collect();
        if actual.len() != expected.len() || actual.iter().zip(expected).any(|(a, e)| *a != e) {
            return Err(SegmentError::Prediction(format!(
                "feature names differ from the model's training columns ({} vs {})",
                actual.len(),
                expected.len()
            )));
        }
    }

    let x = row.to_vector();
    let class_code = model.predict(&x)?;
    let label = segment_label(class_code);
    log::debug!("model predicted class {class_code} ({label})");

    let probabilities = match model.predict_proba(&x) {
        Some(result) => Some(label_probabilities(model.classes(), result?)?),
        None => None,
    };

    Ok(Prediction {
        class_code,
        label,
        probabilities,
    })
}

fn label_probabilities(classes: &[i64], probabilities: Vec<f64>) -> Result<Vec<ClassProbability>> {
    if probabilities.len() != classes.len() {
        return Err(SegmentError::Prediction(format!(
            "{} probabilities for {} classes",
            probabilities.len(),
            classes.len()
        )));
    }
    let total: f64 = probabilities.iter().sum();
    if !total.is_finite() || (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(SegmentError::Prediction(format!(
            "class probabilities sum to {total}"
        )));
    }
    Ok(classes
        .iter()
        .zip(probabilities)
        .map(|(&code, probability)| ClassProbability {
            code,
            label: segment_label(code),
            probability,
        })
        .collect())
}
