use std::path::Path;

use crate::error::{Result, SegmentError};
use crate::model::classifier::SegmentModel;

/// Encodings a model artifact may use, tried in `DECODE_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Bincode,
}

impl ModelFormat {
    pub const DECODE_ORDER: [ModelFormat; 2] = [ModelFormat::Json, ModelFormat::Bincode];

    pub fn name(self) -> &'static str {
        match self {
            ModelFormat::Json => "json",
            ModelFormat::Bincode => "bincode",
        }
    }

    pub fn decode(self, bytes: &[u8]) -> std::result::Result<SegmentModel, String> {
        match self {
            ModelFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
            ModelFormat::Bincode => bincode::deserialize(bytes).map_err(|e| e.to_string()),
        }
    }

    pub fn encode(self, model: &SegmentModel) -> std::result::Result<Vec<u8>, String> {
        match self {
            ModelFormat::Json => serde_json::to_vec(model).map_err(|e| e.to_string()),
            ModelFormat::Bincode => bincode::serialize(model).map_err(|e| e.to_string()),
        }
    }
}

pub fn save_model(path: &Path, model: &SegmentModel, format: ModelFormat) -> Result<()> {
    let model_data = format.encode(model).map_err(|e| SegmentError::ModelLoad {
        path: path.to_path_buf(),
        attempts: vec![format!("{}: {e}", format.name())],
    })?;
    std::fs::write(path, model_data)?;
    Ok(())
}

/// Read a model artifact, decoding with each format in turn. The first
/// format that decodes to a structurally valid model wins.
pub fn load_model(path: &Path) -> Result<SegmentModel> {
    if !path.exists() {
        return Err(SegmentError::MissingArtifact {
            kind: "model file",
            path: path.to_path_buf(),
        });
    }

    let model_data = std::fs::read(path)?;
    let mut attempts = Vec::new();
    for format in ModelFormat::DECODE_ORDER {
        match format.decode(&model_data).and_then(|m| m.validate().map(|_| m)) {
            Ok(model) => {
                log::info!(
                    "loaded {} model from {} ({} encoding)",
                    model.kind(),
                    path.display(),
                    format.name()
                );
                return Ok(model);
            }
            Err(e) => {
                log::debug!("{} decoding of {} failed: {e}", format.name(), path.display());
                attempts.push(format!("{}: {e}", format.name()));
            }
        }
    }

    Err(SegmentError::ModelLoad {
        path: path.to_path_buf(),
        attempts,
    })
}
