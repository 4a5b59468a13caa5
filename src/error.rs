use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SegmentError>;

#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("{kind} not found at {}", path.display())]
    MissingArtifact { kind: &'static str, path: PathBuf },

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("failed to load model from {}: {}", path.display(), attempts.join("; "))]
    ModelLoad { path: PathBuf, attempts: Vec<String> },

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to read reference dataset: {0}")]
    Dataset(#[from] csv::Error),
}

impl SegmentError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        SegmentError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Short category name, used by the C ABI and in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            SegmentError::MissingArtifact { .. } => "MissingArtifact",
            SegmentError::SchemaMismatch(_) => "SchemaMismatch",
            SegmentError::ModelLoad { .. } => "ModelLoadError",
            SegmentError::InvalidInput { .. } => "InvalidInput",
            SegmentError::Prediction(_) => "PredictionError",
            SegmentError::Io(_) => "IoError",
            SegmentError::Dataset(_) => "DatasetError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_load_lists_every_attempt() {
        let err = SegmentError::ModelLoad {
            path: PathBuf::from("models/m.bin"),
            attempts: vec!["json: bad".into(), "bincode: worse".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("json: bad"));
        assert!(msg.contains("bincode: worse"));
        assert_eq!(err.kind(), "ModelLoadError");
    }

    #[test]
    fn missing_artifact_names_path() {
        let err = SegmentError::MissingArtifact {
            kind: "model file",
            path: PathBuf::from("/tmp/none.bin"),
        };
        assert_eq!(err.to_string(), "model file not found at /tmp/none.bin");
    }
}
