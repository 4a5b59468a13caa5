use std::env;
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "HCM_SEGMENT_ROOT";
pub const DATASET_ENV: &str = "HCM_SEGMENT_DATASET";
pub const MODEL_ENV: &str = "HCM_SEGMENT_MODEL";
pub const CHART_ENV: &str = "HCM_SEGMENT_CHART";

pub const DEFAULT_DATASET: &str = "data/cleaned/Model_None_Scaling.csv";
pub const DEFAULT_MODEL: &str = "models/house_segment_rf_optimized.bin";

/// Where the two startup artifacts live, plus the optional chart output.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub root: PathBuf,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub chart_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        AppConfig {
            dataset_path: root.join(DEFAULT_DATASET),
            model_path: root.join(DEFAULT_MODEL),
            chart_path: None,
            root,
        }
    }

    pub fn from_env() -> Self {
        let root = env::var_os(ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = AppConfig::with_root(root);

        if let Some(path) = env::var_os(DATASET_ENV) {
            config.dataset_path = config.resolve(Path::new(&path));
        }
        if let Some(path) = env::var_os(MODEL_ENV) {
            config.model_path = config.resolve(Path::new(&path));
        }
        config.chart_path = env::var_os(CHART_ENV).map(PathBuf::from);
        config
    }

    /// Relative paths are taken from the install root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
