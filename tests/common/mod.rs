#![allow(dead_code)]

use std::fs;
use std::path::Path;

use house_segment::AppConfig;
use house_segment::model::classifier::SegmentModel;
use house_segment::model::forest::{DecisionTree, RandomForest, TreeNode};
use house_segment::utils::io::{ModelFormat, save_model};

/// Bedrooms, toilets and the size columns average to whole numbers so a form
/// holding the means scales to exactly zero.
pub const REFERENCE_CSV: &str = "\
Area_m2,Width_m,Floors,Bedrooms,Toilets,Price_Billion,Price_Per_m2,Is_MatTien,Is Hem,Dist_Bình Thạnh,Dist_Quận 1,Dist_Quận 7,Segment_Encoded
50,4,2,2,2,5.0,100.0,1,0,False,True,False,3
80,5,3,4,3,8.0,100.0,0,1,True,False,False,2
20,3,1,3,1,2.0,100.0,0,1,False,False,True,0
";

pub const MODEL_FEATURES: [&str; 10] = [
    "Area_m2",
    "Width_m",
    "Floors",
    "Bedrooms",
    "Toilets",
    "Is_MatTien",
    "Is Hem",
    "Dist_Bình Thạnh",
    "Dist_Quận 1",
    "Dist_Quận 7",
];

fn split(feature: usize, threshold: f64, low: [f64; 4], high: [f64; 4]) -> DecisionTree {
    DecisionTree {
        nodes: vec![
            TreeNode::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: low.to_vec() },
            TreeNode::Leaf { value: high.to_vec() },
        ],
    }
}

/// District 1 votes VIP; front-facing votes for the two upper tiers.
pub fn forest() -> SegmentModel {
    SegmentModel::RandomForest(RandomForest {
        n_features: MODEL_FEATURES.len(),
        feature_names: Some(MODEL_FEATURES.iter().map(|s| s.to_string()).collect()),
        classes: vec![0, 1, 2, 3],
        trees: vec![
            split(8, 0.5, [1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, 1.0]),
            split(5, 0.5, [5.0, 5.0, 0.0, 0.0], [0.0, 0.0, 5.0, 5.0]),
        ],
    })
}

/// Lays out an install root the way `AppConfig::with_root` expects.
pub fn install(root: &Path, csv: &str, model: Option<(&SegmentModel, ModelFormat)>) -> AppConfig {
    let config = AppConfig::with_root(root);
    fs::create_dir_all(config.dataset_path.parent().unwrap()).unwrap();
    fs::create_dir_all(config.model_path.parent().unwrap()).unwrap();
    fs::write(&config.dataset_path, csv).unwrap();
    if let Some((model, format)) = model {
        save_model(&config.model_path, model, format).unwrap();
    }
    config
}
