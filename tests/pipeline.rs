mod common;

use house_segment::data::features::CellValue;
use house_segment::model::classifier::SegmentModel;
use house_segment::model::network::{DenseLayer, NeuralNetwork};
use house_segment::utils::io::ModelFormat;
use house_segment::{AppContext, FormInput, Position, SegmentError};
use ndarray::{Array1, Array2};

fn form(position: Position, district: &str) -> FormInput {
    FormInput {
        area: 50.0,
        width: 4.0,
        floors: 2.0,
        price: 5.0,
        bedrooms: 2,
        toilets: 2,
        position,
        district: district.to_string(),
    }
}

fn load(model: &SegmentModel, format: ModelFormat) -> (tempfile::TempDir, AppContext) {
    let dir = tempfile::tempdir().unwrap();
    let config = common::install(dir.path(), common::REFERENCE_CSV, Some((model, format)));
    let ctx = AppContext::load(&config).unwrap();
    (dir, ctx)
}

#[test]
fn front_facing_district_1_end_to_end() {
    let (_dir, ctx) = load(&common::forest(), ModelFormat::Json);
    let form = form(Position::FrontFacing, "Quận 1");
    assert_eq!(form.unit_price(), 100.0);

    let row = ctx.feature_row(&form);
    assert_eq!(row.get("Price_Per_m2"), Some(CellValue::Float(100.0)));
    assert_eq!(row.get("Is_MatTien"), Some(CellValue::Int(1)));
    assert_eq!(row.get("Is Hem"), Some(CellValue::Int(0)));
    assert_eq!(row.get("Dist_Quận 1"), Some(CellValue::Bool(true)));
    assert_eq!(row.get("Dist_Quận 7"), Some(CellValue::Bool(false)));
    assert_eq!(row.get("Dist_Bình Thạnh"), Some(CellValue::Bool(false)));

    let input = ctx.model_input(&form).unwrap();
    assert_eq!(input.names().collect::<Vec<_>>(), common::MODEL_FEATURES);
    assert!(input.get("Price_Billion").is_none());
    assert!(input.get("Price_Per_m2").is_none());

    let prediction = ctx.predict(&form).unwrap();
    assert_eq!(prediction.class_code, 3);
    assert_eq!(prediction.label, "VIP");
    let probabilities = prediction.probabilities.unwrap();
    assert_eq!(probabilities.len(), 4);
    assert!((probabilities.iter().map(|p| p.probability).sum::<f64>() - 1.0).abs() < 1e-9);
    assert_eq!(probabilities[3].probability, 0.75);
}

#[test]
fn alley_house_elsewhere_is_entry_tier() {
    let (_dir, ctx) = load(&common::forest(), ModelFormat::Json);
    let form = form(Position::Alley, "Quận 7");

    let row = ctx.feature_row(&form);
    assert_eq!(row.get("Is_MatTien"), Some(CellValue::Int(0)));
    assert_eq!(row.get("Is Hem"), Some(CellValue::Int(1)));

    let prediction = ctx.predict(&form).unwrap();
    assert_eq!(prediction.class_code, 0);
    assert_eq!(prediction.label, "Bình dân");
}

#[test]
fn form_at_reference_means_scales_to_zero() {
    let (_dir, ctx) = load(&common::forest(), ModelFormat::Json);
    let mut at_mean = form(Position::Alley, "Quận 7");
    at_mean.bedrooms = 3;

    let input = ctx.model_input(&at_mean).unwrap();
    for name in ["Area_m2", "Width_m", "Floors", "Bedrooms", "Toilets"] {
        assert_eq!(input.get(name), Some(CellValue::Float(0.0)), "{name}");
    }
}

#[test]
fn bincode_artifact_loads_through_fallback() {
    let network = SegmentModel::NeuralNetwork(NeuralNetwork {
        n_features: 10,
        feature_names: None,
        classes: vec![0, 1, 2, 3],
        layers: vec![DenseLayer {
            weights: Array2::zeros((10, 4)),
            bias: Array1::from(vec![0.0, 0.0, 3.0, 0.0]),
        }],
    });
    let (_dir, ctx) = load(&network, ModelFormat::Bincode);

    let prediction = ctx.predict(&form(Position::FrontFacing, "Quận 1")).unwrap();
    assert_eq!(prediction.label, "Cao cấp");
    assert!(prediction.probabilities.is_some());
}

#[test]
fn invalid_form_never_reaches_the_model() {
    let (_dir, ctx) = load(&common::forest(), ModelFormat::Json);

    let mut tiny = form(Position::FrontFacing, "Quận 1");
    tiny.area = 0.5;
    assert!(matches!(
        ctx.predict(&tiny),
        Err(SegmentError::InvalidInput { field: "area", .. })
    ));

    let unknown = form(Position::FrontFacing, "Thủ Đức");
    assert!(matches!(
        ctx.predict(&unknown),
        Err(SegmentError::InvalidInput { field: "district", .. })
    ));
}

#[test]
fn missing_model_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::install(dir.path(), common::REFERENCE_CSV, None);
    match AppContext::load(&config) {
        Err(SegmentError::MissingArtifact { path, .. }) => assert_eq!(path, config.model_path),
        Err(e) => panic!("expected MissingArtifact, got {e}"),
        Ok(_) => panic!("expected MissingArtifact, got a context"),
    }
}

#[test]
fn missing_dataset_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = house_segment::AppConfig::with_root(dir.path());
    assert!(matches!(
        AppContext::load(&config),
        Err(SegmentError::MissingArtifact { kind: "reference dataset", .. })
    ));
}

#[test]
fn dataset_without_scaler_columns_is_a_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let csv = "Area_m2,Width_m,Floors,Bedrooms,Segment_Encoded\n50,4,2,2,1\n";
    let config = common::install(dir.path(), csv, Some((&common::forest(), ModelFormat::Json)));
    assert!(matches!(
        AppContext::load(&config),
        Err(SegmentError::SchemaMismatch(_))
    ));
}

#[test]
fn model_of_the_wrong_width_is_a_schema_mismatch() {
    let SegmentModel::RandomForest(mut rf) = common::forest() else {
        unreachable!()
    };
    rf.n_features = 12;
    rf.feature_names = None;
    let dir = tempfile::tempdir().unwrap();
    let config = common::install(
        dir.path(),
        common::REFERENCE_CSV,
        Some((&SegmentModel::RandomForest(rf), ModelFormat::Json)),
    );
    assert!(matches!(
        AppContext::load(&config),
        Err(SegmentError::SchemaMismatch(_))
    ));
}

#[test]
fn unreadable_model_lists_both_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let config = common::install(dir.path(), common::REFERENCE_CSV, None);
    std::fs::write(&config.model_path, b"definitely not a model").unwrap();
    match AppContext::load(&config) {
        Err(SegmentError::ModelLoad { attempts, .. }) => assert_eq!(attempts.len(), 2),
        Err(e) => panic!("expected ModelLoad, got {e}"),
        Ok(_) => panic!("expected ModelLoad, got a context"),
    }
}
