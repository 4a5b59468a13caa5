//! Everything loaded once at startup, and the per-request pipeline over it.

use std::path::Path;

use crate::config::AppConfig;
use crate::data::features::{FeatureBuilder, FeatureRow, drop_leakage};
use crate::data::form::FormInput;
use crate::data::preprocessing::{ReferenceData, StandardScaler};
use crate::data::schema::{DistrictCatalog, NUMERIC_COLUMNS, PositionColumns, ReferenceSchema};
use crate::error::{Result, SegmentError};
use crate::model::classifier::{Classifier, SegmentModel};
use crate::model::prediction::{self, Prediction, is_known_segment};
use crate::utils::io::load_model;

/// Reference schema, fitted scaler and model. Immutable once built; pass it
/// by reference to every prediction.
pub struct AppContext {
    schema: ReferenceSchema,
    districts: DistrictCatalog,
    positions: PositionColumns,
    scaler: StandardScaler,
    model: SegmentModel,
}

impl AppContext {
    pub fn load(config: &AppConfig) -> Result<Self> {
        Self::load_from(&config.dataset_path, &config.model_path)
    }

    pub fn load_from(dataset_path: &Path, model_path: &Path) -> Result<Self> {
        if !dataset_path.exists() {
            return Err(SegmentError::MissingArtifact {
                kind: "reference dataset",
                path: dataset_path.to_path_buf(),
            });
        }
        log::info!("loading reference dataset from {}", dataset_path.display());
        let data = ReferenceData::load(dataset_path)?;
        let scaler = StandardScaler::fit(&data, &NUMERIC_COLUMNS)?;

        let model = load_model(model_path)?;
        Self::from_parts(data.schema, scaler, model)
    }

    pub fn from_parts(
        schema: ReferenceSchema,
        scaler: StandardScaler,
        model: SegmentModel,
    ) -> Result<Self> {
        let width = schema.model_width();
        if model.n_features() != width {
            return Err(SegmentError::SchemaMismatch(format!(
                "model takes {} features but the reference schema provides {width}",
                model.n_features()
            )));
        }
        for &code in model.classes() {
            if !is_known_segment(code) {
                log::warn!("model class {code} has no segment label");
            }
        }

        let districts = DistrictCatalog::from_schema(&schema);
        let positions = PositionColumns::resolve(&schema);
        log::info!(
            "ready: {} features, {} districts, {} model",
            width,
            districts.names().len(),
            model.kind()
        );

        Ok(AppContext {
            schema,
            districts,
            positions,
            scaler,
            model,
        })
    }

    pub fn schema(&self) -> &ReferenceSchema {
        &self.schema
    }

    pub fn districts(&self) -> &DistrictCatalog {
        &self.districts
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn model(&self) -> &SegmentModel {
        &self.model
    }

    /// Raw feature row for a form, before scaling.
    pub fn feature_row(&self, form: &FormInput) -> FeatureRow {
        FeatureBuilder::new(&self.schema, &self.positions).build(form)
    }

    /// The exact row handed to the model: built, scaled, leakage dropped.
    pub fn model_input(&self, form: &FormInput) -> Result<FeatureRow> {
        let row = self.feature_row(form);
        let row = self.scaler.transform(row)?;
        Ok(drop_leakage(row))
    }

    pub fn predict(&self, form: &FormInput) -> Result<Prediction> {
        form.validate(&self.districts)?;
        let row = self.model_input(form)?;
        prediction::predict(&self.model, &row)
    }
}
