use csv::{Reader, StringRecord};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::data::features::{CellValue, FeatureRow};
use crate::data::schema::{Column, Dtype, ReferenceSchema, is_missing};
use crate::error::{Result, SegmentError};

/// The reference dataset: its schema plus the raw rows used for fitting.
pub struct ReferenceData {
    pub schema: ReferenceSchema,
    records: Vec<StringRecord>,
}

impl ReferenceData {
    pub fn load(path: &Path) -> Result<Self> {
        let mut rdr = Reader::from_path(path)?;
        let headers = rdr.headers()?.clone();
        let records = rdr.records().collect::<std::result::Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            if !seen.insert(name) {
                return Err(SegmentError::SchemaMismatch(format!(
                    "duplicate column '{name}' in reference dataset"
                )));
            }
            let dtype = Dtype::infer(records.iter().map(|r| r.get(idx).unwrap_or("")));
            columns.push(Column::new(name, dtype));
        }

        log::debug!(
            "reference dataset {}: {} columns, {} rows",
            path.display(),
            columns.len(),
            records.len()
        );

        Ok(ReferenceData {
            schema: ReferenceSchema::new(columns),
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Non-missing values of a numeric column.
    fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .schema
            .columns()
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| {
                SegmentError::SchemaMismatch(format!("column '{name}' missing from reference dataset"))
            })?;
        let dtype = self.schema.columns()[idx].dtype;
        if !dtype.is_numeric() {
            return Err(SegmentError::SchemaMismatch(format!(
                "column '{name}' is {dtype:?}, expected a numeric column"
            )));
        }

        let mut values = Vec::with_capacity(self.records.len());
        for record in &self.records {
            let cell = record.get(idx).unwrap_or("").trim();
            if is_missing(cell) {
                continue;
            }
            let value = cell.parse::<f64>().map_err(|_| {
                SegmentError::SchemaMismatch(format!("non-numeric value '{cell}' in column '{name}'"))
            })?;
            values.push(value);
        }
        Ok(values)
    }
}

/// Zero-mean, unit-variance scaling over a fixed list of columns.
///
/// Uses the population standard deviation. Constant columns get a scale of 1
/// so they map to zero instead of dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub columns: Vec<String>,
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(data: &ReferenceData, columns: &[&str]) -> Result<Self> {
        if data.is_empty() {
            return Err(SegmentError::SchemaMismatch(
                "reference dataset has no rows to fit the scaler".into(),
            ));
        }

        let mut mean = Array1::<f64>::zeros(columns.len());
        let mut std = Array1::<f64>::ones(columns.len());
        for (i, name) in columns.iter().enumerate() {
            let values = Array1::from(data.numeric_values(name)?);
            let col_mean = values.mean().ok_or_else(|| {
                SegmentError::SchemaMismatch(format!("column '{name}' has no values"))
            })?;
            let col_std = values.std(0.0);
            if !col_mean.is_finite() || !col_std.is_finite() {
                return Err(SegmentError::SchemaMismatch(format!(
                    "column '{name}' does not have finite statistics"
                )));
            }
            mean[i] = col_mean;
            std[i] = if col_std == 0.0 { 1.0 } else { col_std };
        }

        log::debug!("scaler fitted: mean {:?}, std {:?}", mean, std);

        Ok(StandardScaler {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            mean,
            std,
        })
    }

    /// Standardize the fitted columns of `row`; all must be present.
    pub fn transform(&self, mut row: FeatureRow) -> Result<FeatureRow> {
        let mut raw = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            let value = row.get(name).ok_or_else(|| {
                SegmentError::SchemaMismatch(format!("scaler column '{name}' missing from feature row"))
            })?;
            raw.push(value.as_f64());
        }

        let scaled = (Array1::from(raw) - &self.mean) / &self.std;
        for (name, value) in self.columns.iter().zip(scaled.iter()) {
            row.set(name, CellValue::Float(*value));
        }
        Ok(row)
    }
}
