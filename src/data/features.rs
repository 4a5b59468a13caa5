//! Maps a submitted form onto the reference schema.

use crate::data::form::{FormInput, Position};
use crate::data::schema::{
    AREA, BEDROOMS, DistrictCatalog, Dtype, FLOORS, LEAKAGE_COLUMNS, PRICE, PositionColumns,
    ReferenceSchema, TOILETS, UNIT_PRICE, WIDTH,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl CellValue {
    pub fn zero(dtype: Dtype) -> Self {
        match dtype {
            Dtype::Bool => CellValue::Bool(false),
            Dtype::Int => CellValue::Int(0),
            Dtype::Float | Dtype::Text => CellValue::Float(0.0),
        }
    }

    /// The dtype's representation of a set/unset indicator.
    pub fn flag(dtype: Dtype, on: bool) -> Self {
        match dtype {
            Dtype::Bool => CellValue::Bool(on),
            _ => CellValue::Int(on as i64),
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            CellValue::Bool(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            CellValue::Int(i) => i as f64,
            CellValue::Float(f) => f,
        }
    }
}

/// One row of model features, kept in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRow {
    entries: Vec<(String, CellValue)>,
}

impl FeatureRow {
    pub fn from_entries(entries: Vec<(String, CellValue)>) -> Self {
        FeatureRow { entries }
    }

    /// Every non-label column at its dtype's zero.
    pub fn zeroed(schema: &ReferenceSchema) -> Self {
        FeatureRow {
            entries: schema
                .feature_columns()
                .map(|c| (c.name.clone(), CellValue::zero(c.dtype)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<CellValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Overwrite an existing column. Returns false if the column is absent;
    /// rows never grow new keys.
    pub fn set(&mut self, name: &str, value: CellValue) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => {
                entry.1 = value;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<CellValue> {
        let idx = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CellValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dense numeric vector in row order, booleans as 0/1.
    pub fn to_vector(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| v.as_f64()).collect()
    }
}

/// Builds feature rows against one schema. Holds only the lookups resolved at
/// load time, so it is cheap to create per request.
pub struct FeatureBuilder<'a> {
    schema: &'a ReferenceSchema,
    positions: &'a PositionColumns,
}

impl<'a> FeatureBuilder<'a> {
    pub fn new(schema: &'a ReferenceSchema, positions: &'a PositionColumns) -> Self {
        FeatureBuilder { schema, positions }
    }

    pub fn build(&self, form: &FormInput) -> FeatureRow {
        let mut row = FeatureRow::zeroed(self.schema);

        row.set(AREA, CellValue::Float(form.area));
        row.set(WIDTH, CellValue::Float(form.width));
        row.set(FLOORS, CellValue::Float(form.floors));
        row.set(BEDROOMS, CellValue::Int(form.bedrooms));
        row.set(TOILETS, CellValue::Int(form.toilets));
        row.set(PRICE, CellValue::Float(form.price));
        row.set(UNIT_PRICE, CellValue::Float(form.unit_price()));

        let front = form.position == Position::FrontFacing;
        self.set_flag(&mut row, self.positions.front.as_deref(), front);
        self.set_flag(&mut row, self.positions.alley.as_deref(), !front);

        let district_col = DistrictCatalog::column_for(&form.district);
        if !self.set_flag(&mut row, Some(district_col.as_str()), true) {
            log::warn!("district column '{district_col}' not in schema, left unset");
        }

        row
    }

    fn set_flag(&self, row: &mut FeatureRow, column: Option<&str>, on: bool) -> bool {
        let Some(column) = column else {
            return false;
        };
        match self.schema.dtype(column) {
            Some(dtype) => row.set(column, CellValue::flag(dtype, on)),
            None => false,
        }
    }
}

/// Drop the price-derived columns the model was not trained on.
pub fn drop_leakage(mut row: FeatureRow) -> FeatureRow {
    for name in LEAKAGE_COLUMNS {
        row.remove(name);
    }
    row
}
