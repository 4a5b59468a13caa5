//! Column schema of the reference dataset and the lookups derived from it.
//!
//! The reference CSV is the post-feature-engineering table the model was
//! trained on. Its header fixes the column set and order the model expects;
//! its values fix each column's dtype.

pub const LABEL_COLUMN: &str = "Segment_Encoded";
pub const DISTRICT_PREFIX: &str = "Dist_";

pub const AREA: &str = "Area_m2";
pub const WIDTH: &str = "Width_m";
pub const FLOORS: &str = "Floors";
pub const BEDROOMS: &str = "Bedrooms";
pub const TOILETS: &str = "Toilets";
pub const PRICE: &str = "Price_Billion";
pub const UNIT_PRICE: &str = "Price_Per_m2";

pub const FRONT_COLUMN: &str = "Is_MatTien";
/// Both spellings occur in exported datasets.
pub const ALLEY_COLUMNS: [&str; 2] = ["Is Hem", "Is_Hem"];

/// Columns standardized before prediction, in fit order.
pub const NUMERIC_COLUMNS: [&str; 5] = [AREA, WIDTH, FLOORS, BEDROOMS, TOILETS];

/// Columns derived from the price, never seen by the model.
pub const LEAKAGE_COLUMNS: [&str; 2] = [PRICE, UNIT_PRICE];

/// Cell spellings read as missing values, compared case-insensitively.
const NA_TOKENS: [&str; 8] = ["nan", "-nan", "na", "n/a", "<na>", "null", "none", "#n/a"];

/// True for empty cells, NA spellings, and non-finite numbers.
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty()
        || NA_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
        || cell.parse::<f64>().is_ok_and(|v| !v.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    Bool,
    Int,
    Float,
    Text,
}

impl Dtype {
    pub fn is_numeric(self) -> bool {
        matches!(self, Dtype::Int | Dtype::Float)
    }

    /// Infer the dtype of a column from its raw cells.
    ///
    /// Missing cells (see [`is_missing`]) promote integers to floats and
    /// turn boolean columns into text.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Dtype {
        let mut all_bool = true;
        let mut all_int = true;
        let mut all_float = true;
        let mut any_missing = false;
        let mut any_value = false;

        for cell in cells {
            let cell = cell.trim();
            if is_missing(cell) {
                any_missing = true;
                continue;
            }
            any_value = true;
            all_bool &= parse_bool(cell).is_some();
            all_int &= cell.parse::<i64>().is_ok();
            all_float &= cell.parse::<f64>().is_ok();
        }

        if !any_value {
            return Dtype::Float;
        }
        if all_bool {
            return if any_missing { Dtype::Text } else { Dtype::Bool };
        }
        if all_int && !any_missing {
            return Dtype::Int;
        }
        if all_int || all_float {
            return Dtype::Float;
        }
        Dtype::Text
    }
}

pub fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: Dtype,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: Dtype) -> Self {
        Column {
            name: name.into(),
            dtype,
        }
    }
}

/// Ordered columns of the reference dataset, label included.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSchema {
    columns: Vec<Column>,
}

impl ReferenceSchema {
    pub fn new(columns: Vec<Column>) -> Self {
        ReferenceSchema { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Every column except the label, in schema order.
    pub fn feature_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.name != LABEL_COLUMN)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn dtype(&self, name: &str) -> Option<Dtype> {
        self.column(name).map(|c| c.dtype)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Width of the vector the model receives: features minus leakage columns.
    pub fn model_width(&self) -> usize {
        self.feature_columns()
            .filter(|c| !LEAKAGE_COLUMNS.contains(&c.name.as_str()))
            .count()
    }
}

/// District names offered to the user, and the one-hot column behind each.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictCatalog {
    names: Vec<String>,
}

impl DistrictCatalog {
    pub fn from_schema(schema: &ReferenceSchema) -> Self {
        let mut names: Vec<String> = schema
            .feature_columns()
            .filter_map(|c| c.name.strip_prefix(DISTRICT_PREFIX))
            .map(str::to_string)
            .collect();
        names.sort();
        DistrictCatalog { names }
    }

    /// Sorted display names, prefix stripped.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, district: &str) -> bool {
        self.names.iter().any(|n| n == district)
    }

    pub fn column_for(district: &str) -> String {
        format!("{DISTRICT_PREFIX}{district}")
    }
}

/// Position indicator columns, resolved once against the schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionColumns {
    pub front: Option<String>,
    pub alley: Option<String>,
}

impl PositionColumns {
    pub fn resolve(schema: &ReferenceSchema) -> Self {
        let front = schema.contains(FRONT_COLUMN).then(|| FRONT_COLUMN.to_string());
        let alley = ALLEY_COLUMNS
            .iter()
            .find(|name| schema.contains(name))
            .map(|name| name.to_string());
        if alley.is_none() {
            log::warn!("reference schema has no alley indicator column");
        }
        PositionColumns { front, alley }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[(&str, Dtype)]) -> ReferenceSchema {
        ReferenceSchema::new(names.iter().map(|(n, d)| Column::new(*n, *d)).collect())
    }

    #[test]
    fn infers_dtypes_like_a_dataframe_reader() {
        assert_eq!(Dtype::infer(["True", "false", "TRUE"]), Dtype::Bool);
        assert_eq!(Dtype::infer(["1", "0", "3"]), Dtype::Int);
        assert_eq!(Dtype::infer(["1", "2.5"]), Dtype::Float);
        assert_eq!(Dtype::infer(["1", ""]), Dtype::Float);
        assert_eq!(Dtype::infer(["True", ""]), Dtype::Text);
        assert_eq!(Dtype::infer(["Quận 1", "2"]), Dtype::Text);
        assert_eq!(Dtype::infer(["1", "NaN", "3"]), Dtype::Float);
        assert_eq!(Dtype::infer(["2.5", "inf", "NA", "null"]), Dtype::Float);
    }

    #[test]
    fn na_spellings_and_non_finite_numbers_are_missing() {
        for cell in ["", "  ", "NaN", "nan", "NA", "null", "None", "inf", "-Infinity"] {
            assert!(is_missing(cell), "{cell:?}");
        }
        for cell in ["0", "2.5", "True", "Quận 1", "Nam"] {
            assert!(!is_missing(cell), "{cell:?}");
        }
    }

    #[test]
    fn feature_columns_skip_the_label() {
        let s = schema(&[
            (AREA, Dtype::Float),
            (LABEL_COLUMN, Dtype::Int),
            (PRICE, Dtype::Float),
            (UNIT_PRICE, Dtype::Float),
            ("Dist_Quận 1", Dtype::Bool),
        ]);
        let names: Vec<&str> = s.feature_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![AREA, PRICE, UNIT_PRICE, "Dist_Quận 1"]);
        assert_eq!(s.model_width(), 2);
    }

    #[test]
    fn districts_are_sorted_and_unprefixed() {
        let s = schema(&[
            ("Dist_Quận 7", Dtype::Int),
            (AREA, Dtype::Float),
            ("Dist_Bình Thạnh", Dtype::Int),
            ("Dist_Quận 1", Dtype::Int),
        ]);
        let catalog = DistrictCatalog::from_schema(&s);
        assert_eq!(catalog.names(), ["Bình Thạnh", "Quận 1", "Quận 7"]);
        assert!(catalog.contains("Quận 7"));
        assert!(!catalog.contains("Quận 9"));
        assert_eq!(DistrictCatalog::column_for("Quận 1"), "Dist_Quận 1");
    }

    #[test]
    fn alley_column_resolves_either_spelling() {
        let spaced = schema(&[(FRONT_COLUMN, Dtype::Int), ("Is Hem", Dtype::Int)]);
        assert_eq!(PositionColumns::resolve(&spaced).alley.as_deref(), Some("Is Hem"));

        let underscored = schema(&[(FRONT_COLUMN, Dtype::Int), ("Is_Hem", Dtype::Int)]);
        let resolved = PositionColumns::resolve(&underscored);
        assert_eq!(resolved.alley.as_deref(), Some("Is_Hem"));
        assert_eq!(resolved.front.as_deref(), Some(FRONT_COLUMN));

        let neither = schema(&[(AREA, Dtype::Float)]);
        assert_eq!(PositionColumns::resolve(&neither), PositionColumns::default());
    }
}
