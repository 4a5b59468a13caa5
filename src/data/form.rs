use std::fmt;
use std::str::FromStr;

use crate::data::schema::DistrictCatalog;
use crate::error::{Result, SegmentError};

pub const MIN_AREA: f64 = 1.0;
pub const MIN_WIDTH: f64 = 1.0;
pub const MIN_FLOORS: f64 = 1.0;
pub const MIN_PRICE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Mặt Tiền
    FrontFacing,
    /// Hẻm
    Alley,
}

impl Position {
    pub const ALL: [Position; 2] = [Position::FrontFacing, Position::Alley];

    pub fn label(self) -> &'static str {
        match self {
            Position::FrontFacing => "Mặt Tiền",
            Position::Alley => "Hẻm",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Position {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "front-facing" | "front" | "mặt tiền" | "mat tien" | "1" => Ok(Position::FrontFacing),
            "alley" | "hẻm" | "hem" | "2" => Ok(Position::Alley),
            other => Err(SegmentError::invalid_input(
                "position",
                format!("'{other}' is neither front-facing nor alley"),
            )),
        }
    }
}

/// Form fields as typed by the user, before coercion.
#[derive(Debug, Clone, Default)]
pub struct RawForm {
    pub area: String,
    pub width: String,
    pub floors: String,
    pub price: String,
    pub bedrooms: String,
    pub toilets: String,
    pub position: String,
    pub district: String,
}

/// A submitted form. `price` is in billions of VND.
#[derive(Debug, Clone, PartialEq)]
pub struct FormInput {
    pub area: f64,
    pub width: f64,
    pub floors: f64,
    pub price: f64,
    pub bedrooms: i64,
    pub toilets: i64,
    pub position: Position,
    pub district: String,
}

impl FormInput {
    /// Coerce raw text fields, then check them against their bounds.
    pub fn parse(raw: &RawForm, districts: &DistrictCatalog) -> Result<Self> {
        let form = FormInput {
            area: parse_float("area", &raw.area)?,
            width: parse_float("width", &raw.width)?,
            floors: parse_float("floors", &raw.floors)?,
            price: parse_float("price", &raw.price)?,
            bedrooms: parse_count("bedrooms", &raw.bedrooms)?,
            toilets: parse_count("toilets", &raw.toilets)?,
            position: raw.position.parse()?,
            district: raw.district.trim().to_string(),
        };
        form.validate(districts)?;
        Ok(form)
    }

    pub fn validate(&self, districts: &DistrictCatalog) -> Result<()> {
        check_min("area", self.area, MIN_AREA)?;
        check_min("width", self.width, MIN_WIDTH)?;
        check_min("floors", self.floors, MIN_FLOORS)?;
        check_min("price", self.price, MIN_PRICE)?;
        check_non_negative("bedrooms", self.bedrooms)?;
        check_non_negative("toilets", self.toilets)?;
        if !districts.contains(&self.district) {
            return Err(SegmentError::invalid_input(
                "district",
                format!("unknown district '{}'", self.district),
            ));
        }
        Ok(())
    }

    /// Price per square metre in millions of VND.
    pub fn unit_price(&self) -> f64 {
        unit_price(self.price, self.area)
    }
}

/// `price` in billions over `area` in m², as millions per m². Zero when the
/// area is not positive.
pub fn unit_price(price: f64, area: f64) -> f64 {
    if area > 0.0 {
        price * 1000.0 / area
    } else {
        0.0
    }
}

pub fn parse_float(field: &'static str, text: &str) -> Result<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| SegmentError::invalid_input(field, format!("'{}' is not a number", text.trim())))?;
    if !value.is_finite() {
        return Err(SegmentError::invalid_input(field, "must be a finite number"));
    }
    Ok(value)
}

pub fn parse_count(field: &'static str, text: &str) -> Result<i64> {
    text.trim()
        .parse()
        .map_err(|_| SegmentError::invalid_input(field, format!("'{}' is not a whole number", text.trim())))
}

/// Parse a number and check it against its lower bound.
pub fn parse_at_least(field: &'static str, text: &str, min: f64) -> Result<f64> {
    let value = parse_float(field, text)?;
    check_min(field, value, min)?;
    Ok(value)
}

pub fn parse_non_negative(field: &'static str, text: &str) -> Result<i64> {
    let value = parse_count(field, text)?;
    check_non_negative(field, value)?;
    Ok(value)
}

fn check_non_negative(field: &'static str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(SegmentError::invalid_input(field, "must not be negative"));
    }
    Ok(())
}

fn check_min(field: &'static str, value: f64, min: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SegmentError::invalid_input(field, "must be a finite number"));
    }
    if value < min {
        return Err(SegmentError::invalid_input(field, format!("must be at least {min}")));
    }
    Ok(())
}
