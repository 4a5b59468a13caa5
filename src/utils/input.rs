use std::io::{self, BufRead, Write};

use crate::data::form::{
    FormInput, MIN_AREA, MIN_FLOORS, MIN_PRICE, MIN_WIDTH, Position, RawForm, parse_at_least,
    parse_non_negative,
};
use crate::data::schema::DistrictCatalog;
use crate::error::{Result, SegmentError};

/// Print `prompt` and read one trimmed line. `None` at end of input.
pub fn get_line(input: &mut impl BufRead, prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt until `parse` accepts the answer. Empty input takes `default`.
fn ask<T>(
    input: &mut impl BufRead,
    prompt: &str,
    default: &str,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<T> {
    loop {
        let Some(answer) = get_line(input, &format!("{prompt} [{default}]: "))? else {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        };
        let answer = if answer.is_empty() { default.to_string() } else { answer };
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => println!("{e}"),
        }
    }
}

/// Collect one form from the terminal. Each field is re-asked until it
/// parses and meets its bound; the assembled form is then validated as a
/// whole.
pub fn read_form(input: &mut impl BufRead, districts: &DistrictCatalog) -> Result<FormInput> {
    println!("\nDistricts:");
    for (i, name) in districts.names().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, name);
    }

    let raw = RawForm {
        area: ask(input, "Land area (m²)", "50", checked(|s| parse_at_least("area", s, MIN_AREA)))?,
        width: ask(input, "Width (m)", "4", checked(|s| parse_at_least("width", s, MIN_WIDTH)))?,
        floors: ask(input, "Floors", "2", checked(|s| parse_at_least("floors", s, MIN_FLOORS)))?,
        price: ask(input, "Price (billion VND)", "5.0", checked(|s| {
            parse_at_least("price", s, MIN_PRICE)
        }))?,
        bedrooms: ask(input, "Bedrooms", "2", checked(|s| parse_non_negative("bedrooms", s)))?,
        toilets: ask(input, "Toilets", "2", checked(|s| parse_non_negative("toilets", s)))?,
        position: ask(
            input,
            &format!("Position: 1) {}  2) {}", Position::FrontFacing, Position::Alley),
            "1",
            checked(|s| s.parse::<Position>()),
        )?,
        district: ask(input, "District (number or name)", "1", |s| {
            resolve_district(districts, s)
        })?,
    };

    FormInput::parse(&raw, districts)
}

/// Keep the raw text once `parse` accepts it.
fn checked<T>(parse: impl Fn(&str) -> Result<T>) -> impl Fn(&str) -> Result<String> {
    move |s: &str| parse(s).map(|_| s.to_string())
}

fn resolve_district(districts: &DistrictCatalog, answer: &str) -> Result<String> {
    if let Ok(n) = answer.parse::<usize>() {
        if let Some(name) = n.checked_sub(1).and_then(|i| districts.names().get(i)) {
            return Ok(name.clone());
        }
    }
    if districts.contains(answer) {
        return Ok(answer.to_string());
    }
    Err(SegmentError::invalid_input(
        "district",
        format!("'{answer}' is not in the list"),
    ))
}

pub fn confirm(input: &mut impl BufRead, prompt: &str) -> io::Result<bool> {
    let answer = get_line(input, &format!("{prompt} [y/N]: "))?;
    Ok(matches!(answer.as_deref(), Some("y") | Some("Y") | Some("yes")))
}
