use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::error::{AppError, AppResult};

pub const EMPTY_BARCODE: &str = "Please enter a barcode.";
pub const NON_DIGIT_BARCODE: &str = "Barcode must contain only digits.";

/// A barcode that passed normalization: non-empty, ASCII digits only, any length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    pub fn parse(raw: &str) -> AppResult<Self> {
        let normalized = normalize(raw);
        validate(&normalized)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips every whitespace character, interior ones included.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn validate(normalized: &str) -> AppResult<()> {
    lazy_static! {
        static ref DIGITS_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
    }
    if normalized.is_empty() {
        return Err(AppError::InvalidBarcode(EMPTY_BARCODE.into()));
    }
    if !DIGITS_RE.is_match(normalized) {
        return Err(AppError::InvalidBarcode(NON_DIGIT_BARCODE.into()));
    }
    Ok(())
}
