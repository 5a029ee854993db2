//! Checks applied to request fields before anything is stored.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Fail unless `value` is strictly greater than zero.
pub fn validate_positive(value: f64, field: &str) -> Result<f64, Error> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::Validation(format!("{field} must be positive")))
    }
}

/// Fail if `value` is below zero.
pub fn validate_non_negative(value: f64, field: &str) -> Result<f64, Error> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::Validation(format!("{field} cannot be negative")))
    }
}

/// Fail if `value` is empty or only whitespace. Returns the trimmed string.
pub fn validate_not_blank(value: &str, field: &str) -> Result<String, Error> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        Err(Error::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Fail if a required field was omitted.
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::Validation(format!("{field} is required")))
}

/// Parse a `YYYY-MM-DD` date. An empty string means no date.
pub fn parse_optional_date(value: Option<&str>, field: &str) -> Result<Option<Date>, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Date::parse(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| Error::Validation(format!("{field} must be a date like 2025-01-31"))),
    }
}
