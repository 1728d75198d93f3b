//! Best-effort numeric parsing for feed fields.
//!
//! Feeds exported from spreadsheets often use `,` as the decimal separator, so floats are
//! normalized before parsing. Failures are reported to the caller, never coerced to zero.
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseNumberError {
    #[error(transparent)]
    Invalid(#[from] ParseFloatError),
    /// `NaN`, `inf` and friends parse as floats but have no place in coordinates or distances.
    #[error("value is not finite")]
    NotFinite,
}

/// Parses a finite float that may use either `.` or `,` as its decimal separator.
pub fn parse_locale_float(value: &str) -> Result<f64, ParseNumberError> {
    let value = value.trim();
    let parsed: f64 = if value.contains(',') {
        value.replace(',', ".").parse()?
    } else {
        value.parse()?
    };
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ParseNumberError::NotFinite)
    }
}

/// Like [`parse_locale_float`], but an empty field is `None` instead of an error.
pub fn parse_optional_locale_float(value: &str) -> Result<Option<f64>, ParseNumberError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_locale_float(value).map(Some)
    }
}

/// Keeps only the ASCII digits of `value`, in order.
pub fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

#[test]
fn parse_dot_separator() {
    assert_eq!(parse_locale_float("59.3293").unwrap(), 59.3293);
}

#[test]
fn parse_comma_separator() {
    assert_eq!(parse_locale_float("59,3293").unwrap(), 59.3293);
}

#[test]
fn parse_rejects_garbage() {
    assert!(parse_locale_float("abc").is_err());
    assert!(parse_locale_float("").is_err());
}

#[test]
fn parse_rejects_non_finite() {
    for value in ["NaN", "nan", "inf", "-inf", "infinity", "-Infinity"] {
        assert_eq!(
            parse_locale_float(value),
            Err(ParseNumberError::NotFinite),
            "{value} should not parse"
        );
    }
    assert_eq!(
        parse_optional_locale_float("nan"),
        Err(ParseNumberError::NotFinite)
    );
}

#[test]
fn optional_empty_is_none() {
    assert_eq!(parse_optional_locale_float("  ").unwrap(), None);
    assert_eq!(parse_optional_locale_float("1,5").unwrap(), Some(1.5));
}

#[test]
fn digits_only() {
    assert_eq!(digits("Тр15а"), "15");
    assert_eq!(digits("Н-А"), "");
}
