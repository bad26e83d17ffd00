//! Format predicates for contact fields.
//!
//! - Phone: `(0dd)ddd-dd-dd`, e.g. `(050)123-45-67`
//! - Email: a letter, then word characters or dots, `@`, a letters-only domain
//!   and a top-level domain of at least two letters
//! - Birthday: `dd.mm.yyyy` that is also a real calendar date
//!
//! The whole input must match; surrounding text is rejected.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// chrono format used for every `dd.mm.yyyy` date in the crate.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(0[0-9]{2}\)[0-9]{3}-[0-9]{2}-[0-9]{2}$").expect("valid phone regex")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][\w.]+@[A-Za-z]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").expect("valid date regex"));

pub fn is_valid_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

pub fn is_valid_birthday(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Parses a strict `dd.mm.yyyy` literal.
///
/// chrono alone accepts single-digit days and months, so the shape is checked
/// first and the calendar second (`31.02.2024` fails the latter).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}
