//! # Data Model
//!
//! Two kinds of things are kept:
//!
//! - [`Record`]: one contact, keyed by its name. Every optional field that is set
//!   has passed its format check in [`crate::validate`]; setters that fail leave the
//!   previous value in place.
//! - [`NoteEntry`]: one line of the notes file. Its [`NoteId`] is the creation
//!   timestamp, which doubles as the primary key.
//!
//! Notes serialize to a single text line:
//!
//! ```text
//! 17.10.2026 - 09:41:07 :: buy milk
//! ```
//!
//! Two notes created within the same second share an identifier; lookups by
//! identifier act on the first one in file order.

use crate::error::{PocketError, Result, ValidationError};
use crate::validate::{is_valid_email, is_valid_phone, parse_date};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shown in place of a field that is not set.
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    phones: Vec<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    birthday: Option<String>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(Self {
            name,
            address: None,
            phones: Vec::new(),
            email: None,
            birthday: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn phones(&self) -> &[String] {
        &self.phones
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn birthday(&self) -> Option<&str> {
        self.birthday.as_deref()
    }

    /// The birthday as a calendar date (always `Some` when a birthday is set).
    pub fn birthday_date(&self) -> Option<NaiveDate> {
        self.birthday.as_deref().and_then(parse_date)
    }

    pub fn set_address(&mut self, address: impl Into<String>) -> Result<()> {
        let address = address.into();
        if address.trim().is_empty() {
            return Err(ValidationError::EmptyAddress.into());
        }
        self.address = Some(address);
        Ok(())
    }

    /// Returns the previous value.
    pub fn clear_address(&mut self) -> Option<String> {
        self.address.take()
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        let email = email.into();
        if !is_valid_email(&email) {
            return Err(ValidationError::Email(email).into());
        }
        self.email = Some(email);
        Ok(())
    }

    pub fn clear_email(&mut self) -> Option<String> {
        self.email.take()
    }

    pub fn set_birthday(&mut self, birthday: impl Into<String>) -> Result<()> {
        let birthday = birthday.into();
        if parse_date(&birthday).is_none() {
            return Err(ValidationError::Birthday(birthday).into());
        }
        self.birthday = Some(birthday);
        Ok(())
    }

    pub fn clear_birthday(&mut self) -> Option<String> {
        self.birthday.take()
    }

    /// Appends a phone number. An exact duplicate is rejected before the format
    /// is checked.
    pub fn add_phone(&mut self, phone: impl Into<String>) -> Result<()> {
        let phone = phone.into();
        if self.phones.contains(&phone) {
            return Err(PocketError::Duplicate(format!(
                "Phone number {} for {}",
                phone, self.name
            )));
        }
        if !is_valid_phone(&phone) {
            return Err(ValidationError::Phone(phone).into());
        }
        self.phones.push(phone);
        Ok(())
    }

    /// Removes the first exact match.
    pub fn remove_phone(&mut self, phone: &str) -> Result<()> {
        let pos = self.phone_position(phone)?;
        self.phones.remove(pos);
        Ok(())
    }

    /// Swaps `old` for `new` in place, keeping its position in the list.
    pub fn replace_phone(&mut self, old: &str, new: impl Into<String>) -> Result<()> {
        let new = new.into();
        let pos = self.phone_position(old)?;
        if new != old && self.phones.contains(&new) {
            return Err(PocketError::Duplicate(format!(
                "Phone number {} for {}",
                new, self.name
            )));
        }
        if !is_valid_phone(&new) {
            return Err(ValidationError::Phone(new).into());
        }
        self.phones[pos] = new;
        Ok(())
    }

    fn phone_position(&self, phone: &str) -> Result<usize> {
        self.phones
            .iter()
            .position(|p| p == phone)
            .ok_or_else(|| {
                PocketError::NotFound(format!("Phone number {} for {}", phone, self.name))
            })
    }

    /// Clears every field that does not pass its format check and returns the
    /// names of the fields that were dropped. Used after deserialization, which
    /// bypasses the setters.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let mut dropped = Vec::new();
        if self.address.as_deref().is_some_and(|a| a.trim().is_empty()) {
            self.address = None;
            dropped.push("address");
        }
        if self.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            self.email = None;
            dropped.push("email");
        }
        if self.birthday.as_deref().is_some_and(|b| parse_date(b).is_none()) {
            self.birthday = None;
            dropped.push("birthday");
        }
        let before = self.phones.len();
        let mut seen = Vec::with_capacity(before);
        for phone in self.phones.drain(..) {
            if is_valid_phone(&phone) && !seen.contains(&phone) {
                seen.push(phone);
            }
        }
        self.phones = seen;
        if self.phones.len() != before {
            dropped.push("phones");
        }
        dropped
    }

    /// One deterministic line describing the contact.
    pub fn render(&self) -> String {
        let phones = if self.phones.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            self.phones.join(", ")
        };
        format!(
            "{} | address: {} | phones: {} | email: {} | birthday: {}",
            self.name,
            self.address().unwrap_or(PLACEHOLDER),
            phones,
            self.email().unwrap_or(PLACEHOLDER),
            self.birthday().unwrap_or(PLACEHOLDER),
        )
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// chrono format of a note identifier.
pub const NOTE_ID_FORMAT: &str = "%d.%m.%Y - %H:%M:%S";

/// Length of a formatted identifier (`dd.mm.yyyy - hh:mm:ss`).
pub const NOTE_ID_LEN: usize = 21;

/// Separator between identifier and body in the notes file.
pub const NOTE_SEPARATOR: &str = " :: ";

/// A note's creation timestamp, second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(NaiveDateTime);

impl NoteId {
    /// Truncates to whole seconds so the identifier survives a round trip
    /// through its text form.
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(NOTE_ID_FORMAT))
    }
}

impl FromStr for NoteId {
    type Err = PocketError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(s.trim(), NOTE_ID_FORMAT)
            .map(NoteId)
            .map_err(|_| {
                PocketError::InvalidArgument(format!(
                    "'{}' is not a note identifier (expected dd.mm.yyyy - hh:mm:ss)",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub id: NoteId,
    pub body: String,
}

impl NoteEntry {
    pub fn new(id: NoteId, body: impl Into<String>) -> Result<Self> {
        let body = body.into();
        if body.contains('\n') || body.contains('\r') {
            return Err(ValidationError::MultilineNote.into());
        }
        Ok(Self { id, body })
    }

    /// Parses one line of the notes file (without its trailing newline).
    /// `line_no` is 1-based and only used for the error.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let corrupt = || PocketError::Corruption {
            line: line_no,
            content: line.to_string(),
        };
        let head = line.get(..NOTE_ID_LEN).ok_or_else(corrupt)?;
        let id = NaiveDateTime::parse_from_str(head, NOTE_ID_FORMAT)
            .map(NoteId)
            .map_err(|_| corrupt())?;
        let rest = &line[NOTE_ID_LEN..];
        let body = rest
            .strip_prefix(NOTE_SEPARATOR)
            .or_else(|| rest.strip_prefix(NOTE_SEPARATOR.trim_end()))
            .unwrap_or(rest);
        Ok(Self {
            id,
            body: body.to_string(),
        })
    }

    /// The serialized form, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}{}{}", self.id, NOTE_SEPARATOR, self.body)
    }
}
