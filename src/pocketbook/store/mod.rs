//! # Storage Layer
//!
//! Persistence is abstracted behind two traits so the engines never touch the
//! filesystem directly:
//!
//! - [`ContactStore`]: exchanges the whole contact mapping as one blob.
//!   The directory lives in memory between an explicit load and save.
//! - [`NoteStore`]: a line-oriented text file. The notes log has no cached
//!   copy; every operation reads (and, if it mutates, rewrites) the file.
//!   Lines travel as [`RawLine`]s: the bytes as read plus their terminator, so
//!   a line that is not UTF-8 or ends in `\r\n` is written back unchanged.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage
//!   - Contacts in a pretty-printed JSON file (`contacts.json` by default)
//!   - Notes in a plain text file (`notes.txt` by default), one note per line
//!   - Whole-file rewrites go through a temporary sibling file and a rename
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── contacts.json   # {"Alice": {"name": "Alice", "phones": [...], ...}, ...}
//! ├── notes.txt       # 17.10.2026 - 09:41:07 :: buy milk
//! └── config.json     # PocketConfig
//! ```
//!
//! Nothing is locked: a single process is assumed to own both files.

use crate::error::Result;
use crate::model::Record;
use std::collections::BTreeMap;

pub mod fs;
pub mod memory;

/// The persisted contact mapping, keyed by record name.
pub type ContactMap = BTreeMap<String, Record>;

pub trait ContactStore {
    /// Returns `None` when nothing has been persisted yet.
    fn load_contacts(&self) -> Result<Option<ContactMap>>;

    /// Replaces whatever was persisted before.
    fn save_contacts(&mut self, contacts: &ContactMap) -> Result<()>;
}

/// One line of the notes file as it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    bytes: Vec<u8>,
    crlf: bool,
}

impl RawLine {
    /// A `\n`-terminated line.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
            crlf: false,
        }
    }

    /// `bytes` excludes the terminator; `crlf` records whether it was `\r\n`.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, crlf: bool) -> Self {
        Self {
            bytes: bytes.into(),
            crlf,
        }
    }

    /// The line as text, or `None` if it is not valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn terminator(&self) -> &'static [u8] {
        if self.crlf {
            b"\r\n"
        } else {
            b"\n"
        }
    }

    /// New content with this line's terminator.
    pub fn replaced(&self, text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
            crlf: self.crlf,
        }
    }
}

pub trait NoteStore {
    /// Creates an empty notes file if there is none. Returns `true` if it had to.
    fn ensure_notes(&mut self) -> Result<bool>;

    /// All lines in file order.
    fn read_lines(&self) -> Result<Vec<RawLine>>;

    /// Appends one line (a terminator is added).
    fn append_line(&mut self, line: &str) -> Result<()>;

    /// Replaces the whole file with `lines`, each with its own terminator.
    fn write_lines(&mut self, lines: &[RawLine]) -> Result<()>;
}

impl<T: ContactStore + ?Sized> ContactStore for &mut T {
    fn load_contacts(&self) -> Result<Option<ContactMap>> {
        (**self).load_contacts()
    }

    fn save_contacts(&mut self, contacts: &ContactMap) -> Result<()> {
        (**self).save_contacts(contacts)
    }
}

impl<T: NoteStore + ?Sized> NoteStore for &mut T {
    fn ensure_notes(&mut self) -> Result<bool> {
        (**self).ensure_notes()
    }

    fn read_lines(&self) -> Result<Vec<RawLine>> {
        (**self).read_lines()
    }

    fn append_line(&mut self, line: &str) -> Result<()> {
        (**self).append_line(line)
    }

    fn write_lines(&mut self, lines: &[RawLine]) -> Result<()> {
        (**self).write_lines(lines)
    }
}
