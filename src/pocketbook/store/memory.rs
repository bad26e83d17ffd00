use super::{ContactMap, ContactStore, NoteStore, RawLine};
use crate::error::Result;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    contacts: Option<ContactMap>,
    notes: Option<Vec<RawLine>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The notes "file" as text, `None` until created. Bytes that are not
    /// UTF-8 show up as replacement characters.
    pub fn notes(&self) -> Option<Vec<String>> {
        self.notes.as_ref().map(|lines| {
            lines
                .iter()
                .map(|line| String::from_utf8_lossy(line.as_bytes()).into_owned())
                .collect()
        })
    }

    pub fn contacts(&self) -> Option<&ContactMap> {
        self.contacts.as_ref()
    }
}

impl ContactStore for InMemoryStore {
    fn load_contacts(&self) -> Result<Option<ContactMap>> {
        Ok(self.contacts.clone())
    }

    fn save_contacts(&mut self, contacts: &ContactMap) -> Result<()> {
        self.contacts = Some(contacts.clone());
        Ok(())
    }
}

impl NoteStore for InMemoryStore {
    fn ensure_notes(&mut self) -> Result<bool> {
        if self.notes.is_some() {
            return Ok(false);
        }
        self.notes = Some(Vec::new());
        Ok(true)
    }

    fn read_lines(&self) -> Result<Vec<RawLine>> {
        Ok(self.notes.clone().unwrap_or_default())
    }

    fn append_line(&mut self, line: &str) -> Result<()> {
        self.notes.get_or_insert_with(Vec::new).push(RawLine::new(line));
        Ok(())
    }

    fn write_lines(&mut self, lines: &[RawLine]) -> Result<()> {
        self.notes = Some(lines.to_vec());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Record;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_contact(mut self, name: &str, birthday: Option<&str>) -> Self {
            let mut record = Record::new(name).unwrap();
            if let Some(b) = birthday {
                record.set_birthday(b).unwrap();
            }
            let mut contacts = self.store.contacts.take().unwrap_or_default();
            contacts.insert(name.to_string(), record);
            self.store.contacts = Some(contacts);
            self
        }

        /// Raw lines, written as-is so corrupt lines can be planted.
        pub fn with_note_lines(mut self, lines: &[&str]) -> Self {
            let notes = self.store.notes.get_or_insert_with(Vec::new);
            notes.extend(lines.iter().map(|l| RawLine::new(*l)));
            self
        }

        pub fn with_raw_note_line(mut self, bytes: &[u8], crlf: bool) -> Self {
            let notes = self.store.notes.get_or_insert_with(Vec::new);
            notes.push(RawLine::from_bytes(bytes, crlf));
            self
        }
    }
}
