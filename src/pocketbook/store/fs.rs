use super::{ContactMap, ContactStore, NoteStore, RawLine};
use crate::error::{PocketError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub struct FileStore {
    contacts_path: PathBuf,
    notes_path: PathBuf,
}

impl FileStore {
    pub fn new(contacts_path: impl Into<PathBuf>, notes_path: impl Into<PathBuf>) -> Self {
        Self {
            contacts_path: contacts_path.into(),
            notes_path: notes_path.into(),
        }
    }

    /// Both files inside `root`, using the given file names.
    pub fn in_dir(root: &Path, contacts_file: &str, notes_file: &str) -> Self {
        Self::new(root.join(contacts_file), root.join(notes_file))
    }

    pub fn contacts_path(&self) -> &Path {
        &self.contacts_path
    }

    pub fn notes_path(&self) -> &Path {
        &self.notes_path
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(PocketError::Io)?;
            }
        }
        Ok(())
    }

    /// Writes to `<path>.tmp` and renames it over `path`, so a failed write
    /// leaves the previous file in place.
    fn replace_file(path: &Path, content: &[u8]) -> Result<()> {
        Self::ensure_parent(path)?;
        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);
        fs::write(&tmp, content).map_err(PocketError::Io)?;
        fs::rename(&tmp, path).map_err(PocketError::Io)?;
        Ok(())
    }

    /// Whether the file's last byte is something other than `\n`.
    fn ends_mid_line(path: &Path) -> Result<bool> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(PocketError::Io(e)),
        };
        if file.seek(SeekFrom::End(0)).map_err(PocketError::Io)? == 0 {
            return Ok(false);
        }
        file.seek(SeekFrom::End(-1)).map_err(PocketError::Io)?;
        let mut last = [0u8; 1];
        file.read_exact(&mut last).map_err(PocketError::Io)?;
        Ok(last[0] != b'\n')
    }
}

/// Splits on `\n`, remembering which lines ended in `\r\n`. A trailing
/// terminator does not start an empty line.
fn split_lines(content: &[u8]) -> Vec<RawLine> {
    content
        .split_inclusive(|b| *b == b'\n')
        .map(|chunk| match chunk.strip_suffix(b"\r\n") {
            Some(body) => RawLine::from_bytes(body, true),
            None => RawLine::from_bytes(chunk.strip_suffix(b"\n").unwrap_or(chunk), false),
        })
        .collect()
}

impl ContactStore for FileStore {
    fn load_contacts(&self) -> Result<Option<ContactMap>> {
        if !self.contacts_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.contacts_path).map_err(PocketError::Io)?;
        if content.trim().is_empty() {
            return Ok(Some(ContactMap::new()));
        }
        let contacts: ContactMap =
            serde_json::from_str(&content).map_err(PocketError::Serialization)?;
        Ok(Some(contacts))
    }

    fn save_contacts(&mut self, contacts: &ContactMap) -> Result<()> {
        let content = serde_json::to_string_pretty(contacts).map_err(PocketError::Serialization)?;
        Self::replace_file(&self.contacts_path, content.as_bytes())
    }
}

impl NoteStore for FileStore {
    fn ensure_notes(&mut self) -> Result<bool> {
        if self.notes_path.exists() {
            return Ok(false);
        }
        Self::ensure_parent(&self.notes_path)?;
        fs::write(&self.notes_path, "").map_err(PocketError::Io)?;
        Ok(true)
    }

    fn read_lines(&self) -> Result<Vec<RawLine>> {
        if !self.notes_path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read(&self.notes_path).map_err(PocketError::Io)?;
        Ok(split_lines(&content))
    }

    fn append_line(&mut self, line: &str) -> Result<()> {
        Self::ensure_parent(&self.notes_path)?;
        // A hand-edited file may lack its final newline.
        let needs_break = Self::ends_mid_line(&self.notes_path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.notes_path)
            .map_err(PocketError::Io)?;
        if needs_break {
            writeln!(file).map_err(PocketError::Io)?;
        }
        writeln!(file, "{}", line).map_err(PocketError::Io)?;
        Ok(())
    }

    fn write_lines(&mut self, lines: &[RawLine]) -> Result<()> {
        let mut content = Vec::new();
        for line in lines {
            content.extend_from_slice(line.as_bytes());
            content.extend_from_slice(line.terminator());
        }
        Self::replace_file(&self.notes_path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteId, Record};
    use crate::notes::{NoteQuery, NotesLog};

    fn store_in(dir: &Path) -> FileStore {
        FileStore::in_dir(dir, "contacts.json", "notes.txt")
    }

    #[test]
    fn missing_contacts_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load_contacts().unwrap().is_none());
    }

    #[test]
    fn contacts_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        let mut alice = Record::new("Alice").unwrap();
        alice.set_address("Kyiv").unwrap();
        alice.add_phone("(050)123-45-67").unwrap();
        alice.set_birthday("15.06.1990").unwrap();
        let mut contacts = ContactMap::new();
        contacts.insert("Alice".into(), alice);
        contacts.insert("Bob".into(), Record::new("Bob").unwrap());

        store.save_contacts(&contacts).unwrap();
        let loaded = store.load_contacts().unwrap().unwrap();
        assert_eq!(loaded, contacts);
        assert!(!dir.path().join("contacts.json.tmp").exists());
    }

    #[test]
    fn garbage_contacts_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("contacts.json"), "not json").unwrap();
        let store = store_in(dir.path());
        assert!(matches!(
            store.load_contacts(),
            Err(PocketError::Serialization(_))
        ));
    }

    #[test]
    fn ensure_notes_creates_the_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir.path().join("nested"));
        assert!(store.ensure_notes().unwrap());
        assert!(!store.ensure_notes().unwrap());
        assert_eq!(fs::read_to_string(store.notes_path()).unwrap(), "");
    }

    #[test]
    fn append_then_rewrite_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.append_line("one").unwrap();
        store.append_line("two").unwrap();
        assert_eq!(
            store.read_lines().unwrap(),
            [RawLine::new("one"), RawLine::new("two")]
        );

        store.write_lines(&[RawLine::new("three")]).unwrap();
        assert_eq!(fs::read_to_string(store.notes_path()).unwrap(), "three\n");
    }

    #[test]
    fn split_lines_keeps_terminators() {
        let lines = split_lines(b"a\r\nb\nc");
        assert_eq!(
            lines,
            [
                RawLine::from_bytes(&b"a"[..], true),
                RawLine::from_bytes(&b"b"[..], false),
                RawLine::from_bytes(&b"c"[..], false),
            ]
        );
        assert!(split_lines(b"").is_empty());
        assert_eq!(split_lines(b"x\n").len(), 1);
    }

    #[test]
    fn append_after_unterminated_last_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        fs::write(store.notes_path(), "one").unwrap();
        store.append_line("two").unwrap();
        assert_eq!(fs::read_to_string(store.notes_path()).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn non_utf8_line_does_not_block_find_or_delete() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let mut content = b"01.06.2024 - 10:00:00 :: buy milk\n".to_vec();
        let bad_line = b"02.06.2024 - 11:00:00 :: \xcf\xf0\xe8\xe2\xe5\xf2\n";
        content.extend_from_slice(bad_line);
        fs::write(store.notes_path(), &content).unwrap();

        let mut log = NotesLog::new(&mut store);
        let found = log.find(&NoteQuery::parse("milk", "", "")).unwrap();
        assert_eq!(found.lines, ["01.06.2024 - 10:00:00 :: buy milk"]);
        assert_eq!(found.skipped, 1);

        let id: NoteId = "01.06.2024 - 10:00:00".parse().unwrap();
        assert!(log.delete(&id).unwrap());
        assert_eq!(fs::read(store.notes_path()).unwrap(), bad_line);
    }

    #[test]
    fn rewrite_keeps_crlf_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        fs::write(
            store.notes_path(),
            "01.06.2024 - 10:00:00 :: buy milk\r\n02.06.2024 - 11:00:00 :: call mom\r\n",
        )
        .unwrap();

        let id: NoteId = "01.06.2024 - 10:00:00".parse().unwrap();
        assert!(NotesLog::new(&mut store).delete(&id).unwrap());
        assert_eq!(
            fs::read_to_string(store.notes_path()).unwrap(),
            "02.06.2024 - 11:00:00 :: call mom\r\n"
        );
    }
}
