//! # Notes Log
//!
//! An ordered, file-backed sequence of [`NoteEntry`] lines. The file is the only
//! source of truth: nothing is cached between calls.
//!
//! - `add` appends one line.
//! - `find` reads and filters.
//! - `change` and `delete` read every line, edit one, and rewrite the whole file.
//!   When no line matches the file is left untouched.
//!
//! A line whose first 21 characters do not parse as an identifier is corrupt. It
//! is logged and skipped by every scan, and rewritten verbatim so hand edits are
//! never lost.
//!
//! Nothing guards against another process editing the file between a `find` and
//! a later `change`/`delete`.

use crate::error::{PocketError, Result};
use crate::model::{NoteEntry, NoteId};
use crate::store::{NoteStore, RawLine};
use crate::validate::parse_date;
use chrono::{Local, NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

/// Asks the user a yes/no question.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Filters for [`NotesLog::find`]. Missing bounds mean "since forever" and
/// "up to now".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    pub keyword: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl NoteQuery {
    /// Builds a query from raw arguments. Dates that are not `dd.mm.yyyy` are
    /// treated as absent.
    pub fn parse(keyword: &str, start: &str, end: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            start: optional_date(start, "start"),
            end: optional_date(end, "end"),
        }
    }

    fn matches(&self, entry: &NoteEntry, start: NaiveDate, end: NaiveDate, needle: &str) -> bool {
        let date = entry.id.date();
        if date < start || date > end {
            return false;
        }
        needle.is_empty() || entry.body.to_lowercase().contains(needle)
    }
}

fn optional_date(raw: &str, which: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    let parsed = parse_date(raw);
    if parsed.is_none() {
        info!("{} date '{}' is not dd.mm.yyyy, ignoring it", which, raw);
    }
    parsed
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOutcome {
    /// Matching raw lines, in file order.
    pub lines: Vec<String>,
    /// Corrupt lines passed over during the scan.
    pub skipped: usize,
}

impl FindOutcome {
    pub fn found(&self) -> bool {
        !self.lines.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    Changed,
    NotFound,
    /// The empty-body confirmation was declined.
    Cancelled,
}

pub struct NotesLog<S: NoteStore> {
    store: S,
}

impl<S: NoteStore> NotesLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Makes sure the backing file exists. Returns `true` if it was created.
    pub fn open(&mut self) -> Result<bool> {
        let created = self.store.ensure_notes()?;
        if created {
            info!("created an empty notes file");
        }
        Ok(created)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn add(&mut self, body: &str) -> Result<NoteEntry> {
        self.add_at(body, Local::now().naive_local())
    }

    pub fn add_at(&mut self, body: &str, at: NaiveDateTime) -> Result<NoteEntry> {
        let entry = NoteEntry::new(NoteId::new(at), body)?;
        self.store.append_line(&entry.to_line())?;
        debug!("added note {}", entry.id);
        Ok(entry)
    }

    /// Every readable entry in file order, plus the number of corrupt lines.
    pub fn entries(&self) -> Result<(Vec<NoteEntry>, usize)> {
        let lines = self.store.read_lines()?;
        let mut entries = Vec::with_capacity(lines.len());
        let mut skipped = 0;
        for (idx, line) in lines.iter().enumerate() {
            match parse_logged(line, idx) {
                Some(entry) => entries.push(entry),
                None => skipped += 1,
            }
        }
        Ok((entries, skipped))
    }

    pub fn find(&self, query: &NoteQuery) -> Result<FindOutcome> {
        self.find_at(query, Local::now().naive_local())
    }

    pub fn find_at(&self, query: &NoteQuery, now: NaiveDateTime) -> Result<FindOutcome> {
        find_in(&self.store, query, now)
    }

    /// Replaces the body of the first note with identifier `id`. An empty body
    /// is only written if `confirm` agrees.
    pub fn change(
        &mut self,
        id: &NoteId,
        new_body: &str,
        confirm: &mut dyn Confirm,
    ) -> Result<ChangeOutcome> {
        let replacement = NoteEntry::new(*id, new_body)?;
        let mut lines = self.store.read_lines()?;
        let Some(idx) = position_of(&lines, id) else {
            return Ok(ChangeOutcome::NotFound);
        };

        if new_body.is_empty()
            && !confirm.confirm("The new note text is empty. Are you sure? (y/n)")
        {
            return Ok(ChangeOutcome::Cancelled);
        }

        lines[idx] = lines[idx].replaced(replacement.to_line());
        self.store.write_lines(&lines)?;
        debug!("changed note {}", id);
        Ok(ChangeOutcome::Changed)
    }

    /// Removes the first note with identifier `id`. Returns `false` if there
    /// is none.
    pub fn delete(&mut self, id: &NoteId) -> Result<bool> {
        let mut lines = self.store.read_lines()?;
        let Some(idx) = position_of(&lines, id) else {
            return Ok(false);
        };
        lines.remove(idx);
        self.store.write_lines(&lines)?;
        debug!("deleted note {}", id);
        Ok(true)
    }
}

/// The read-only search behind [`NotesLog::find_at`], usable with a shared
/// reference to any store.
pub fn find_in<S: NoteStore + ?Sized>(
    store: &S,
    query: &NoteQuery,
    now: NaiveDateTime,
) -> Result<FindOutcome> {
    let start = query.start.unwrap_or(NaiveDate::MIN);
    let end = query.end.unwrap_or_else(|| now.date());
    let needle = query.keyword.to_lowercase();

    let mut outcome = FindOutcome::default();
    for (idx, line) in store.read_lines()?.into_iter().enumerate() {
        match parse_logged(&line, idx) {
            Some(entry) if query.matches(&entry, start, end, &needle) => {
                outcome.lines.extend(line.text().map(str::to_string))
            }
            Some(_) => {}
            None => outcome.skipped += 1,
        }
    }
    Ok(outcome)
}

fn position_of(lines: &[RawLine], id: &NoteId) -> Option<usize> {
    lines
        .iter()
        .enumerate()
        .find(|(idx, line)| parse_logged(line, *idx).is_some_and(|entry| entry.id == *id))
        .map(|(idx, _)| idx)
}

fn parse_logged(line: &RawLine, idx: usize) -> Option<NoteEntry> {
    let Some(text) = line.text() else {
        warn!("skipping note on line {}: not valid UTF-8", idx + 1);
        return None;
    };
    match NoteEntry::parse_line(text, idx + 1) {
        Ok(entry) => Some(entry),
        Err(PocketError::Corruption { line, content }) => {
            warn!("skipping corrupted note on line {}: {:?}", line, content);
            None
        }
        Err(e) => {
            warn!("skipping unreadable note on line {}: {}", idx + 1, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn at(s: &str) -> NaiveDateTime {
        s.parse::<NoteId>().unwrap().timestamp()
    }

    fn id(s: &str) -> NoteId {
        s.parse().unwrap()
    }

    fn never(_: &str) -> bool {
        panic!("confirmation should not be requested")
    }

    fn log_with(lines: &[&str]) -> NotesLog<InMemoryStore> {
        NotesLog::new(StoreFixture::new().with_note_lines(lines).store)
    }

    fn sample() -> NotesLog<InMemoryStore> {
        log_with(&[
            "01.06.2024 - 10:00:00 :: buy milk",
            "05.06.2024 - 12:30:00 :: call the Bank",
            "10.06.2024 - 08:15:42 :: Milk is in the fridge",
        ])
    }

    fn lines(log: &NotesLog<InMemoryStore>) -> Vec<String> {
        log.store().notes().unwrap_or_default()
    }

    #[test]
    fn open_creates_the_file_once() {
        let mut log = NotesLog::new(InMemoryStore::new());
        assert!(log.open().unwrap());
        assert!(!log.open().unwrap());
        assert_eq!(log.store().notes(), Some(Vec::new()));
    }

    #[test]
    fn add_then_find_by_keyword() {
        let mut log = NotesLog::new(InMemoryStore::new());
        let now = at("17.10.2026 - 09:41:07");
        log.add_at("buy milk", now).unwrap();

        let found = log.find_at(&NoteQuery::parse("milk", "", ""), now).unwrap();
        assert_eq!(found.lines, ["17.10.2026 - 09:41:07 :: buy milk"]);

        let missing = log.find_at(&NoteQuery::parse("bread", "", ""), now).unwrap();
        assert!(!missing.found());
    }

    #[test]
    fn add_rejects_multiline_bodies() {
        let mut log = NotesLog::new(InMemoryStore::new());
        assert!(log.add("one\ntwo").is_err());
        assert!(lines(&log).is_empty());
    }

    #[test]
    fn keyword_is_case_insensitive_and_optional() {
        let log = sample();
        let now = at("17.10.2026 - 09:41:07");

        let milk = log.find_at(&NoteQuery::parse("MILK", "", ""), now).unwrap();
        assert_eq!(milk.lines.len(), 2);

        let all = log.find_at(&NoteQuery::default(), now).unwrap();
        assert_eq!(all.lines.len(), 3);
    }

    #[test]
    fn keyword_matches_body_not_identifier() {
        let log = sample();
        let found = log
            .find_at(&NoteQuery::parse("2024", "", ""), at("17.10.2026 - 09:41:07"))
            .unwrap();
        assert!(!found.found());
    }

    #[test]
    fn date_range_is_inclusive() {
        let log = sample();
        let now = at("17.10.2026 - 09:41:07");

        let q = NoteQuery::parse("", "05.06.2024", "10.06.2024");
        let found = log.find_at(&q, now).unwrap();
        assert_eq!(found.lines.len(), 2);
        assert!(found.lines[0].contains("call the Bank"));

        let q = NoteQuery::parse("milk", "02.06.2024", "");
        let found = log.find_at(&q, now).unwrap();
        assert_eq!(found.lines, ["10.06.2024 - 08:15:42 :: Milk is in the fridge"]);
    }

    #[test]
    fn end_defaults_to_now() {
        let log = sample();
        let found = log
            .find_at(&NoteQuery::default(), at("05.06.2024 - 00:00:01"))
            .unwrap();
        assert_eq!(found.lines.len(), 2);
    }

    #[test]
    fn unparsable_dates_fall_back_to_defaults() {
        let q = NoteQuery::parse("", "yesterday", "31.02.2024");
        assert_eq!(q.start, None);
        assert_eq!(q.end, None);
        let found = sample()
            .find_at(&q, at("17.10.2026 - 09:41:07"))
            .unwrap();
        assert_eq!(found.lines.len(), 3);
    }

    #[test]
    fn corrupt_lines_are_skipped_not_fatal() {
        let log = log_with(&[
            "01.06.2024 - 10:00:00 :: buy milk",
            "garbage written by hand",
            "05.06.2024 - 12:30:00 :: more milk",
        ]);
        let found = log
            .find_at(&NoteQuery::parse("milk", "", ""), at("17.10.2026 - 09:41:07"))
            .unwrap();
        assert_eq!(found.lines.len(), 2);
        assert_eq!(found.skipped, 1);

        let (entries, skipped) = log.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn change_updates_only_the_target_line() {
        let mut log = sample();
        let before = lines(&log);
        let outcome = log
            .change(&id("05.06.2024 - 12:30:00"), "call the bank back", &mut never)
            .unwrap();
        assert_eq!(outcome, ChangeOutcome::Changed);

        let after = lines(&log);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], "05.06.2024 - 12:30:00 :: call the bank back");
        assert_eq!(after[2], before[2]);
    }

    #[test]
    fn change_unknown_id_leaves_file_untouched() {
        let mut log = sample();
        let before = lines(&log);
        let outcome = log
            .change(&id("06.06.2024 - 12:30:00"), "x", &mut never)
            .unwrap();
        assert_eq!(outcome, ChangeOutcome::NotFound);
        assert_eq!(lines(&log), before);
    }

    #[test]
    fn empty_body_needs_confirmation() {
        let mut log = sample();
        let target = id("01.06.2024 - 10:00:00");

        let mut decline = |_: &str| false;
        assert_eq!(
            log.change(&target, "", &mut decline).unwrap(),
            ChangeOutcome::Cancelled
        );
        assert_eq!(lines(&log)[0], "01.06.2024 - 10:00:00 :: buy milk");

        let mut asked = Vec::new();
        let mut accept = |prompt: &str| {
            asked.push(prompt.to_string());
            true
        };
        assert_eq!(
            log.change(&target, "", &mut accept).unwrap(),
            ChangeOutcome::Changed
        );
        assert_eq!(asked.len(), 1);
        assert_eq!(lines(&log)[0], "01.06.2024 - 10:00:00 :: ");
    }

    #[test]
    fn change_keeps_corrupt_lines_verbatim() {
        let mut log = log_with(&[
            "not a note",
            "01.06.2024 - 10:00:00 :: buy milk",
        ]);
        log.change(&id("01.06.2024 - 10:00:00"), "buy oat milk", &mut never)
            .unwrap();
        assert_eq!(
            lines(&log),
            ["not a note", "01.06.2024 - 10:00:00 :: buy oat milk"]
        );
    }

    #[test]
    fn delete_removes_exactly_one_line() {
        let mut log = sample();
        assert!(log.delete(&id("05.06.2024 - 12:30:00")).unwrap());
        assert_eq!(
            lines(&log),
            [
                "01.06.2024 - 10:00:00 :: buy milk",
                "10.06.2024 - 08:15:42 :: Milk is in the fridge",
            ]
        );
    }

    #[test]
    fn delete_unknown_id_leaves_file_untouched() {
        let mut log = sample();
        let before = lines(&log);
        assert!(!log.delete(&id("05.06.2024 - 12:30:01")).unwrap());
        assert_eq!(lines(&log), before);
    }

    #[test]
    fn same_second_collision_hits_the_first_note() {
        let mut log = log_with(&[
            "01.06.2024 - 10:00:00 :: first",
            "01.06.2024 - 10:00:00 :: second",
        ]);
        log.delete(&id("01.06.2024 - 10:00:00")).unwrap();
        assert_eq!(lines(&log), ["01.06.2024 - 10:00:00 :: second"]);
    }

    #[test]
    fn non_utf8_line_is_skipped_and_kept() {
        let mut log = NotesLog::new(
            StoreFixture::new()
                .with_note_lines(&["01.06.2024 - 10:00:00 :: buy milk"])
                .with_raw_note_line(b"03.06.2024 - 09:00:00 :: \xcf\xf0\xe8\xe2\xe5\xf2", false)
                .store,
        );
        let (entries, skipped) = log.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(skipped, 1);

        log.change(&id("01.06.2024 - 10:00:00"), "buy oat milk", &mut never)
            .unwrap();
        let raw = log.store().read_lines().unwrap();
        assert_eq!(raw[0].text(), Some("01.06.2024 - 10:00:00 :: buy oat milk"));
        assert_eq!(
            raw[1].as_bytes(),
            b"03.06.2024 - 09:00:00 :: \xcf\xf0\xe8\xe2\xe5\xf2"
        );
    }

    #[test]
    fn change_keeps_the_line_terminator() {
        let mut log = NotesLog::new(
            StoreFixture::new()
                .with_raw_note_line(b"01.06.2024 - 10:00:00 :: buy milk", true)
                .store,
        );
        log.change(&id("01.06.2024 - 10:00:00"), "buy oat milk", &mut never)
            .unwrap();
        assert_eq!(
            log.store().read_lines().unwrap(),
            [RawLine::from_bytes(
                &b"01.06.2024 - 10:00:00 :: buy oat milk"[..],
                true
            )]
        );
    }
}
