//! # Contact Directory
//!
//! The keyed collection of [`Record`]s. Names are unique and case-sensitive as
//! keys; [`ContactDirectory::search`] matches them case-insensitively.
//!
//! The directory is purely in memory. It is filled by [`ContactDirectory::load`]
//! and written back only by an explicit [`ContactDirectory::save`]; mutations in
//! between are not persisted on their own.
//!
//! ## Birthday window
//!
//! [`ContactDirectory::upcoming_birthdays`] moves every birthday into the
//! current year and keeps those that land in `[today, today + window]`. With
//! [`BirthdayRollover::SameYear`] (the default) a birthday that already passed
//! this year is not considered again, so a window crossing New Year's Eve does not
//! see January birthdays. [`BirthdayRollover::NextYear`] moves passed birthdays
//! into next year instead. A 29 February birthday falls on 28 February in common
//! years.

use crate::error::{PocketError, Result};
use crate::model::Record;
use crate::store::{ContactMap, ContactStore};
use chrono::{Datelike, Days, NaiveDate};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BirthdayRollover {
    #[default]
    SameYear,
    NextYear,
}

impl BirthdayRollover {
    pub fn as_str(&self) -> &'static str {
        match self {
            BirthdayRollover::SameYear => "same-year",
            BirthdayRollover::NextYear => "next-year",
        }
    }
}

impl std::str::FromStr for BirthdayRollover {
    type Err = PocketError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "same-year" => Ok(BirthdayRollover::SameYear),
            "next-year" => Ok(BirthdayRollover::NextYear),
            other => Err(PocketError::InvalidArgument(format!(
                "'{}' is not a rollover rule (use same-year or next-year)",
                other
            ))),
        }
    }
}

/// Everyone celebrating on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayGroup {
    pub date: NaiveDate,
    pub names: Vec<String>,
}

/// What [`ContactDirectory::load`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing persisted yet; the directory stays empty.
    Missing,
    /// A persisted but empty directory.
    Empty,
    Loaded(usize),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ContactDirectory {
    records: ContactMap,
}

impl ContactDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records ordered by name.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn add(&mut self, name: &str) -> Result<&mut Record> {
        if self.records.contains_key(name) {
            return Err(PocketError::Duplicate(format!("Contact '{}'", name)));
        }
        let record = Record::new(name)?;
        Ok(self.records.entry(name.to_string()).or_insert(record))
    }

    pub fn get(&self, name: &str) -> Result<&Record> {
        self.records.get(name).ok_or_else(|| not_found(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Record> {
        self.records.get_mut(name).ok_or_else(|| not_found(name))
    }

    pub fn remove(&mut self, name: &str) -> Result<Record> {
        self.records.remove(name).ok_or_else(|| not_found(name))
    }

    /// Records whose name contains `needle`, ignoring case. An empty needle
    /// matches everything.
    pub fn search(&self, needle: &str) -> Vec<&Record> {
        let needle = needle.to_lowercase();
        self.records
            .values()
            .filter(|r| r.name().to_lowercase().contains(&needle))
            .collect()
    }

    /// Birthdays falling in `[today, today + window_days]`, grouped by date in
    /// ascending order. Names within a group are sorted.
    pub fn upcoming_birthdays(
        &self,
        window_days: u32,
        today: NaiveDate,
        rollover: BirthdayRollover,
    ) -> Vec<BirthdayGroup> {
        let end = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        let mut groups: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();

        for record in self.records.values() {
            let Some(born) = record.birthday_date() else {
                continue;
            };
            let Some(mut date) = anniversary(born, today.year()) else {
                continue;
            };
            if date < today && rollover == BirthdayRollover::NextYear {
                match anniversary(born, today.year() + 1) {
                    Some(next) => date = next,
                    None => continue,
                }
            }
            if date >= today && date <= end {
                groups
                    .entry(date)
                    .or_default()
                    .push(record.name().to_string());
            }
        }

        groups
            .into_iter()
            .map(|(date, names)| BirthdayGroup { date, names })
            .collect()
    }

    /// Replaces the in-memory records with whatever `store` holds.
    ///
    /// Fields that no longer pass validation are cleared with a warning, and a
    /// record stored under a key other than its own name is re-keyed.
    pub fn load<S: ContactStore + ?Sized>(&mut self, store: &S) -> Result<LoadOutcome> {
        let Some(persisted) = store.load_contacts()? else {
            info!("no saved contacts, starting empty");
            self.records.clear();
            return Ok(LoadOutcome::Missing);
        };

        let mut records = ContactMap::new();
        for (key, mut record) in persisted {
            let dropped = record.sanitize();
            if !dropped.is_empty() {
                warn!(
                    "contact '{}': dropped invalid {}",
                    record.name(),
                    dropped.join(", ")
                );
            }
            let name = record.name().to_string();
            if name.trim().is_empty() {
                warn!("dropping contact stored as '{}': it has no name", key);
                continue;
            }
            if key != name {
                warn!("contact stored as '{}' is named '{}'", key, name);
            }
            match records.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
                // The copy stored under its own name wins over a renamed one.
                Entry::Occupied(mut slot) if key == *slot.key() => {
                    warn!(
                        "contact '{}' is stored twice, keeping the copy under its own key",
                        key
                    );
                    slot.insert(record);
                }
                Entry::Occupied(slot) => {
                    warn!(
                        "dropping contact stored as '{}': the name '{}' is already taken",
                        key,
                        slot.key()
                    );
                }
            }
        }
        self.records = records;
        info!("loaded {} contacts", self.records.len());

        if self.records.is_empty() {
            Ok(LoadOutcome::Empty)
        } else {
            Ok(LoadOutcome::Loaded(self.records.len()))
        }
    }

    /// Writes every record to `store`, replacing its previous content.
    pub fn save<S: ContactStore + ?Sized>(&self, store: &mut S) -> Result<usize> {
        store.save_contacts(&self.records)?;
        info!("saved {} contacts", self.records.len());
        Ok(self.records.len())
    }
}

fn not_found(name: &str) -> PocketError {
    PocketError::NotFound(format!("Contact '{}'", name))
}

/// `born` moved into `year`; 29 February becomes 28 February in common years.
fn anniversary(born: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, born.month(), born.day()).or_else(|| {
        if born.month() == 2 && born.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn date(s: &str) -> NaiveDate {
        crate::validate::parse_date(s).unwrap()
    }

    fn directory_with(birthdays: &[(&str, &str)]) -> ContactDirectory {
        let mut dir = ContactDirectory::new();
        for (name, birthday) in birthdays {
            dir.add(name).unwrap().set_birthday(*birthday).unwrap();
        }
        dir
    }

    #[test]
    fn add_then_get_returns_blank_record() {
        let mut dir = ContactDirectory::new();
        dir.add("Alice").unwrap();
        let alice = dir.get("Alice").unwrap();
        assert_eq!(alice.name(), "Alice");
        assert!(alice.address().is_none());
        assert!(alice.phones().is_empty());
        assert!(alice.email().is_none());
        assert!(alice.birthday().is_none());
    }

    #[test]
    fn add_twice_is_a_duplicate() {
        let mut dir = ContactDirectory::new();
        dir.add("Alice").unwrap();
        assert!(matches!(dir.add("Alice"), Err(PocketError::Duplicate(_))));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn names_are_case_sensitive_keys() {
        let mut dir = ContactDirectory::new();
        dir.add("alice").unwrap();
        dir.add("Alice").unwrap();
        assert_eq!(dir.len(), 2);
        assert!(dir.get("ALICE").is_err());
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut dir = ContactDirectory::new();
        assert!(matches!(dir.remove("Bob"), Err(PocketError::NotFound(_))));

        dir.add("Bob").unwrap();
        dir.remove("Bob").unwrap();
        assert!(matches!(dir.get("Bob"), Err(PocketError::NotFound(_))));
    }

    #[test]
    fn search_ignores_case() {
        let mut dir = ContactDirectory::new();
        for name in ["Alice", "Malik", "Bob"] {
            dir.add(name).unwrap();
        }
        let names: Vec<_> = dir.search("LI").iter().map(|r| r.name()).collect();
        assert_eq!(names, ["Alice", "Malik"]);
        assert!(dir.search("zed").is_empty());
        assert_eq!(dir.search("").len(), 3);
    }

    #[test]
    fn upcoming_birthdays_within_window() {
        let dir = directory_with(&[("Alice", "15.06.1990"), ("Bob", "01.01.1990")]);
        let groups = dir.upcoming_birthdays(7, date("10.06.2024"), BirthdayRollover::SameYear);
        assert_eq!(
            groups,
            [BirthdayGroup {
                date: date("15.06.2024"),
                names: vec!["Alice".to_string()],
            }]
        );
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let dir = directory_with(&[
            ("Today", "10.06.1980"),
            ("Edge", "17.06.1985"),
            ("Late", "18.06.1985"),
        ]);
        let groups = dir.upcoming_birthdays(7, date("10.06.2024"), BirthdayRollover::SameYear);
        let dates: Vec<_> = groups.iter().map(|g| g.date).collect();
        assert_eq!(dates, [date("10.06.2024"), date("17.06.2024")]);

        let zero = dir.upcoming_birthdays(0, date("10.06.2024"), BirthdayRollover::SameYear);
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].names, ["Today"]);
    }

    #[test]
    fn groups_share_a_date_and_are_ordered() {
        let dir = directory_with(&[
            ("Carol", "12.06.1970"),
            ("Alice", "14.06.1990"),
            ("Bob", "12.06.2001"),
        ]);
        let groups = dir.upcoming_birthdays(7, date("10.06.2024"), BirthdayRollover::SameYear);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, date("12.06.2024"));
        assert_eq!(groups[0].names, ["Bob", "Carol"]);
        assert_eq!(groups[1].names, ["Alice"]);
    }

    #[test]
    fn contacts_without_birthday_are_skipped() {
        let mut dir = directory_with(&[("Alice", "11.06.1990")]);
        dir.add("Bob").unwrap();
        let groups = dir.upcoming_birthdays(30, date("10.06.2024"), BirthdayRollover::SameYear);
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn year_end_window_depends_on_rollover() {
        let dir = directory_with(&[("Jan", "02.01.1990"), ("Dec", "30.12.1990")]);
        let today = date("28.12.2024");

        let same = dir.upcoming_birthdays(7, today, BirthdayRollover::SameYear);
        let names: Vec<_> = same.iter().flat_map(|g| g.names.clone()).collect();
        assert_eq!(names, ["Dec"]);

        let next = dir.upcoming_birthdays(7, today, BirthdayRollover::NextYear);
        let dates: Vec<_> = next.iter().map(|g| g.date).collect();
        assert_eq!(dates, [date("30.12.2024"), date("02.01.2025")]);
    }

    #[test]
    fn leap_day_birthdays_fall_on_feb_28() {
        let dir = directory_with(&[("Leap", "29.02.2000")]);
        let groups = dir.upcoming_birthdays(3, date("27.02.2023"), BirthdayRollover::SameYear);
        assert_eq!(groups[0].date, date("28.02.2023"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut dir = ContactDirectory::new();
        let alice = dir.add("Alice").unwrap();
        alice.set_address("Kyiv, Khreshchatyk 1").unwrap();
        alice.add_phone("(050)123-45-67").unwrap();
        alice.add_phone("(067)000-11-22").unwrap();
        alice.set_email("alice@example.com").unwrap();
        alice.set_birthday("15.06.1990").unwrap();
        dir.add("Bob").unwrap();

        let mut store = InMemoryStore::new();
        assert_eq!(dir.save(&mut store).unwrap(), 2);

        let mut fresh = ContactDirectory::new();
        assert_eq!(fresh.load(&store).unwrap(), LoadOutcome::Loaded(2));
        assert_eq!(fresh, dir);
    }

    #[test]
    fn load_reports_missing_and_empty() {
        let mut dir = ContactDirectory::new();
        let mut store = InMemoryStore::new();
        assert_eq!(dir.load(&store).unwrap(), LoadOutcome::Missing);

        ContactDirectory::new().save(&mut store).unwrap();
        assert_eq!(dir.load(&store).unwrap(), LoadOutcome::Empty);
    }

    #[test]
    fn load_replaces_in_memory_state() {
        let store = StoreFixture::new()
            .with_contact("Alice", Some("15.06.1990"))
            .store;
        let mut dir = ContactDirectory::new();
        dir.add("Zed").unwrap();
        dir.load(&store).unwrap();
        assert!(dir.get("Zed").is_err());
        assert_eq!(dir.get("Alice").unwrap().birthday(), Some("15.06.1990"));
    }

    #[test]
    fn load_drops_nameless_and_colliding_records() {
        let contacts: ContactMap = serde_json::from_str(
            r#"{
                "Ghost": {"name": "  "},
                "Alias": {"name": "Alice", "address": "Lviv"},
                "Alice": {"name": "Alice", "address": "Kyiv"},
                "Ali": {"name": "Alice", "address": "Odesa"}
            }"#,
        )
        .unwrap();
        let mut store = InMemoryStore::new();
        store.save_contacts(&contacts).unwrap();

        let mut dir = ContactDirectory::new();
        assert_eq!(dir.load(&store).unwrap(), LoadOutcome::Loaded(1));
        assert!(dir.get("Ghost").is_err());
        assert_eq!(dir.get("Alice").unwrap().address(), Some("Kyiv"));
    }
}
