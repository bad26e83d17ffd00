//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every pocketbook operation, whatever the UI.
//!
//! The facade:
//! - **Dispatches** a parsed [`CommandLine`] to the matching command function
//! - **Shapes arguments** (joins trailing words, parses note identifiers and
//!   day counts, supplies the current time)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and reads no terminal input. Confirmation prompts go
//! through the [`Confirm`] trait so the caller decides how to ask.
//!
//! ## Generic Over the Store
//!
//! `PocketApi<S: ContactStore + NoteStore>`:
//! - Production: `PocketApi<FileStore>`
//! - Testing: `PocketApi<InMemoryStore>`
//!
//! ## Error Boundary
//!
//! [`PocketApi::execute`] propagates errors with `?`. [`PocketApi::run_line`]
//! never fails: parse errors, validation failures and I/O errors all come back
//! as error-level messages so an interactive loop can keep going.

use crate::commands::contacts::Field;
use crate::commands::{self, CmdMessage, CmdResult, CommandLine, Verb};
use crate::config::PocketConfig;
use crate::directory::ContactDirectory;
use crate::error::{PocketError, Result};
use crate::model::NoteId;
use crate::notes::{Confirm, NoteQuery};
use crate::store::{ContactStore, NoteStore};
use chrono::{Local, NaiveDateTime};
use log::{debug, error};
use std::path::{Path, PathBuf};

/// Words making up a note identifier: `dd.mm.yyyy - hh:mm:ss`.
const NOTE_ID_WORDS: usize = 3;

pub struct PocketApi<S: ContactStore + NoteStore> {
    store: S,
    directory: ContactDirectory,
    config: PocketConfig,
    config_dir: Option<PathBuf>,
}

impl<S: ContactStore + NoteStore> PocketApi<S> {
    /// Loads the contacts book and makes sure the notes file exists.
    ///
    /// `config_dir` is where `config` changes are saved; `None` keeps them in
    /// memory only.
    pub fn open(
        mut store: S,
        config: PocketConfig,
        config_dir: Option<PathBuf>,
    ) -> Result<(Self, CmdResult)> {
        let mut directory = ContactDirectory::new();
        let result = commands::session::open(&mut directory, &mut store)?;
        let api = Self {
            store,
            directory,
            config,
            config_dir,
        };
        Ok((api, result))
    }

    pub fn directory(&self) -> &ContactDirectory {
        &self.directory
    }

    pub fn config(&self) -> &PocketConfig {
        &self.config
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save(&mut self) -> Result<CmdResult> {
        commands::session::save(&self.directory, &mut self.store)
    }

    pub fn execute(&mut self, cmd: &CommandLine, confirm: &mut dyn Confirm) -> Result<CmdResult> {
        self.execute_at(cmd, confirm, Local::now().naive_local())
    }

    /// Runs one command as if the clock read `now`.
    pub fn execute_at(
        &mut self,
        cmd: &CommandLine,
        confirm: &mut dyn Confirm,
        now: NaiveDateTime,
    ) -> Result<CmdResult> {
        debug!("running '{}' with {} argument(s)", cmd.spec.words, cmd.args.len());
        let args = &cmd.args;
        let dir = &mut self.directory;

        match cmd.verb() {
            Verb::Add => commands::contacts::add(dir, &args[0]),
            Verb::Remove => commands::contacts::remove(dir, &args[0]),
            Verb::Show => commands::contacts::show(dir, &args[0]),
            Verb::List => commands::contacts::list(dir),
            Verb::Search => commands::contacts::search(dir, &args[0]),
            Verb::AddAddress | Verb::ChangeAddress => {
                commands::contacts::set_field(dir, &args[0], Field::Address, &cmd.rest(1))
            }
            Verb::AddBirthday | Verb::ChangeBirthday => {
                commands::contacts::set_field(dir, &args[0], Field::Birthday, &args[1])
            }
            Verb::AddEmail | Verb::ChangeEmail => {
                commands::contacts::set_field(dir, &args[0], Field::Email, &args[1])
            }
            Verb::DeleteAddress => commands::contacts::clear_field(dir, &args[0], Field::Address),
            Verb::DeleteBirthday => {
                commands::contacts::clear_field(dir, &args[0], Field::Birthday)
            }
            Verb::DeleteEmail => commands::contacts::clear_field(dir, &args[0], Field::Email),
            Verb::AddPhone => commands::contacts::add_phone(dir, &args[0], &args[1]),
            Verb::DeletePhone => commands::contacts::remove_phone(dir, &args[0], &args[1]),
            Verb::ChangePhone => {
                commands::contacts::change_phone(dir, &args[0], &args[1], &args[2])
            }
            Verb::ComingBirthday => {
                let window = commands::birthdays::parse_window(
                    args.first().map(String::as_str),
                    self.config.birthday_window,
                )?;
                commands::birthdays::run(dir, window, now.date(), self.config.birthday_rollover)
            }
            Verb::AddNote => commands::notes::add(&mut self.store, &cmd.rest(0), now),
            Verb::FindNote => {
                let arg = |i: usize| args.get(i).map(String::as_str).unwrap_or("");
                let query = NoteQuery::parse(arg(0), arg(1), arg(2));
                commands::notes::find(&self.store, &query, now)
            }
            Verb::ChangeNote => match note_id(cmd) {
                Ok(id) => {
                    commands::notes::change(&mut self.store, &id, &cmd.rest(NOTE_ID_WORDS), confirm)
                }
                Err(e) => Ok(bad_note_id(e, "no note changed")),
            },
            Verb::DeleteNote => match note_id(cmd) {
                Ok(id) => commands::notes::delete(&mut self.store, &id),
                Err(e) => Ok(bad_note_id(e, "no note deleted")),
            },
            Verb::TagNote => commands::notes::tag(),
            Verb::Save => commands::session::save(dir, &mut self.store),
            Verb::Exit => commands::session::exit(dir, &mut self.store),
            Verb::Config => commands::config::run(
                &mut self.config,
                self.config_dir.as_deref(),
                commands::config::ConfigAction::from_args(args),
            ),
            Verb::Help => commands::help::run(args),
        }
    }

    /// Parses and runs one input line. Never fails: errors become messages.
    pub fn run_line(&mut self, line: &str, confirm: &mut dyn Confirm) -> CmdResult {
        let cmd = match CommandLine::parse(line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => return CmdResult::default(),
            Err(e) => return failure(None, e),
        };
        match self.execute(&cmd, confirm) {
            Ok(result) => result,
            Err(e) => failure(Some(cmd.spec.words), e),
        }
    }
}

fn note_id(cmd: &CommandLine) -> Result<NoteId> {
    cmd.args[..NOTE_ID_WORDS].join(" ").parse()
}

/// The error, followed by the same status a missing note would get.
fn bad_note_id(e: PocketError, status: &str) -> CmdResult {
    CmdResult::default()
        .with_message(CmdMessage::error(e.to_string()))
        .with_message(CmdMessage::info(status))
}

fn failure(words: Option<&str>, e: PocketError) -> CmdResult {
    let content = match (&e, words) {
        (PocketError::Io(_) | PocketError::Serialization(_), Some(words)) => {
            error!("'{}' failed: {:?}", words, e);
            format!("Error while running '{}': {}", words, e)
        }
        _ => e.to_string(),
    };
    CmdResult::default().with_message(CmdMessage::error(content))
}
