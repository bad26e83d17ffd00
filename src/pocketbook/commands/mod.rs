//! # Command Layer
//!
//! Business logic for each verb, plus the static command table the dispatcher
//! matches input against.
//!
//! A command line is split on whitespace. The first two words are tried as a
//! two-word verb (`add phone`, `find note`, `good bye`), then the first word alone
//! (`add`, `save`). Matching ignores case. The remaining words are the arguments,
//! and their count is checked against the table before anything runs.
//!
//! Command functions take regular Rust values and return [`CmdResult`]; they
//! never print and never read the terminal.

use crate::directory::BirthdayGroup;
use crate::error::{PocketError, Result};
use crate::model::Record;

pub mod birthdays;
pub mod config;
pub mod contacts;
pub mod help;
pub mod notes;
pub mod session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    /// Contacts to list, in order.
    pub records: Vec<Record>,
    /// Raw note lines, in file order.
    pub note_lines: Vec<String>,
    pub birthdays: Vec<BirthdayGroup>,
    /// Plain text lines (help, config listings).
    pub lines: Vec<String>,
    /// The session should end after this command.
    pub exit: bool,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    pub fn with_note_lines(mut self, lines: Vec<String>) -> Self {
        self.note_lines = lines;
        self
    }

    pub fn with_birthdays(mut self, birthdays: Vec<BirthdayGroup>) -> Self {
        self.birthdays = birthdays;
        self
    }

    pub fn with_lines(mut self, lines: Vec<String>) -> Self {
        self.lines = lines;
        self
    }

    pub fn exiting(mut self) -> Self {
        self.exit = true;
        self
    }

    /// Messages and listings flattened to plain text, in display order.
    pub fn to_text(&self) -> Vec<String> {
        let mut out = Vec::new();
        out.extend(self.lines.iter().cloned());
        out.extend(self.records.iter().map(Record::render));
        out.extend(self.birthdays.iter().map(birthdays::format_group));
        out.extend(self.note_lines.iter().cloned());
        out.extend(self.messages.iter().map(|m| m.content.clone()));
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Exit,
    Save,
    Help,
    Config,
    Add,
    AddAddress,
    AddBirthday,
    AddEmail,
    AddPhone,
    Remove,
    DeleteAddress,
    DeleteBirthday,
    DeleteEmail,
    DeletePhone,
    ChangeAddress,
    ChangeBirthday,
    ChangeEmail,
    ChangePhone,
    Show,
    List,
    Search,
    ComingBirthday,
    AddNote,
    FindNote,
    ChangeNote,
    DeleteNote,
    TagNote,
}

/// Command group definitions for help output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Contacts,
    Fields,
    Notes,
    Session,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Contacts => "Contacts:",
            CommandGroup::Fields => "Contact Fields:",
            CommandGroup::Notes => "Notes:",
            CommandGroup::Session => "Session:",
        }
    }

    /// Returns all groups in display order
    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Contacts,
            CommandGroup::Fields,
            CommandGroup::Notes,
            CommandGroup::Session,
        ]
    }
}

/// One row of the command table.
#[derive(Debug)]
pub struct CommandSpec {
    /// Lower-case verb, one or two words.
    pub words: &'static str,
    pub verb: Verb,
    pub group: CommandGroup,
    pub min_args: usize,
    /// `None` means any number of trailing words.
    pub max_args: Option<usize>,
    pub usage: &'static str,
    pub about: &'static str,
}

impl CommandSpec {
    fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && self.max_args.map_or(true, |max| count <= max)
    }
}

macro_rules! command {
    ($words:literal, $verb:ident, $group:ident, $min:literal.., $usage:literal, $about:literal) => {
        CommandSpec {
            words: $words,
            verb: Verb::$verb,
            group: CommandGroup::$group,
            min_args: $min,
            max_args: None,
            usage: $usage,
            about: $about,
        }
    };
    ($words:literal, $verb:ident, $group:ident, $min:literal..=$max:literal, $usage:literal, $about:literal) => {
        CommandSpec {
            words: $words,
            verb: Verb::$verb,
            group: CommandGroup::$group,
            min_args: $min,
            max_args: Some($max),
            usage: $usage,
            about: $about,
        }
    };
}

pub static COMMANDS: &[CommandSpec] = &[
    command!("add", Add, Contacts, 1..=1, "add <name>", "Add a new contact"),
    command!("remove", Remove, Contacts, 1..=1, "remove <name>", "Remove a contact"),
    command!("show", Show, Contacts, 1..=1, "show <name>", "Show one contact"),
    command!("list", List, Contacts, 0..=0, "list", "List every contact"),
    command!("search", Search, Contacts, 1..=1, "search <text>", "Find contacts whose name contains text"),
    command!("coming birthday", ComingBirthday, Contacts, 0..=1, "coming birthday [days]", "Birthdays in the next days"),
    command!("add address", AddAddress, Fields, 2.., "add address <name> <address>", "Set a contact's address"),
    command!("add birthday", AddBirthday, Fields, 2..=2, "add birthday <name> <dd.mm.yyyy>", "Set a contact's birthday"),
    command!("add email", AddEmail, Fields, 2..=2, "add email <name> <email>", "Set a contact's email"),
    command!("add phone", AddPhone, Fields, 2..=2, "add phone <name> <(0XX)XXX-XX-XX>", "Add a phone number"),
    command!("change address", ChangeAddress, Fields, 2.., "change address <name> <address>", "Replace a contact's address"),
    command!("change birthday", ChangeBirthday, Fields, 2..=2, "change birthday <name> <dd.mm.yyyy>", "Replace a contact's birthday"),
    command!("change email", ChangeEmail, Fields, 2..=2, "change email <name> <email>", "Replace a contact's email"),
    command!("change phone", ChangePhone, Fields, 3..=3, "change phone <name> <old> <new>", "Replace one phone number"),
    command!("delete address", DeleteAddress, Fields, 1..=1, "delete address <name>", "Clear a contact's address"),
    command!("delete birthday", DeleteBirthday, Fields, 1..=1, "delete birthday <name>", "Clear a contact's birthday"),
    command!("delete email", DeleteEmail, Fields, 1..=1, "delete email <name>", "Clear a contact's email"),
    command!("delete phone", DeletePhone, Fields, 2..=2, "delete phone <name> <phone>", "Remove one phone number"),
    command!("add note", AddNote, Notes, 1.., "add note <text>", "Write a new note"),
    command!("find note", FindNote, Notes, 0..=3, "find note [keyword] [from dd.mm.yyyy] [to dd.mm.yyyy]", "Search notes"),
    command!("change note", ChangeNote, Notes, 3.., "change note <dd.mm.yyyy - hh:mm:ss> [text]", "Rewrite a note"),
    command!("delete note", DeleteNote, Notes, 3..=3, "delete note <dd.mm.yyyy - hh:mm:ss>", "Delete a note"),
    command!("tag note", TagNote, Notes, 0.., "tag note ...", "Tag a note (not available yet)"),
    command!("save", Save, Session, 0..=0, "save", "Save the contacts book"),
    command!("config", Config, Session, 0..=2, "config [key] [value]", "Show or change settings"),
    command!("help", Help, Session, 0..=2, "help [command]", "Show this help"),
    command!("exit", Exit, Session, 0.., "exit", "Save and quit"),
    command!("close", Exit, Session, 0.., "close", "Save and quit"),
    command!("good bye", Exit, Session, 0.., "good bye", "Save and quit"),
];

pub fn find_command(words: &str) -> Option<&'static CommandSpec> {
    let words = words.to_lowercase();
    COMMANDS.iter().find(|c| c.words == words)
}

/// A parsed input line: the matched table row and the remaining words.
#[derive(Debug)]
pub struct CommandLine {
    pub spec: &'static CommandSpec,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return Ok(None);
        };

        let two_words = tokens
            .get(1)
            .and_then(|second| find_command(&format!("{} {}", first, second)));
        let (spec, consumed) = match two_words {
            Some(spec) => (spec, 2),
            None => match find_command(first) {
                Some(spec) => (spec, 1),
                None => {
                    return Err(PocketError::InvalidArgument(format!(
                        "The \"{}\" command is wrong! The allowable commands are {}.",
                        first.to_lowercase(),
                        COMMANDS
                            .iter()
                            .map(|c| c.words)
                            .collect::<Vec<_>>()
                            .join(", ")
                    )))
                }
            },
        };

        let args: Vec<String> = tokens[consumed..].iter().map(|s| s.to_string()).collect();
        if !spec.accepts(args.len()) {
            return Err(PocketError::InvalidArgument(format!(
                "Usage: {}",
                spec.usage
            )));
        }
        Ok(Some(Self { spec, args }))
    }

    pub fn verb(&self) -> Verb {
        self.spec.verb
    }

    /// Arguments from `from` on, joined with single spaces.
    pub fn rest(&self, from: usize) -> String {
        self.args.get(from..).unwrap_or_default().join(" ")
    }
}
