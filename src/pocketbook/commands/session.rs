use crate::commands::{CmdMessage, CmdResult};
use crate::directory::{ContactDirectory, LoadOutcome};
use crate::error::Result;
use crate::notes::NotesLog;
use crate::store::{ContactStore, NoteStore};

/// Loads the contacts book and makes sure the notes file exists.
pub fn open<S: ContactStore + NoteStore>(
    dir: &mut ContactDirectory,
    store: &mut S,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.add_message(match dir.load(store)? {
        LoadOutcome::Missing | LoadOutcome::Empty => {
            CmdMessage::info("This is an empty contacts book. Add contacts to it.")
        }
        LoadOutcome::Loaded(1) => CmdMessage::info("The contacts book is loaded (1 contact)."),
        LoadOutcome::Loaded(n) => {
            CmdMessage::info(format!("The contacts book is loaded ({} contacts).", n))
        }
    });

    let created = NotesLog::new(store).open()?;
    result.add_message(CmdMessage::info(if created {
        "Created an empty notes file."
    } else {
        "The notes file is loaded."
    }));
    Ok(result)
}

pub fn save<S: ContactStore>(dir: &ContactDirectory, store: &mut S) -> Result<CmdResult> {
    let message = match dir.save(store)? {
        1 => "The contacts book is saved (1 contact).".to_string(),
        n => format!("The contacts book is saved ({} contacts).", n),
    };
    Ok(CmdResult::default().with_message(CmdMessage::success(message)))
}

/// Saves, says goodbye and asks the session to end.
pub fn exit<S: ContactStore>(dir: &ContactDirectory, store: &mut S) -> Result<CmdResult> {
    let result = save(dir, store)?;
    Ok(result
        .with_message(CmdMessage::info("Good bye!"))
        .exiting())
}
