use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::NoteId;
use crate::notes::{find_in, ChangeOutcome, Confirm, NoteQuery, NotesLog};
use crate::store::NoteStore;
use chrono::NaiveDateTime;

pub fn add<S: NoteStore>(store: &mut S, body: &str, now: NaiveDateTime) -> Result<CmdResult> {
    let entry = NotesLog::new(store).add_at(body, now)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Note added ({})",
        entry.id
    ))))
}

pub fn find<S: NoteStore>(store: &S, query: &NoteQuery, now: NaiveDateTime) -> Result<CmdResult> {
    let outcome = find_in(store, query, now)?;
    let mut result = CmdResult::default();
    if outcome.skipped > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} unreadable line(s) in the notes file were skipped",
            outcome.skipped
        )));
    }
    result.add_message(if outcome.found() {
        CmdMessage::success("note found")
    } else {
        CmdMessage::info("no note found")
    });
    Ok(result.with_note_lines(outcome.lines))
}

pub fn change<S: NoteStore>(
    store: &mut S,
    id: &NoteId,
    body: &str,
    confirm: &mut dyn Confirm,
) -> Result<CmdResult> {
    let message = match NotesLog::new(store).change(id, body, confirm)? {
        ChangeOutcome::Changed => CmdMessage::success("note changed"),
        ChangeOutcome::NotFound => CmdMessage::info("no note changed"),
        ChangeOutcome::Cancelled => CmdMessage::info("no note changed (cancelled)"),
    };
    Ok(CmdResult::default().with_message(message))
}

pub fn delete<S: NoteStore>(store: &mut S, id: &NoteId) -> Result<CmdResult> {
    let message = if NotesLog::new(store).delete(id)? {
        CmdMessage::success("note deleted")
    } else {
        CmdMessage::info("no note deleted")
    };
    Ok(CmdResult::default().with_message(message))
}

/// Tagging is declared in the command table but does nothing yet.
pub fn tag() -> Result<CmdResult> {
    Ok(CmdResult::default().with_message(CmdMessage::warning(
        "Tagging notes is not supported yet",
    )))
}
