use crate::commands::{CmdMessage, CmdResult};
use crate::directory::ContactDirectory;
use crate::error::Result;
use crate::model::Record;

/// Which optional text field a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Address,
    Birthday,
    Email,
}

impl Field {
    fn label(&self) -> &'static str {
        match self {
            Field::Address => "address",
            Field::Birthday => "birthday",
            Field::Email => "email",
        }
    }

    fn set(&self, record: &mut Record, value: &str) -> Result<()> {
        match self {
            Field::Address => record.set_address(value),
            Field::Birthday => record.set_birthday(value),
            Field::Email => record.set_email(value),
        }
    }

    fn clear(&self, record: &mut Record) -> Option<String> {
        match self {
            Field::Address => record.clear_address(),
            Field::Birthday => record.clear_birthday(),
            Field::Email => record.clear_email(),
        }
    }
}

pub fn add(dir: &mut ContactDirectory, name: &str) -> Result<CmdResult> {
    dir.add(name)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Contact \"{}\" has been added",
        name
    ))))
}

pub fn remove(dir: &mut ContactDirectory, name: &str) -> Result<CmdResult> {
    dir.remove(name)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Contact \"{}\" has been removed",
        name
    ))))
}

pub fn set_field(
    dir: &mut ContactDirectory,
    name: &str,
    field: Field,
    value: &str,
) -> Result<CmdResult> {
    field.set(dir.get_mut(name)?, value)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "The {} of {} has been set to {}",
        field.label(),
        name,
        value
    ))))
}

pub fn clear_field(dir: &mut ContactDirectory, name: &str, field: Field) -> Result<CmdResult> {
    let message = match field.clear(dir.get_mut(name)?) {
        Some(old) => CmdMessage::success(format!(
            "The {} {} of {} has been deleted",
            field.label(),
            old,
            name
        )),
        None => CmdMessage::info(format!("{} has no {} to delete", name, field.label())),
    };
    Ok(CmdResult::default().with_message(message))
}

pub fn add_phone(dir: &mut ContactDirectory, name: &str, phone: &str) -> Result<CmdResult> {
    dir.get_mut(name)?.add_phone(phone)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Phone number {} has been added to {}",
        phone, name
    ))))
}

pub fn remove_phone(dir: &mut ContactDirectory, name: &str, phone: &str) -> Result<CmdResult> {
    dir.get_mut(name)?.remove_phone(phone)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Phone number {} has been deleted from {}",
        phone, name
    ))))
}

pub fn change_phone(
    dir: &mut ContactDirectory,
    name: &str,
    old: &str,
    new: &str,
) -> Result<CmdResult> {
    dir.get_mut(name)?.replace_phone(old, new)?;
    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Phone number {} of {} has been changed to {}",
        old, name, new
    ))))
}

pub fn show(dir: &ContactDirectory, name: &str) -> Result<CmdResult> {
    let record = dir.get(name)?.clone();
    Ok(CmdResult::default().with_records(vec![record]))
}

pub fn list(dir: &ContactDirectory) -> Result<CmdResult> {
    let records: Vec<Record> = dir.records().cloned().collect();
    let result = CmdResult::default().with_records(records);
    if dir.is_empty() {
        return Ok(result.with_message(CmdMessage::info("The contacts book is empty")));
    }
    Ok(result)
}

pub fn search(dir: &ContactDirectory, needle: &str) -> Result<CmdResult> {
    let records: Vec<Record> = dir.search(needle).into_iter().cloned().collect();
    let message = match records.len() {
        0 => CmdMessage::info(format!("No contacts match \"{}\"", needle)),
        1 => CmdMessage::success("1 contact found"),
        n => CmdMessage::success(format!("{} contacts found", n)),
    };
    Ok(CmdResult::default()
        .with_records(records)
        .with_message(message))
}
