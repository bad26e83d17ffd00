use crate::commands::{CmdMessage, CmdResult};
use crate::directory::{BirthdayGroup, BirthdayRollover, ContactDirectory};
use crate::error::{PocketError, Result};
use crate::validate::DATE_FORMAT;
use chrono::NaiveDate;

/// Parses the optional `[days]` argument.
pub fn parse_window(arg: Option<&str>, default: u32) -> Result<u32> {
    match arg {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            PocketError::InvalidArgument(format!(
                "The number of days must be a non-negative whole number, got '{}'",
                raw
            ))
        }),
    }
}

pub fn run(
    dir: &ContactDirectory,
    window_days: u32,
    today: NaiveDate,
    rollover: BirthdayRollover,
) -> Result<CmdResult> {
    let groups = dir.upcoming_birthdays(window_days, today, rollover);
    let message = if groups.is_empty() {
        CmdMessage::info(format!("No birthdays in the next {} days", window_days))
    } else {
        let people: usize = groups.iter().map(|g| g.names.len()).sum();
        CmdMessage::success(format!(
            "{} birthday(s) in the next {} days",
            people, window_days
        ))
    };
    Ok(CmdResult::default()
        .with_birthdays(groups)
        .with_message(message))
}

/// `15.06.2024 (Saturday): Alice, Bob`
pub fn format_group(group: &BirthdayGroup) -> String {
    format!(
        "{} ({}): {}",
        group.date.format(DATE_FORMAT),
        group.date.format("%A"),
        group.names.join(", ")
    )
}
