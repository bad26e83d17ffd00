//! # Rendering
//!
//! Turns a [`CmdResult`] into terminal output. Layout (column widths,
//! truncation) is computed on plain strings with `unicode-width`; styling is
//! applied last so ANSI codes never skew the alignment.

use super::styles;
use colored::Colorize;
use console::Term;
use pocketbook::commands::birthdays::format_group;
use pocketbook::commands::{CmdMessage, CmdResult, MessageLevel};
use pocketbook::model::{Record, NOTE_ID_LEN, PLACEHOLDER};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const COLUMNS: [&str; 5] = ["Name", "Phones", "Email", "Birthday", "Address"];
const GAP: &str = "  ";

pub fn print_result(result: &CmdResult) {
    for line in &result.lines {
        if line.ends_with(':') && !line.starts_with(' ') {
            println!("{}", styles::HEADING.apply_to(line));
        } else {
            println!("{}", line);
        }
    }
    print_records(&result.records);
    for group in &result.birthdays {
        let text = format_group(group);
        match text.split_once(": ") {
            Some((date, names)) => println!("{}: {}", styles::BIRTHDAY_DATE.apply_to(date), names),
            None => println!("{}", text),
        }
    }
    print_note_lines(&result.note_lines);
    print_messages(&result.messages);
}

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_records(records: &[Record]) {
    if records.is_empty() {
        return;
    }
    let rows: Vec<[String; 5]> = records.iter().map(record_row).collect();
    let widths = column_widths(&rows);

    let header: Vec<String> = COLUMNS
        .iter()
        .zip(widths)
        .map(|(title, w)| styles::HEADER.apply_to(pad_to(title, w)).to_string())
        .collect();
    println!("{}", header.join(GAP).trim_end());

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = pad_to(cell, w);
                if i == 0 {
                    styles::NAME.apply_to(padded).to_string()
                } else if cell == PLACEHOLDER {
                    styles::PLACEHOLDER.apply_to(padded).to_string()
                } else {
                    padded
                }
            })
            .collect();
        println!("{}", cells.join(GAP).trim_end());
    }
}

/// Note lines as stored, with the identifier highlighted. Bodies are cut to
/// the terminal width when stdout is a terminal.
fn print_note_lines(lines: &[String]) {
    let width = Term::stdout().size_checked().map(|(_, cols)| cols as usize);
    for line in lines {
        let shown = match width {
            Some(w) => truncate_to_width(line, w),
            None => line.clone(),
        };
        match (shown.get(..NOTE_ID_LEN), shown.get(NOTE_ID_LEN..)) {
            (Some(id), Some(rest)) => println!("{}{}", styles::NOTE_ID.apply_to(id), rest),
            _ => println!("{}", shown),
        }
    }
}

fn record_row(record: &Record) -> [String; 5] {
    let phones = if record.phones().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        record.phones().join(", ")
    };
    [
        record.name().to_string(),
        phones,
        record.email().unwrap_or(PLACEHOLDER).to_string(),
        record.birthday().unwrap_or(PLACEHOLDER).to_string(),
        record.address().unwrap_or(PLACEHOLDER).to_string(),
    ]
}

fn column_widths(rows: &[[String; 5]]) -> [usize; 5] {
    let mut widths = COLUMNS.map(|title| title.width());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width());
        }
    }
    widths
}

fn pad_to(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
