use crate::commands::{find_command, CmdResult, CommandGroup, COMMANDS};
use crate::error::{PocketError, Result};

const USAGE_WIDTH: usize = 56;

/// Grouped help for every command, or the usage of one command when
/// `topic` names it.
pub fn run(topic: &[String]) -> Result<CmdResult> {
    if topic.is_empty() {
        return Ok(CmdResult::default().with_lines(grouped_help()));
    }

    let words = topic.join(" ");
    let spec = find_command(&words).ok_or_else(|| {
        PocketError::InvalidArgument(format!("No help for unknown command \"{}\"", words))
    })?;
    Ok(CmdResult::default().with_lines(vec![
        format!("Usage: {}", spec.usage),
        format!("  {}", spec.about),
    ]))
}

fn grouped_help() -> Vec<String> {
    let mut lines = Vec::new();
    for group in CommandGroup::all() {
        let rows: Vec<_> = COMMANDS.iter().filter(|c| c.group == *group).collect();
        if rows.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(group.heading().to_string());
        for c in rows {
            lines.push(format!("  {:<width$} {}", c.usage, c.about, width = USAGE_WIDTH));
        }
    }
    lines
}
