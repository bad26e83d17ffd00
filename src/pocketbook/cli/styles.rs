use console::Style;
use once_cell::sync::Lazy;

pub static HEADER: Lazy<Style> = Lazy::new(|| Style::new().bold().underlined());
pub static NAME: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static PLACEHOLDER: Lazy<Style> = Lazy::new(|| Style::new().dim());
pub static NOTE_ID: Lazy<Style> = Lazy::new(|| Style::new().yellow());
pub static BIRTHDAY_DATE: Lazy<Style> = Lazy::new(|| Style::new().cyan());
pub static HEADING: Lazy<Style> = Lazy::new(|| Style::new().bold());
