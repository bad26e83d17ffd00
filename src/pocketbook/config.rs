use crate::directory::BirthdayRollover;
use crate::error::{PocketError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_CONTACTS_FILE: &str = "contacts.json";
const DEFAULT_NOTES_FILE: &str = "notes.txt";
const DEFAULT_BIRTHDAY_WINDOW: u32 = 7;

/// Keys accepted by the `config` command, in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "contacts-file",
    "notes-file",
    "birthday-window",
    "birthday-rollover",
];

/// Configuration for pocketbook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PocketConfig {
    /// File name of the contacts blob, relative to the data directory
    #[serde(default = "default_contacts_file")]
    pub contacts_file: String,

    /// File name of the notes log, relative to the data directory
    #[serde(default = "default_notes_file")]
    pub notes_file: String,

    /// Days ahead `coming birthday` looks when no argument is given
    #[serde(default = "default_birthday_window")]
    pub birthday_window: u32,

    #[serde(default)]
    pub birthday_rollover: BirthdayRollover,
}

fn default_contacts_file() -> String {
    DEFAULT_CONTACTS_FILE.to_string()
}

fn default_notes_file() -> String {
    DEFAULT_NOTES_FILE.to_string()
}

fn default_birthday_window() -> u32 {
    DEFAULT_BIRTHDAY_WINDOW
}

impl Default for PocketConfig {
    fn default() -> Self {
        Self {
            contacts_file: default_contacts_file(),
            notes_file: default_notes_file(),
            birthday_window: DEFAULT_BIRTHDAY_WINDOW,
            birthday_rollover: BirthdayRollover::default(),
        }
    }
}

impl PocketConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(PocketError::Io)?;
        let config: PocketConfig =
            serde_json::from_str(&content).map_err(PocketError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(PocketError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(PocketError::Serialization)?;
        fs::write(config_path, content).map_err(PocketError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "contacts-file" => Ok(self.contacts_file.clone()),
            "notes-file" => Ok(self.notes_file.clone()),
            "birthday-window" => Ok(self.birthday_window.to_string()),
            "birthday-rollover" => Ok(self.birthday_rollover.as_str().to_string()),
            other => Err(unknown_key(other)),
        }
    }

    /// Sets one key from its text form. The config is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "contacts-file" => self.contacts_file = file_name(key, value)?,
            "notes-file" => self.notes_file = file_name(key, value)?,
            "birthday-window" => {
                self.birthday_window = value.parse().map_err(|_| {
                    PocketError::InvalidArgument(format!(
                        "birthday-window must be a whole number of days, got '{}'",
                        value
                    ))
                })?
            }
            "birthday-rollover" => self.birthday_rollover = value.parse()?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn file_name(key: &str, value: &str) -> Result<String> {
    let components: Vec<_> = Path::new(value).components().collect();
    if value.trim().is_empty() || !matches!(components.as_slice(), [Component::Normal(_)]) {
        return Err(PocketError::InvalidArgument(format!(
            "{} must be a plain file name, got '{}'",
            key, value
        )));
    }
    Ok(value.to_string())
}

fn unknown_key(key: &str) -> PocketError {
    PocketError::InvalidArgument(format!(
        "Unknown config key '{}' (known keys: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
