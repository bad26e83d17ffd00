use crate::commands::{CmdMessage, CmdResult};
use crate::config::{PocketConfig, CONFIG_KEYS};
use crate::error::Result;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

impl ConfigAction {
    pub fn from_args(args: &[String]) -> Self {
        match args {
            [] => ConfigAction::ShowAll,
            [key] => ConfigAction::ShowKey(key.clone()),
            [key, value, ..] => ConfigAction::Set(key.clone(), value.clone()),
        }
    }
}

/// Shows or edits `config`. Changes are saved to `config_dir` when there is
/// one; file name changes take effect on the next start.
pub fn run(
    config: &mut PocketConfig,
    config_dir: Option<&Path>,
    action: ConfigAction,
) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let mut lines = Vec::with_capacity(CONFIG_KEYS.len());
            for key in CONFIG_KEYS {
                lines.push(format!("{} = {}", key, config.get(key)?));
            }
            Ok(CmdResult::default().with_lines(lines))
        }
        ConfigAction::ShowKey(key) => {
            let value = config.get(&key)?;
            Ok(CmdResult::default().with_lines(vec![format!("{} = {}", key, value)]))
        }
        ConfigAction::Set(key, value) => {
            let mut updated = config.clone();
            updated.set(&key, &value)?;
            if let Some(dir) = config_dir {
                updated.save(dir)?;
            }
            *config = updated;

            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key,
                config.get(&key)?
            )));
            if key.ends_with("-file") {
                result.add_message(CmdMessage::info("The new file is used from the next start."));
            }
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PocketError;

    fn args(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn action_from_args() {
        assert!(matches!(ConfigAction::from_args(&[]), ConfigAction::ShowAll));
        assert!(matches!(
            ConfigAction::from_args(&args(&["birthday-window"])),
            ConfigAction::ShowKey(k) if k == "birthday-window"
        ));
        assert!(matches!(
            ConfigAction::from_args(&args(&["birthday-window", "3"])),
            ConfigAction::Set(k, v) if k == "birthday-window" && v == "3"
        ));
    }

    #[test]
    fn show_all_lists_every_key() {
        let mut config = PocketConfig::default();
        let result = run(&mut config, None, ConfigAction::ShowAll).unwrap();
        assert_eq!(result.lines.len(), CONFIG_KEYS.len());
        assert!(result.lines.contains(&"birthday-window = 7".to_string()));
    }

    #[test]
    fn set_persists_to_the_config_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut config = PocketConfig::default();
        let action = ConfigAction::Set("birthday-window".into(), "10".into());
        let result = run(&mut config, Some(temp_dir.path()), action).unwrap();

        assert_eq!(result.messages[0].content, "birthday-window set to 10");
        assert_eq!(config.birthday_window, 10);
        assert_eq!(
            PocketConfig::load(temp_dir.path()).unwrap().birthday_window,
            10
        );
    }

    #[test]
    fn bad_value_keeps_config() {
        let mut config = PocketConfig::default();
        let action = ConfigAction::Set("birthday-window".into(), "soon".into());
        assert!(matches!(
            run(&mut config, None, action),
            Err(PocketError::InvalidArgument(_))
        ));
        assert_eq!(config, PocketConfig::default());
    }

    #[test]
    fn file_changes_mention_restart() {
        let mut config = PocketConfig::default();
        let action = ConfigAction::Set("notes-file".into(), "journal.txt".into());
        let result = run(&mut config, None, action).unwrap();
        assert_eq!(result.messages.len(), 2);
    }
}
