use clap::Parser;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "pocketbook",
    bin_name = "pocketbook",
    version = get_version(),
    after_help = "Run without a command for the interactive prompt. Type `help` there for the command list."
)]
#[command(about = "Contacts book and timestamped notes in your terminal", long_about = None)]
pub struct Cli {
    /// Directory holding the contacts, notes and config files
    #[arg(long, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, help_heading = "Options")]
    pub verbose: bool,

    /// A single command to run, e.g. `add note buy milk`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_command_means_interactive() {
        let cli = Cli::try_parse_from(["pocketbook"]).unwrap();
        assert!(cli.command.is_empty());
        assert!(!cli.verbose);
        assert!(cli.data_dir.is_none());
    }

    #[test]
    fn trailing_words_form_the_command() {
        let cli = Cli::try_parse_from([
            "pocketbook",
            "--data-dir",
            "/tmp/pb",
            "-v",
            "change",
            "note",
            "01.06.2024",
            "-",
            "10:00:00",
            "new",
            "text",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/pb")));
        assert!(cli.verbose);
        assert_eq!(
            cli.command.join(" "),
            "change note 01.06.2024 - 10:00:00 new text"
        );
    }
}
