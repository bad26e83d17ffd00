//! # CLI Layer
//!
//! One possible UI client for pocketbook. This is the only place that reads
//! stdin, writes stdout and chooses exit codes.
//!
//! - `pocketbook add note buy milk` runs one command, saves the contacts book
//!   and exits. A failed command exits with status 1.
//! - `pocketbook` alone opens the `>>> ` prompt. It runs until an exit verb
//!   (`exit`, `close`, `good bye`) or end of input; both save before leaving.
//!
//! The data directory is `--data-dir`, else `$POCKETBOOK_HOME`, else the
//! platform data directory.

mod render;
mod setup;
mod styles;

use self::render::print_result;
use self::setup::Cli;
use clap::Parser;
use directories::ProjectDirs;
use log::{debug, warn};
use pocketbook::api::PocketApi;
use pocketbook::commands::MessageLevel;
use pocketbook::config::PocketConfig;
use pocketbook::error::{PocketError, Result};
use pocketbook::store::fs::FileStore;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const HOME_ENV: &str = "POCKETBOOK_HOME";
const PROMPT: &str = ">>> ";

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = resolve_data_dir(cli.data_dir)?;
    debug!("data directory: {}", data_dir.display());
    let config = load_config(&data_dir);
    let store = FileStore::in_dir(&data_dir, &config.contacts_file, &config.notes_file);
    let (mut api, opened) = PocketApi::open(store, config, Some(data_dir))?;

    if cli.command.is_empty() {
        print_result(&opened);
        repl(&mut api)
    } else {
        one_shot(&mut api, &cli.command.join(" "))
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "pocketbook", "pocketbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            PocketError::InvalidArgument(format!(
                "Could not determine a data directory, use --data-dir or set {}",
                HOME_ENV
            ))
        })
}

fn load_config(data_dir: &Path) -> PocketConfig {
    PocketConfig::load(data_dir).unwrap_or_else(|e| {
        warn!("ignoring unreadable config in {}: {}", data_dir.display(), e);
        PocketConfig::default()
    })
}

fn one_shot(api: &mut PocketApi<FileStore>, line: &str) -> Result<()> {
    let result = api.run_line(line, &mut stdin_confirm);
    print_result(&result);
    if !result.exit {
        api.save()?;
    }
    if result
        .messages
        .iter()
        .any(|m| m.level == MessageLevel::Error)
    {
        std::process::exit(1);
    }
    Ok(())
}

fn repl(api: &mut PocketApi<FileStore>) -> Result<()> {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            println!();
            let saved = api.save()?;
            print_result(&saved);
            return Ok(());
        }

        let result = api.run_line(&line, &mut stdin_confirm);
        print_result(&result);
        if result.exit {
            return Ok(());
        }
    }
}

/// "y" proceeds; anything else, including end of input, declines.
fn stdin_confirm(prompt: &str) -> bool {
    print!("{} ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().read_line(&mut answer) {
        Ok(_) => answer.trim() == "y",
        Err(_) => false,
    }
}
