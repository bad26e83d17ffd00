//! # Pocketbook Architecture
//!
//! Pocketbook is a personal contacts book and timestamped notes log. It is a
//! library with a thin command-line client, not the other way round.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, runs the >>> loop, prints results      │
//! │  - The ONLY place that knows about stdin/stdout/exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: dispatches a parsed command line            │
//! │  - Turns every failure into a message at run_line           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One function per verb, returns CmdResult                 │
//! │  - The static command table and its parser                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engines (directory.rs, notes.rs) over model.rs             │
//! │  - ContactDirectory: keyed Records, birthday window query   │
//! │  - NotesLog: file-backed, one timestamped note per line     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - ContactStore / NoteStore traits                          │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns
//! `Result<CmdResult>`. It never writes to stdout or stderr and never calls
//! `std::process::exit`. The one question the core asks the user (confirming an
//! empty note body) goes through the [`notes::Confirm`] trait.
//!
//! ## Testing Strategy
//!
//! 1. **Engines and commands**: thorough unit tests against `InMemoryStore`.
//! 2. **API**: dispatch tests, checking arguments reach the right command.
//! 3. **Store**: `FileStore` tests in temp directories.
//! 4. **CLI**: end-to-end runs of the binary in `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade
//! - [`commands`]: per-verb logic and the command table
//! - [`directory`]: the contacts book
//! - [`notes`]: the notes log
//! - [`model`]: `Record`, `NoteId`, `NoteEntry`
//! - [`validate`]: phone, email and date rules
//! - [`store`]: persistence
//! - [`config`]: `config.json` settings
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod directory;
pub mod error;
pub mod model;
pub mod notes;
pub mod store;
pub mod validate;
