//! # quill-core
//!
//! **Quill** – client core for a snapshot-based file versioning engine.
//!
//! This crate maps repositories and snapshots onto the on-disk layout kept by
//! an external engine binary, drives that binary with bounded invocations, and
//! provides the pieces a frontend needs around it: line diffs, keyword intent
//! parsing and next-step suggestions.
//!
//! ## Main Types
//!
//! - [`QuillClient`] – the frontend-facing workflows
//! - [`SnapshotResolver`] – repository and snapshot discovery on disk
//! - [`EngineAdapter`] – bounded engine invocation and output classification
//! - [`QuillError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`resolver`] – directory conventions and listings
//! - [`diff`] – line diff between snapshots and working copies
//! - [`protocol`] – engine command lines and expected output phrases
//! - [`runner`] – process execution with timeout
//! - [`adapter`] – the engine adapter
//! - [`intent`] – utterance to action mapping
//! - [`advisor`] – suggested next step
//! - [`client`] – workflows combining the above
//! - [`config`] – configuration types
//! - [`validation`] – repository and file name checks
//!
//! ## Example
//!
//! ```ignore
//! use quill_core::{QuillClient, QuillConfig, RepoOpened};
//!
//! let config = QuillConfig::load_default()?;
//! config.validate()?;
//! let client = QuillClient::from_config(&config);
//!
//! if let RepoOpened::Created(message) = client.open_or_init("Notes")? {
//!     println!("{message}");
//! }
//! client.add_file("Notes", "todo.txt", Some("buy milk"))?;
//! client.commit("Notes", "todo.txt", None, Some("first list"))?;
//!
//! println!("{}", client.suggest("Notes", Some("todo.txt")));
//! ```

// Modules
pub mod adapter;
pub mod advisor;
pub mod client;
pub mod config;
pub mod constants;
pub mod diff;
pub mod errors;
pub mod intent;
pub mod protocol;
pub mod resolver;
pub mod runner;
pub mod validation;

// Re-exports for convenience
pub use adapter::EngineAdapter;
pub use advisor::{advise, observe, RepoFacts, Suggestion};
pub use client::{DiffReport, Dispatch, DispatchContext, QuillClient, RepoOpened};
pub use config::{EngineConfig, QuillConfig};
pub use diff::{diff, DiffLine, DiffOutcome, DiffStats, LineKind, NO_DIFFERENCES};
pub use errors::QuillError;
pub use intent::{parse, Action, Intent};
pub use protocol::{CommandOutcome, Invocation, Operation, EXPECTED_PHRASES, TIMEOUT_MESSAGE};
pub use resolver::{SnapshotInfo, SnapshotResolver};
pub use runner::{CommandRunner, ProcessRunner, RawOutput, RunError};
pub use validation::{validate_filename, validate_repo_name, ValidationError};
