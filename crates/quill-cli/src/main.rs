//! # quill CLI
//!
//! Command-line interface for Quill.
//!
//! This binary provides human-friendly access to `quill-core` functionality.
//! Run `quill --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}
