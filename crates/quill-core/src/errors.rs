//! Error types for quill-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::protocol::Operation;
use crate::validation::ValidationError;

/// Domain-specific errors for Quill operations.
///
/// Absence (no repository, no snapshots) is usually reported as an empty
/// result rather than an error; the variants here cover the cases where a
/// workflow cannot proceed at all.
#[derive(Error, Debug)]
pub enum QuillError {
    /// Global configuration file is invalid.
    #[error("Config invalid: {0}")]
    InvalidConfig(String),

    /// A configuration value is invalid.
    #[error("Invalid configuration: {message}. {hint}")]
    InvalidConfiguration {
        /// Description of the invalid configuration.
        message: String,
        /// Actionable hint on how to fix it.
        hint: String,
    },

    /// A repository or file name was rejected before reaching the engine.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The repository does not exist (marker file or snapshot container missing).
    #[error("Repository `{0}` not found. Run `quill open {0}` to create it.")]
    RepositoryNotFound(String),

    /// The working copy of a file does not exist in the repository.
    #[error("`{filename}` not found in repository `{repository}`.")]
    FileNotTracked {
        /// The repository that was searched.
        repository: String,
        /// The missing file.
        filename: String,
    },

    /// No snapshot has been recorded for the file yet.
    #[error("No committed version found for `{filename}` in repository `{repository}`.")]
    NoSnapshots {
        /// The repository that was searched.
        repository: String,
        /// The file without history.
        filename: String,
    },

    /// The engine reported failure (unmatched output, timeout, spawn failure).
    #[error("`{operation}` failed: {message}")]
    Engine {
        /// The operation that failed.
        operation: Operation,
        /// The engine's explanation, or a fixed fallback.
        message: String,
    },

    /// Failed to write content handed to the engine.
    #[error("Failed to write `{path}`: {message}")]
    WorkingCopyWrite {
        /// Path that could not be written.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A wrapped generic error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
