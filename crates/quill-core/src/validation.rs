//! Input validation for repository and file names.
//!
//! Names are checked before any engine call so that an invalid name never
//! reaches the external process or the filesystem.

use thiserror::Error;

/// Characters rejected in repository names and filenames.
pub const INVALID_NAME_CHARS: &str = "<>:\"/\\|?*";

/// Reason a repository name or filename was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Filename cannot be empty")]
    EmptyFilename,

    #[error("Filename contains invalid characters: {}", INVALID_NAME_CHARS)]
    FilenameInvalidChars,

    #[error("Filename cannot start with a dot")]
    FilenameLeadingDot,

    #[error("Repository name cannot be empty")]
    EmptyRepoName,

    #[error("Repository name contains invalid characters: {}", INVALID_NAME_CHARS)]
    RepoNameInvalidChars,

    #[error("Repository name cannot start with a dot")]
    RepoNameLeadingDot,
}

fn has_invalid_chars(name: &str) -> bool {
    name.chars().any(|c| INVALID_NAME_CHARS.contains(c))
}

/// Validate a filename.
///
/// # Example
///
/// ```
/// use quill_core::validation::{validate_filename, ValidationError};
///
/// assert!(validate_filename("notes.txt").is_ok());
/// assert_eq!(validate_filename(".env"), Err(ValidationError::FilenameLeadingDot));
/// ```
pub fn validate_filename(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }
    if has_invalid_chars(name) {
        return Err(ValidationError::FilenameInvalidChars);
    }
    if name.starts_with('.') {
        return Err(ValidationError::FilenameLeadingDot);
    }
    Ok(())
}

/// Validate a repository name.
pub fn validate_repo_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyRepoName);
    }
    if has_invalid_chars(name) {
        return Err(ValidationError::RepoNameInvalidChars);
    }
    if name.starts_with('.') {
        return Err(ValidationError::RepoNameLeadingDot);
    }
    Ok(())
}
