//! Common constants used throughout quill-core.
//!
//! This module centralizes the on-disk naming convention shared with the
//! external engine: marker file, snapshot container, separator and message
//! suffix. Changing any of these breaks compatibility with existing
//! repositories.

// ============================================================================
// Repository Layout
// ============================================================================

/// The marker file that identifies a repository directory.
///
/// Written by the engine on `init`. Also excluded from file listings.
pub const MARKER_FILENAME: &str = "config.txt";

/// The snapshot container directory inside a repository.
///
/// Layout: `<repo>/commits/<filename>.<version_tag>`
pub const SNAPSHOT_DIR: &str = "commits";

/// Separator between a filename and its version tag.
pub const TAG_SEPARATOR: char = '.';

/// Suffix of the per-snapshot message artifact.
///
/// Layout: `<repo>/commits/<filename>.<version_tag>.msg`
pub const MESSAGE_SUFFIX: &str = ".msg";

/// Suffix the engine appends to files restored by `checkout`.
pub const CHECKOUT_SUFFIX: &str = ".decrypted";

// ============================================================================
// Ignore Patterns
// ============================================================================

/// Default name fragments that exclude an entry from listings.
///
/// Matching is by substring, so `.git` also hides `.github` and `.gitignore`.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["__pycache__", ".git", ".vscode", "node_modules"];

/// Check if a name matches any of the given ignore patterns.
///
/// # Arguments
///
/// * `name` - The file or directory name to check (not a full path).
/// * `patterns` - Substrings that mark a name as ignored.
#[inline]
pub fn is_ignored(name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| name.contains(pattern.as_str()))
}

/// Check if a name is a snapshot message artifact.
#[inline]
pub fn is_message_artifact(name: &str) -> bool {
    name.ends_with(MESSAGE_SUFFIX)
}

// ============================================================================
// Engine Defaults
// ============================================================================

/// Default path to the external engine executable.
pub const DEFAULT_ENGINE_EXECUTABLE: &str = "./myvcs";

/// Default wall-clock timeout for one engine invocation, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default repository name used when none is selected.
pub const DEFAULT_REPOSITORY: &str = "MyRepo";

// ============================================================================
// Configuration Filenames
// ============================================================================

/// The name of the global Quill configuration directory (`~/.quill`).
pub const QUILL_HOME_DIR: &str = ".quill";

/// The name of the global configuration file.
pub const GLOBAL_CONFIG_FILENAME: &str = "config.yaml";

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_ignored() {
        let patterns = defaults();
        assert!(is_ignored(".git", &patterns));
        assert!(is_ignored("node_modules", &patterns));
        assert!(is_ignored("src__pycache__", &patterns));
        assert!(!is_ignored("MyRepo", &patterns));
        assert!(!is_ignored("notes.txt", &patterns));
    }

    #[test]
    fn test_is_ignored_empty_patterns() {
        assert!(!is_ignored(".git", &[]));
    }

    #[test]
    fn test_is_message_artifact() {
        assert!(is_message_artifact("a.txt.20240101120000.msg"));
        assert!(!is_message_artifact("a.txt.20240101120000"));
        assert!(!is_message_artifact("msg"));
    }
}
