//! Integration contract with the external engine.
//!
//! The engine reports success only through free text on stdout; its exit
//! status carries no meaning. Each mutating operation is recognised by one
//! expected phrase, and all of them live in [`EXPECTED_PHRASES`]. An engine
//! release that rewords any of these messages must be matched by an edit to
//! that table and nowhere else.
//!
//! | Operation  | Command line                                   | Expected stdout phrase             |
//! |------------|------------------------------------------------|------------------------------------|
//! | `init`     | `myvcs init <repo>`                            | `Initialized empty VCS repository` |
//! | `add`      | `myvcs add <repo> <file>`                      | `added to repository`              |
//! | `commit`   | `myvcs commit <repo> <file> [message]`         | `committed`                        |
//! | `revert`   | `myvcs revert <repo> <file> [tag]`             | `reverted`                         |
//! | `checkout` | `myvcs checkout <repo> <file>`                 | `checked out`                      |
//! | `status`   | `myvcs status <repo>`                          | (text passthrough)                 |
//! | `log`      | `myvcs log <repo> [file]`                      | (text passthrough)                 |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Message returned when an invocation exceeds its time budget.
pub const TIMEOUT_MESSAGE: &str = "Command timed out";

/// Operations understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Init,
    Add,
    Commit,
    Revert,
    Checkout,
    Status,
    Log,
}

/// Expected stdout phrase per mutating operation.
///
/// `status` and `log` are absent: their output is returned verbatim.
pub const EXPECTED_PHRASES: &[(Operation, &str)] = &[
    (Operation::Init, "Initialized empty VCS repository"),
    (Operation::Add, "added to repository"),
    (Operation::Commit, "committed"),
    (Operation::Revert, "reverted"),
    (Operation::Checkout, "checked out"),
];

/// Fallback failure message per mutating operation, used when stderr is empty.
pub const FALLBACK_MESSAGES: &[(Operation, &str)] = &[
    (Operation::Init, "Failed to create repository"),
    (Operation::Add, "Failed to add file"),
    (Operation::Commit, "Failed to commit file"),
    (Operation::Revert, "Failed to revert file"),
    (Operation::Checkout, "Failed to checkout file"),
];

const GENERIC_FALLBACK: &str = "Command failed";

impl Operation {
    /// All operations, in command-line keyword order.
    pub const ALL: [Operation; 7] = [
        Self::Init,
        Self::Add,
        Self::Commit,
        Self::Revert,
        Self::Checkout,
        Self::Status,
        Self::Log,
    ];

    /// The command-line keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Add => "add",
            Self::Commit => "commit",
            Self::Revert => "revert",
            Self::Checkout => "checkout",
            Self::Status => "status",
            Self::Log => "log",
        }
    }

    /// The phrase whose presence in stdout means success, if this operation
    /// is classified at all.
    pub fn expected_phrase(&self) -> Option<&'static str> {
        EXPECTED_PHRASES
            .iter()
            .find(|(op, _)| op == self)
            .map(|(_, phrase)| *phrase)
    }

    /// Message used for a failure that produced no stderr.
    pub fn fallback_message(&self) -> &'static str {
        FALLBACK_MESSAGES
            .iter()
            .find(|(op, _)| op == self)
            .map(|(_, msg)| *msg)
            .unwrap_or(GENERIC_FALLBACK)
    }

    /// `status` and `log` return text instead of a success flag.
    pub fn is_passthrough(&self) -> bool {
        self.expected_phrase().is_none()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.keyword() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown operation: '{}'", s))
    }
}

// ============================================================================
// Invocation
// ============================================================================

/// Positional parameters for one engine call.
///
/// Rendered as `<op> <repository> [filename] [extra]`; `extra` is only
/// emitted together with a filename.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    pub repository: String,
    pub filename: Option<String>,
    /// Commit message or revert target tag.
    pub extra: Option<String>,
}

impl Invocation {
    /// Invocation addressing a whole repository.
    pub fn repo(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    /// Invocation addressing one file.
    pub fn file(repository: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            filename: Some(filename.into()),
            extra: None,
        }
    }

    /// Attach a trailing token. Empty strings are dropped.
    pub fn with_extra(mut self, extra: Option<&str>) -> Self {
        self.extra = extra.filter(|e| !e.is_empty()).map(str::to_string);
        self
    }

    /// Arguments passed to the engine after the executable.
    pub fn args(&self, operation: Operation) -> Vec<String> {
        let mut args = vec![operation.keyword().to_string(), self.repository.clone()];
        if let Some(filename) = self.filename.as_deref().filter(|f| !f.is_empty()) {
            args.push(filename.to_string());
            if let Some(extra) = &self.extra {
                args.push(extra.clone());
            }
        }
        args
    }
}

// ============================================================================
// CommandOutcome
// ============================================================================

/// Classified result of a mutating engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    /// Engine text on success; engine error text or a fixed fallback on failure.
    /// Never empty.
    pub message: String,
}

impl CommandOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Classify captured output for `operation`.
    ///
    /// Success means stdout contains the expected phrase; the exit status is
    /// deliberately not consulted.
    pub fn classify(operation: Operation, stdout: &str, stderr: &str) -> Self {
        let stdout = stdout.trim();
        let stderr = stderr.trim();
        let matched = operation
            .expected_phrase()
            .is_some_and(|phrase| stdout.contains(phrase));

        if matched {
            Self::ok(stdout)
        } else if stderr.is_empty() {
            Self::failed(operation.fallback_message())
        } else {
            Self::failed(stderr)
        }
    }
}

/// Text result for `status`/`log`: stdout if non-empty, else stderr.
pub fn passthrough_text(stdout: &str, stderr: &str) -> String {
    let stdout = stdout.trim();
    if stdout.is_empty() {
        stderr.trim().to_string()
    } else {
        stdout.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mutating_operation_has_phrase_and_fallback() {
        for op in Operation::ALL {
            if op.is_passthrough() {
                assert!(matches!(op, Operation::Status | Operation::Log));
            } else {
                assert!(op.expected_phrase().is_some());
                assert_ne!(op.fallback_message(), GENERIC_FALLBACK);
            }
        }
    }

    #[test]
    fn test_operation_round_trip_keyword() {
        assert_eq!("COMMIT".parse::<Operation>().unwrap(), Operation::Commit);
        assert!("push".parse::<Operation>().is_err());
        assert_eq!(Operation::Checkout.to_string(), "checkout");
    }

    #[test]
    fn test_invocation_args() {
        assert_eq!(Invocation::repo("R").args(Operation::Init), vec!["init", "R"]);
        assert_eq!(
            Invocation::file("R", "a.txt").args(Operation::Add),
            vec!["add", "R", "a.txt"]
        );
        assert_eq!(
            Invocation::file("R", "a.txt")
                .with_extra(Some("fix typo"))
                .args(Operation::Commit),
            vec!["commit", "R", "a.txt", "fix typo"]
        );
        assert_eq!(
            Invocation::file("R", "a.txt")
                .with_extra(Some(""))
                .args(Operation::Revert),
            vec!["revert", "R", "a.txt"]
        );
    }

    #[test]
    fn test_invocation_extra_requires_filename() {
        let inv = Invocation::repo("R").with_extra(Some("dangling"));
        assert_eq!(inv.args(Operation::Log), vec!["log", "R"]);
    }

    #[test]
    fn test_classify_success_ignores_exit_status_and_stderr() {
        let outcome = CommandOutcome::classify(
            Operation::Init,
            "Created: R\nInitialized empty VCS repository in R\n",
            "warning: something",
        );
        assert!(outcome.success);
        assert!(outcome.message.ends_with("Initialized empty VCS repository in R"));
    }

    #[test]
    fn test_classify_failure_prefers_stderr() {
        let outcome = CommandOutcome::classify(Operation::Add, "", "File not found: a.txt\n");
        assert_eq!(outcome, CommandOutcome::failed("File not found: a.txt"));
    }

    #[test]
    fn test_classify_failure_fallback() {
        let outcome = CommandOutcome::classify(Operation::Revert, "something else", "  ");
        assert_eq!(outcome, CommandOutcome::failed("Failed to revert file"));
    }

    #[test]
    fn test_passthrough_text() {
        assert_eq!(passthrough_text("out\n", "err"), "out");
        assert_eq!(passthrough_text("", "err\n"), "err");
        assert_eq!(passthrough_text("", ""), "");
    }
}
