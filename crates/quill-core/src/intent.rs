//! Keyword matching of free-form utterances to workflow actions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workflow an utterance maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Init,
    Add,
    Update,
    Commit,
    Revert,
    Status,
    Log,
    Unknown,
}

/// Trigger phrases, checked in order. The first action with any trigger
/// contained in the utterance wins, so `save version` resolves to
/// [`Action::Update`] and `revert to last save` to [`Action::Revert`].
pub const TRIGGERS: &[(Action, &[&str])] = &[
    (Action::Init, &["init", "initialize", "create repository"]),
    (Action::Add, &["add", "add file"]),
    (Action::Revert, &["revert", "restore", "rollback"]),
    (Action::Update, &["update", "update content", "save"]),
    (Action::Commit, &["commit", "commit file", "save version"]),
    (Action::Status, &["status", "show status"]),
    (Action::Log, &["log", "history", "show log"]),
];

const UNKNOWN_HINT: &str = "Try saying: init, add, update, commit, or revert.";

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Add => "add",
            Self::Update => "update",
            Self::Commit => "commit",
            Self::Revert => "revert",
            Self::Status => "status",
            Self::Log => "log",
            Self::Unknown => "unknown",
        }
    }

    /// Guidance shown when an utterance is not understood.
    pub fn hint() -> &'static str {
        UNKNOWN_HINT
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "init" => Ok(Self::Init),
            "add" => Ok(Self::Add),
            "update" => Ok(Self::Update),
            "commit" => Ok(Self::Commit),
            "revert" => Ok(Self::Revert),
            "status" => Ok(Self::Status),
            "log" => Ok(Self::Log),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("Unknown action: '{}'", other)),
        }
    }
}

/// A parsed utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub action: Action,
    /// Trimmed, lowercased input.
    pub utterance: String,
}

impl Intent {
    pub fn is_unknown(&self) -> bool {
        self.action == Action::Unknown
    }
}

/// Map an utterance to an [`Intent`].
///
/// ```
/// use quill_core::intent::{parse, Action};
///
/// assert_eq!(parse("  Please COMMIT this ").action, Action::Commit);
/// assert_eq!(parse("sing a song").action, Action::Unknown);
/// ```
pub fn parse(utterance: &str) -> Intent {
    let normalized = utterance.trim().to_lowercase();
    let action = TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| normalized.contains(t)))
        .map(|(action, _)| *action)
        .unwrap_or(Action::Unknown);

    tracing::debug!(%action, utterance = %normalized, "parsed utterance");
    Intent {
        action,
        utterance: normalized,
    }
}
