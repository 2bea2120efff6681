//! Next-step suggestions from the current repository state.
//!
//! [`advise`] is a pure function of [`RepoFacts`]; [`observe`] gathers those
//! facts from disk. Callers decide where the suggestion is shown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolver::SnapshotResolver;

/// What is known about the current repository and file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoFacts {
    pub repository_exists: bool,
    pub filename_present: bool,
    pub working_file_exists: bool,
    pub has_snapshots: bool,
}

/// Recommended next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Suggestion {
    CreateRepository,
    EnterFilename,
    AddFile,
    Commit,
    CommitOrRevert,
}

impl Suggestion {
    /// Short imperative form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateRepository => "create or open a repository",
            Self::EnterFilename => "enter a file name",
            Self::AddFile => "add file",
            Self::Commit => "commit",
            Self::CommitOrRevert => "commit or revert",
        }
    }

    /// Full sentence for display.
    pub fn message(&self) -> &'static str {
        match self {
            Self::CreateRepository => "Create or open a repository.",
            Self::EnterFilename => "Enter a file name and add the file.",
            Self::AddFile => "Add file to create and register it.",
            Self::Commit => "Commit to save a version.",
            Self::CommitOrRevert => "You can commit changes or revert to a previous version.",
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Pick the next step. Earlier missing prerequisites take precedence.
pub fn advise(facts: &RepoFacts) -> Suggestion {
    if !facts.repository_exists {
        Suggestion::CreateRepository
    } else if !facts.filename_present {
        Suggestion::EnterFilename
    } else if !facts.working_file_exists {
        Suggestion::AddFile
    } else if !facts.has_snapshots {
        Suggestion::Commit
    } else {
        Suggestion::CommitOrRevert
    }
}

/// Collect [`RepoFacts`] for `repository` and an optional `filename`.
///
/// A blank filename counts as absent. Facts that depend on an earlier one
/// (a file inside a missing repository) are reported as `false`.
pub fn observe(resolver: &SnapshotResolver, repository: &str, filename: Option<&str>) -> RepoFacts {
    let filename = filename.map(str::trim).filter(|f| !f.is_empty());
    let repository_exists = !repository.trim().is_empty() && resolver.repository_exists(repository);

    let (working_file_exists, has_snapshots) = match filename {
        Some(file) if repository_exists => (
            resolver.working_file_exists(repository, file),
            resolver.has_snapshots(repository, file),
        ),
        _ => (false, false),
    };

    RepoFacts {
        repository_exists,
        filename_present: filename.is_some(),
        working_file_exists,
        has_snapshots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn facts(repo: bool, name: bool, file: bool, snaps: bool) -> RepoFacts {
        RepoFacts {
            repository_exists: repo,
            filename_present: name,
            working_file_exists: file,
            has_snapshots: snaps,
        }
    }

    #[test]
    fn test_advise_scenarios() {
        let table = [
            (facts(false, false, false, false), "create or open a repository"),
            (facts(true, false, false, false), "enter a file name"),
            (facts(true, true, false, false), "add file"),
            (facts(true, true, true, false), "commit"),
            (facts(true, true, true, true), "commit or revert"),
        ];
        for (facts, label) in table {
            assert_eq!(advise(&facts).label(), label, "facts: {facts:?}");
        }
    }

    #[test]
    fn test_missing_repository_dominates() {
        assert_eq!(advise(&facts(false, true, true, true)), Suggestion::CreateRepository);
        assert_eq!(advise(&facts(true, false, true, true)), Suggestion::EnterFilename);
    }

    #[test]
    fn test_suggestion_messages() {
        assert_eq!(Suggestion::Commit.to_string(), "Commit to save a version.");
        assert_eq!(
            Suggestion::CommitOrRevert.message(),
            "You can commit changes or revert to a previous version."
        );
    }

    #[test]
    fn test_observe_from_disk() {
        let temp = TempDir::new().unwrap();
        let resolver = SnapshotResolver::new(temp.path(), Vec::new());

        assert_eq!(observe(&resolver, "R", Some("a.txt")), facts(false, true, false, false));

        fs::create_dir_all(temp.path().join("R/commits")).unwrap();
        fs::write(temp.path().join("R/config.txt"), "").unwrap();
        assert_eq!(observe(&resolver, "R", Some("  ")), facts(true, false, false, false));
        assert_eq!(observe(&resolver, "R", Some("a.txt")), facts(true, true, false, false));

        fs::write(temp.path().join("R/a.txt"), "hello").unwrap();
        assert_eq!(observe(&resolver, "R", Some("a.txt")), facts(true, true, true, false));

        fs::write(temp.path().join("R/commits/a.txt.20240101120000"), "hello").unwrap();
        assert_eq!(observe(&resolver, "R", Some("a.txt")), facts(true, true, true, true));
    }
}
