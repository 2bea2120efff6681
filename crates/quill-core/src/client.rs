//! High-level workflows over a snapshot root and the external engine.
//!
//! [`QuillClient`] is what frontends talk to. Each workflow validates its
//! input before anything reaches the engine and reports problems as
//! [`QuillError`] values.

use std::fs;

use serde::{Deserialize, Serialize};

use crate::adapter::EngineAdapter;
use crate::advisor::{advise, observe, Suggestion};
use crate::config::QuillConfig;
use crate::diff::{diff, DiffOutcome};
use crate::errors::QuillError;
use crate::intent::{parse, Action, Intent};
use crate::protocol::{CommandOutcome, Invocation, Operation};
use crate::resolver::SnapshotResolver;
use crate::validation::{validate_filename, validate_repo_name};

// ============================================================================
// Result types
// ============================================================================

/// Result of [`QuillClient::open_or_init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "camelCase")]
pub enum RepoOpened {
    /// The repository already existed.
    Opened,
    /// The engine created it; carries the engine's confirmation.
    Created(String),
}

/// Comparison of the latest snapshot against the working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DiffReport {
    /// Nothing has been committed yet.
    NoSnapshot,
    Compared { tag: String, diff: DiffOutcome },
}

/// Inputs an utterance is interpreted against.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    pub repository: String,
    pub filename: Option<String>,
    /// Content for `update`/`commit`. `update` falls back to the working copy.
    pub content: Option<String>,
    /// Commit message.
    pub message: Option<String>,
}

/// Outcome of [`QuillClient::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub intent: Intent,
    pub success: bool,
    pub message: String,
}

// ============================================================================
// QuillClient
// ============================================================================

/// Frontend-facing facade.
#[derive(Debug, Clone)]
pub struct QuillClient {
    resolver: SnapshotResolver,
    adapter: EngineAdapter,
}

impl QuillClient {
    pub fn new(resolver: SnapshotResolver, adapter: EngineAdapter) -> Self {
        Self { resolver, adapter }
    }

    pub fn from_config(config: &QuillConfig) -> Self {
        Self::new(SnapshotResolver::from_config(config), EngineAdapter::from_config(config))
    }

    pub fn resolver(&self) -> &SnapshotResolver {
        &self.resolver
    }

    pub fn adapter(&self) -> &EngineAdapter {
        &self.adapter
    }

    /// Open `repository`, creating it through the engine if needed.
    ///
    /// # Errors
    ///
    /// - [`QuillError::Validation`] for an unusable name
    /// - [`QuillError::Engine`] if `init` fails
    pub fn open_or_init(&self, repository: &str) -> Result<RepoOpened, QuillError> {
        validate_repo_name(repository)?;
        if self.resolver.repository_exists(repository) {
            tracing::debug!(repository, "opened existing repository");
            return Ok(RepoOpened::Opened);
        }

        let outcome = self.adapter.execute(Operation::Init, &Invocation::repo(repository));
        let message = into_result(Operation::Init, outcome)?;
        tracing::info!(repository, "created repository");
        Ok(RepoOpened::Created(message))
    }

    /// Register `filename` with the repository.
    ///
    /// With `content`, that content is handed to the engine. Without it, a
    /// file the repository does not track yet starts out empty, replacing any
    /// source left behind at the root; a tracked file is registered as is.
    pub fn add_file(&self, repository: &str, filename: &str, content: Option<&str>) -> Result<String, QuillError> {
        self.check_file_target(repository, filename)?;
        match content {
            Some(content) => self.write_source(filename, content)?,
            None if !self.resolver.working_file_exists(repository, filename) => self.write_source(filename, "")?,
            None => {}
        }
        let outcome = self
            .adapter
            .execute(Operation::Add, &Invocation::file(repository, filename));
        into_result(Operation::Add, outcome)
    }

    /// Replace the content of an already tracked file.
    ///
    /// # Errors
    ///
    /// [`QuillError::FileNotTracked`] when the working copy does not exist.
    pub fn update_content(&self, repository: &str, filename: &str, content: &str) -> Result<String, QuillError> {
        self.check_file_target(repository, filename)?;
        if !self.resolver.working_file_exists(repository, filename) {
            return Err(QuillError::FileNotTracked {
                repository: repository.to_string(),
                filename: filename.to_string(),
            });
        }
        self.write_source(filename, content)?;
        let outcome = self
            .adapter
            .execute(Operation::Add, &Invocation::file(repository, filename));
        into_result(Operation::Add, outcome)
    }

    /// Record a new snapshot, optionally writing `content` first.
    pub fn commit(
        &self,
        repository: &str,
        filename: &str,
        content: Option<&str>,
        message: Option<&str>,
    ) -> Result<String, QuillError> {
        self.check_file_target(repository, filename)?;
        if let Some(content) = content {
            self.write_source(filename, content)?;
        }
        let invocation = Invocation::file(repository, filename).with_extra(message);
        into_result(Operation::Commit, self.adapter.execute(Operation::Commit, &invocation))
    }

    /// Restore the working copy from a snapshot; the latest when `tag` is `None`.
    ///
    /// A tag that no longer exists is still sent to the engine and fails there.
    pub fn revert(&self, repository: &str, filename: &str, tag: Option<&str>) -> Result<String, QuillError> {
        self.check_file_target(repository, filename)?;
        let tag = match tag.filter(|t| !t.is_empty()) {
            Some(tag) => tag.to_string(),
            None => self
                .resolver
                .latest_version_tag(repository, filename)
                .ok_or_else(|| QuillError::NoSnapshots {
                    repository: repository.to_string(),
                    filename: filename.to_string(),
                })?,
        };
        tracing::debug!(repository, filename, %tag, "reverting");
        let invocation = Invocation::file(repository, filename).with_extra(Some(&tag));
        into_result(Operation::Revert, self.adapter.execute(Operation::Revert, &invocation))
    }

    /// Ask the engine to write a readable copy of `filename`.
    pub fn checkout(&self, repository: &str, filename: &str) -> Result<String, QuillError> {
        self.check_file_target(repository, filename)?;
        let outcome = self
            .adapter
            .execute(Operation::Checkout, &Invocation::file(repository, filename));
        into_result(Operation::Checkout, outcome)
    }

    /// Engine status text for `repository`.
    pub fn status(&self, repository: &str) -> Result<String, QuillError> {
        validate_repo_name(repository)?;
        into_result(Operation::Status, self.adapter.text(Operation::Status, &Invocation::repo(repository)))
    }

    /// Engine log text, for the whole repository or one file.
    pub fn log(&self, repository: &str, filename: Option<&str>) -> Result<String, QuillError> {
        validate_repo_name(repository)?;
        let invocation = match filename.filter(|f| !f.is_empty()) {
            Some(file) => {
                validate_filename(file)?;
                Invocation::file(repository, file)
            }
            None => Invocation::repo(repository),
        };
        into_result(Operation::Log, self.adapter.text(Operation::Log, &invocation))
    }

    /// Diff the latest snapshot of `filename` against its working copy.
    ///
    /// A missing working copy compares as empty.
    pub fn diff_latest(&self, repository: &str, filename: &str) -> Result<DiffReport, QuillError> {
        validate_repo_name(repository)?;
        validate_filename(filename)?;

        let Some(tag) = self.resolver.latest_version_tag(repository, filename) else {
            return Ok(DiffReport::NoSnapshot);
        };
        // The snapshot may vanish between listing and reading.
        let Some(old) = self.resolver.read_snapshot(repository, filename, &tag)? else {
            return Ok(DiffReport::NoSnapshot);
        };
        let new = self
            .resolver
            .read_working_copy(repository, filename)?
            .unwrap_or_default();

        Ok(DiffReport::Compared {
            diff: diff(&old, &new),
            tag,
        })
    }

    /// Suggested next step for `repository` and an optional `filename`.
    pub fn suggest(&self, repository: &str, filename: Option<&str>) -> Suggestion {
        advise(&observe(&self.resolver, repository, filename))
    }

    /// Interpret `utterance` and run the matching workflow.
    ///
    /// Never fails: errors are folded into the returned [`Dispatch`].
    pub fn dispatch(&self, utterance: &str, context: &DispatchContext) -> Dispatch {
        let intent = parse(utterance);
        let repository = context.repository.as_str();
        let filename = context.filename.as_deref().unwrap_or_default();
        let content = context.content.as_deref();

        let result = match intent.action {
            Action::Init => self.open_or_init(repository).map(|opened| match opened {
                RepoOpened::Opened => format!("Opened repository '{}'", repository),
                RepoOpened::Created(message) => message,
            }),
            Action::Add => self.add_file(repository, filename, content),
            Action::Update => match content {
                Some(content) => self.update_content(repository, filename, content),
                None => self
                    .working_copy_text(repository, filename)
                    .and_then(|text| self.update_content(repository, filename, &text)),
            },
            Action::Commit => self.commit(repository, filename, content, context.message.as_deref()),
            Action::Revert => self.revert(repository, filename, None),
            Action::Status => self.status(repository),
            Action::Log => self.log(repository, context.filename.as_deref()),
            Action::Unknown => {
                return Dispatch {
                    intent,
                    success: false,
                    message: Action::hint().to_string(),
                }
            }
        };

        let (success, message) = match result {
            Ok(message) => (true, message),
            Err(err) => (false, err.to_string()),
        };
        Dispatch {
            intent,
            success,
            message,
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    fn check_file_target(&self, repository: &str, filename: &str) -> Result<(), QuillError> {
        validate_repo_name(repository)?;
        validate_filename(filename)?;
        if !self.resolver.repository_exists(repository) {
            return Err(QuillError::RepositoryNotFound(repository.to_string()));
        }
        Ok(())
    }

    /// Write content where the engine reads it from.
    fn write_source(&self, filename: &str, content: &str) -> Result<(), QuillError> {
        let path = self.resolver.source_path(filename);
        fs::write(&path, content).map_err(|e| QuillError::WorkingCopyWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote engine source");
        Ok(())
    }

    fn working_copy_text(&self, repository: &str, filename: &str) -> Result<String, QuillError> {
        self.check_file_target(repository, filename)?;
        let path = self.resolver.working_file_path(repository, filename);
        match fs::read(&path) {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(QuillError::FileNotTracked {
                repository: repository.to_string(),
                filename: filename.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

fn into_result(operation: Operation, outcome: CommandOutcome) -> Result<String, QuillError> {
    if outcome.success {
        Ok(outcome.message)
    } else {
        Err(QuillError::Engine {
            operation,
            message: outcome.message,
        })
    }
}
