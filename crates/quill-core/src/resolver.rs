//! Snapshot directory resolution.
//!
//! This module provides the [`SnapshotResolver`] which maps repository names
//! and filenames onto the on-disk convention maintained by the external
//! engine:
//!
//! ```text
//! <root>/
//!   <repo>/
//!     config.txt                      marker file
//!     notes.txt                       working copy
//!     commits/
//!       notes.txt.20240101093000      snapshot
//!       notes.txt.20240101093000.msg  optional message
//! ```
//!
//! Every listing re-reads the filesystem and tolerates missing directories by
//! returning an empty collection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::QuillConfig;
use crate::constants::{
    is_ignored, is_message_artifact, MARKER_FILENAME, MESSAGE_SUFFIX, SNAPSHOT_DIR, TAG_SEPARATOR,
};
use crate::errors::QuillError;

// ============================================================================
// SnapshotInfo
// ============================================================================

/// One recorded snapshot of a tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInfo {
    /// Opaque, sortable version tag.
    pub tag: String,

    /// Path to the snapshot artifact.
    pub path: PathBuf,

    /// Message recorded alongside the snapshot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Modification time of the artifact on disk.
    ///
    /// Taken from filesystem metadata; the tag itself is never parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

// ============================================================================
// SnapshotResolver
// ============================================================================

/// Read-only view over the repositories under a root directory.
///
/// # Example
///
/// ```ignore
/// use quill_core::SnapshotResolver;
///
/// let resolver = SnapshotResolver::new(".", vec![".git".into()]);
/// for tag in resolver.list_version_tags("MyRepo", "notes.txt") {
///     println!("{tag}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotResolver {
    /// Directory containing the repositories.
    root: PathBuf,

    /// Name fragments excluded from listings.
    ignore_patterns: Vec<String>,
}

impl SnapshotResolver {
    /// Create a resolver over `root`.
    pub fn new(root: impl Into<PathBuf>, ignore_patterns: Vec<String>) -> Self {
        Self {
            root: root.into(),
            ignore_patterns,
        }
    }

    /// Create a resolver from configuration.
    pub fn from_config(config: &QuillConfig) -> Self {
        Self::new(config.root.clone(), config.ignore_patterns.clone())
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // -------------------------------------------------------------------------
    // Paths
    // -------------------------------------------------------------------------

    /// Returns `<root>/<repo>`.
    pub fn repo_dir(&self, repo: &str) -> PathBuf {
        self.root.join(repo)
    }

    /// Returns `<root>/<repo>/config.txt`.
    pub fn marker_path(&self, repo: &str) -> PathBuf {
        self.repo_dir(repo).join(MARKER_FILENAME)
    }

    /// Returns `<root>/<repo>/commits`.
    pub fn snapshot_dir(&self, repo: &str) -> PathBuf {
        self.repo_dir(repo).join(SNAPSHOT_DIR)
    }

    /// Returns `<root>/<repo>/<filename>`, the working copy.
    pub fn working_file_path(&self, repo: &str, filename: &str) -> PathBuf {
        self.repo_dir(repo).join(filename)
    }

    /// Returns `<root>/<filename>`, where content is placed for the engine to pick up.
    pub fn source_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Returns `<root>/<repo>/commits/<filename>.<tag>`.
    pub fn snapshot_path(&self, repo: &str, filename: &str, tag: &str) -> PathBuf {
        self.snapshot_dir(repo)
            .join(format!("{filename}{TAG_SEPARATOR}{tag}"))
    }

    /// Returns `<root>/<repo>/commits/<filename>.<tag>.msg`.
    pub fn message_path(&self, repo: &str, filename: &str, tag: &str) -> PathBuf {
        self.snapshot_dir(repo)
            .join(format!("{filename}{TAG_SEPARATOR}{tag}{MESSAGE_SUFFIX}"))
    }

    // -------------------------------------------------------------------------
    // Existence
    // -------------------------------------------------------------------------

    /// A repository exists only when both the marker file and the snapshot
    /// container are present.
    pub fn repository_exists(&self, repo: &str) -> bool {
        self.repo_dir(repo).is_dir()
            && self.marker_path(repo).is_file()
            && self.snapshot_dir(repo).is_dir()
    }

    /// Check if the working copy of `filename` exists in `repo`.
    pub fn working_file_exists(&self, repo: &str, filename: &str) -> bool {
        !filename.is_empty() && self.working_file_path(repo, filename).is_file()
    }

    // -------------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------------

    /// List repository candidates under the root.
    ///
    /// Every non-hidden, non-ignored directory is returned, whether or not it
    /// carries the repository marker. Sorted ascending.
    pub fn list_repositories(&self) -> Vec<String> {
        let mut repos: Vec<String> = read_names(&self.root, EntryKind::Dir)
            .into_iter()
            .filter(|name| !name.starts_with('.') && !is_ignored(name, &self.ignore_patterns))
            .collect();
        repos.sort();
        repos
    }

    /// List working-copy files directly inside a repository, sorted ascending.
    pub fn list_files(&self, repo: &str) -> Vec<String> {
        let mut files: Vec<String> = read_names(&self.repo_dir(repo), EntryKind::File)
            .into_iter()
            .filter(|name| name != MARKER_FILENAME && !is_ignored(name, &self.ignore_patterns))
            .collect();
        files.sort();
        files
    }

    /// List snapshot artifacts (message artifacts excluded), sorted ascending.
    pub fn list_snapshot_artifacts(&self, repo: &str) -> Vec<String> {
        let mut artifacts: Vec<String> = read_names(&self.snapshot_dir(repo), EntryKind::File)
            .into_iter()
            .filter(|name| !is_message_artifact(name))
            .collect();
        artifacts.sort();
        artifacts
    }

    /// List the version tags recorded for `filename`, oldest first.
    ///
    /// Only entries named exactly `<filename>.<tag>` qualify, so the tags of
    /// `a.txt` never include snapshots of `a.txt.bak`.
    pub fn list_version_tags(&self, repo: &str, filename: &str) -> Vec<String> {
        if filename.is_empty() {
            return Vec::new();
        }
        let mut tags: Vec<String> = self
            .list_snapshot_artifacts(repo)
            .iter()
            .filter_map(|name| version_tag_of(name, filename))
            .map(str::to_string)
            .collect();
        tags.sort();
        tracing::debug!(repo, filename, count = tags.len(), "listed version tags");
        tags
    }

    /// The latest version tag for `filename`, if any.
    pub fn latest_version_tag(&self, repo: &str, filename: &str) -> Option<String> {
        self.list_version_tags(repo, filename).pop()
    }

    /// Check if at least one snapshot exists for `filename`.
    pub fn has_snapshots(&self, repo: &str, filename: &str) -> bool {
        !self.list_version_tags(repo, filename).is_empty()
    }

    /// Read the message recorded with a snapshot.
    ///
    /// Returns `None` when there is no message artifact or it is unreadable.
    pub fn snapshot_message(&self, repo: &str, filename: &str, tag: &str) -> Option<String> {
        let path = self.message_path(repo, filename, tag);
        match fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes).trim().to_string();
                (!text.is_empty()).then_some(text)
            }
            Err(_) => None,
        }
    }

    /// Full history of `filename`, oldest first.
    pub fn history(&self, repo: &str, filename: &str) -> Vec<SnapshotInfo> {
        self.list_version_tags(repo, filename)
            .into_iter()
            .map(|tag| {
                let path = self.snapshot_path(repo, filename, &tag);
                let recorded_at = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .ok()
                    .map(DateTime::<Utc>::from);
                let message = self.snapshot_message(repo, filename, &tag);
                SnapshotInfo {
                    tag,
                    path,
                    message,
                    recorded_at,
                }
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Content
    // -------------------------------------------------------------------------

    /// Read the working copy as lines. `None` if it does not exist.
    pub fn read_working_copy(&self, repo: &str, filename: &str) -> Result<Option<Vec<String>>, QuillError> {
        read_lines(&self.working_file_path(repo, filename))
    }

    /// Read a snapshot as lines. `None` if it does not exist.
    pub fn read_snapshot(
        &self,
        repo: &str,
        filename: &str,
        tag: &str,
    ) -> Result<Option<Vec<String>>, QuillError> {
        read_lines(&self.snapshot_path(repo, filename, tag))
    }
}

// ============================================================================
// Helpers
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
}

/// Names of the entries of one kind directly inside `dir`.
///
/// A missing or unreadable directory yields an empty list. Entries whose
/// names are not valid UTF-8 are skipped.
fn read_names(dir: &Path, kind: EntryKind) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let path = entry.path();
            match kind {
                EntryKind::File => path.is_file(),
                EntryKind::Dir => path.is_dir(),
            }
        })
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect()
}

/// Extract the version tag from a snapshot artifact name belonging to `filename`.
///
/// The name must be `<filename>.<tag>` where the tag itself holds no separator.
fn version_tag_of<'a>(artifact: &'a str, filename: &str) -> Option<&'a str> {
    if is_message_artifact(artifact) {
        return None;
    }
    let tag = artifact
        .strip_prefix(filename)?
        .strip_prefix(TAG_SEPARATOR)?;
    if tag.is_empty() || tag.contains(TAG_SEPARATOR) {
        return None;
    }
    Some(tag)
}

fn read_lines(path: &Path) -> Result<Option<Vec<String>>, QuillError> {
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(Some(text.lines().map(str::to_string).collect()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_IGNORE_PATTERNS;
    use tempfile::TempDir;

    fn resolver(temp: &TempDir) -> SnapshotResolver {
        SnapshotResolver::new(
            temp.path(),
            DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        )
    }

    fn make_repo(temp: &TempDir, name: &str) {
        let repo = temp.path().join(name);
        fs::create_dir_all(repo.join(SNAPSHOT_DIR)).unwrap();
        fs::write(repo.join(MARKER_FILENAME), "version=1.0\n").unwrap();
    }

    fn touch_snapshot(temp: &TempDir, repo: &str, name: &str, content: &str) {
        fs::write(temp.path().join(repo).join(SNAPSHOT_DIR).join(name), content).unwrap();
    }

    #[test]
    fn test_repository_exists_requires_marker_and_container() {
        let temp = TempDir::new().unwrap();
        let r = resolver(&temp);

        make_repo(&temp, "Full");
        fs::create_dir_all(temp.path().join("MarkerOnly")).unwrap();
        fs::write(temp.path().join("MarkerOnly").join(MARKER_FILENAME), "").unwrap();
        fs::create_dir_all(temp.path().join("ContainerOnly").join(SNAPSHOT_DIR)).unwrap();

        assert!(r.repository_exists("Full"));
        assert!(!r.repository_exists("MarkerOnly"));
        assert!(!r.repository_exists("ContainerOnly"));
        assert!(!r.repository_exists("Missing"));
    }

    #[test]
    fn test_list_repositories_skips_hidden_and_ignored() {
        let temp = TempDir::new().unwrap();
        for dir in ["beta", "alpha", ".hidden", "node_modules", "__pycache__"] {
            fs::create_dir_all(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("file.txt"), "x").unwrap();

        assert_eq!(resolver(&temp).list_repositories(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_list_files_excludes_marker_and_dirs() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp, "Repo");
        let repo = temp.path().join("Repo");
        fs::write(repo.join("b.txt"), "b").unwrap();
        fs::write(repo.join("a.txt"), "a").unwrap();

        assert_eq!(resolver(&temp).list_files("Repo"), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn test_list_snapshot_artifacts_excludes_messages() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp, "Repo");
        touch_snapshot(&temp, "Repo", "a.txt.20240102000000", "");
        touch_snapshot(&temp, "Repo", "a.txt.20240101000000", "");
        touch_snapshot(&temp, "Repo", "a.txt.20240101000000.msg", "first");

        assert_eq!(
            resolver(&temp).list_snapshot_artifacts("Repo"),
            vec!["a.txt.20240101000000", "a.txt.20240102000000"]
        );
    }

    #[test]
    fn test_list_version_tags_sorted_and_exact_prefix() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp, "Repo");
        touch_snapshot(&temp, "Repo", "a.txt.20240103000000", "");
        touch_snapshot(&temp, "Repo", "a.txt.20240101000000", "");
        touch_snapshot(&temp, "Repo", "a.txt.20240101000000.msg", "msg");
        touch_snapshot(&temp, "Repo", "a.txt.bak.20240102000000", "");
        touch_snapshot(&temp, "Repo", "a.txtx.20240104000000", "");
        touch_snapshot(&temp, "Repo", "ba.txt.20240105000000", "");

        let r = resolver(&temp);
        assert_eq!(
            r.list_version_tags("Repo", "a.txt"),
            vec!["20240101000000", "20240103000000"]
        );
        assert_eq!(r.list_version_tags("Repo", "a.txt.bak"), vec!["20240102000000"]);
        assert_eq!(r.latest_version_tag("Repo", "a.txt").as_deref(), Some("20240103000000"));
    }

    #[test]
    fn test_listings_on_missing_directories_are_empty() {
        let temp = TempDir::new().unwrap();
        let r = SnapshotResolver::new(temp.path().join("does-not-exist"), Vec::new());

        assert!(r.list_repositories().is_empty());
        assert!(r.list_files("Repo").is_empty());
        assert!(r.list_snapshot_artifacts("Repo").is_empty());
        assert!(r.list_version_tags("Repo", "a.txt").is_empty());
        assert!(r.latest_version_tag("Repo", "a.txt").is_none());
        assert!(r.history("Repo", "a.txt").is_empty());
    }

    #[test]
    fn test_empty_filename_has_no_tags() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp, "Repo");
        touch_snapshot(&temp, "Repo", ".20240101000000", "");
        assert!(resolver(&temp).list_version_tags("Repo", "").is_empty());
    }

    #[test]
    fn test_history_includes_messages() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp, "Repo");
        touch_snapshot(&temp, "Repo", "a.txt.1", "one");
        touch_snapshot(&temp, "Repo", "a.txt.2", "two");
        touch_snapshot(&temp, "Repo", "a.txt.2.msg", "second save\n");

        let history = resolver(&temp).history("Repo", "a.txt");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].tag, "1");
        assert!(history[0].message.is_none());
        assert!(history[0].recorded_at.is_some());
        assert_eq!(history[1].message.as_deref(), Some("second save"));
    }

    #[test]
    fn test_read_working_copy_and_snapshot() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp, "Repo");
        fs::write(temp.path().join("Repo").join("a.txt"), "one\ntwo\n").unwrap();
        touch_snapshot(&temp, "Repo", "a.txt.1", "one\n");

        let r = resolver(&temp);
        assert_eq!(
            r.read_working_copy("Repo", "a.txt").unwrap(),
            Some(vec!["one".to_string(), "two".to_string()])
        );
        assert_eq!(r.read_snapshot("Repo", "a.txt", "1").unwrap(), Some(vec!["one".to_string()]));
        assert_eq!(r.read_working_copy("Repo", "missing.txt").unwrap(), None);
    }

    #[test]
    fn test_version_tag_of() {
        assert_eq!(version_tag_of("a.txt.123", "a.txt"), Some("123"));
        assert_eq!(version_tag_of("a.txt.123.msg", "a.txt"), None);
        assert_eq!(version_tag_of("a.txt.bak.123", "a.txt"), None);
        assert_eq!(version_tag_of("a.txt.", "a.txt"), None);
        assert_eq!(version_tag_of("a.txtx.123", "a.txt"), None);
        assert_eq!(version_tag_of("a.txt", "a.txt"), None);
    }
}
