//! Line-level diff between a snapshot and a working copy.
//!
//! [`diff`] aligns two line sequences on a longest common subsequence and
//! classifies every line as [`LineKind::Unchanged`], [`LineKind::Added`] or
//! [`LineKind::Removed`], keeping removed lines at their old position and
//! added lines at their new one.
//!
//! The alignment comes from `similar`'s Myers implementation, which works in
//! linear space, so memory stays proportional to the input length.
//!
//! The search always runs from the lexically smaller sequence to the larger
//! one and the result is mirrored when the inputs came the other way round.
//! `diff(a, b)` and `diff(b, a)` therefore classify every line as mirror
//! images of each other. Inside a run of changes, removals are listed first.

use std::fmt;

use serde::{Deserialize, Serialize};
use similar::{capture_diff_slices, Algorithm, DiffOp};

/// Rendering used when there is nothing to show.
pub const NO_DIFFERENCES: &str = "No differences found.";

/// Classification of one diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Unchanged,
    Added,
    Removed,
}

impl LineKind {
    /// Label used when rendering a line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged => "Unchanged",
            Self::Added => "Added",
            Self::Removed => "Removed",
        }
    }

    /// The classification seen from the other side of the comparison.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Unchanged => Self::Unchanged,
            Self::Added => Self::Removed,
            Self::Removed => Self::Added,
        }
    }
}

/// One classified line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: LineKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.text)
    }
}

/// Line counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Result of comparing two line sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "lines", rename_all = "camelCase")]
pub enum DiffOutcome {
    /// No line was added or removed.
    NoDifferences,
    /// The full interleaved listing, unchanged context included.
    Changes(Vec<DiffLine>),
}

impl DiffOutcome {
    /// Check if anything was added or removed.
    pub fn has_changes(&self) -> bool {
        matches!(self, Self::Changes(_))
    }

    /// The classified lines; empty for [`DiffOutcome::NoDifferences`].
    pub fn lines(&self) -> &[DiffLine] {
        match self {
            Self::NoDifferences => &[],
            Self::Changes(lines) => lines,
        }
    }

    /// Count lines per classification.
    pub fn stats(&self) -> DiffStats {
        self.lines()
            .iter()
            .fold(DiffStats::default(), |mut stats, line| {
                match line.kind {
                    LineKind::Added => stats.added += 1,
                    LineKind::Removed => stats.removed += 1,
                    LineKind::Unchanged => stats.unchanged += 1,
                }
                stats
            })
    }

    /// Render as `Kind: text` lines, or [`NO_DIFFERENCES`].
    pub fn render(&self) -> String {
        match self {
            Self::NoDifferences => NO_DIFFERENCES.to_string(),
            Self::Changes(lines) => lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Compare `old` against `new` line by line.
///
/// Pure and total: never fails and performs no I/O.
///
/// # Example
///
/// ```
/// use quill_core::diff::{diff, LineKind};
///
/// let outcome = diff(&["a", "b", "c"], &["a", "x", "c"]);
/// let kinds: Vec<LineKind> = outcome.lines().iter().map(|l| l.kind).collect();
/// assert_eq!(
///     kinds,
///     vec![LineKind::Unchanged, LineKind::Removed, LineKind::Added, LineKind::Unchanged]
/// );
///
/// assert!(!diff(&["same"], &["same"]).has_changes());
/// ```
pub fn diff<S: AsRef<str>>(old: &[S], new: &[S]) -> DiffOutcome {
    let old: Vec<&str> = old.iter().map(AsRef::as_ref).collect();
    let new: Vec<&str> = new.iter().map(AsRef::as_ref).collect();

    if old == new {
        return DiffOutcome::NoDifferences;
    }

    let mut lines = if old <= new {
        align(&old, &new)
    } else {
        let mut lines = align(&new, &old);
        for line in &mut lines {
            line.kind = line.kind.mirrored();
        }
        lines
    };
    removals_first(&mut lines);

    if lines.iter().all(|l| l.kind == LineKind::Unchanged) {
        DiffOutcome::NoDifferences
    } else {
        DiffOutcome::Changes(lines)
    }
}

/// Classify every line of `old` and `new` along a Myers alignment.
fn align(old: &[&str], new: &[&str]) -> Vec<DiffLine> {
    let mut lines = Vec::with_capacity(old.len() + new.len());

    for op in capture_diff_slices(Algorithm::Myers, old, new) {
        match op {
            DiffOp::Equal { old_index, len, .. } => {
                push_run(&mut lines, LineKind::Unchanged, &old[old_index..old_index + len]);
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => push_run(&mut lines, LineKind::Removed, &old[old_index..old_index + old_len]),
            DiffOp::Insert {
                new_index, new_len, ..
            } => push_run(&mut lines, LineKind::Added, &new[new_index..new_index + new_len]),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                push_run(&mut lines, LineKind::Removed, &old[old_index..old_index + old_len]);
                push_run(&mut lines, LineKind::Added, &new[new_index..new_index + new_len]);
            }
        }
    }
    lines
}

fn push_run(lines: &mut Vec<DiffLine>, kind: LineKind, texts: &[&str]) {
    lines.extend(texts.iter().map(|t| DiffLine::new(kind, t)));
}

/// Within each run of changed lines, list removals before additions.
fn removals_first(lines: &mut [DiffLine]) {
    let mut start = 0;
    while start < lines.len() {
        if lines[start].kind == LineKind::Unchanged {
            start += 1;
            continue;
        }
        let end = lines[start..]
            .iter()
            .position(|l| l.kind == LineKind::Unchanged)
            .map_or(lines.len(), |p| start + p);
        lines[start..end].sort_by_key(|l| l.kind != LineKind::Removed);
        start = end;
    }
}

// ============================================================================
// Tests
// ============================================================================
