//! Table rendering for CLI output using comfy-table.
//!
//! | Command | Table Function |
//! |---------|----------------|
//! | `quill repos` | `render_repos_table()` |
//! | `quill files` | `render_files_table()` |
//! | `quill history` | `render_history_table()` |

use chrono::{DateTime, Utc};
use comfy_table::presets::NOTHING;
use comfy_table::{Cell, CellAlignment, ColumnConstraint, Table, Width};

use super::color::terminal_width;
use super::format::{first_line, format_bytes, format_relative_time, truncate_str};

/// A directory under the root.
#[derive(Debug, Clone)]
pub struct RepoRow {
    pub name: String,
    /// Marker file and snapshot container both present.
    pub initialized: bool,
    pub files: usize,
}

/// A working-copy file inside a repository.
#[derive(Debug, Clone)]
pub struct FileRow {
    pub name: String,
    pub size_bytes: u64,
    pub versions: usize,
    pub latest: Option<String>,
}

/// One snapshot of a file.
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub tag: String,
    pub recorded_at: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

/// Render the repositories table.
///
/// ```text
/// REPOSITORY   STATE   FILES
/// Notes        ready       3
/// scratch      -           0
/// ```
pub fn render_repos_table(repos: &[RepoRow]) -> String {
    if repos.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("REPOSITORY"),
        Cell::new("STATE"),
        Cell::new("FILES").set_alignment(CellAlignment::Right),
    ]);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(12)), // REPOSITORY
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),  // STATE
        ColumnConstraint::LowerBoundary(Width::Fixed(6)),  // FILES
    ]);

    for repo in repos {
        let state = if repo.initialized { "ready" } else { "-" };
        table.add_row(vec![
            Cell::new(truncate_str(&repo.name, 32)),
            Cell::new(state),
            Cell::new(repo.files).set_alignment(CellAlignment::Right),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render the files table of one repository.
///
/// ```text
/// FILE        SIZE     VERSIONS   LATEST
/// todo.txt    1.2 KB          4   20240105093000
/// ```
pub fn render_files_table(files: &[FileRow]) -> String {
    if files.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![
        Cell::new("FILE"),
        Cell::new("SIZE").set_alignment(CellAlignment::Right),
        Cell::new("VERSIONS").set_alignment(CellAlignment::Right),
        Cell::new("LATEST"),
    ]);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(10)), // FILE
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),  // SIZE
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),  // VERSIONS
        ColumnConstraint::LowerBoundary(Width::Fixed(14)), // LATEST
    ]);

    for file in files {
        table.add_row(vec![
            Cell::new(truncate_str(&file.name, 40)),
            Cell::new(format_bytes(file.size_bytes)).set_alignment(CellAlignment::Right),
            Cell::new(file.versions).set_alignment(CellAlignment::Right),
            Cell::new(file.latest.as_deref().unwrap_or("-")),
        ]);
    }

    table.trim_fmt().to_string()
}

/// Render the snapshot history of one file, oldest first.
///
/// The message column is truncated to fit the terminal.
///
/// ```text
/// TAG              RECORDED   MESSAGE
/// 20240101093000   2d ago     first list
/// ```
pub fn render_history_table(rows: &[HistoryRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let message_width = terminal_width().saturating_sub(36).max(20);

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(vec![Cell::new("TAG"), Cell::new("RECORDED"), Cell::new("MESSAGE")]);
    table.set_constraints(vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(14)), // TAG
        ColumnConstraint::LowerBoundary(Width::Fixed(10)), // RECORDED
        ColumnConstraint::LowerBoundary(Width::Fixed(10)), // MESSAGE
    ]);

    for row in rows {
        let recorded = row
            .recorded_at
            .map(format_relative_time)
            .unwrap_or_else(|| "-".to_string());
        let message = row
            .message
            .as_deref()
            .map(|m| truncate_str(first_line(m), message_width))
            .unwrap_or_default();
        table.add_row(vec![Cell::new(&row.tag), Cell::new(recorded), Cell::new(message)]);
    }

    table.trim_fmt().to_string()
}
