//! Message styling for CLI output.
//!
//! Provides consistent prefixes, colors, and formatting for all CLI messages.
//!
//! ## Message Types
//!
//! | Prefix | Meaning | Color |
//! |--------|---------|-------|
//! | `[ok]` | Success | Green |
//! | `[err]` | Error | Red |
//! | `[warn]` | Warning | Yellow |
//! | `[info]` | Information | Blue |
//! | `[hint]` | Suggestion | Cyan |

use owo_colors::OwoColorize;

use quill_core::{DiffLine, LineKind};

use super::color::ColorMode;

/// Message severity/type for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    /// Operation completed successfully
    Ok,
    /// Operation failed, cannot continue
    Err,
    /// Operation succeeded with caveats
    Warn,
    /// Neutral status
    Info,
    /// Actionable next step
    Hint,
}

impl MessageType {
    /// Returns the prefix text for this message type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Ok => "[ok]",
            Self::Err => "[err]",
            Self::Warn => "[warn]",
            Self::Info => "[info]",
            Self::Hint => "[hint]",
        }
    }
}

/// Main styling interface for CLI output.
#[derive(Debug, Clone)]
pub struct Style {
    color_mode: ColorMode,
}

impl Style {
    /// Create a Style instance with an explicit color mode.
    pub fn new(color_mode: ColorMode) -> Self {
        Self { color_mode }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(&self) -> bool {
        self.color_mode.is_enabled()
    }

    /// Format a simple message with a type prefix.
    ///
    /// ```ignore
    /// let style = Style::new(ColorMode::Never);
    /// assert_eq!(style.message(MessageType::Ok, "Done"), "[ok] Done");
    /// ```
    pub fn message(&self, msg_type: MessageType, text: &str) -> String {
        let prefix = msg_type.prefix();
        if self.colors_enabled() {
            let colored_prefix = match msg_type {
                MessageType::Ok => prefix.green().to_string(),
                MessageType::Err => prefix.red().to_string(),
                MessageType::Warn => prefix.yellow().to_string(),
                MessageType::Info => prefix.blue().to_string(),
                MessageType::Hint => prefix.cyan().to_string(),
            };
            format!("{} {}", colored_prefix, text)
        } else {
            format!("{} {}", prefix, text)
        }
    }

    /// Format a detail line with 5-space indentation.
    pub fn message_detail(&self, label: &str, value: &str) -> String {
        format!("     {}: {}", label, value)
    }

    /// Format a section header.
    pub fn section(&self, title: &str) -> String {
        if self.colors_enabled() {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a structured error with optional cause and hint.
    pub fn error_with_context(&self, msg: &str, cause: Option<&str>, hint: Option<&str>) -> String {
        let mut output = self.message(MessageType::Err, msg);

        if let Some(cause_text) = cause {
            output.push('\n');
            output.push_str(&format!("      Cause: {}", cause_text));
        }

        if let Some(hint_text) = hint {
            output.push('\n');
            output.push_str(&format!("      Hint: {}", hint_text));
        }

        output
    }

    /// Format a list item with a prefix marker.
    ///
    /// The prefix `+` is colored green, `-` is colored red.
    pub fn list_item(&self, prefix: &str, text: &str) -> String {
        let styled_prefix = if self.colors_enabled() {
            match prefix {
                "+" => prefix.green().to_string(),
                "-" => prefix.red().to_string(),
                _ => prefix.dimmed().to_string(),
            }
        } else {
            prefix.to_string()
        };
        format!("  {} {}", styled_prefix, text)
    }

    /// Format one diff line as `+ text`, `- text` or `  text`.
    pub fn diff_line(&self, line: &DiffLine) -> String {
        let marker = match line.kind {
            LineKind::Added => "+",
            LineKind::Removed => "-",
            LineKind::Unchanged => " ",
        };
        if !self.colors_enabled() {
            return format!("{} {}", marker, line.text);
        }
        match line.kind {
            LineKind::Added => format!("{} {}", marker, line.text).green().to_string(),
            LineKind::Removed => format!("{} {}", marker, line.text).red().to_string(),
            LineKind::Unchanged => format!("{} {}", marker, line.text).dimmed().to_string(),
        }
    }

    /// Format a key-value pair.
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.colors_enabled() {
            format!("{}: {}", key.dimmed(), value)
        } else {
            format!("{}: {}", key, value)
        }
    }

    /// Format a version tag (colored yellow).
    pub fn tag(&self, tag: &str) -> String {
        if self.colors_enabled() {
            tag.yellow().to_string()
        } else {
            tag.to_string()
        }
    }

    /// Format a file or repository name (colored cyan).
    pub fn file_path(&self, path: &str) -> String {
        if self.colors_enabled() {
            path.cyan().to_string()
        } else {
            path.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Style {
        Style::new(ColorMode::Never)
    }

    #[test]
    fn test_message_no_color() {
        assert_eq!(plain().message(MessageType::Ok, "Success"), "[ok] Success");
        assert_eq!(plain().message(MessageType::Hint, "Commit"), "[hint] Commit");
    }

    #[test]
    fn test_message_detail() {
        assert_eq!(plain().message_detail("Tag", "20240101"), "     Tag: 20240101");
    }

    #[test]
    fn test_error_with_context() {
        let output = plain().error_with_context("Engine failed", Some("Command timed out"), Some("Raise --timeout"));
        assert!(output.contains("[err] Engine failed"));
        assert!(output.contains("Cause: Command timed out"));
        assert!(output.contains("Hint: Raise --timeout"));
    }

    #[test]
    fn test_diff_line_markers() {
        let style = plain();
        let added = DiffLine {
            kind: LineKind::Added,
            text: "new".to_string(),
        };
        let removed = DiffLine {
            kind: LineKind::Removed,
            text: "old".to_string(),
        };
        let same = DiffLine {
            kind: LineKind::Unchanged,
            text: "ctx".to_string(),
        };
        assert_eq!(style.diff_line(&added), "+ new");
        assert_eq!(style.diff_line(&removed), "- old");
        assert_eq!(style.diff_line(&same), "  ctx");
    }

    #[test]
    fn test_list_item_and_key_value() {
        assert_eq!(plain().list_item("-", "notes.txt"), "  - notes.txt");
        assert_eq!(plain().key_value("Repository", "Notes"), "Repository: Notes");
    }
}
