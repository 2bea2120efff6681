//! # CLI UI Module
//!
//! Styling and formatting layer for Quill CLI output.
//!
//! ## Design Principles
//!
//! 1. **Scannable**: success or failure is visible from the prefix alone
//! 2. **Consistent**: same patterns across all commands
//! 3. **Accessible**: works without colors (respects `NO_COLOR`)
//! 4. **Scriptable**: machine-parseable with `--json`
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions
//! - `format`: Utility formatters (bytes, time, truncation)
//! - `table`: Table rendering with comfy-table
//! - `progress`: Spinner shown while the engine runs

pub mod color;
pub mod format;
pub mod progress;
pub mod style;
pub mod table;

// Re-export main types for convenient access
pub use color::ColorMode;
pub use progress::{Progress, ProgressMode};
pub use style::{MessageType, Style};
