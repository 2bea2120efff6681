//! Spinner shown while the engine runs.
//!
//! Disabled when stdout is not a TTY, with `--quiet`, or with `--json`.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress feedback mode based on output context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Interactive TTY: show an animated spinner
    Interactive,
    /// Non-TTY or quiet: only final results
    Quiet,
    /// Machine-readable output: nothing but the payload
    Silent,
}

impl ProgressMode {
    /// Detect the appropriate mode from flags and the terminal.
    pub fn detect(quiet: bool, json: bool) -> Self {
        if json {
            Self::Silent
        } else if quiet || !std::io::stdout().is_terminal() {
            Self::Quiet
        } else {
            Self::Interactive
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

/// Spinner tick characters (Braille-based).
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// A spinner that wraps indicatif.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Start a spinner; hidden unless `mode` is interactive.
    pub fn spinner(message: &str, mode: ProgressMode) -> Self {
        let bar = if mode.is_interactive() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_chars(SPINNER_CHARS)
                .template("{spinner:.cyan} {msg} ({elapsed})")
            {
                pb.set_style(style);
            }
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        } else {
            ProgressBar::hidden()
        };

        Self { bar }
    }

    /// Finish and clear the spinner line.
    pub fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
