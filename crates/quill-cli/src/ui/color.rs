//! Color mode detection for CLI output.
//!
//! Respects the `NO_COLOR` environment variable and TTY detection.
//! See https://no-color.org/ for the NO_COLOR standard.

use std::io::IsTerminal;
use std::str::FromStr;

/// Color output mode for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Always use colors, even when output is not a TTY.
    Always,
    /// Never use colors.
    Never,
    /// Detect from TTY and `NO_COLOR`.
    #[default]
    Auto,
}

impl FromStr for ColorMode {
    type Err = String;

    /// Accepts: "always", "never", "auto"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "auto" => Ok(Self::Auto),
            other => Err(format!("invalid color mode '{}' (expected always, never or auto)", other)),
        }
    }
}

impl ColorMode {
    /// Check if colors should be used based on current mode.
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => Self::should_auto_colorize(),
        }
    }

    /// Rules:
    /// 1. If `NO_COLOR` env var is set (any value), disable colors
    /// 2. If stdout is not a TTY, disable colors
    /// 3. Otherwise, enable colors
    fn should_auto_colorize() -> bool {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        std::io::stdout().is_terminal()
    }
}

/// Current terminal width, or 80 if it cannot be determined.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode_from_str() {
        assert_eq!("always".parse::<ColorMode>(), Ok(ColorMode::Always));
        assert_eq!("NEVER".parse::<ColorMode>(), Ok(ColorMode::Never));
        assert_eq!("auto".parse::<ColorMode>(), Ok(ColorMode::Auto));
        assert!("sometimes".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_color_mode_explicit() {
        assert!(ColorMode::Always.is_enabled());
        assert!(!ColorMode::Never.is_enabled());
    }
}
