//! Configuration types for Quill.
//!
//! - [`QuillConfig`]: user-level configuration stored in `~/.quill/config.yaml`
//! - [`EngineConfig`]: how to invoke the external engine
//!
//! Precedence when used from the CLI: flags > environment > file > defaults.
//! The CLI applies the first two on top of what this module loads.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_ENGINE_EXECUTABLE, DEFAULT_IGNORE_PATTERNS, DEFAULT_REPOSITORY, DEFAULT_TIMEOUT_SECS,
    GLOBAL_CONFIG_FILENAME, QUILL_HOME_DIR,
};
use crate::errors::QuillError;

/// Timeouts above this are accepted but logged as suspicious.
const LARGE_TIMEOUT_SECS: u64 = 600;

// ============================================================================
// QuillConfig
// ============================================================================

/// User-level configuration for Quill.
///
/// # Example YAML
///
/// ```yaml
/// engine:
///   executable: ./myvcs
///   timeoutSecs: 30
/// root: /home/me/vcs
/// defaultRepository: MyRepo
/// ignorePatterns: [__pycache__, .git, .vscode, node_modules]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuillConfig {
    /// External engine invocation settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Directory that contains the repositories. Relative paths resolve
    /// against the process working directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Repository used when none is given on the command line.
    #[serde(default = "default_repository")]
    pub default_repository: String,

    /// Name fragments hidden from repository and file listings.
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_string()
}
fn default_ignore_patterns() -> Vec<String> {
    DEFAULT_IGNORE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

impl Default for QuillConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            root: default_root(),
            default_repository: default_repository(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl QuillConfig {
    /// Load the configuration from the default location (`~/.quill/config.yaml`).
    ///
    /// If the file does not exist, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QuillError::InvalidConfig`] if the file exists but cannot be parsed.
    pub fn load_default() -> Result<Self, QuillError> {
        match Self::default_path() {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("Could not determine home directory, using default config");
                Ok(Self::default())
            }
        }
    }

    /// Load the configuration from a specific path.
    ///
    /// If the file does not exist, returns defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QuillError::InvalidConfig`] if the file cannot be read or parsed.
    /// Values are not validated here; call [`QuillConfig::validate`] once any
    /// overrides have been applied.
    pub fn from_path(path: &Path) -> Result<Self, QuillError> {
        if !path.exists() {
            tracing::debug!("Config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            QuillError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            QuillError::InvalidConfig(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Get the default config directory (`~/.quill`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(QUILL_HOME_DIR))
    }

    /// Get the default config file path (`~/.quill/config.yaml`).
    pub fn default_path() -> Option<PathBuf> {
        Self::default_dir().map(|d| d.join(GLOBAL_CONFIG_FILENAME))
    }

    /// Validate the configuration, returning warnings for questionable values.
    ///
    /// # Errors
    ///
    /// Returns an error for values that make the engine unusable.
    pub fn validate(&self) -> Result<Vec<String>, QuillError> {
        self.engine.validate()
    }
}

// ============================================================================
// EngineConfig
// ============================================================================

/// How the external engine is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Path or name of the engine executable.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Wall-clock limit for a single invocation.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_executable() -> PathBuf {
    PathBuf::from(DEFAULT_ENGINE_EXECUTABLE)
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl EngineConfig {
    /// The timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the engine settings.
    ///
    /// # Errors
    ///
    /// - `timeoutSecs == 0`: every invocation would time out immediately
    /// - empty `executable`
    pub fn validate(&self) -> Result<Vec<String>, QuillError> {
        let mut warnings = Vec::new();

        if self.timeout_secs == 0 {
            return Err(QuillError::InvalidConfiguration {
                message: "engine.timeoutSecs cannot be 0".to_string(),
                hint: "Set timeoutSecs to at least 1 (default: 30)".to_string(),
            });
        }

        if self.executable.as_os_str().is_empty() {
            return Err(QuillError::InvalidConfiguration {
                message: "engine.executable cannot be empty".to_string(),
                hint: format!("Point executable at the engine binary (default: {})", DEFAULT_ENGINE_EXECUTABLE),
            });
        }

        if self.timeout_secs > LARGE_TIMEOUT_SECS {
            warnings.push(format!(
                "engine.timeoutSecs={} is very large; a hung engine will block for that long",
                self.timeout_secs
            ));
        }

        Ok(warnings)
    }
}

// ============================================================================
// Tests
// ============================================================================
