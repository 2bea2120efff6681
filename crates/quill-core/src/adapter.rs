//! Engine adapter: turns operations into engine invocations and classifies
//! the results.
//!
//! Every call is synchronous and bounded by the configured timeout. Failures
//! of any kind (timeout, missing binary, unexpected output) come back as a
//! [`CommandOutcome`] with `success == false`; the adapter itself never errors.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::QuillConfig;
use crate::protocol::{passthrough_text, CommandOutcome, Invocation, Operation, TIMEOUT_MESSAGE};
use crate::runner::{CommandRunner, ProcessRunner, RawOutput, RunError};

/// Invokes the external engine.
#[derive(Clone)]
pub struct EngineAdapter {
    executable: PathBuf,
    root: PathBuf,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for EngineAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineAdapter")
            .field("executable", &self.executable)
            .field("root", &self.root)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl EngineAdapter {
    /// Create an adapter running `executable` inside `root`.
    pub fn new(executable: impl Into<PathBuf>, root: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            executable: executable.into(),
            root: root.into(),
            timeout,
            runner: Arc::new(ProcessRunner::new()),
        }
    }

    pub fn from_config(config: &QuillConfig) -> Self {
        Self::new(&config.engine.executable, &config.root, config.engine.timeout())
    }

    /// Replace the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a mutating operation and classify its output.
    pub fn execute(&self, operation: Operation, invocation: &Invocation) -> CommandOutcome {
        match self.invoke(operation, invocation) {
            Ok(output) => {
                let outcome = CommandOutcome::classify(operation, &output.stdout, &output.stderr);
                tracing::debug!(
                    op = %operation,
                    success = outcome.success,
                    phrase = operation.expected_phrase().unwrap_or_default(),
                    "classified engine output"
                );
                outcome
            }
            Err(outcome) => outcome,
        }
    }

    /// Run `status` or `log` and return its text.
    ///
    /// The outcome is successful whenever the engine ran to completion; the
    /// message is stdout, else stderr, else empty.
    pub fn text(&self, operation: Operation, invocation: &Invocation) -> CommandOutcome {
        match self.invoke(operation, invocation) {
            Ok(output) => CommandOutcome::ok(passthrough_text(&output.stdout, &output.stderr)),
            Err(outcome) => outcome,
        }
    }

    fn invoke(&self, operation: Operation, invocation: &Invocation) -> Result<RawOutput, CommandOutcome> {
        let args = invocation.args(operation);
        let program = self.program();
        tracing::debug!(program = %program.display(), ?args, cwd = %self.root.display(), "invoking engine");

        let started = Instant::now();
        let result = self.runner.run(&program, &args, &self.root, self.timeout);
        tracing::debug!(op = %operation, elapsed = ?started.elapsed(), "engine returned");

        result.map_err(|err| match err {
            RunError::TimedOut(after) => {
                tracing::warn!(op = %operation, "engine timed out after {:?}", after);
                CommandOutcome::failed(TIMEOUT_MESSAGE)
            }
            RunError::Spawn(message) | RunError::Wait(message) => {
                tracing::warn!(op = %operation, "{}", message);
                CommandOutcome::failed(message)
            }
        })
    }

    /// Relative paths with a directory part (`./myvcs`, `bin/myvcs`) resolve
    /// against the root; bare names are looked up on `PATH`.
    fn program(&self) -> PathBuf {
        let has_dir = self
            .executable
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty());
        if self.executable.is_relative() && has_dir {
            self.root.join(&self.executable)
        } else {
            self.executable.clone()
        }
    }
}
