//! Bounded execution of the external engine process.
//!
//! [`ProcessRunner`] spawns the engine with piped output, drains both pipes
//! on helper threads and polls the child until it exits or the deadline
//! passes. A child that outlives its deadline is killed and reaped before
//! [`CommandRunner::run`] returns, so no engine process survives a timeout.
//!
//! The [`CommandRunner`] trait is the seam used by the adapter; tests plug in
//! scripted runners without spawning anything.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

/// How often the child is polled while waiting.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long pipe output is awaited after the child exits, even past the deadline.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Captured output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process exited normally. Informational only.
    pub exit_code: Option<i32>,
}

/// Invocation-level failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The deadline passed; the process was killed and reaped.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    /// The process could not be started (missing binary, permissions).
    #[error("{0}")]
    Spawn(String),

    /// Waiting on the process failed.
    #[error("{0}")]
    Wait(String),
}

/// Runs a program to completion within a time budget.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` in `cwd`, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::TimedOut`] if the program is still running after
    /// `timeout`, and [`RunError::Spawn`] if it cannot be started.
    fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<RawOutput, RunError>;
}

/// [`CommandRunner`] backed by `std::process`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    poll_interval: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn wait_until(&self, child: &mut Child, deadline: Instant) -> Result<Option<ExitStatus>, RunError> {
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(Some(status)),
                Ok(None) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Ok(None);
                    }
                    thread::sleep(self.poll_interval.min(deadline - now));
                }
                Err(e) => {
                    terminate(child);
                    return Err(RunError::Wait(format!("Failed to wait for engine: {e}")));
                }
            }
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<RawOutput, RunError> {
        let started = Instant::now();
        let deadline = started + timeout;

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RunError::Spawn(format!("Failed to start {}: {}", program.display(), e)))?;

        let stdout_rx = drain(child.stdout.take());
        let stderr_rx = drain(child.stderr.take());

        let status = match self.wait_until(&mut child, deadline)? {
            Some(status) => status,
            None => {
                terminate(&mut child);
                tracing::warn!(
                    program = %program.display(),
                    ?args,
                    "engine exceeded {:?}, killed",
                    timeout
                );
                return Err(RunError::TimedOut(timeout));
            }
        };

        // A grandchild may still hold the pipes open; wait for them only until
        // the deadline or the drain grace, whichever is later.
        let stdout = collect(&stdout_rx, deadline);
        let stderr = collect(&stderr_rx, deadline);

        tracing::debug!(
            program = %program.display(),
            code = ?status.code(),
            elapsed = ?started.elapsed(),
            "engine finished"
        );

        Ok(RawOutput {
            stdout,
            stderr,
            exit_code: status.code(),
        })
    }
}

/// Kill and reap a child. Errors mean it already exited.
fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Read a pipe to the end on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    match pipe {
        Some(mut pipe) => {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = pipe.read_to_end(&mut buf);
                let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
            });
        }
        None => {
            let _ = tx.send(String::new());
        }
    }
    rx
}

fn collect(rx: &Receiver<String>, deadline: Instant) -> String {
    let remaining = deadline.saturating_duration_since(Instant::now());
    rx.recv_timeout(remaining.max(DRAIN_GRACE)).unwrap_or_default()
}
