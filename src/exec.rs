//! Execution engine: runs resolved invocations through the platform shell.
//!
//! Two modes. `Launch` starts a detached process and reports immediately;
//! `Capture` runs synchronously with a hard timeout, captured output, and
//! a stdout cap. A non-zero exit code is a reported failure, not an error:
//! only spawn failures and timeouts surface as `ExecError`, and neither
//! terminates the session.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Hard timeout applied to capture-mode execution.
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum captured stdout length, in characters.
pub const MAX_STDOUT_CHARS: usize = 12_000;

/// Marker appended when stdout exceeds [`MAX_STDOUT_CHARS`].
pub const TRUNCATION_MARKER: &str = "\n... (output truncated)";

/// How an invocation is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    /// Fire-and-forget application launch; no waiting, no capture.
    Launch,
    /// Synchronous execution with output capture and timeout.
    Capture,
}

/// A fully resolved command ready for the engine, carrying a snapshot of
/// the working directory at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInvocation {
    pub command: String,
    pub mode: ExecMode,
    pub cwd: PathBuf,
}

impl ShellInvocation {
    #[must_use]
    pub fn capture(command: impl Into<String>, cwd: PathBuf) -> Self {
        Self { command: command.into(), mode: ExecMode::Capture, cwd }
    }

    #[must_use]
    pub fn launch(command: impl Into<String>, cwd: PathBuf) -> Self {
        Self { command: command.into(), mode: ExecMode::Launch, cwd }
    }
}

/// Captured result of a capture-mode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutput {
    /// Captured stdout, possibly truncated (see `truncated`).
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    /// Whether stdout was cut at the cap and the marker appended.
    pub truncated: bool,
}

impl CaptureOutput {
    /// `true` when the command exited with code 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Outcome of dispatching an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    /// Launch mode: the process was started and left running.
    Launched,
    /// Capture mode: the process ran to completion (any exit code).
    Completed(CaptureOutput),
}

/// Failures that abort a single invocation. None of these escalate past
/// the command that caused them.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("command timed out after {timeout:?}: {command}")]
    Timeout { command: String, timeout: Duration },

    #[error("failed to run command: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Platform shell used to interpret invocation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// The shell executable (e.g. "sh" or "cmd.exe").
    pub command: String,
    /// Arguments placed before the command string (e.g. ["-c"] or ["/C"]).
    pub args: Vec<String>,
}

#[cfg(unix)]
impl Default for ShellConfig {
    fn default() -> Self {
        Self { command: "sh".to_string(), args: vec!["-c".to_string()] }
    }
}

#[cfg(windows)]
impl Default for ShellConfig {
    fn default() -> Self {
        Self { command: "cmd.exe".to_string(), args: vec!["/C".to_string()] }
    }
}

/// Execution engine. Owns the shell configuration and the capture limits;
/// the defaults are the fixed production values.
pub struct Executor {
    shell: ShellConfig,
    timeout: Duration,
    max_stdout_chars: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            shell: ShellConfig::default(),
            timeout: CAPTURE_TIMEOUT,
            max_stdout_chars: MAX_STDOUT_CHARS,
        }
    }
}

impl Executor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the capture timeout. Test seam.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the stdout cap. Test seam.
    #[must_use]
    pub fn with_max_stdout_chars(mut self, max: usize) -> Self {
        self.max_stdout_chars = max;
        self
    }

    /// Dispatches an invocation according to its mode.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Spawn`] when the shell cannot be started and
    /// [`ExecError::Timeout`] when a capture run exceeds the timeout (the
    /// child is killed). A non-zero exit code is not an error; inspect the
    /// returned [`CaptureOutput`].
    pub async fn run(&self, invocation: &ShellInvocation) -> Result<ExecOutcome, ExecError> {
        match invocation.mode {
            ExecMode::Launch => self.launch(invocation),
            ExecMode::Capture => self.capture(invocation).await,
        }
    }

    fn launch(&self, invocation: &ShellInvocation) -> Result<ExecOutcome, ExecError> {
        debug!(command = %invocation.command, "launching detached");
        // The child handle is dropped without kill_on_drop, so the process
        // keeps running after we return.
        let _child = Command::new(&self.shell.command)
            .args(&self.shell.args)
            .arg(&invocation.command)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        Ok(ExecOutcome::Launched)
    }

    async fn capture(&self, invocation: &ShellInvocation) -> Result<ExecOutcome, ExecError> {
        debug!(command = %invocation.command, cwd = %invocation.cwd.display(), "capturing");
        let child = Command::new(&self.shell.command)
            .args(&self.shell.args)
            .arg(&invocation.command)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // On timeout the future is dropped, which kills the child via
        // kill_on_drop.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    command = %invocation.command,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "command timed out and was killed"
                );
                return Err(ExecError::Timeout {
                    command: invocation.command.clone(),
                    timeout: self.timeout,
                });
            }
        };

        let raw_stdout = String::from_utf8_lossy(&output.stdout);
        let stdout_trimmed = raw_stdout.trim_end();
        let (stdout, truncated) = if stdout_trimmed.chars().count() > self.max_stdout_chars {
            warn!(
                original_chars = stdout_trimmed.chars().count(),
                cap = self.max_stdout_chars,
                "stdout truncated"
            );
            let mut cut: String = stdout_trimmed.chars().take(self.max_stdout_chars).collect();
            cut.push_str(TRUNCATION_MARKER);
            (cut, true)
        } else {
            (stdout_trimmed.to_string(), false)
        };

        Ok(ExecOutcome::Completed(CaptureOutput {
            stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            truncated,
        }))
    }
}
