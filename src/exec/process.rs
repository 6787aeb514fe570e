//! Atlas CLI process execution.
//!
//! An [`Invocation`] describes one run of the tool. A [`Runner`] turns it
//! into a [`RawOutcome`]: the exit state plus the two captured output
//! streams. [`ProcessRunner`] is the real implementation; it runs the child
//! in its own process group so that cancellation can take down anything the
//! tool spawned.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio_util::sync::CancellationToken;

use super::env::{Environ, DEFAULT_ENVS};
use crate::outcome::ExecError;

/// Default grace period between SIGTERM and SIGKILL on cancellation.
pub const DEFAULT_TERMINATE_GRACE: Duration = Duration::ZERO;

/// How a process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Exit code zero.
    Success,
    /// Any other termination. `code` is `None` when killed by a signal.
    Failure { code: Option<i32> },
}

impl ExitState {
    /// Whether the process exited successfully.
    #[must_use]
    pub fn success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Numeric exit code, when the platform reported one.
    #[must_use]
    pub fn code(self) -> Option<i32> {
        match self {
            Self::Success => Some(0),
            Self::Failure { code } => code,
        }
    }
}

impl From<ExitStatus> for ExitState {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            Self::Success
        } else {
            Self::Failure {
                code: status.code(),
            }
        }
    }
}

/// The raw facts of a completed invocation.
///
/// Both streams are trimmed of surrounding whitespace on construction, so an
/// "empty" stream is one with nothing but whitespace in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOutcome {
    exit: ExitState,
    stdout: String,
    stderr: String,
}

impl RawOutcome {
    /// Build an outcome from already-decoded text.
    #[must_use]
    pub fn new(exit: ExitState, stdout: impl AsRef<str>, stderr: impl AsRef<str>) -> Self {
        Self {
            exit,
            stdout: stdout.as_ref().trim().to_string(),
            stderr: stderr.as_ref().trim().to_string(),
        }
    }

    /// Build an outcome from captured bytes. Invalid UTF-8 is replaced.
    #[must_use]
    pub fn from_bytes(exit: ExitState, stdout: &[u8], stderr: &[u8]) -> Self {
        Self::new(
            exit,
            String::from_utf8_lossy(stdout),
            String::from_utf8_lossy(stderr),
        )
    }

    #[must_use]
    pub fn exit(&self) -> ExitState {
        self.exit
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    /// Take the stdout text, dropping the rest.
    #[must_use]
    pub fn into_stdout(self) -> String {
        self.stdout
    }
}

/// One run of the Atlas CLI.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    dir: Option<PathBuf>,
    env: Environ,
    timeout: Option<Duration>,
}

impl Invocation {
    /// Create an invocation.
    ///
    /// The environment is `base` with [`DEFAULT_ENVS`] applied on top.
    #[must_use]
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<String>,
        dir: Option<PathBuf>,
        base: &Environ,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            dir,
            env: base.merged(DEFAULT_ENVS),
            timeout: None,
        }
    }

    /// Limit how long the process may run.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    #[must_use]
    pub fn env(&self) -> &Environ {
        &self.env
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Render the command as a shell-escaped line, for logs.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut parts = vec![shell_escape::escape(self.program.to_string_lossy())];
        parts.extend(
            self.args
                .iter()
                .map(|a| shell_escape::escape(Cow::Borrowed(a.as_str()))),
        );
        parts.join(" ")
    }
}

/// Executes invocations.
#[async_trait]
pub trait Runner: Send + Sync + std::fmt::Debug {
    /// Run the invocation to completion or until `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Spawn` if the process cannot start,
    /// `ExecError::Cancelled` or `ExecError::TimedOut` if it was stopped,
    /// and `ExecError::Io` if its output could not be read.
    async fn run(
        &self,
        invocation: &Invocation,
        cancel: &CancellationToken,
    ) -> Result<RawOutcome, ExecError>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    terminate_grace: Duration,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self {
            terminate_grace: DEFAULT_TERMINATE_GRACE,
        }
    }

    /// Wait this long after SIGTERM before sending SIGKILL.
    #[must_use]
    pub fn terminate_grace(mut self, grace: Duration) -> Self {
        self.terminate_grace = grace;
        self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .env_clear()
            .envs(invocation.env.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(ref dir) = invocation.dir {
            cmd.current_dir(dir);
        }

        // Own process group, so the whole tree can be signalled at once.
        #[cfg(unix)]
        cmd.process_group(0);

        cmd
    }

    /// Drain both streams and wait for exit.
    async fn collect(
        child: &mut Child,
        mut stdout: ChildStdout,
        mut stderr: ChildStderr,
    ) -> Result<RawOutcome, ExecError> {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let (out_res, err_res, status) = tokio::join!(
            stdout.read_to_end(&mut out),
            stderr.read_to_end(&mut err),
            child.wait(),
        );
        out_res?;
        err_res?;
        let status = status?;
        Ok(RawOutcome::from_bytes(status.into(), &out, &err))
    }

    /// Stop the process group and reap the child.
    async fn terminate(&self, child: &mut Child) {
        #[cfg(unix)]
        if let Some(pid) = child.id() {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            let pgid = Pid::from_raw(i32::try_from(pid).unwrap_or(i32::MAX));
            if !self.terminate_grace.is_zero() {
                let _ = killpg(pgid, Signal::SIGTERM);
                if tokio::time::timeout(self.terminate_grace, child.wait())
                    .await
                    .is_ok()
                {
                    // Leader exited; sweep whatever is left in the group.
                    let _ = killpg(pgid, Signal::SIGKILL);
                    return;
                }
            }
            let _ = killpg(pgid, Signal::SIGKILL);
        }

        if let Err(e) = child.kill().await {
            tracing::debug!(error = %e, "Child already gone");
        }
    }
}

#[async_trait]
impl Runner for ProcessRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        cancel: &CancellationToken,
    ) -> Result<RawOutcome, ExecError> {
        if cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }

        tracing::debug!(
            command = %invocation.command_line(),
            dir = ?invocation.dir,
            "Running atlas command"
        );

        let mut child = Self::command(invocation)
            .spawn()
            .map_err(|e| ExecError::spawn(&invocation.program, e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("stderr was not captured"))?;

        let timeout = invocation.timeout;
        let deadline = async {
            match timeout {
                Some(t) => tokio::time::sleep(t).await,
                None => std::future::pending().await,
            }
        };

        let interrupted = tokio::select! {
            res = Self::collect(&mut child, stdout, stderr) => {
                let outcome = res?;
                tracing::debug!(
                    code = ?outcome.exit().code(),
                    stdout_len = outcome.stdout().len(),
                    stderr_len = outcome.stderr().len(),
                    "Atlas command finished"
                );
                return Ok(outcome);
            }
            () = cancel.cancelled() => ExecError::Cancelled,
            () = deadline => ExecError::TimedOut(timeout.unwrap_or_default()),
        };

        tracing::warn!(
            command = %invocation.command_line(),
            reason = %interrupted,
            "Terminating atlas command"
        );
        self.terminate(&mut child).await;
        Err(interrupted)
    }
}
