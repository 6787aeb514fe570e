//! Error taxonomy for Atlas CLI invocations.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::classify::record_error;
use crate::config::ConfigError;
use crate::exec::RawOutcome;

/// Exit code reported when no process-level exit information exists.
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Fieldless discriminant of [`ExecError`], for branching without matching
/// on payloads or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    InvalidParams,
    Spawn,
    Cancelled,
    TimedOut,
    Tool,
    MalformedOutput,
    PartialFailure,
    SoftFailure,
    Cardinality,
    Io,
    Json,
}

/// Errors returned by client operations.
#[derive(thiserror::Error, Debug)]
pub enum ExecError {
    /// Invalid client setup. Raised before any process starts.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Parameters are missing a required value.
    #[error("atlasexec: command {command:?} has invalid parameters: {message}")]
    InvalidParams {
        command: &'static str,
        message: String,
    },

    /// The process could not be started.
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The caller cancelled the call while the process was running.
    #[error("atlas command cancelled")]
    Cancelled,

    /// The process ran longer than the configured timeout.
    #[error("atlas command timed out after {0:?}")]
    TimedOut(Duration),

    /// The tool reported a usage, configuration or runtime fault on stderr.
    #[error("{0}")]
    Tool(ToolError),

    /// Stdout was not the JSON the operation expected.
    #[error("unexpected output format from atlas: {}", malformed_detail(.stdout, .source.as_ref()))]
    MalformedOutput {
        stdout: String,
        stderr: String,
        code: Option<i32>,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Some targets failed. Carries every decoded record.
    #[error("{0}")]
    PartialFailure(PartialFailure),

    /// The operation completed but reported findings, e.g. lint diagnostics.
    #[error("atlas reported findings")]
    SoftFailure { stdout: String, code: Option<i32> },

    /// A single-target operation returned a different number of records.
    #[error("expected exactly one result, got {count}")]
    Cardinality { count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn malformed_detail(stdout: &str, source: Option<&serde_json::Error>) -> String {
    match (stdout.is_empty(), source) {
        (true, _) => "empty output".to_string(),
        (false, Some(e)) => format!("{e}: {stdout}"),
        (false, None) => stdout.to_string(),
    }
}

impl ExecError {
    pub(crate) fn spawn(program: &Path, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.to_path_buf(),
            source,
        }
    }

    pub(crate) fn invalid_params(command: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParams {
            command,
            message: message.into(),
        }
    }

    pub(crate) fn tool(raw: RawOutcome) -> Self {
        let code = raw.exit().code();
        Self::Tool(ToolError {
            stdout: raw.stdout().to_string(),
            stderr: raw.stderr().to_string(),
            code,
        })
    }

    pub(crate) fn malformed(raw: &RawOutcome, source: Option<serde_json::Error>) -> Self {
        Self::MalformedOutput {
            stdout: raw.stdout().to_string(),
            stderr: raw.stderr().to_string(),
            code: raw.exit().code(),
            source,
        }
    }

    pub(crate) fn partial(raw: &RawOutcome, records: Vec<Value>) -> Self {
        Self::PartialFailure(PartialFailure {
            records,
            stdout: raw.stdout().to_string(),
            code: raw.exit().code(),
        })
    }

    pub(crate) fn soft(raw: RawOutcome) -> Self {
        let code = raw.exit().code();
        Self::SoftFailure {
            stdout: raw.into_stdout(),
            code,
        }
    }

    /// The kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::InvalidParams { .. } => ErrorKind::InvalidParams,
            Self::Spawn { .. } => ErrorKind::Spawn,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::TimedOut(_) => ErrorKind::TimedOut,
            Self::Tool(_) => ErrorKind::Tool,
            Self::MalformedOutput { .. } => ErrorKind::MalformedOutput,
            Self::PartialFailure(_) => ErrorKind::PartialFailure,
            Self::SoftFailure { .. } => ErrorKind::SoftFailure,
            Self::Cardinality { .. } => ErrorKind::Cardinality,
            Self::Io(_) => ErrorKind::Io,
            Self::Json(_) => ErrorKind::Json,
        }
    }

    /// Whether this is the soft-failure marker.
    #[must_use]
    pub fn is_soft_failure(&self) -> bool {
        self.kind() == ErrorKind::SoftFailure
    }

    /// Raw stdout of the process, or `""` when there was none.
    #[must_use]
    pub fn stdout(&self) -> &str {
        match self {
            Self::Tool(e) => &e.stdout,
            Self::MalformedOutput { stdout, .. } | Self::SoftFailure { stdout, .. } => stdout,
            Self::PartialFailure(p) => &p.stdout,
            _ => "",
        }
    }

    /// Raw stderr of the process, or `""` when there was none.
    #[must_use]
    pub fn stderr(&self) -> &str {
        match self {
            Self::Tool(e) => &e.stderr,
            Self::MalformedOutput { stderr, .. } => stderr,
            _ => "",
        }
    }

    /// Exit code of the process.
    ///
    /// Falls back to [`DEFAULT_EXIT_CODE`] when the process never ran, was
    /// killed by a signal, or exited with 0 but its output was rejected.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            Self::Tool(e) => e.code,
            Self::MalformedOutput { code, .. } | Self::SoftFailure { code, .. } => *code,
            Self::PartialFailure(p) => p.code,
            _ => None,
        };
        code.filter(|&c| c != 0).unwrap_or(DEFAULT_EXIT_CODE)
    }
}

/// A structural failure: the tool wrote diagnostics to stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    /// Trimmed stdout of the process.
    pub stdout: String,
    /// Trimmed stderr of the process.
    pub stderr: String,
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
}

impl ToolError {
    /// Exit code, or [`DEFAULT_EXIT_CODE`] when none was reported.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code.unwrap_or(DEFAULT_EXIT_CODE)
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stderr.is_empty() {
            f.write_str(&self.stdout)
        } else {
            f.write_str(&self.stderr)
        }
    }
}

/// A multi-target run where at least one target failed.
///
/// Records are in the order the tool emitted them. Records before the
/// failing one describe targets that succeeded.
#[derive(Debug, Clone)]
pub struct PartialFailure {
    records: Vec<Value>,
    stdout: String,
    code: Option<i32>,
}

impl PartialFailure {
    /// The decoded records, untyped.
    #[must_use]
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Decode the records into the operation's result type.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if a record does not match `T`.
    pub fn results<T: DeserializeOwned>(&self) -> Result<Vec<T>, serde_json::Error> {
        self.records
            .iter()
            .map(|r| serde_json::from_value(r.clone()))
            .collect()
    }

    /// Error text of the last record, which is where the tool reports the
    /// failure that stopped the run.
    #[must_use]
    pub fn message(&self) -> String {
        self.records
            .last()
            .and_then(record_error)
            .unwrap_or_default()
    }
}

impl fmt::Display for PartialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
