//! Typed client for the Atlas CLI.
//!
//! Every operation builds an argument vector, runs the tool once through a
//! [`Runner`], and turns the raw outcome into a typed result or an
//! [`ExecError`].

mod account;
mod copilot;
mod migrate;
mod schema;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::{ClientConfig, ConfigError};
use crate::exec::{Environ, Invocation, ProcessRunner, RawOutcome, Runner, DEFAULT_ENVS};
use crate::outcome::{expect_one, into_records, into_text, ExecError, SoftPolicy};

/// Client for the Atlas CLI.
///
/// Cloning is cheap. Clones share the runner and the cancellation token.
#[derive(Debug, Clone)]
pub struct Client {
    exec_path: PathBuf,
    working_dir: Option<PathBuf>,
    env: Environ,
    runner: Arc<dyn Runner>,
    cancel: CancellationToken,
    timeout: Option<Duration>,
}

impl Client {
    /// Create a client running `exec_path` in `working_dir`.
    ///
    /// An empty `working_dir` runs the tool in the current directory. The
    /// environment starts as a snapshot of the current process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the executable path is empty or cannot be
    /// found, or if the working directory does not exist.
    pub fn new(
        working_dir: impl Into<PathBuf>,
        exec_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let exec_path = resolve_exec(&exec_path.into())?;
        let working_dir = Some(working_dir.into()).filter(|d| !d.as_os_str().is_empty());
        if let Some(dir) = &working_dir {
            std::fs::metadata(dir).map_err(|source| ConfigError::WorkingDir {
                path: dir.clone(),
                source,
            })?;
        }
        tracing::debug!(
            exec_path = %exec_path.display(),
            working_dir = ?working_dir,
            "Created atlas client"
        );
        Ok(Self {
            exec_path,
            working_dir,
            env: Environ::from_os(),
            runner: Arc::new(ProcessRunner::new()),
            cancel: CancellationToken::new(),
            timeout: None,
        })
    }

    /// Create a client from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Same as [`Client::new`], plus `ConfigError::ReservedEnv` if the
    /// configured environment overrides a fixed variable.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        // Only the explicit table is checked. Inherited values of the fixed
        // keys are overridden when the invocation is built.
        config
            .env
            .iter()
            .collect::<Environ>()
            .check_reserved(DEFAULT_ENVS)?;
        let mut client = Self::new(
            config.working_dir.clone().unwrap_or_default(),
            config.exec_path.clone(),
        )?
        .with_runner(ProcessRunner::new().terminate_grace(config.terminate_grace()))
        .with_timeout(config.timeout());
        client.env = config.environ();
        Ok(client)
    }

    /// Replace the base environment of the tool.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReservedEnv` if `env` sets one of
    /// [`DEFAULT_ENVS`].
    pub fn with_env(mut self, env: Environ) -> Result<Self, ConfigError> {
        env.check_reserved(DEFAULT_ENVS)?;
        self.env = env;
        Ok(self)
    }

    /// A copy of this client running in `dir`.
    #[must_use]
    pub fn with_work_dir(&self, dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..self.clone()
        }
    }

    /// Stop running tools when `cancel` fires.
    ///
    /// The token is shared by every call and every clone of this client.
    /// Once it fired, calls fail with `ExecError::Cancelled` without starting
    /// the tool; install a fresh token to use the client again.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Kill the tool after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use another runner, e.g. to script outcomes in tests.
    #[must_use]
    pub fn with_runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    #[must_use]
    pub fn exec_path(&self) -> &Path {
        &self.exec_path
    }

    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    #[must_use]
    pub fn env(&self) -> &Environ {
        &self.env
    }

    #[must_use]
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    async fn run(&self, args: Vec<String>) -> Result<RawOutcome, ExecError> {
        if self.cancel.is_cancelled() {
            return Err(ExecError::Cancelled);
        }
        let invocation = Invocation::new(
            self.exec_path.clone(),
            args,
            self.working_dir.clone(),
            &self.env,
        )
        .with_timeout(self.timeout);
        self.runner.run(&invocation, &self.cancel).await
    }

    /// Run the tool and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns the executor error, or `ExecError::Tool` unless the run was
    /// clean.
    pub async fn invoke(&self, args: Vec<String>) -> Result<String, ExecError> {
        into_text(self.run(args).await?)
    }

    /// Run the tool and decode every JSON record it printed.
    ///
    /// # Errors
    ///
    /// Returns the executor error, or the error matching the outcome class.
    pub async fn invoke_many<T: DeserializeOwned>(
        &self,
        args: Vec<String>,
        soft: SoftPolicy,
    ) -> Result<Vec<T>, ExecError> {
        into_records(self.run(args).await?, soft)
    }

    /// Run the tool and decode exactly one JSON record.
    ///
    /// # Errors
    ///
    /// Same as [`Client::invoke_many`], plus `ExecError::Cardinality`.
    pub async fn invoke_one<T: DeserializeOwned>(
        &self,
        args: Vec<String>,
        soft: SoftPolicy,
    ) -> Result<T, ExecError> {
        expect_one(self.invoke_many(args, soft).await?)
    }
}

/// Resolve the executable the way a shell would: paths are checked as is,
/// bare names are searched in `PATH`.
fn resolve_exec(exec_path: &Path) -> Result<PathBuf, ConfigError> {
    if exec_path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyExecPath);
    }
    which::which(exec_path).map_err(|source| ConfigError::ExecNotFound {
        path: exec_path.to_path_buf(),
        source,
    })
}
