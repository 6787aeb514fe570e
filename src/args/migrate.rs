//! Parameters of the `migrate` commands.

use serde::{Deserialize, Serialize};

use super::{ArgsBuilder, DeployRunContext, RunContext, Vars};
use crate::outcome::ExecError;

/// Execution order of migration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecOrder {
    #[default]
    Linear,
    LinearSkip,
    NonLinear,
}

impl ExecOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::LinearSkip => "linear-skip",
            Self::NonLinear => "non-linear",
        }
    }
}

/// Parameters of `migrate apply`.
#[derive(Debug, Clone, Default)]
pub struct MigrateApplyParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<DeployRunContext>,
    pub dir_url: Option<String>,
    pub url: Option<String>,
    pub revisions_schema: Option<String>,
    pub baseline_version: Option<String>,
    pub tx_mode: Option<String>,
    pub exec_order: Option<ExecOrder>,
    /// Apply at most this many files; `0` applies all pending files.
    pub amount: u64,
    pub allow_dirty: bool,
    pub dry_run: bool,
}

impl MigrateApplyParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        let args = ArgsBuilder::new(&["migrate", "apply"])
            .json()
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .context(self.context.as_ref())?
            .opt("--url", self.url.as_deref())
            .opt("--dir", self.dir_url.as_deref())
            .switch("--allow-dirty", self.allow_dirty)
            .switch("--dry-run", self.dry_run)
            .opt("--revisions-schema", self.revisions_schema.as_deref())
            .opt("--baseline", self.baseline_version.as_deref())
            .opt("--tx-mode", self.tx_mode.as_deref())
            .opt("--exec-order", self.exec_order.map(ExecOrder::as_str))
            .extend(self.vars.as_args());
        let args = if self.amount > 0 {
            args.arg(self.amount.to_string())
        } else {
            args
        };
        Ok(args.build())
    }
}

/// Parameters of `migrate down`.
#[derive(Debug, Clone, Default)]
pub struct MigrateDownParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<DeployRunContext>,
    pub dev_url: Option<String>,
    pub dir_url: Option<String>,
    pub url: Option<String>,
    pub revisions_schema: Option<String>,
    pub to_version: Option<String>,
    pub to_tag: Option<String>,
    /// Revert this many files; `0` lets the tool decide.
    pub amount: u64,
}

impl MigrateDownParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        let args = ArgsBuilder::new(&["migrate", "down"])
            .json()
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .context(self.context.as_ref())?
            .opt("--url", self.url.as_deref())
            .opt("--dir", self.dir_url.as_deref())
            .opt("--dev-url", self.dev_url.as_deref())
            .opt("--revisions-schema", self.revisions_schema.as_deref())
            .opt("--to-version", self.to_version.as_deref())
            .opt("--to-tag", self.to_tag.as_deref())
            .extend(self.vars.as_args());
        let args = if self.amount > 0 {
            args.arg(self.amount.to_string())
        } else {
            args
        };
        Ok(args.build())
    }
}

/// Parameters of `migrate status`.
#[derive(Debug, Clone, Default)]
pub struct MigrateStatusParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub dir_url: Option<String>,
    pub url: Option<String>,
    pub revisions_schema: Option<String>,
}

impl MigrateStatusParams {
    /// Build the argument vector.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        ArgsBuilder::new(&["migrate", "status"])
            .json()
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .opt("--url", self.url.as_deref())
            .opt("--dir", self.dir_url.as_deref())
            .opt("--revisions-schema", self.revisions_schema.as_deref())
            .extend(self.vars.as_args())
            .build()
    }
}

/// Parameters of `migrate lint`.
#[derive(Debug, Clone, Default)]
pub struct MigrateLintParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub dir_url: Option<String>,
    pub dir_format: Option<String>,
    pub base: Option<String>,
    pub git_base: Option<String>,
    /// Lint the last `latest` files; `0` means unset.
    pub latest: u64,
    /// Custom `--format` template. JSON is requested when unset.
    pub format: Option<String>,
    /// Publish the report to Atlas Cloud.
    pub web: bool,
}

impl MigrateLintParams {
    /// Build the argument vector. `exit_code` adds `--exit-code`, making the
    /// tool exit non-zero when findings are reported.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self, exit_code: bool) -> Result<Vec<String>, ExecError> {
        let args = ArgsBuilder::new(&["migrate", "lint"]);
        let args = match self.format.as_deref() {
            Some(f) if !f.is_empty() => args.flag("--format", f),
            _ => args.json(),
        };
        Ok(args
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .opt("--dir", self.dir_url.as_deref())
            .opt("--dir-format", self.dir_format.as_deref())
            .opt("--base", self.base.as_deref())
            .opt("--git-base", self.git_base.as_deref())
            .count("--latest", self.latest)
            .switch("-w", self.web)
            .switch("--exit-code", exit_code)
            .extend(self.vars.as_args())
            .build())
    }
}

/// Parameters of `migrate push`.
#[derive(Debug, Clone, Default)]
pub struct MigratePushParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub dir_url: Option<String>,
    pub dir_format: Option<String>,
    pub lock_timeout: Option<String>,
    /// Name of the directory in the registry.
    pub name: Option<String>,
    pub tag: Option<String>,
}

impl MigratePushParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without a directory name, or
    /// `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        let name = match self.name.as_deref() {
            Some(n) if !n.is_empty() => n,
            _ => return Err(ExecError::invalid_params("migrate push", "missing required directory name")),
        };
        let target = match self.tag.as_deref() {
            Some(t) if !t.is_empty() => format!("{name}:{t}"),
            _ => name.to_string(),
        };
        Ok(ArgsBuilder::new(&["migrate", "push"])
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .opt("--dir", self.dir_url.as_deref())
            .opt("--dir-format", self.dir_format.as_deref())
            .opt("--lock-timeout", self.lock_timeout.as_deref())
            .extend(self.vars.as_args())
            .arg(target)
            .build())
    }
}

/// Parameters of `migrate test`.
#[derive(Debug, Clone, Default)]
pub struct MigrateTestParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub dir_url: Option<String>,
    pub dir_format: Option<String>,
    pub run: Option<String>,
    pub revisions_schema: Option<String>,
    /// Test files or directories. Defaults to the tool's own lookup.
    pub paths: Vec<String>,
}

impl MigrateTestParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        Ok(ArgsBuilder::new(&["migrate", "test"])
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .opt("--dir", self.dir_url.as_deref())
            .opt("--dir-format", self.dir_format.as_deref())
            .opt("--run", self.run.as_deref())
            .opt("--revisions-schema", self.revisions_schema.as_deref())
            .extend(self.vars.as_args())
            .extend(self.paths.iter().cloned())
            .build())
    }
}
