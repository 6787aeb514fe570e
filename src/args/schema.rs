//! Parameters of the `schema` commands.

use super::{ArgsBuilder, RunContext, Vars, SQL_FORMAT};
use crate::outcome::ExecError;

fn required<'a>(
    command: &'static str,
    flag: &str,
    value: Option<&'a str>,
) -> Result<&'a str, ExecError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ExecError::invalid_params(
            command,
            format!("missing required flag {flag}"),
        )),
    }
}

/// Parameters of `schema apply`.
#[derive(Debug, Clone, Default)]
pub struct SchemaApplyParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub dev_url: Option<String>,
    pub url: Option<String>,
    pub to: Option<String>,
    pub tx_mode: Option<String>,
    pub exclude: Vec<String>,
    pub schema: Vec<String>,
    /// Print the plan only. Otherwise `--auto-approve` is passed.
    pub dry_run: bool,
}

impl SchemaApplyParams {
    /// Build the argument vector.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        ArgsBuilder::new(&["schema", "apply"])
            .json()
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .opt("--url", self.url.as_deref())
            .opt("--to", self.to.as_deref())
            .switch("--dry-run", self.dry_run)
            .switch("--auto-approve", !self.dry_run)
            .opt("--tx-mode", self.tx_mode.as_deref())
            .opt("--dev-url", self.dev_url.as_deref())
            .list("--schema", &self.schema)
            .list("--exclude", &self.exclude)
            .extend(self.vars.as_args())
            .build()
    }
}

/// Parameters of `schema inspect`.
#[derive(Debug, Clone, Default)]
pub struct SchemaInspectParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    /// Output format. `"sql"` is shorthand for the SQL template.
    pub format: Option<String>,
    pub dev_url: Option<String>,
    pub url: Option<String>,
    pub exclude: Vec<String>,
    pub schema: Vec<String>,
}

impl SchemaInspectParams {
    /// Build the argument vector.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let format = match self.format.as_deref() {
            Some("sql") => Some(SQL_FORMAT),
            other => other,
        };
        ArgsBuilder::new(&["schema", "inspect"])
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .opt("--url", self.url.as_deref())
            .opt("--dev-url", self.dev_url.as_deref())
            .opt("--format", format)
            .list("--schema", &self.schema)
            .list("--exclude", &self.exclude)
            .extend(self.vars.as_args())
            .build()
    }
}

/// Parameters of `schema test`.
#[derive(Debug, Clone, Default)]
pub struct SchemaTestParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub dev_url: Option<String>,
    pub url: Option<String>,
    pub run: Option<String>,
}

impl SchemaTestParams {
    /// Build the argument vector.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        ArgsBuilder::new(&["schema", "test"])
            .opt("--env", self.env.as_deref())
            .opt("--config", self.config_url.as_deref())
            .opt("--url", self.url.as_deref())
            .opt("--dev-url", self.dev_url.as_deref())
            .opt("--run", self.run.as_deref())
            .extend(self.vars.as_args())
            .build()
    }
}

/// Parameters of `schema plan`.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlanParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub repo: Option<String>,
    pub name: Option<String>,
    /// Save the plan file locally.
    pub save: bool,
    /// Push the plan to the registry.
    pub push: bool,
    /// Push the plan in pending state.
    pub pending: bool,
    /// Print the plan only. Otherwise `--auto-approve` is passed.
    pub dry_run: bool,
}

impl SchemaPlanParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        Ok(ArgsBuilder::new(&["schema", "plan"])
            .json()
            .opt("--config", self.config_url.as_deref())
            .opt("--env", self.env.as_deref())
            .extend(self.vars.as_args())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .list("--from", &self.from)
            .list("--to", &self.to)
            .opt("--name", self.name.as_deref())
            .opt("--repo", self.repo.as_deref())
            .switch("--save", self.save)
            .switch("--push", self.push)
            .switch("--pending", self.pending)
            .switch("--dry-run", self.dry_run)
            .switch("--auto-approve", !self.dry_run)
            .build())
    }
}

/// Parameters of `schema plan list`.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlanListParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub repo: Option<String>,
    /// List only pending plans.
    pub pending: bool,
}

impl SchemaPlanListParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        Ok(ArgsBuilder::new(&["schema", "plan", "list"])
            .json()
            .opt("--config", self.config_url.as_deref())
            .opt("--env", self.env.as_deref())
            .extend(self.vars.as_args())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .list("--from", &self.from)
            .list("--to", &self.to)
            .opt("--repo", self.repo.as_deref())
            .switch("--pending", self.pending)
            .switch("--auto-approve", true)
            .build())
    }
}

/// Parameters of `schema plan push`.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlanPushParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub repo: Option<String>,
    /// Push the plan in pending state instead of approving it.
    pub pending: bool,
    /// Plan file to push. Required.
    pub file: Option<String>,
}

impl SchemaPlanPushParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without `file`, or
    /// `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        const CMD: &str = "schema plan push";
        let builder = ArgsBuilder::new(&["schema", "plan", "push"])
            .json()
            .opt("--config", self.config_url.as_deref())
            .opt("--env", self.env.as_deref())
            .extend(self.vars.as_args())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .list("--from", &self.from)
            .list("--to", &self.to);
        let file = required(CMD, "--file", self.file.as_deref())?;
        Ok(builder
            .flag("--file", file)
            .opt("--repo", self.repo.as_deref())
            .switch("--pending", self.pending)
            .switch("--auto-approve", !self.pending)
            .build())
    }
}

/// Parameters of `schema plan pull`.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlanPullParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    /// Plan URL. Required.
    pub url: Option<String>,
}

impl SchemaPlanPullParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without `url`.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        let url = required("schema plan pull", "--url", self.url.as_deref())?;
        Ok(ArgsBuilder::new(&["schema", "plan", "pull"])
            .opt("--config", self.config_url.as_deref())
            .opt("--env", self.env.as_deref())
            .extend(self.vars.as_args())
            .flag("--url", url)
            .build())
    }
}

/// Parameters of `schema plan lint`.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlanLintParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub repo: Option<String>,
    /// Plan file to lint. Required.
    pub file: Option<String>,
}

impl SchemaPlanLintParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without `file`, or
    /// `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        let file = required("schema plan lint", "--file", self.file.as_deref())?;
        Ok(ArgsBuilder::new(&["schema", "plan", "lint"])
            .json()
            .opt("--config", self.config_url.as_deref())
            .opt("--env", self.env.as_deref())
            .extend(self.vars.as_args())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .list("--from", &self.from)
            .list("--to", &self.to)
            .flag("--file", file)
            .opt("--repo", self.repo.as_deref())
            .switch("--auto-approve", true)
            .build())
    }
}

/// Parameters of `schema plan validate`.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlanValidateParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    pub context: Option<RunContext>,
    pub dev_url: Option<String>,
    pub from: Vec<String>,
    pub to: Vec<String>,
    pub repo: Option<String>,
    pub name: Option<String>,
    /// Plan file to validate. Required.
    pub file: Option<String>,
}

impl SchemaPlanValidateParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without `file`, or
    /// `ExecError::Json` if the run context cannot be encoded.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        let file = required("schema plan validate", "--file", self.file.as_deref())?;
        Ok(ArgsBuilder::new(&["schema", "plan", "validate"])
            .opt("--config", self.config_url.as_deref())
            .opt("--env", self.env.as_deref())
            .extend(self.vars.as_args())
            .context(self.context.as_ref())?
            .opt("--dev-url", self.dev_url.as_deref())
            .list("--from", &self.from)
            .list("--to", &self.to)
            .flag("--file", file)
            .opt("--name", self.name.as_deref())
            .opt("--repo", self.repo.as_deref())
            .switch("--auto-approve", true)
            .build())
    }
}

/// Parameters of `schema plan approve`.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlanApproveParams {
    pub config_url: Option<String>,
    pub env: Option<String>,
    pub vars: Vars,
    /// Plan URL. Required.
    pub url: Option<String>,
}

impl SchemaPlanApproveParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` without `url`.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        let url = required("schema plan approve", "--url", self.url.as_deref())?;
        Ok(ArgsBuilder::new(&["schema", "plan", "approve"])
            .json()
            .opt("--config", self.config_url.as_deref())
            .opt("--env", self.env.as_deref())
            .extend(self.vars.as_args())
            .flag("--url", url)
            .build())
    }
}
