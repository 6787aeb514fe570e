//! Parameters of the account and copilot commands.

use super::ArgsBuilder;
use crate::outcome::ExecError;

/// Parameters of `login`.
#[derive(Debug, Clone, Default)]
pub struct LoginParams {
    pub token: String,
}

impl LoginParams {
    /// Build the argument vector.
    ///
    /// # Errors
    ///
    /// Returns `ExecError::InvalidParams` when the token is empty.
    pub fn build_args(&self) -> Result<Vec<String>, ExecError> {
        if self.token.is_empty() {
            return Err(ExecError::invalid_params("login", "token cannot be empty"));
        }
        Ok(ArgsBuilder::new(&["login"])
            .flag("--token", self.token.as_str())
            .build())
    }
}

/// Parameters of a one-shot `copilot` session.
#[derive(Debug, Clone, Default)]
pub struct CopilotParams {
    pub prompt: String,
    /// Resume this session.
    pub session: Option<String>,
    /// Glob of files the session may write.
    pub fs_write: Option<String>,
    /// Glob of files the session may delete.
    pub fs_delete: Option<String>,
}

impl CopilotParams {
    /// Build the argument vector.
    #[must_use]
    pub fn build_args(&self) -> Vec<String> {
        let perm = |kind: &str, glob: Option<&str>| match glob {
            Some(g) if !g.is_empty() => vec!["-p".to_string(), format!("fs.{kind}={g}")],
            _ => Vec::new(),
        };
        ArgsBuilder::new(&["copilot"])
            .flag("-q", self.prompt.as_str())
            .opt("-r", self.session.as_deref())
            .extend(perm("write", self.fs_write.as_deref()))
            .extend(perm("delete", self.fs_delete.as_deref()))
            .build()
    }
}
