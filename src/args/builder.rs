//! Incremental argument vector construction.

use serde::Serialize;

/// Value of `--format` that makes the tool print JSON records.
pub const JSON_FORMAT: &str = "{{ json . }}";

/// Value of `--format` that makes `schema inspect` print SQL.
pub const SQL_FORMAT: &str = "{{ sql . }}";

/// Builds an argument vector, skipping unset values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgsBuilder {
    args: Vec<String>,
}

impl ArgsBuilder {
    /// Start with the command words, e.g. `["migrate", "apply"]`.
    #[must_use]
    pub fn new(command: &[&str]) -> Self {
        Self {
            args: command.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Request JSON output.
    #[must_use]
    pub fn json(self) -> Self {
        self.flag("--format", JSON_FORMAT)
    }

    /// Append `name value`.
    #[must_use]
    pub fn flag(mut self, name: &str, value: impl Into<String>) -> Self {
        self.args.push(name.to_string());
        self.args.push(value.into());
        self
    }

    /// Append `name value` when the value is set and non-empty.
    #[must_use]
    pub fn opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.flag(name, v),
            _ => self,
        }
    }

    /// Append `name` alone when `on`.
    #[must_use]
    pub fn switch(mut self, name: &str, on: bool) -> Self {
        if on {
            self.args.push(name.to_string());
        }
        self
    }

    /// Append `name a,b,c` when the list is non-empty.
    #[must_use]
    pub fn list(self, name: &str, values: &[String]) -> Self {
        if values.is_empty() {
            self
        } else {
            self.flag(name, values.join(","))
        }
    }

    /// Append `name a name b ...` for every value.
    #[must_use]
    pub fn repeat(mut self, name: &str, values: &[String]) -> Self {
        for v in values {
            self.args.push(name.to_string());
            self.args.push(v.clone());
        }
        self
    }

    /// Append `name n` when `n` is non-zero.
    #[must_use]
    pub fn count(self, name: &str, n: u64) -> Self {
        if n == 0 {
            self
        } else {
            self.flag(name, n.to_string())
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Append pre-built tokens.
    #[must_use]
    pub fn extend(mut self, tokens: impl IntoIterator<Item = String>) -> Self {
        self.args.extend(tokens);
        self
    }

    /// Append `--context <json>` when a run context is given.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json::Error` if the context cannot be encoded.
    pub fn context<T: Serialize>(self, context: Option<&T>) -> Result<Self, serde_json::Error> {
        match context {
            Some(c) => Ok(self.flag("--context", serde_json::to_string(c)?)),
            None => Ok(self),
        }
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Vec<String> {
        self.args
    }
}
