//! Typed results of Atlas CLI commands.
//!
//! Field names follow the tool's JSON output, which uses `PascalCase`.

mod account;
mod lint;
mod migrate;
mod schema;

pub use account::*;
pub use lint::*;
pub use migrate::*;
pub use schema::*;

use serde::{Deserialize, Serialize};

/// Environment information reported with most results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Env {
    /// Driver name, e.g. `sqlite3`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub driver: String,
    /// Database URL.
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Migration directory.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dir: String,
}

impl Env {
    /// The database URL, parsed.
    #[must_use]
    pub fn parsed_url(&self) -> Option<url::Url> {
        self.url.as_deref().and_then(|u| url::Url::parse(u).ok())
    }
}

/// A statement together with the error it raised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StmtError {
    /// SQL statement that failed.
    pub stmt: String,
    /// Error message as returned by the database.
    pub text: String,
}
