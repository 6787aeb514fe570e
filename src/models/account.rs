//! Results of account and informational commands.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Result of `atlas whoami`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WhoAmI {
    pub org: String,
}

/// Result of `atlas version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Version {
    pub version: String,
    #[serde(rename = "SHA", default, skip_serializing_if = "String::is_empty")]
    pub sha: String,
    #[serde(default)]
    pub canary: bool,
}

fn version_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^atlas version v(\d+\.\d+.\d+)-?([a-z0-9]*)?").ok())
        .as_ref()
}

impl Version {
    /// Parse the text printed by `atlas version`.
    ///
    /// Returns `None` if the text does not start with a version line.
    #[must_use]
    pub fn parse(output: &str) -> Option<Self> {
        let caps = version_re()?.captures(output)?;
        Some(Self {
            version: caps.get(1)?.as_str().to_string(),
            sha: caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            canary: output.contains("canary"),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atlas version v{}", self.version)?;
        if !self.sha.is_empty() {
            write!(f, "-{}", self.sha)?;
        }
        if self.canary {
            f.write_str("-canary")?;
        }
        Ok(())
    }
}

/// One message emitted by a one-shot Copilot session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopilotMessage {
    #[serde(rename = "sessionID", skip_serializing_if = "String::is_empty")]
    pub session_id: String,
    /// Message type. Only `"message"` is emitted today.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
}

/// Messages of a Copilot session, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Copilot(pub Vec<CopilotMessage>);

impl Copilot {
    /// Session ID reported by the first message that carries one.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.0
            .iter()
            .map(|m| m.session_id.as_str())
            .find(|s| !s.is_empty())
    }
}

impl fmt::Display for Copilot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for msg in &self.0 {
            f.write_str(&msg.content)?;
        }
        Ok(())
    }
}
