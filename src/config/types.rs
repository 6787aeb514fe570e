//! Configuration types.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::exec::Environ;

/// Client configuration, usually loaded from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Path or name of the Atlas executable.
    pub exec_path: PathBuf,
    /// Directory the tool runs in. Defaults to the current directory.
    pub working_dir: Option<PathBuf>,
    /// Start from the current process environment.
    pub inherit_env: bool,
    /// Extra environment variables for the tool.
    pub env: BTreeMap<String, String>,
    /// Kill the tool after this many seconds.
    pub timeout_secs: Option<u64>,
    /// Milliseconds between SIGTERM and SIGKILL when stopping the tool.
    pub terminate_grace_ms: u64,
}

fn default_exec_path() -> PathBuf {
    PathBuf::from("atlas")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            exec_path: default_exec_path(),
            working_dir: None,
            inherit_env: true,
            env: BTreeMap::new(),
            timeout_secs: None,
            terminate_grace_ms: 0,
        }
    }
}

impl ClientConfig {
    /// The configured timeout.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// The configured termination grace period.
    #[must_use]
    pub fn terminate_grace(&self) -> Duration {
        Duration::from_millis(self.terminate_grace_ms)
    }

    /// The base environment described by this config.
    #[must_use]
    pub fn environ(&self) -> Environ {
        let mut env = if self.inherit_env {
            Environ::from_os()
        } else {
            Environ::new()
        };
        for (k, v) in &self.env {
            env.insert(k.as_str(), v.as_str());
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.exec_path, PathBuf::from("atlas"));
        assert!(config.inherit_env);
        assert!(config.timeout().is_none());
        assert!(config.terminate_grace().is_zero());
    }

    #[test]
    fn test_client_config_deserialize_partial() {
        let config: ClientConfig = toml::from_str(
            r#"
            exec_path = "/usr/local/bin/atlas"
            timeout_secs = 30

            [env]
            DB_URL = "sqlite://file?mode=memory"
            "#,
        )
        .unwrap();
        assert_eq!(config.exec_path, PathBuf::from("/usr/local/bin/atlas"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.env.get("DB_URL").map(String::as_str),
            Some("sqlite://file?mode=memory")
        );
        assert!(config.inherit_env);
    }

    #[test]
    fn test_environ_without_inherit() {
        let config = ClientConfig {
            inherit_env: false,
            env: [("A".to_string(), "1".to_string())].into_iter().collect(),
            ..Default::default()
        };
        let env = config.environ();
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("A"), Some("1"));
    }
}
