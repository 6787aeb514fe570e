//! Reads [`ClientConfig`] from TOML.

use std::path::{Path, PathBuf};

use super::ClientConfig;

/// Project-local config file, looked up in the current directory.
pub const LOCAL_CONFIG: &str = ".atlas-exec.toml";

/// Loads the client config from an explicit file, or from the first of
/// [`LOCAL_CONFIG`] and `<config dir>/atlas-exec/config.toml` that exists.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path` only. A missing file is an error.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Load the config, or the defaults when no file was found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<ClientConfig, ConfigError> {
        let Some(path) = self.path.clone().or_else(default_file) else {
            tracing::debug!("No config file found, using defaults");
            return Ok(ClientConfig::default());
        };
        tracing::debug!(path = %path.display(), "Loading config file");
        parse(&path)
    }
}

fn default_file() -> Option<PathBuf> {
    let user = dirs::config_dir().map(|d| d.join("atlas-exec").join("config.toml"));
    std::iter::once(PathBuf::from(LOCAL_CONFIG))
        .chain(user)
        .find(|p| p.is_file())
}

fn parse(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

/// Invalid client setup. Always raised before a process is started.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("execPath cannot be empty")]
    EmptyExecPath,

    #[error("looking up atlas-cli: {}: {source}", .path.display())]
    ExecNotFound {
        path: PathBuf,
        source: which::Error,
    },

    #[error("initializing Atlas with working dir {}: {source}", .path.display())]
    WorkingDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("atlasexec: cannot override the default environment variable {0:?}")]
    ReservedEnv(String),

    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"))
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn reads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exec_path = \"/opt/atlas\"\ninherit_env = false").unwrap();

        let config = ConfigLoader::with_path(file.path().to_path_buf())
            .load()
            .unwrap();
        assert_eq!(config.exec_path, PathBuf::from("/opt/atlas"));
        assert!(!config.inherit_env);
    }

    #[test]
    fn parse_error_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exec_path = [").unwrap();

        let err = ConfigLoader::with_path(file.path().to_path_buf())
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { ref path, .. } if path == file.path()));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }
}
