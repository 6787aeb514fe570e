//! Environment handling for tool invocations.

use std::collections::BTreeMap;

use crate::config::ConfigError;

/// Operational variables that are always set on the child process.
///
/// They are applied after the caller environment, so they cannot be
/// disabled by it.
pub const DEFAULT_ENVS: &[(&str, &str)] = &[
    // Disable the update notifier and upgrade suggestions.
    ("ATLAS_NO_UPDATE_NOTIFIER", "1"),
    ("ATLAS_NO_UPGRADE_SUGGESTIONS", "1"),
];

/// A set of environment variables, kept sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ(BTreeMap<String, String>);

impl Environ {
    /// Create an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the environment of the current process.
    #[must_use]
    pub fn from_os() -> Self {
        std::env::vars_os()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect()
    }

    /// Set a variable, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Look up a variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the environment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as sorted `KEY=value` entries.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }

    /// Reject caller environments that try to set one of the fixed keys.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReservedEnv` naming the first offending key.
    pub fn check_reserved(&self, fixed: &[(&str, &str)]) -> Result<(), ConfigError> {
        match fixed.iter().find(|(k, _)| self.0.contains_key(*k)) {
            Some((k, _)) => Err(ConfigError::ReservedEnv((*k).to_string())),
            None => Ok(()),
        }
    }

    /// Merge the fixed table over this environment, producing a new one.
    #[must_use]
    pub fn merged(&self, fixed: &[(&str, &str)]) -> Self {
        let mut env = self.clone();
        for (k, v) in fixed {
            env.insert(*k, *v);
        }
        env
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environ {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
