//! Input variables passed with `--var key=value`.

use std::collections::BTreeMap;
use std::fmt;

/// A single variable value.
///
/// Lists expand to one `--var` flag per element, recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    String(String),
    Int(i64),
    List(Vec<VarValue>),
}

impl VarValue {
    /// Push the `--var key=value` tokens for this value.
    fn expand(&self, key: &str, out: &mut Vec<String>) {
        match self {
            Self::String(s) => push_var(out, key, s),
            Self::Int(n) => push_var(out, key, n),
            Self::List(items) => {
                for item in items {
                    item.expand(key, out);
                }
            }
        }
    }
}

fn push_var(out: &mut Vec<String>, key: &str, value: impl fmt::Display) {
    out.push("--var".to_string());
    out.push(format!("{key}={value}"));
}

impl From<&str> for VarValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for VarValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for VarValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for VarValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl<T: Into<VarValue>> From<Vec<T>> for VarValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Variables for a command, expanded in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars(BTreeMap<String, VarValue>);

impl Vars {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable and return `self`, for chaining.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<VarValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a variable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<VarValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The variables as `--var` tokens.
    #[must_use]
    pub fn as_args(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (key, value) in &self.0 {
            value.expand(key, &mut out);
        }
        out
    }
}

impl<K: Into<String>, V: Into<VarValue>> FromIterator<(K, V)> for Vars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
