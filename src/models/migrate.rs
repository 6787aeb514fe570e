//! Results of the `migrate` commands.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Env, StmtError};

/// A migration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct File {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A pre-migration assertion and its outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Check {
    pub stmt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The checks run before applying a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileChecks {
    pub name: String,
    pub stmts: Vec<Check>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StmtError>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// A file applied during `migrate apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AppliedFile {
    #[serde(flatten)]
    pub file: File,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Statements skipped in a partially applied file.
    pub skipped: u64,
    /// Statements applied successfully.
    pub applied: Vec<String>,
    pub checks: Vec<FileChecks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StmtError>,
}

/// A file reverted during `migrate down`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RevertedFile {
    #[serde(flatten)]
    pub file: File,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub skipped: u64,
    pub applied: Vec<String>,
    /// Scope of the revert, e.g. `statement` or `versions`.
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StmtError>,
}

/// Result of `migrate apply` for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MigrateApply {
    #[serde(flatten)]
    pub env: Env,
    pub pending: Vec<File>,
    pub applied: Vec<AppliedFile>,
    pub current: String,
    pub target: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Set when the run failed outside a migration statement, e.g. on commit.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

/// Result of `migrate down` for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MigrateDown {
    pub planned: Vec<File>,
    pub reverted: Vec<RevertedFile>,
    pub current: String,
    pub target: String,
    pub total: u64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Set only when the revert is planned or run in the cloud.
    #[serde(rename = "URL", skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

/// An applied migration as recorded in the revisions table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Revision {
    pub version: String,
    pub description: String,
    #[serde(rename = "Type")]
    pub kind: String,
    /// Statements applied.
    pub applied: u64,
    /// Statements in the file.
    pub total: u64,
    pub executed_at: Option<DateTime<Utc>>,
    /// Execution time in nanoseconds.
    pub execution_time: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error_stmt: String,
    pub operator_version: String,
}

impl Revision {
    #[must_use]
    pub fn execution_duration(&self) -> chrono::Duration {
        chrono::Duration::nanoseconds(self.execution_time)
    }
}

/// Result of `migrate status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MigrateStatus {
    pub available: Vec<File>,
    pub pending: Vec<File>,
    pub applied: Vec<Revision>,
    pub current: String,
    pub next: String,
    /// Applied statements of the last revision.
    pub count: u64,
    /// Total statements of the last migration.
    pub total: u64,
    /// `OK` or `PENDING`.
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(rename = "SQL", skip_serializing_if = "String::is_empty")]
    pub sql: String,
}

#[derive(Default)]
struct Tally {
    passed: usize,
    failed: usize,
}

impl Tally {
    /// `mixed` follows the failure count when both counts are set, `failed`
    /// when only failures were seen.
    fn line(&self, noun: &str, mixed: &str, failed: &str) -> Option<String> {
        match (self.passed, self.failed) {
            (0, 0) => None,
            (p, 0) => Some(format!("{p} {noun}{}", plural(p))),
            (0, f) => Some(format!("{f} {failed}")),
            (p, f) => Some(format!("{p} {noun}{} ok, {f} {mixed}", plural(p))),
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

impl MigrateApply {
    /// Human readable summary of the run: duration, then counts of files,
    /// checks and statements. Lines after the first are prefixed by `indent`.
    #[must_use]
    pub fn summary(&self, indent: &str) -> String {
        let mut files = Tally::default();
        let mut checks = Tally::default();
        let mut stmts = Tally::default();

        for f in &self.applied {
            for c in f.checks.iter().flat_map(|c| &c.stmts) {
                if c.error.is_some() {
                    checks.failed += 1;
                } else {
                    checks.passed += 1;
                }
            }
            stmts.passed += f.applied.len();
            if f.error.is_some() {
                files.failed += 1;
                // The failure was a statement, not an assertion.
                if f.checks.last().map_or(true, |c| c.error.is_none()) {
                    stmts.passed = stmts.passed.saturating_sub(1);
                    stmts.failed += 1;
                }
            } else {
                files.passed += 1;
            }
        }

        let elapsed = match (self.start, self.end) {
            (Some(s), Some(e)) => e - s,
            _ => chrono::Duration::zero(),
        };
        let mut lines = vec![format_duration(elapsed)];
        lines.extend(files.line(
            "migration",
            "with errors",
            &format!("migration{} with errors", plural(files.failed)),
        ));
        lines.extend(checks.line(
            "check",
            &format!("failure{}", plural(checks.failed)),
            &format!("check error{}", plural(checks.failed)),
        ));
        lines.extend(stmts.line(
            "sql statement",
            "with errors",
            &format!("sql statement{} with errors", plural(stmts.failed)),
        ));

        let mut out = String::new();
        for (i, l) in lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
                out.push_str(indent);
            }
            let _ = write!(out, "-- {l}");
        }
        out
    }
}

/// Format a duration the way the tool prints them, e.g. `1.5s`, `12ms`.
fn format_duration(d: chrono::Duration) -> String {
    let nanos = d.num_nanoseconds().unwrap_or(i64::MAX);
    if nanos <= 0 {
        return "0s".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let n = nanos as f64;
    match nanos {
        n_ if n_ < 1_000 => format!("{nanos}ns"),
        n_ if n_ < 1_000_000 => format!("{}µs", trim_float(n / 1e3)),
        n_ if n_ < 1_000_000_000 => format!("{}ms", trim_float(n / 1e6)),
        _ => {
            let secs = n / 1e9;
            #[allow(clippy::cast_possible_truncation)]
            let whole_minutes = (secs / 60.0).floor() as i64;
            let (hours, minutes) = (whole_minutes / 60, whole_minutes % 60);
            #[allow(clippy::cast_precision_loss)]
            let rest = secs - (whole_minutes * 60) as f64;
            match (hours, minutes) {
                (0, 0) => format!("{}s", trim_float(rest)),
                (0, m) => format!("{m}m{}s", trim_float(rest)),
                (h, m) => format!("{h}h{m}m{}s", trim_float(rest)),
            }
        }
    }
}

fn trim_float(v: f64) -> String {
    let s = format!("{v:.9}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
