//! Lint reports produced by `migrate lint` and `schema plan`.

use serde::{Deserialize, Serialize};

use super::Env;

/// Schema versions found by the lint runner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SchemaVersions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub current: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub desired: String,
}

/// Summary of the analysis of all linted files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SummaryReport {
    /// Report URL, when published to the cloud.
    #[serde(rename = "URL", skip_serializing_if = "String::is_empty")]
    pub url: String,
    pub env: Env,
    pub schema: SchemaVersions,
    /// Analysis steps. Only present in verbose mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepReport>,
    /// Files with findings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileReport>,
}

impl SummaryReport {
    /// Total number of diagnostics across every file.
    #[must_use]
    pub fn diagnostics_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|f| &f.reports)
            .map(|r| r.diagnostics.len())
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StepReport {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Error that halted the run.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<FileReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct FileReport {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// File contents.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<Report>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

/// A group of diagnostics raised by one analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Report {
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// A single finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Diagnostic {
    /// Byte offset of the finding in the file.
    pub pos: i64,
    pub text: String,
    /// Analyzer code, e.g. `DS103`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggested_fixes: Vec<SuggestedFix>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SuggestedFix {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_edit: Option<TextEdit>,
}

/// Replace `end - line + 1` lines starting at `line` with `new_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TextEdit {
    pub line: i64,
    pub end: i64,
    pub new_text: String,
}
