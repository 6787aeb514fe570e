//! Results of the `schema` commands.

use serde::{Deserialize, Serialize};

use super::{Env, StmtError, SummaryReport};

/// SQL changes that were applied or are still pending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Changes {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StmtError>,
}

/// Result of `schema apply` for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SchemaApply {
    #[serde(flatten)]
    pub env: Env,
    pub changes: Changes,
    /// General failure, e.g. when committing or rolling back a transaction.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

/// A schema plan file, local or stored in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SchemaPlanFile {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub from_hash: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub to_hash: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub migration: String,
    #[serde(rename = "URL", skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
}

/// Result of `schema plan` and the plan subcommands that report a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SchemaPlan {
    pub env: Env,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint: Option<SummaryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<SchemaPlanFile>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

/// Result of `schema plan approve`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SchemaPlanApprove {
    #[serde(rename = "URL", skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_apply_decodes() {
        let apply: SchemaApply = serde_json::from_str(
            r#"{"Driver":"sqlite3","URL":"sqlite://file?mode=memory",
                "Changes":{"Applied":["CREATE TABLE t (id int);"],
                "Pending":["DROP TABLE u;"],
                "Error":{"Stmt":"DROP TABLE u;","Text":"no such table: u"}}}"#,
        )
        .unwrap();
        assert_eq!(apply.env.driver, "sqlite3");
        assert_eq!(apply.changes.applied.len(), 1);
        assert_eq!(apply.changes.error.unwrap().text, "no such table: u");
        assert!(apply.error.is_empty());
    }

    #[test]
    fn schema_plan_decodes_nested_lint() {
        let plan: SchemaPlan = serde_json::from_str(
            r#"{"Env":{"Driver":"postgres"},"Repo":"foo",
                "Lint":{"Files":[{"Name":"x.sql","Reports":[{"Text":"destructive","Diagnostics":[{"Pos":0,"Text":"drop table","Code":"DS102"}]}]}]},
                "File":{"Name":"plan","FromHash":"a","ToHash":"b","URL":"atlas://app/plans/plan","Status":"PENDING"}}"#,
        )
        .unwrap();
        assert_eq!(plan.repo, "foo");
        assert_eq!(plan.lint.unwrap().diagnostics_count(), 1);
        let file = plan.file.unwrap();
        assert_eq!(file.url, "atlas://app/plans/plan");
        assert_eq!(file.status, "PENDING");
    }

    #[test]
    fn plan_file_serializes_without_empty_fields() {
        let file = SchemaPlanFile {
            name: "plan".into(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&file).unwrap(), r#"{"Name":"plan"}"#);
    }
}
