//! Outcome classification.
//!
//! The Atlas CLI signals failure in several ways: diagnostics on stderr,
//! a failing exit with per-target JSON that embeds an error, or a failing
//! exit with JSON findings (lint). [`classify`] maps every raw outcome to
//! exactly one [`OutcomeClass`], looking only at the exit state and the two
//! streams.

use serde_json::Value;

use super::decode::parse_all;
use crate::exec::RawOutcome;

/// Top-level field in which the tool reports a per-target error.
pub const RECORD_ERROR_FIELD: &str = "Error";

/// How an invocation ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    /// Exit success; stdout holds the result.
    Clean,
    /// Stderr carried diagnostics.
    StructuralFailure,
    /// Exit failure with JSON records, at least one of which has an error.
    PartialFailure,
    /// Exit failure with JSON records and no record-level error.
    SoftFailure,
    /// Exit failure with empty or non-JSON stdout.
    Malformed,
}

/// Classify a raw outcome. First match wins:
///
/// 1. non-empty stderr: [`OutcomeClass::StructuralFailure`]
/// 2. exit success: [`OutcomeClass::Clean`]
/// 3. stdout empty or not JSON: [`OutcomeClass::Malformed`]
/// 4. a record with a populated `Error` field: [`OutcomeClass::PartialFailure`]
/// 5. otherwise: [`OutcomeClass::SoftFailure`]
#[must_use]
pub fn classify(raw: &RawOutcome) -> OutcomeClass {
    if !raw.stderr().is_empty() {
        return OutcomeClass::StructuralFailure;
    }
    if raw.exit().success() {
        return OutcomeClass::Clean;
    }
    if raw.stdout().is_empty() {
        return OutcomeClass::Malformed;
    }
    match parse_all::<Value>(raw.stdout()) {
        Err(_) => OutcomeClass::Malformed,
        Ok(records) if records.iter().any(|r| record_error(r).is_some()) => {
            OutcomeClass::PartialFailure
        }
        Ok(_) => OutcomeClass::SoftFailure,
    }
}

/// Extract the record-level error of a JSON record, if populated.
///
/// Strings are returned as-is. Structured errors are rendered as compact
/// JSON. `null`, `false`, empty strings and empty containers count as unset.
#[must_use]
pub fn record_error(record: &Value) -> Option<String> {
    match record.get(RECORD_ERROR_FIELD)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::exec::ExitState;

    fn failed(stdout: &str, stderr: &str) -> RawOutcome {
        RawOutcome::new(ExitState::Failure { code: Some(1) }, stdout, stderr)
    }

    fn any_exit() -> impl Strategy<Value = ExitState> {
        prop_oneof![
            Just(ExitState::Success),
            any::<Option<i32>>().prop_map(|code| ExitState::Failure { code }),
        ]
    }

    proptest! {
        #[test]
        fn stderr_always_wins(
            exit in any_exit(),
            stdout in prop_oneof![
                Just(String::new()),
                Just(r#"{"Driver":"sqlite3"}"#.to_string()),
                Just(r#"{"Error":"x"}{"Error":"y"}"#.to_string()),
                ".*",
            ],
            stderr in "[a-zA-Z][a-zA-Z :\"]{0,40}",
        ) {
            let raw = RawOutcome::new(exit, stdout, stderr);
            prop_assert_eq!(classify(&raw), OutcomeClass::StructuralFailure);
        }

        #[test]
        fn clean_exit_without_stderr_is_clean(stdout in ".*", blank in "[ \t\n]{0,4}") {
            let raw = RawOutcome::new(ExitState::Success, stdout, blank);
            prop_assert_eq!(classify(&raw), OutcomeClass::Clean);
        }
    }

    #[test]
    fn whitespace_stderr_counts_as_empty() {
        let raw = failed(r#"{"Target":"1"}"#, "  \n");
        assert_eq!(classify(&raw), OutcomeClass::SoftFailure);
    }

    #[test]
    fn structural_with_error_prefix() {
        let raw = RawOutcome::new(
            ExitState::Failure { code: Some(1) },
            "",
            "Error: required flag \"url\" not set",
        );
        assert_eq!(classify(&raw), OutcomeClass::StructuralFailure);
    }

    #[test]
    fn partial_failure_when_second_record_has_error() {
        let raw = failed(
            "{\"Target\":\"1\"}\n{\"Target\":\"2\",\"Error\":\"boom\"}",
            "",
        );
        assert_eq!(classify(&raw), OutcomeClass::PartialFailure);
    }

    #[test]
    fn single_record_with_error_is_partial_failure() {
        let raw = failed(r#"{"Error":"sql/migrate: executing statement"}"#, "");
        assert_eq!(classify(&raw), OutcomeClass::PartialFailure);
    }

    #[test]
    fn findings_without_error_are_soft_failure() {
        let raw = failed(
            r#"{"Files":[{"Name":"1.sql","Error":"destructive changes detected"}]}"#,
            "",
        );
        assert_eq!(classify(&raw), OutcomeClass::SoftFailure);
    }

    #[test]
    fn empty_error_fields_do_not_count() {
        let raw = failed(r#"{"Error":""}{"Error":null}{"Error":{}}"#, "");
        assert_eq!(classify(&raw), OutcomeClass::SoftFailure);
    }

    #[test]
    fn not_json_is_malformed() {
        assert_eq!(classify(&failed("not json", "")), OutcomeClass::Malformed);
    }

    #[test]
    fn empty_stdout_on_failure_is_malformed() {
        assert_eq!(classify(&failed("", "")), OutcomeClass::Malformed);
    }

    #[test]
    fn trailing_garbage_is_malformed() {
        assert_eq!(
            classify(&failed(r#"{"Target":"1"} oops"#, "")),
            OutcomeClass::Malformed
        );
    }

    #[test]
    fn record_error_renders_structured_errors() {
        let record = serde_json::json!({"Error": {"Stmt": "broken;", "Text": "syntax error"}});
        assert_eq!(
            record_error(&record).as_deref(),
            Some(r#"{"Stmt":"broken;","Text":"syntax error"}"#)
        );
        assert_eq!(record_error(&serde_json::json!({"Target": "1"})), None);
        assert_eq!(record_error(&serde_json::json!([1, 2])), None);
    }
}
