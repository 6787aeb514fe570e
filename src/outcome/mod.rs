//! Classification and decoding of Atlas CLI results.

mod classify;
mod decode;
mod error;

pub use classify::*;
pub use decode::{decode_many, decode_one, expect_one};
pub use error::*;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::exec::RawOutcome;
use decode::parse_all;

/// What a JSON operation does with a [`OutcomeClass::SoftFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoftPolicy {
    /// Decode the findings and return them as the result.
    #[default]
    Decode,
    /// Return [`ExecError::SoftFailure`].
    Fail,
}

/// Turn a raw outcome into typed records.
///
/// # Errors
///
/// Returns the error matching the outcome class: `Tool` for structural
/// failures, `PartialFailure` with every decoded record, `SoftFailure` when
/// `soft` says so, and `MalformedOutput` when stdout is not a sequence of `T`.
pub fn into_records<T: DeserializeOwned>(
    raw: RawOutcome,
    soft: SoftPolicy,
) -> Result<Vec<T>, ExecError> {
    let class = classify(&raw);
    tracing::trace!(?class, "Classified atlas outcome");
    match class {
        OutcomeClass::StructuralFailure => Err(ExecError::tool(raw)),
        OutcomeClass::SoftFailure if soft == SoftPolicy::Fail => Err(ExecError::soft(raw)),
        OutcomeClass::Clean | OutcomeClass::SoftFailure => {
            parse_all(raw.stdout()).map_err(|e| ExecError::malformed(&raw, Some(e)))
        }
        OutcomeClass::PartialFailure => match parse_all::<Value>(raw.stdout()) {
            Ok(records) => Err(ExecError::partial(&raw, records)),
            Err(e) => Err(ExecError::malformed(&raw, Some(e))),
        },
        OutcomeClass::Malformed => {
            let source = parse_all::<Value>(raw.stdout()).err();
            Err(ExecError::malformed(&raw, source))
        }
    }
}

/// Turn a raw outcome of a text command into its stdout.
///
/// Text commands never promise JSON, so every unclean outcome is reported
/// as a tool error; its message is stderr, or stdout when stderr is empty.
///
/// # Errors
///
/// Returns `ExecError::Tool` unless the outcome is clean.
pub fn into_text(raw: RawOutcome) -> Result<String, ExecError> {
    match classify(&raw) {
        OutcomeClass::Clean => Ok(raw.into_stdout()),
        _ => Err(ExecError::tool(raw)),
    }
}

/// Turn a raw outcome of a check command into its stdout.
///
/// Check commands exit non-zero when they report findings, whatever format
/// the report is printed in. Any failed exit with an empty stderr is
/// therefore a soft failure; the report is kept verbatim.
///
/// # Errors
///
/// Returns `ExecError::Tool` when stderr is populated, and
/// `ExecError::SoftFailure` for any other failed exit.
pub fn into_verdict(raw: RawOutcome) -> Result<String, ExecError> {
    if raw.exit().success() {
        Ok(raw.into_stdout())
    } else if raw.stderr().is_empty() {
        Err(ExecError::soft(raw))
    } else {
        Err(ExecError::tool(raw))
    }
}
