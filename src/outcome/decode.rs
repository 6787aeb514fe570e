//! JSON decoding of Atlas CLI stdout.
//!
//! Commands run with `--format '{{ json . }}'` print one JSON object per
//! target, back to back, with no enclosing array.

use serde::de::DeserializeOwned;

use super::error::ExecError;

/// Parse every JSON value in `input`, in order.
pub(crate) fn parse_all<T: DeserializeOwned>(input: &str) -> Result<Vec<T>, serde_json::Error> {
    serde_json::Deserializer::from_str(input)
        .into_iter::<T>()
        .collect()
}

/// Decode a back-to-back sequence of JSON records.
///
/// Empty input yields no records. A decode failure anywhere discards all
/// records; the raw text is kept on the returned error.
///
/// # Errors
///
/// Returns `ExecError::MalformedOutput` if the input is not a sequence of `T`.
pub fn decode_many<T: DeserializeOwned>(stdout: &str) -> Result<Vec<T>, ExecError> {
    parse_all(stdout).map_err(|e| ExecError::MalformedOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        code: None,
        source: Some(e),
    })
}

/// Decode exactly one JSON record.
///
/// # Errors
///
/// Returns `ExecError::MalformedOutput` on bad input, or
/// `ExecError::Cardinality` unless exactly one record was found.
pub fn decode_one<T: DeserializeOwned>(stdout: &str) -> Result<T, ExecError> {
    expect_one(decode_many(stdout)?)
}

/// Assert a record list has length one and return that record.
///
/// # Errors
///
/// Returns `ExecError::Cardinality` with the actual count otherwise.
pub fn expect_one<T>(records: Vec<T>) -> Result<T, ExecError> {
    let count = records.len();
    let mut records = records.into_iter();
    match (records.next(), count) {
        (Some(record), 1) => Ok(record),
        _ => Err(ExecError::Cardinality { count }),
    }
}
