//! Exit status of the `atlas-exec` binary.

use std::process::{Command, Output};

use tempfile::NamedTempFile;

use crate::support::FakeAtlas;

fn run_cli(atlas: &FakeAtlas, args: &[&str]) -> Output {
    let config = NamedTempFile::new().expect("Failed to create config");
    Command::new(env!("CARGO_BIN_EXE_atlas-exec"))
        .arg("--config")
        .arg(config.path())
        .arg("--atlas")
        .arg(atlas.path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_unparsable_output_exits_nonzero() {
    let atlas = FakeAtlas::replay("hello", "", 0);
    let output = run_cli(&atlas, &["version"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("hello"), "stderr: {stderr}");
}

#[test]
fn test_wrong_record_count_exits_nonzero() {
    let atlas = FakeAtlas::replay(r#"{"Org":"a"}{"Org":"b"}"#, "", 0);
    let output = run_cli(&atlas, &["whoami"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_tool_exit_code_is_forwarded() {
    let atlas = FakeAtlas::replay("", "Error: required flag \"url\" not set", 3);
    let output = run_cli(&atlas, &["migrate", "status"]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: required flag \"url\" not set"));
}

#[test]
fn test_success_exits_zero() {
    let atlas = FakeAtlas::replay("atlas version v0.21.0", "", 0);
    let output = run_cli(&atlas, &["version"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "atlas version v0.21.0"
    );
}
