//! End-to-end client tests against fake `atlas` scripts.

use std::io::Write;
use std::time::{Duration, Instant};

use atlas_exec::args::{
    DeployRunContext, MigrateApplyParams, MigrateDownParams, MigrateLintParams,
    MigrateTestParams, RunContext, SchemaApplyParams, SchemaInspectParams, SchemaPlanParams,
    SchemaPlanPushParams, Vars,
};
use atlas_exec::exec::Environ;
use atlas_exec::models::MigrateApply;
use atlas_exec::{Client, ErrorKind, ExecError, WorkingDir};
use tokio_util::sync::CancellationToken;

use crate::support::{FakeAtlas, MOCK_ARGS};

fn client(atlas: &FakeAtlas) -> Client {
    Client::new("", atlas.path()).expect("Failed to create client")
}

/// Run an operation against the argument-echoing script and return the
/// argument line it saw.
async fn args_of<F, Fut, T>(op: F) -> String
where
    F: FnOnce(Client) -> Fut,
    Fut: std::future::Future<Output = Result<T, ExecError>>,
    T: std::fmt::Debug,
{
    let atlas = FakeAtlas::new(MOCK_ARGS);
    let err = op(client(&atlas)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Tool);
    err.to_string()
}

#[tokio::test]
async fn migrate_apply_args() {
    let line = args_of(|c| async move {
        c.migrate_apply(&MigrateApplyParams {
            env: Some("test".into()),
            ..Default::default()
        })
        .await
    })
    .await;
    assert_eq!(line, "migrate apply --format {{ json . }} --env test");
}

#[tokio::test]
async fn migrate_apply_with_deploy_context() {
    let line = args_of(|c| async move {
        c.migrate_apply(&MigrateApplyParams {
            context: Some(DeployRunContext::default()),
            ..Default::default()
        })
        .await
    })
    .await;
    assert_eq!(line, "migrate apply --format {{ json . }} --context {}");
}

#[tokio::test]
async fn migrate_down_args() {
    let line = args_of(|c| async move {
        c.migrate_down(&MigrateDownParams {
            amount: 10,
            ..Default::default()
        })
        .await
    })
    .await;
    assert_eq!(line, "migrate down --format {{ json . }} 10");
}

#[tokio::test]
async fn migrate_test_args() {
    let line = args_of(|c| async move {
        c.migrate_test(&MigrateTestParams {
            context: Some(RunContext {
                repo: Some("testing-repo".into()),
                ..Default::default()
            }),
            ..Default::default()
        })
        .await
    })
    .await;
    assert_eq!(line, r#"migrate test --context {"repo":"testing-repo"}"#);
}

#[tokio::test]
async fn vars_expand_in_key_order() {
    let vars = Vars::new()
        .with("b", vec!["x", "y"])
        .with("a", 1);
    let line = args_of(|c| async move {
        c.schema_apply(&SchemaApplyParams {
            url: Some("sqlite://file".into()),
            vars,
            ..Default::default()
        })
        .await
    })
    .await;
    assert_eq!(
        line,
        "schema apply --format {{ json . }} --url sqlite://file --auto-approve --var a=1 --var b=x --var b=y"
    );
}

#[tokio::test]
async fn structural_failure_keeps_message_and_code() {
    let atlas = FakeAtlas::replay("", "Error: required flag \"url\" not set", 3);
    let err = client(&atlas)
        .migrate_apply(&MigrateApplyParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Tool);
    assert_eq!(err.to_string(), "Error: required flag \"url\" not set");
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn partial_failure_returns_every_record() {
    let atlas = FakeAtlas::replay(
        "{\"Driver\":\"sqlite3\",\"Target\":\"1\"}\n{\"Driver\":\"sqlite3\",\"Target\":\"2\",\"Error\":\"second failed\"}",
        "",
        1,
    );
    let err = client(&atlas)
        .migrate_apply_slice(&MigrateApplyParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "second failed");
    let ExecError::PartialFailure(partial) = err else {
        panic!("Expected a partial failure");
    };
    let results: Vec<MigrateApply> = partial.results().expect("Records should decode");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].target, "1");
    assert_eq!(results[1].error, "second failed");
}

#[tokio::test]
async fn malformed_output_keeps_stdout() {
    let atlas = FakeAtlas::replay("not json", "", 1);
    let err = client(&atlas)
        .schema_apply(&SchemaApplyParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedOutput);
    assert_eq!(err.stdout(), "not json");
}

#[tokio::test]
async fn clean_json_decodes_driver() {
    let atlas = FakeAtlas::replay(r#"{"Driver":"sqlite3"}"#, "", 0);
    let apply = client(&atlas)
        .schema_apply(&SchemaApplyParams::default())
        .await
        .expect("Apply should decode");
    assert_eq!(apply.env.driver, "sqlite3");
}

#[tokio::test]
async fn lint_error_reports_soft_failure() {
    let atlas = FakeAtlas::replay("Analyzing changes from version 1 to 2:\n  -- destructive change", "", 1);
    let err = client(&atlas)
        .migrate_lint_error(&MigrateLintParams {
            format: Some("{{ range .Files }}{{ .Name }}{{ end }}".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(err.is_soft_failure());
    assert!(err.stdout().starts_with("Analyzing changes"));
}

#[tokio::test]
async fn schema_plan_combines_publish_flags() {
    let line = args_of(|c| async move {
        c.schema_plan(&SchemaPlanParams {
            repo: Some("app".into()),
            save: true,
            push: true,
            pending: true,
            ..Default::default()
        })
        .await
    })
    .await;
    assert_eq!(
        line,
        "schema plan --format {{ json . }} --repo app --save --push --pending --auto-approve"
    );
}

#[tokio::test]
async fn schema_plan_dry_run_is_not_approved() {
    let line = args_of(|c| async move {
        c.schema_plan(&SchemaPlanParams {
            dry_run: true,
            ..Default::default()
        })
        .await
    })
    .await;
    assert_eq!(line, "schema plan --format {{ json . }} --dry-run");
}

#[tokio::test]
async fn plan_push_returns_url() {
    let atlas = FakeAtlas::replay("atlas://app/plans/20240101", "", 0);
    let url = client(&atlas)
        .schema_plan_push(&SchemaPlanPushParams {
            file: Some("file://plan.hcl".into()),
            ..Default::default()
        })
        .await
        .expect("Push should succeed");
    assert_eq!(url, "atlas://app/plans/20240101");
}

#[tokio::test]
async fn env_reaches_the_tool() {
    let atlas = FakeAtlas::new(r#"echo "$FOO-$ATLAS_NO_UPDATE_NOTIFIER""#);
    let mut env = Environ::from_os();
    env.insert("FOO", "bar");
    let out = client(&atlas)
        .with_env(env)
        .expect("FOO is not reserved")
        .schema_inspect(&SchemaInspectParams::default())
        .await
        .expect("Inspect should succeed");
    assert_eq!(out, "bar-1");
}

#[test]
fn reserved_env_is_rejected() {
    let atlas = FakeAtlas::new("exit 0");
    let env: Environ = [("ATLAS_NO_UPGRADE_SUGGESTIONS", "0")].into_iter().collect();
    let err = client(&atlas).with_env(env).unwrap_err();
    assert!(err.to_string().contains("ATLAS_NO_UPGRADE_SUGGESTIONS"));
}

#[tokio::test]
async fn version_from_fake_tool() {
    let atlas = FakeAtlas::replay(
        "atlas version v0.14.1\nhttps://github.com/ariga/atlas/releases/latest",
        "",
        0,
    );
    let version = client(&atlas).version().await.expect("Version should parse");
    assert_eq!(version.version, "0.14.1");
    assert!(!version.canary);
    assert_eq!(version.to_string(), "atlas version v0.14.1");
}

#[tokio::test]
async fn runs_inside_working_dir() {
    let wd = WorkingDir::builder()
        .atlas_hcl(|w| w.write_all(b"env \"local\" {}"))
        .build()
        .expect("Failed to build working dir");
    let atlas = FakeAtlas::new("cat atlas.hcl");
    let out = Client::new(wd.path(), atlas.path())
        .expect("Failed to create client")
        .schema_inspect(&SchemaInspectParams::default())
        .await
        .expect("Inspect should succeed");
    assert_eq!(out, "env \"local\" {}");
}

#[tokio::test]
async fn cancellation_returns_promptly() {
    let atlas = FakeAtlas::new("exec sleep 10");
    let cancel = CancellationToken::new();
    let client = client(&atlas).with_cancellation(cancel.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();
    });

    let start = Instant::now();
    let err = client
        .migrate_apply(&MigrateApplyParams::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn timeout_is_not_a_tool_failure() {
    let atlas = FakeAtlas::new("exec sleep 10");
    let err = client(&atlas)
        .with_timeout(Some(Duration::from_millis(50)))
        .version()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TimedOut);
}
