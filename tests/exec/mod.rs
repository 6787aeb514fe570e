//! Process executor tests against real child processes.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use atlas_exec::exec::{Environ, Invocation, ProcessRunner, Runner};
use atlas_exec::{ErrorKind, ExecError};
use tokio_util::sync::CancellationToken;

use crate::support::{path_env, FakeAtlas};

fn invocation(atlas: &FakeAtlas, dir: Option<PathBuf>, env: &Environ) -> Invocation {
    Invocation::new(atlas.path(), vec!["version".into()], dir, env)
}

#[tokio::test]
async fn captures_streams_and_exit_code() {
    let atlas = FakeAtlas::replay("out", "Error: broken", 3);
    let raw = ProcessRunner::new()
        .run(&invocation(&atlas, None, &path_env()), &CancellationToken::new())
        .await
        .expect("Run should complete");
    assert_eq!(raw.stdout(), "out");
    assert_eq!(raw.stderr(), "Error: broken");
    assert_eq!(raw.exit().code(), Some(3));
}

#[tokio::test]
async fn runs_in_working_dir() {
    let atlas = FakeAtlas::new("pwd -P");
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let raw = ProcessRunner::new()
        .run(
            &invocation(&atlas, Some(dir.path().to_path_buf()), &path_env()),
            &CancellationToken::new(),
        )
        .await
        .expect("Run should complete");
    assert_eq!(
        PathBuf::from(raw.stdout()),
        dir.path().canonicalize().expect("Failed to canonicalize")
    );
}

#[tokio::test]
async fn fixed_env_wins_over_base() {
    let atlas = FakeAtlas::new(
        r#"echo "$ATLAS_NO_UPDATE_NOTIFIER,$ATLAS_NO_UPGRADE_SUGGESTIONS,$FOO""#,
    );
    let mut base = path_env();
    base.insert("ATLAS_NO_UPDATE_NOTIFIER", "0");
    base.insert("FOO", "bar");
    let raw = ProcessRunner::new()
        .run(&invocation(&atlas, None, &base), &CancellationToken::new())
        .await
        .expect("Run should complete");
    assert_eq!(raw.stdout(), "1,1,bar");
}

#[tokio::test]
async fn base_env_replaces_process_env() {
    let atlas = FakeAtlas::new(r#"echo "home=$HOME""#);
    let raw = ProcessRunner::new()
        .run(&invocation(&atlas, None, &path_env()), &CancellationToken::new())
        .await
        .expect("Run should complete");
    assert_eq!(raw.stdout(), "home=");
}

#[tokio::test]
async fn missing_program_is_spawn_error() {
    let inv = Invocation::new("/nonexistent/atlas", vec![], None, &Environ::new());
    let err = ProcessRunner::new()
        .run(&inv, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Spawn);
    assert!(err.to_string().contains("/nonexistent/atlas"));
}

#[tokio::test]
async fn cancellation_stops_process_promptly() {
    let atlas = FakeAtlas::new("exec sleep 10");
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let err = ProcessRunner::new()
        .run(&invocation(&atlas, None, &path_env()), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn timeout_stops_process() {
    let atlas = FakeAtlas::new("exec sleep 10");
    let inv = invocation(&atlas, None, &path_env()).with_timeout(Some(Duration::from_millis(50)));
    let start = Instant::now();
    let err = ProcessRunner::new()
        .run(&inv, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::TimedOut(d) if d == Duration::from_millis(50)));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn cancellation_kills_grandchildren() {
    use crate::support::{adopt_orphans, process_alive};

    adopt_orphans();
    let pid_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pid_file = pid_dir.path().join("pid");
    let atlas = FakeAtlas::new(&format!(
        "sleep 30 &\necho $! > {}\nwait",
        pid_file.display()
    ));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let watched = pid_file.clone();
    tokio::spawn(async move {
        for _ in 0..200 {
            if std::fs::read_to_string(&watched).is_ok_and(|s| s.ends_with('\n')) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        trigger.cancel();
    });

    let err = ProcessRunner::new()
        .terminate_grace(Duration::from_millis(100))
        .run(&invocation(&atlas, None, &path_env()), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Cancelled));

    let pid: i32 = std::fs::read_to_string(&pid_file)
        .expect("Script should have written its pid")
        .trim()
        .parse()
        .expect("Pid should be numeric");
    let mut alive = true;
    for _ in 0..100 {
        alive = process_alive(pid);
        if !alive {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!alive, "sleep {pid} survived cancellation");
}
