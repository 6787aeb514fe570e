//! Fake `atlas` executables for driving the client end to end.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use atlas_exec::exec::Environ;
use tempfile::TempDir;

/// Echoes its arguments to stderr and fails, so the argument vector shows up
/// as the error message.
pub const MOCK_ARGS: &str = r#"echo "$@" >&2
exit 1"#;

/// A shell script standing in for the Atlas CLI.
pub struct FakeAtlas {
    _dir: TempDir,
    path: PathBuf,
}

impl FakeAtlas {
    /// Write `body` as a `/bin/sh` script.
    pub fn new(body: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("atlas");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write fake atlas");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake atlas executable");
        Self { _dir: dir, path }
    }

    /// A script that prints `stdout` and `stderr` verbatim and exits with `code`.
    pub fn replay(stdout: &str, stderr: &str, code: i32) -> Self {
        Self::new(&format!(
            "cat <<'__OUT__'\n{stdout}\n__OUT__\ncat >&2 <<'__ERR__'\n{stderr}\n__ERR__\nexit {code}"
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Make this process the reaper of orphaned descendants, so a grandchild
/// left behind by a killed tool can be observed with [`process_alive`].
#[cfg(target_os = "linux")]
pub fn adopt_orphans() {
    nix::sys::prctl::set_child_subreaper(true).expect("Failed to become subreaper");
}

/// Whether `pid` is still running. An exited adopted process is reaped, so
/// zombies count as gone.
#[cfg(target_os = "linux")]
pub fn process_alive(pid: i32) -> bool {
    use nix::sys::signal::kill;
    use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(pid);
    match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
        Ok(WaitStatus::StillAlive) => true,
        Ok(_) => false,
        Err(_) => kill(pid, None).is_ok(),
    }
}

/// An environment holding only the caller's `PATH`, so scripts find their
/// tools.
pub fn path_env() -> Environ {
    std::env::var("PATH")
        .map(|p| [("PATH", p)].into_iter().collect())
        .unwrap_or_default()
}
