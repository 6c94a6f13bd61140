//! Shared test infrastructure: stub dbt executables and binary invocation.

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// A stand-in dbt executable with scripted streams and exit code.
///
/// The temp dir is held so the script outlives the invocation.
pub struct StubTool {
    _dir: TempDir,
    path: PathBuf,
}

impl StubTool {
    /// Write a stub that prints the given streams and exits with `exit_code`.
    pub fn new(stdout: &str, stderr: &str, exit_code: i32) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("dbt");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' '{stdout}'\nprintf '%s\\n' '{stderr}' >&2\nexit {exit_code}\n"
        );
        std::fs::write(&path, script).expect("write stub script");
        let mut perms = std::fs::metadata(&path).expect("stat stub").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod stub");
        Self { _dir: dir, path }
    }

    /// A path inside the stub dir that does not exist, for launch failures.
    pub fn missing() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("missing-dbt");
        Self { _dir: dir, path }
    }

    pub fn path_str(&self) -> &str {
        self.path.to_str().expect("stub path is UTF-8")
    }
}

/// Run the dbt-stage binary with the given arguments and a clean env.
pub fn run_stage_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dbt-stage"))
        .args(args)
        .env_remove("DBT_STAGE_ARGS")
        .output()
        .expect("run dbt-stage")
}

/// Same as [`run_stage_cli`] with one extra environment variable set.
pub fn run_stage_cli_with_env(args: &[&str], key: &str, value: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dbt-stage"))
        .args(args)
        .env(key, value)
        .output()
        .expect("run dbt-stage")
}
