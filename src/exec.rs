//! Synchronous child-process execution with full stream capture.

use std::path::Path;
use std::process::Command;

use crate::error::StageError;

/// Captured result of one tool invocation. Created exactly once per stage
/// run and never mutated afterwards.
#[derive(Debug)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Two-valued classification of an execution, a pure function of the exit
/// code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl ExecutionResult {
    pub fn outcome(&self) -> Outcome {
        if self.exit_code == 0 {
            Outcome::Success
        } else {
            Outcome::Failure
        }
    }
}

/// Run a command to completion, capturing both streams as text.
///
/// Blocks without a timeout; a hung child hangs the stage. A child killed
/// by a signal reports exit code -1, which still classifies as a failure.
pub fn run_command(program: &Path, args: &[String]) -> Result<ExecutionResult, StageError> {
    tracing::debug!(program = %program.display(), ?args, "spawning tool");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|err| StageError::ProcessLaunch(err.to_string()))?;
    Ok(ExecutionResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn captures_streams_and_exit_code() {
        let result = run_command(
            &PathBuf::from("/bin/sh"),
            &sh("echo out; echo err >&2; exit 3"),
        )
        .unwrap();
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.outcome(), Outcome::Failure);
    }

    #[test]
    fn zero_exit_is_success() {
        let result = run_command(&PathBuf::from("/bin/sh"), &sh("exit 0")).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.outcome(), Outcome::Success);
    }

    #[test]
    fn missing_program_is_a_launch_failure() {
        let err = run_command(&PathBuf::from("/nonexistent/dbt"), &[]).unwrap_err();
        assert!(matches!(err, StageError::ProcessLaunch(_)));
        assert!(!err.to_string().is_empty());
    }
}
