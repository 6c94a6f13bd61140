//! Typed failures that abort a stage before its outcome can be classified.

use thiserror::Error;

/// Errors raised between parameter resolution and stream capture.
///
/// A nonzero exit from the tool is not represented here: that is the
/// expected failure path and is classified from the captured exit code.
/// Display is the raw description only, so the terminal signal message is
/// exactly `Error: <description>`.
#[derive(Debug, Error)]
pub enum StageError {
    /// The tool was missing and self-installation did not produce it.
    #[error("{0}")]
    DependencyInstall(String),

    /// The child process could not be started at all.
    #[error("{0}")]
    ProcessLaunch(String),
}
