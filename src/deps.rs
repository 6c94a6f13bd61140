//! Tool-presence check and one-shot self-install.

use std::path::Path;
use std::process::Command;

use crate::error::StageError;

/// Packages installed when the tool is missing.
pub const TOOL_PACKAGES: [&str; 2] = ["dbt-databricks", "dbt-utils"];

/// Ensure a dependency is present: probe, install once on a miss, then
/// re-probe. A probe hit performs no side effect. There is no retry loop;
/// a failed install or a still-missing tool is fatal to the stage.
pub fn ensure_dependency<P, I>(probe: P, install: I) -> Result<(), StageError>
where
    P: Fn() -> bool,
    I: FnOnce() -> Result<(), StageError>,
{
    if probe() {
        return Ok(());
    }
    install()?;
    if probe() {
        Ok(())
    } else {
        Err(StageError::DependencyInstall(
            "tool still missing after install".to_string(),
        ))
    }
}

/// Probe for the dbt executable on PATH, or at an explicit path.
pub fn tool_present(tool: &Path) -> bool {
    which::which(tool).is_ok()
}

/// Install the dbt packages through pip, synchronously.
pub fn install_tool_packages() -> Result<(), StageError> {
    tracing::info!(packages = ?TOOL_PACKAGES, "installing dbt packages");
    let status = Command::new("python3")
        .args(["-m", "pip", "install"])
        .args(TOOL_PACKAGES)
        .status()
        .map_err(|err| StageError::DependencyInstall(err.to_string()))?;
    if status.success() {
        Ok(())
    } else {
        Err(StageError::DependencyInstall(format!(
            "pip install exited with {status}"
        )))
    }
}
