//! Machine-readable run summary, written alongside the console report.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::stage::StageKind;

/// JSON summary of one stage invocation.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub stage: StageKind,
    pub catalog: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub target: String,
    pub command_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub pass: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_with_snake_case_stage() {
        let report = RunReport {
            stage: StageKind::RunGold,
            catalog: "prod".to_string(),
            selector: Some("030_gold".to_string()),
            target: "dev".to_string(),
            command_line: "dbt run --target dev --select 030_gold".to_string(),
            exit_code: Some(1),
            pass: false,
            error: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stage"], "run_gold");
        assert_eq!(json["pass"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn launch_failure_report_omits_exit_code() {
        let report = RunReport {
            stage: StageKind::Seed,
            catalog: "streaming_dev".to_string(),
            selector: Some("raw_*".to_string()),
            target: "dev".to_string(),
            command_line: "dbt seed".to_string(),
            exit_code: None,
            pass: false,
            error: Some("binary not found".to_string()),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("exit_code").is_none());
        assert_eq!(json["error"], "binary not found");
    }
}
