//! The Stage Runner: parameter resolution, dependency assurance, command
//! construction, execution, reporting, and outcome classification.
//!
//! Control flow per invocation is strictly linear. The runner returns no
//! value; it communicates through the printed report and at most one
//! `signal_failure` on the host.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::deps;
use crate::error::StageError;
use crate::exec::{self, ExecutionResult, Outcome};
use crate::host::HostContext;
use crate::report::{self, RunReport};
use crate::stage::{RunParameters, StageConfig};

/// Environment variable holding extra arguments appended to every tool
/// invocation, split with shell quoting rules.
pub const EXTRA_ARGS_ENV: &str = "DBT_STAGE_ARGS";

/// Invocation knobs fixed per deployment rather than per stage.
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// dbt executable name or path.
    pub tool: PathBuf,
    pub profiles_dir: PathBuf,
    pub target: String,
    /// Skip the tool-presence check and self-install.
    pub no_install: bool,
    /// Where to write the JSON run summary, if anywhere.
    pub report_path: Option<PathBuf>,
    /// Operator-supplied arguments appended after the stage template.
    pub extra_args: Vec<String>,
}

/// Profiles directory dbt reads its connection config from.
pub fn default_profiles_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/root"))
        .join(".dbt")
}

/// Extra tool arguments from [`EXTRA_ARGS_ENV`], if set.
pub fn extra_args_from_env() -> Result<Vec<String>> {
    match std::env::var(EXTRA_ARGS_ENV) {
        Ok(raw) => shell_words::split(&raw).with_context(|| format!("parse {EXTRA_ARGS_ENV}")),
        Err(_) => Ok(Vec::new()),
    }
}

/// Execute one stage end to end.
///
/// Exit 0 prints the success marker and signals nothing. A nonzero exit
/// prints the failure marker and signals the stage's failure message.
/// Errors before the tool produced an exit code are contained here and
/// signaled as `Error: <description>`; the stream report is skipped for
/// those because there is nothing to report.
pub fn run_stage(config: &StageConfig, host: &dyn HostContext, options: &RunnerOptions) {
    let params = RunParameters::resolve(config, host, &options.target);
    println!("{}", config.kind.start_message(&params));

    match execute(config, &params, options) {
        Ok(result) => {
            print_streams(&result);
            let pass = result.outcome() == Outcome::Success;
            if pass {
                println!("{}", config.kind.success_marker(&params));
            } else {
                println!("{}", config.kind.failure_marker(&params));
            }
            write_summary(config, &params, options, Some(&result), None);
            if !pass {
                host.signal_failure(&config.kind.failure_signal(&params));
            }
        }
        Err(err) => {
            println!("❌ Error running {}: {}", config.kind.error_label(), err);
            write_summary(config, &params, options, None, Some(&err));
            host.signal_failure(&format!("Error: {err}"));
        }
    }
}

fn execute(
    config: &StageConfig,
    params: &RunParameters,
    options: &RunnerOptions,
) -> Result<ExecutionResult, StageError> {
    if !options.no_install {
        deps::ensure_dependency(
            || deps::tool_present(&options.tool),
            deps::install_tool_packages,
        )?;
    }
    let args = build_args(config, params, options);
    exec::run_command(&options.tool, &args)
}

/// Argument template shared by every stage; only the selector varies.
pub fn build_args(
    config: &StageConfig,
    params: &RunParameters,
    options: &RunnerOptions,
) -> Vec<String> {
    let mut args = vec![
        config.verb.to_string(),
        "--profiles-dir".to_string(),
        options.profiles_dir.display().to_string(),
        "--target".to_string(),
        params.target.clone(),
    ];
    if let Some(selector) = effective_selector(config, params) {
        args.push("--select".to_string());
        args.push(selector.to_string());
    }
    args.extend(options.extra_args.iter().cloned());
    args
}

fn effective_selector<'a>(config: &StageConfig, params: &'a RunParameters) -> Option<&'a str> {
    if config.requires_selector {
        Some(params.selector())
    } else {
        config.fixed_selector
    }
}

/// Unconditional console report, in fixed order: stdout, stderr, exit code.
fn print_streams(result: &ExecutionResult) {
    println!("STDOUT:");
    println!("{}", result.stdout);
    println!("\nSTDERR:");
    println!("{}", result.stderr);
    println!("\nReturn code: {}", result.exit_code);
}

fn write_summary(
    config: &StageConfig,
    params: &RunParameters,
    options: &RunnerOptions,
    result: Option<&ExecutionResult>,
    error: Option<&StageError>,
) {
    let Some(path) = &options.report_path else {
        return;
    };
    let mut parts = vec![options.tool.display().to_string()];
    parts.extend(build_args(config, params, options));
    let summary = RunReport {
        stage: config.kind,
        catalog: params.catalog.clone(),
        selector: effective_selector(config, params).map(str::to_string),
        target: params.target.clone(),
        command_line: shell_words::join(parts.iter()),
        exit_code: result.map(|r| r.exit_code),
        pass: result.is_some_and(|r| r.outcome() == Outcome::Success),
        error: error.map(|e| e.to_string()),
    };
    if let Err(err) = report::write_report(path, &summary) {
        tracing::warn!(error = %err, "failed to write run summary");
    }
}
