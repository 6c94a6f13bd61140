//! dbt-stage: run one stage of a layered dbt warehouse build.
//!
//! Each invocation executes exactly one stage (seed, snapshot, run-silver,
//! run-gold, test) as a dbt subprocess, prints a fixed-order report of its
//! streams and exit code, and exits nonzero when the stage failed.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;
mod deps;
mod error;
mod exec;
mod host;
mod report;
mod runner;
mod stage;

use cli::{Command, InvocationArgs, RootArgs};
use host::CliHost;
use runner::RunnerOptions;
use stage::StageKind;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: RootArgs) -> anyhow::Result<ExitCode> {
    let (kind, catalog, select, invocation) = match args.command {
        Command::Seed(stage) => (StageKind::Seed, stage.catalog, None, stage.invocation),
        Command::Snapshot(stage) => (StageKind::Snapshot, stage.catalog, None, stage.invocation),
        Command::RunSilver(stage) => (StageKind::RunSilver, stage.catalog, None, stage.invocation),
        Command::RunGold(stage) => (StageKind::RunGold, stage.catalog, None, stage.invocation),
        Command::Test(test) => (StageKind::Test, test.catalog, test.select, test.invocation),
    };

    let mut host = CliHost::new();
    if let Some(catalog) = catalog {
        host.set_param("catalog", catalog);
    }
    if let Some(select) = select {
        host.set_param("select", select);
    }

    let options = options_from(invocation)?;
    runner::run_stage(kind.config(), &host, &options);

    Ok(match host.failure() {
        Some(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    })
}

fn options_from(invocation: InvocationArgs) -> anyhow::Result<RunnerOptions> {
    Ok(RunnerOptions {
        tool: invocation.dbt_bin,
        profiles_dir: invocation
            .profiles_dir
            .unwrap_or_else(runner::default_profiles_dir),
        target: invocation.target,
        no_install: invocation.no_install,
        report_path: invocation.report,
        extra_args: runner::extra_args_from_env()?,
    })
}
