//! CLI argument parsing for the stage runner.
//!
//! The CLI is intentionally thin: each subcommand is one row of the stage
//! table plus the shared invocation knobs, with no policy of its own.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::stage::DEFAULT_TARGET;

/// Root CLI entrypoint for the stage runner.
#[derive(Parser, Debug)]
#[command(
    name = "dbt-stage",
    version,
    about = "Run one dbt warehouse build stage and report its outcome",
    after_help = "Stages:\n  seed        Load raw_* seed tables\n  snapshot    Run snapshots for SCD Type-2 tracking\n  run-silver  Build the 020_silver layer\n  run-gold    Build the 030_gold layer\n  test        Run dbt tests for a selector\n\nExamples:\n  dbt-stage seed --catalog streaming_dev\n  dbt-stage run-gold --catalog prod\n  dbt-stage test --select assert_nonnull",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// One subcommand per stage.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Seed raw data tables from CSV files
    Seed(StageArgs),
    /// Run snapshots for SCD Type-2 tracking
    Snapshot(StageArgs),
    /// Build the Silver layer models
    RunSilver(StageArgs),
    /// Build the Gold layer models
    RunGold(StageArgs),
    /// Run dbt tests on a selected layer
    Test(TestArgs),
}

/// Inputs shared by the stages with a fixed selector.
#[derive(Args, Debug)]
pub struct StageArgs {
    /// Destination catalog (defaults to streaming_dev)
    #[arg(long, value_name = "NAME")]
    pub catalog: Option<String>,

    #[command(flatten)]
    pub invocation: InvocationArgs,
}

/// Inputs for the test stage, which takes its selector from the caller.
#[derive(Args, Debug)]
pub struct TestArgs {
    /// Destination catalog (defaults to streaming_dev)
    #[arg(long, value_name = "NAME")]
    pub catalog: Option<String>,

    /// Selector for the tests to run (defaults to *)
    #[arg(long, value_name = "PATTERN")]
    pub select: Option<String>,

    #[command(flatten)]
    pub invocation: InvocationArgs,
}

/// Knobs shared by every stage; none of them vary per stage row.
#[derive(Args, Debug)]
pub struct InvocationArgs {
    /// dbt executable to invoke
    #[arg(long, value_name = "PATH", default_value = "dbt")]
    pub dbt_bin: PathBuf,

    /// Profiles directory passed to dbt (defaults to ~/.dbt)
    #[arg(long, value_name = "DIR")]
    pub profiles_dir: Option<PathBuf>,

    /// dbt target environment
    #[arg(long, value_name = "ENV", default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Skip the tool-presence check and self-install
    #[arg(long)]
    pub no_install: bool,

    /// Write a JSON run summary to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}
