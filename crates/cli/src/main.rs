use crate::{
    commands::{Commands, RunArgs},
    error::CliError,
    shutdown::{ExitCode, ShutdownCoordinator},
};
use clap::Parser;
use model::BatchReport;
use runner::{BatchValidator, DryRunner, FailurePolicy, RunnerError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::EnvFilter;
use warehouse::{BigQueryConfig, BigQueryPlanner, config::PROJECT_ENV};

mod commands;
mod error;
mod output;
mod shutdown;

#[derive(Parser)]
#[command(
    name = "drydock",
    version = "0.1.0",
    about = "Dry-run validation of compiled dbt SQL against BigQuery"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Initialize logger; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let shutdown = ShutdownCoordinator::new(CancellationToken::new());
    shutdown.register_handlers();

    let code = match run(cli.command, &shutdown).await {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::GeneralError
        }
    };
    std::process::exit(code.as_i32());
}

async fn run(command: Commands, shutdown: &ShutdownCoordinator) -> Result<ExitCode, CliError> {
    match command {
        Commands::Incremental { run } => {
            let runner = build_runner(&run, shutdown)?;
            finish(runner.run_incremental().await, &run, shutdown).await
        }
        Commands::FullRefresh { run } => {
            let runner = build_runner(&run, shutdown)?;
            finish(runner.run_full_refresh().await, &run, shutdown).await
        }
    }
}

fn build_runner(args: &RunArgs, shutdown: &ShutdownCoordinator) -> Result<DryRunner, CliError> {
    let project = args
        .project
        .clone()
        .or_else(|| std::env::var(PROJECT_ENV).ok())
        .ok_or(CliError::MissingProject(PROJECT_ENV))?;

    let mut config = BigQueryConfig::from_env(project)?;
    if let Some(location) = &args.location {
        config = config.with_location(location.clone());
    }

    let policy = match (args.fail_fast, args.keep_going) {
        (true, false) => FailurePolicy::AbortOnInfrastructure,
        _ => FailurePolicy::CollectAll,
    };

    let mut validator = BatchValidator::new(Arc::new(BigQueryPlanner::new(config)))
        .with_policy(policy)
        .with_cancellation(shutdown.cancel_token());
    if let Some(concurrency) = args.concurrency {
        validator = validator.with_concurrency(concurrency);
    }

    Ok(DryRunner::new(args.project_dir.clone(), validator)?)
}

/// Prints or writes the report, then maps the batch result onto an exit
/// code. A batch stopped by a signal exits 130 even though it also failed.
async fn finish(
    result: Result<BatchReport, RunnerError>,
    args: &RunArgs,
    shutdown: &ShutdownCoordinator,
) -> Result<ExitCode, CliError> {
    let (report, code) = match result {
        Ok(report) => (report, ExitCode::Success),
        Err(RunnerError::BatchFailed {
            invalid,
            failed,
            skipped,
            total,
            report,
        }) => {
            error!(invalid, failed, skipped, total, "Validation batch failed.");
            let code = if shutdown.is_shutdown_requested() {
                ExitCode::ShutdownRequested
            } else {
                ExitCode::GeneralError
            };
            (*report, code)
        }
        Err(err) => return Err(err.into()),
    };

    match &args.output {
        Some(path) => output::write_report(&report, path).await?,
        None => output::print_report(&report).await?,
    }
    Ok(code)
}
