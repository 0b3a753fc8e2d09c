use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Validate the incrementally compiled models
    Incremental {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Validate the full-refresh compiled models
    FullRefresh {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(Args)]
pub struct RunArgs {
    #[arg(
        long,
        default_value = ".",
        help = "dbt project directory containing dbt_project.yml"
    )]
    pub project_dir: PathBuf,

    #[arg(long, help = "Google Cloud project id (defaults to $GOOGLE_CLOUD_PROJECT)")]
    pub project: Option<String>,

    #[arg(long, help = "BigQuery job location, e.g. EU or us-central1")]
    pub location: Option<String>,

    #[arg(long, help = "Maximum in-flight dry runs (defaults to the CPU count)")]
    pub concurrency: Option<usize>,

    #[arg(
        long,
        help = "Stop submitting models after the first infrastructure failure"
    )]
    pub fail_fast: bool,

    #[arg(
        long,
        conflicts_with = "fail_fast",
        help = "Validate every model even when some cannot be reached (the default)"
    )]
    pub keep_going: bool,

    #[arg(
        long,
        help = "If specified, writes the JSON report to this file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}
