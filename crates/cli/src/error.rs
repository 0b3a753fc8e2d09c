use runner::RunnerError;
use thiserror::Error;
use warehouse::PlannerError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Missing Google Cloud project id: pass --project or set {0}")]
    MissingProject(&'static str),

    #[error("Planner configuration error: {0}")]
    PlannerConfig(#[from] PlannerError),

    #[error("Validation run failed: {0}")]
    Runner(#[from] RunnerError),

    #[error("Failed to write the report: {0}")]
    ReportWrite(#[from] std::io::Error),

    #[error("Failed to serialize the report to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}
