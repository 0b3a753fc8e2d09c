use crate::error::CliError;
use model::BatchReport;
use std::path::Path;

async fn generate_report_json(report: &BatchReport) -> Result<String, CliError> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}

pub async fn write_report(report: &BatchReport, path: &Path) -> Result<(), CliError> {
    let report_json = generate_report_json(report).await?;
    tokio::fs::write(path, report_json).await?;
    Ok(())
}

pub async fn print_report(report: &BatchReport) -> Result<(), CliError> {
    let report_json = generate_report_json(report).await?;
    println!("{report_json}");
    Ok(())
}
