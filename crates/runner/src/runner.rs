use crate::{batch::BatchValidator, error::RunnerError};
use model::BatchReport;
use project::{BuildTarget, DbtProject, ProjectLayout, discover_models};
use std::path::PathBuf;
use tracing::info;

/// Front door for validating a dbt project's compiled output.
///
/// Construction resolves the project descriptor once and fails fast on a
/// broken setup; the entry points only differ in which compiled tree they
/// point the pool at.
pub struct DryRunner {
    layout: ProjectLayout,
    validator: BatchValidator,
}

impl DryRunner {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        validator: BatchValidator,
    ) -> Result<Self, RunnerError> {
        let dir = project_dir.into();
        let project = DbtProject::load(&dir)?;
        info!(
            project = project.name(),
            dir = %dir.display(),
            "Resolved dbt project."
        );
        Ok(DryRunner {
            layout: ProjectLayout::new(dir, project.name()),
            validator,
        })
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Validates `target/incremental/compiled/<name>/models`.
    pub async fn run_incremental(&self) -> Result<BatchReport, RunnerError> {
        self.run_all(BuildTarget::Incremental).await
    }

    /// Validates `target/full_refresh/compiled/<name>/models`.
    pub async fn run_full_refresh(&self) -> Result<BatchReport, RunnerError> {
        self.run_all(BuildTarget::FullRefresh).await
    }

    /// Validates the compiled tree for any build target.
    ///
    /// Returns the sealed report only when the batch is clean; any invalid
    /// model, infrastructure failure or skipped unit comes back as
    /// [`RunnerError::BatchFailed`] with the full report attached.
    pub async fn run_all(&self, target: BuildTarget) -> Result<BatchReport, RunnerError> {
        let dir = self.layout.compiled_models_dir(target);
        let models = discover_models(&dir)?;
        info!(
            target = %target,
            dir = %dir,
            models = models.len(),
            "Validating compiled models."
        );

        let report = self.validator.run(models).await?;
        if report.is_clean() {
            Ok(report)
        } else {
            Err(RunnerError::BatchFailed {
                invalid: report.invalid_count(),
                failed: report.failure_count(),
                skipped: report.skipped.len(),
                total: report.total(),
                report: Box::new(report),
            })
        }
    }

    /// Validating one model by name needs manifest awareness this tool does
    /// not have; calling this is an explicit error, never a silent no-op.
    pub async fn run_by_model_name(&self, _name: &str) -> Result<BatchReport, RunnerError> {
        Err(RunnerError::NotImplemented("validation by model name"))
    }
}
