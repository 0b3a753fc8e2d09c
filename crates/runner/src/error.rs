use model::BatchReport;
use project::ProjectError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level errors for the dry-run engine.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error(
        "Cannot derive a model identity for {path}: no `{segment}` segment in the compiled path"
    )]
    IdentityConvention {
        path: PathBuf,
        segment: &'static str,
    },

    #[error(transparent)]
    Project(#[from] ProjectError),

    /// The batch ran to completion but was not clean. Carries the sealed
    /// report so callers can still print every per-model detail.
    #[error("Validation failed: {invalid} invalid, {failed} failed, {skipped} skipped out of {total} models")]
    BatchFailed {
        invalid: usize,
        failed: usize,
        skipped: usize,
        total: usize,
        report: Box<BatchReport>,
    },
}
