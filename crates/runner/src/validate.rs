use model::{DryRunRequest, FailureKind, ModelFailure, ModelOutcome};
use std::{collections::BTreeMap, path::PathBuf};
use tracing::{error, warn};
use warehouse::{PlannerError, QueryPlanner};

/// One unit of work: a compiled model file plus the identity derived from
/// its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelUnit {
    pub identity: String,
    pub path: PathBuf,
}

/// How a single unit ended. Exactly one of these exists per unit handed to
/// the pool, whichever way it went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitResult {
    /// The planner answered: the SQL is valid or invalid.
    Outcome(ModelOutcome),
    /// The unit could not be validated at all (I/O, auth, transport, service).
    Failure(ModelFailure),
    /// A fail-fast policy or an external cancel stopped the batch before
    /// this unit started.
    Skipped { identity: String },
}

/// Validates one compiled model end to end: read the file, ask the planner,
/// classify the answer.
///
/// Every error is contained in the returned [`UnitResult`] so one broken
/// unit never takes the batch down with it.
pub async fn validate_model(
    planner: &dyn QueryPlanner,
    unit: ModelUnit,
    options: &BTreeMap<String, serde_json::Value>,
) -> UnitResult {
    let ModelUnit { identity, path } = unit;

    let sql = match tokio::fs::read_to_string(&path).await {
        Ok(sql) => sql,
        Err(err) => {
            warn!(
                model = identity.as_str(),
                path = %path.display(),
                "Failed to read compiled model: {err}"
            );
            return UnitResult::Failure(ModelFailure::new(
                identity,
                FailureKind::UnreadableFile,
                err.to_string(),
            ));
        }
    };

    let request = DryRunRequest::new(identity.clone(), sql).with_options(options.clone());
    match planner.dry_run(&request).await {
        Ok(summary) => UnitResult::Outcome(ModelOutcome::valid(
            identity,
            summary.total_bytes_processed,
        )),
        Err(PlannerError::Rejected { message, reason }) => {
            UnitResult::Outcome(ModelOutcome::invalid(identity, message, reason))
        }
        Err(err) => {
            let kind = err.failure_kind().unwrap_or(FailureKind::Service);
            error!(model = identity.as_str(), "Could not validate model: {err}");
            UnitResult::Failure(ModelFailure::new(identity, kind, err.to_string()))
        }
    }
}
