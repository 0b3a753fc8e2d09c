use crate::{
    error::RunnerError,
    validate::{ModelUnit, UnitResult, validate_model},
};
use futures::{StreamExt, stream};
use model::BatchReport;
use project::{MODELS_SEGMENT, trim_from_segment};
use serde_json::Value;
use std::{collections::BTreeMap, num::NonZeroUsize, path::PathBuf, sync::Arc, thread};
use tokio_util::sync::CancellationToken;
use tracing::info;
use warehouse::QueryPlanner;

/// What the pool does when a unit fails for infrastructure reasons.
///
/// Invalid SQL never aborts anything under either policy; a rejection is an
/// answer, not a malfunction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep going and report every unit.
    #[default]
    CollectAll,
    /// Stop submitting new units after the first infrastructure failure.
    /// In-flight units finish; unstarted ones are reported as skipped. The
    /// abort is scoped to that one batch, a later `run` starts fresh.
    AbortOnInfrastructure,
}

/// Fans a set of compiled models out over a bounded worker pool and folds
/// the per-unit results into one [`BatchReport`].
pub struct BatchValidator {
    planner: Arc<dyn QueryPlanner>,
    options: BTreeMap<String, Value>,
    concurrency: usize,
    policy: FailurePolicy,
    cancel: CancellationToken,
}

impl BatchValidator {
    pub fn new(planner: Arc<dyn QueryPlanner>) -> Self {
        BatchValidator {
            planner,
            options: BTreeMap::new(),
            concurrency: default_concurrency(),
            policy: FailurePolicy::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Warehouse-specific query options attached to every request.
    pub fn with_options(mut self, options: BTreeMap<String, Value>) -> Self {
        self.options = options;
        self
    }

    /// Caps in-flight dry runs. Clamped to at least one worker.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shares an external token so a shutdown signal can wind the pool down.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Validates every path concurrently and seals the collected report.
    ///
    /// Identities are derived up front, so a path outside the `models`
    /// convention fails the whole batch here, before any request is sent.
    /// After that every unit is on its own: the stream is drained to
    /// exhaustion and each unit lands in the report exactly once, in
    /// whatever order the workers finish.
    pub async fn run(&self, paths: Vec<PathBuf>) -> Result<BatchReport, RunnerError> {
        let units = self.units_for(paths)?;

        info!(
            models = units.len(),
            concurrency = self.concurrency,
            "Starting dry-run batch."
        );

        // The abort path cancels a per-run child token. The shared token
        // stays untouched so a later run starts fresh; an external shutdown
        // on it still propagates down.
        let run_cancel = self.cancel.child_token();

        let mut results = stream::iter(units.into_iter().map(|unit| {
            let planner = Arc::clone(&self.planner);
            let cancel = run_cancel.clone();
            let options = &self.options;
            async move {
                if cancel.is_cancelled() {
                    return UnitResult::Skipped {
                        identity: unit.identity,
                    };
                }
                validate_model(planner.as_ref(), unit, options).await
            }
        }))
        .buffer_unordered(self.concurrency);

        let mut report = BatchReport::new();
        while let Some(result) = results.next().await {
            match result {
                UnitResult::Outcome(outcome) => report.add_outcome(outcome),
                UnitResult::Failure(failure) => {
                    if self.policy == FailurePolicy::AbortOnInfrastructure {
                        run_cancel.cancel();
                    }
                    report.add_failure(failure);
                }
                UnitResult::Skipped { identity } => report.add_skipped(identity),
            }
        }
        report.seal();

        info!(
            valid = report.valid_count(),
            invalid = report.invalid_count(),
            failed = report.failure_count(),
            skipped = report.skipped.len(),
            "Batch complete."
        );
        Ok(report)
    }

    fn units_for(&self, paths: Vec<PathBuf>) -> Result<Vec<ModelUnit>, RunnerError> {
        paths
            .into_iter()
            .map(|path| match trim_from_segment(&path, MODELS_SEGMENT) {
                Some(identity) => Ok(ModelUnit { identity, path }),
                None => Err(RunnerError::IdentityConvention {
                    path,
                    segment: MODELS_SEGMENT,
                }),
            })
            .collect()
    }
}

fn default_concurrency() -> usize {
    thread::available_parallelism().map_or(4, NonZeroUsize::get)
}
