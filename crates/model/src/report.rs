use crate::outcome::{ModelFailure, ModelOutcome};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The overall status of a validation batch.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum BatchStatus {
    #[default]
    Passed,
    Failed,
}

/// Everything one orchestrator invocation produced, in report form.
///
/// Exactly one entry exists per discovered model: a [`ModelOutcome`] when the
/// planner answered, a [`ModelFailure`] when it could not be asked, or a line
/// in `skipped` when a fail-fast policy stopped the batch first.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub run_id: String,
    pub engine_version: String,
    pub started_at: DateTime<Utc>,
    pub status: BatchStatus,
    pub outcomes: Vec<ModelOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ModelFailure>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl BatchReport {
    pub fn new() -> Self {
        BatchReport {
            run_id: uuid::Uuid::new_v4().to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Utc::now(),
            status: BatchStatus::default(),
            outcomes: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn add_outcome(&mut self, outcome: ModelOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn add_failure(&mut self, failure: ModelFailure) {
        self.failures.push(failure);
    }

    pub fn add_skipped(&mut self, identity: impl Into<String>) {
        self.skipped.push(identity.into());
    }

    /// Sorts everything by identity and fixes the final status. Completion
    /// order of the workers is arbitrary; the sealed report is not.
    pub fn seal(&mut self) {
        self.outcomes.sort_by(|a, b| a.identity.cmp(&b.identity));
        self.failures.sort_by(|a, b| a.identity.cmp(&b.identity));
        self.skipped.sort();
        self.status = if self.is_clean() {
            BatchStatus::Passed
        } else {
            BatchStatus::Failed
        };
    }

    /// True when every collected outcome is `Valid`. Says nothing about
    /// infrastructure failures; see [`BatchReport::is_clean`] for that.
    pub fn all_valid(&self) -> bool {
        self.outcomes.iter().all(ModelOutcome::is_valid)
    }

    /// True when the batch may be considered a success: every outcome valid,
    /// no failures, nothing skipped. An empty batch is clean.
    pub fn is_clean(&self) -> bool {
        self.all_valid() && self.failures.is_empty() && self.skipped.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.outcomes.len() - self.valid_count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of models the batch accounted for, whichever way they ended.
    pub fn total(&self) -> usize {
        self.outcomes.len() + self.failures.len() + self.skipped.len()
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FailureKind;

    #[test]
    fn empty_batch_is_clean() {
        let mut report = BatchReport::new();
        report.seal();

        assert!(report.all_valid());
        assert!(report.is_clean());
        assert_eq!(report.total(), 0);
        assert_eq!(report.status, BatchStatus::Passed);
    }

    #[test]
    fn one_invalid_outcome_fails_the_batch_but_not_all_valid_siblings() {
        let mut report = BatchReport::new();
        report.add_outcome(ModelOutcome::valid("models/a.sql", Some(1024)));
        report.add_outcome(ModelOutcome::invalid(
            "models/b/bad.sql",
            "Unrecognized name: colunm_a",
            Some("invalidQuery".to_string()),
        ));
        report.add_outcome(ModelOutcome::valid("models/c.sql", None));
        report.seal();

        assert!(!report.all_valid());
        assert_eq!(report.valid_count(), 2);
        assert_eq!(report.invalid_count(), 1);
        assert_eq!(report.total(), 3);
        assert_eq!(report.status, BatchStatus::Failed);
    }

    #[test]
    fn infrastructure_failure_breaks_clean_but_not_all_valid() {
        let mut report = BatchReport::new();
        report.add_outcome(ModelOutcome::valid("models/a.sql", None));
        report.add_failure(ModelFailure::new(
            "models/b.sql",
            FailureKind::Transport,
            "connection refused",
        ));
        report.seal();

        assert!(report.all_valid(), "failures are not invalid outcomes");
        assert!(!report.is_clean());
        assert_eq!(report.total(), 2);
        assert_eq!(report.status, BatchStatus::Failed);
    }

    #[test]
    fn seal_orders_by_identity_regardless_of_arrival() {
        let mut report = BatchReport::new();
        report.add_outcome(ModelOutcome::valid("models/z.sql", None));
        report.add_outcome(ModelOutcome::valid("models/a.sql", None));
        report.add_outcome(ModelOutcome::valid("models/m/mid.sql", None));
        report.seal();

        let identities: Vec<&str> = report
            .outcomes
            .iter()
            .map(|o| o.identity.as_str())
            .collect();
        assert_eq!(
            identities,
            vec!["models/a.sql", "models/m/mid.sql", "models/z.sql"]
        );
    }

    #[test]
    fn report_serializes_with_camel_case_keys() {
        let mut report = BatchReport::new();
        report.add_outcome(ModelOutcome::valid("models/a.sql", Some(2048)));
        report.seal();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("runId").is_some());
        assert!(json.get("engineVersion").is_some());
        assert_eq!(json["status"], "passed");
        assert_eq!(json["outcomes"][0]["identity"], "models/a.sql");
        assert_eq!(json["outcomes"][0]["verdict"], "valid");
        assert_eq!(json["outcomes"][0]["totalBytesProcessed"], 2048);
        // Empty failure/skip lists stay off the wire entirely.
        assert!(json.get("failures").is_none());
        assert!(json.get("skipped").is_none());
    }
}
