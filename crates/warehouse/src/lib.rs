use async_trait::async_trait;
use model::DryRunRequest;

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use client::BigQueryPlanner;
pub use config::BigQueryConfig;
pub use error::PlannerError;

/// What a successful dry run tells us about the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanSummary {
    /// Bytes the warehouse would scan if the query ran for real.
    pub total_bytes_processed: Option<u64>,
}

/// A query-planning service that can validate SQL without executing it.
///
/// The orchestrator holds this as `Arc<dyn QueryPlanner>` so tests can swap
/// in a scripted fake; the real thing is [`BigQueryPlanner`].
#[async_trait]
pub trait QueryPlanner: Send + Sync {
    /// Submits exactly one plan-only request and waits for the answer.
    ///
    /// A client-error rejection of the SQL comes back as
    /// [`PlannerError::Rejected`]; anything else wrong with the exchange is
    /// one of the infrastructure variants. Never retries.
    async fn dry_run(&self, request: &DryRunRequest) -> Result<PlanSummary, PlannerError>;
}
