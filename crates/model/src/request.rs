use std::collections::BTreeMap;

/// A single plan-only validation request for one compiled model.
///
/// Immutable once constructed: the orchestrator hands these out to workers
/// and never touches them again.
#[derive(Debug, Clone)]
pub struct DryRunRequest {
    identity: String,
    sql: String,
    options: BTreeMap<String, serde_json::Value>,
}

impl DryRunRequest {
    pub fn new(identity: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            sql: sql.into(),
            options: BTreeMap::new(),
        }
    }

    /// Attaches warehouse-specific query options. Keys are passed through to
    /// the planner as-is; nothing is validated locally.
    pub fn with_options(mut self, options: BTreeMap<String, serde_json::Value>) -> Self {
        self.options = options;
        self
    }

    /// Human-readable label used in logs and the report (trimmed model path).
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn options(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.options
    }
}
