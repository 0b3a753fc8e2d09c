use serde::Serialize;

/// What the planner said about one model's SQL.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "verdict")]
pub enum Verdict {
    /// The service accepted the plan. `total_bytes_processed` is the scan
    /// estimate the planner reports for a dry run, when it reports one.
    #[serde(rename_all = "camelCase")]
    Valid {
        #[serde(skip_serializing_if = "Option::is_none")]
        total_bytes_processed: Option<u64>,
    },
    /// The service rejected the SQL with a client-error class response
    /// (syntax error, unresolved reference, type error, ...).
    #[serde(rename_all = "camelCase")]
    Invalid {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }
}

/// The planner's verdict on exactly one submitted model.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelOutcome {
    pub identity: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl ModelOutcome {
    pub fn valid(identity: impl Into<String>, total_bytes_processed: Option<u64>) -> Self {
        ModelOutcome {
            identity: identity.into(),
            verdict: Verdict::Valid {
                total_bytes_processed,
            },
        }
    }

    pub fn invalid(
        identity: impl Into<String>,
        message: impl Into<String>,
        reason: Option<String>,
    ) -> Self {
        ModelOutcome {
            identity: identity.into(),
            verdict: Verdict::Invalid {
                message: message.into(),
                reason,
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        self.verdict.is_valid()
    }
}

/// Classifies a per-model failure that is not a statement about the SQL:
/// the model could not be validated at all.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Network-level failure reaching the planner.
    Transport,
    /// The planner refused our credentials.
    Auth,
    /// The planner itself errored (5xx class).
    Service,
    /// The local model file could not be read.
    UnreadableFile,
}

/// An infrastructure-class failure for one model. Recorded alongside the
/// outcomes so no submitted model ever drops out of the report, and kept
/// separate from [`Verdict::Invalid`] because it says nothing about the SQL.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelFailure {
    pub identity: String,
    pub kind: FailureKind,
    pub error: String,
}

impl ModelFailure {
    pub fn new(identity: impl Into<String>, kind: FailureKind, error: impl Into<String>) -> Self {
        ModelFailure {
            identity: identity.into(),
            kind,
            error: error.into(),
        }
    }
}
