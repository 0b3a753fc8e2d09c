use model::FailureKind;
use thiserror::Error;

/// Everything that can go wrong asking the planner about one model.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The service understood the request and rejected the SQL. This is a
    /// verdict on the model, not an infrastructure problem.
    #[error("Dry run rejected by the planner: {message}")]
    Rejected {
        message: String,
        reason: Option<String>,
    },

    /// The service refused our credentials (HTTP 401/403).
    #[error("Planner refused the request credentials (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The service itself failed (HTTP 5xx).
    #[error("Planner service error (HTTP {status}): {body}")]
    Service { status: u16, body: String },

    /// The request never completed: DNS, connect, TLS, timeout.
    #[error("Failed to reach the planner: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered 2xx with a body we could not make sense of.
    #[error("Failed to decode the planner response: {0}")]
    InvalidResponse(String),

    /// No bearer token available at construction time.
    #[error("Missing access token: set the {0} environment variable")]
    MissingCredentials(&'static str),
}

impl PlannerError {
    /// The infrastructure failure class for this error, or `None` when the
    /// error is a rejection (an outcome, not a failure) or a configuration
    /// problem caught before any batch work.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            PlannerError::Rejected { .. } => None,
            PlannerError::Unauthorized { .. } => Some(FailureKind::Auth),
            PlannerError::Service { .. } => Some(FailureKind::Service),
            PlannerError::Transport(_) => Some(FailureKind::Transport),
            PlannerError::InvalidResponse(_) => Some(FailureKind::Service),
            PlannerError::MissingCredentials(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_is_not_an_infrastructure_failure() {
        let err = PlannerError::Rejected {
            message: "Syntax error".to_string(),
            reason: Some("invalidQuery".to_string()),
        };
        assert!(err.failure_kind().is_none());
    }

    #[test]
    fn auth_and_service_errors_classify_as_failures() {
        let auth = PlannerError::Unauthorized {
            status: 401,
            message: "Invalid Credentials".to_string(),
        };
        assert_eq!(auth.failure_kind(), Some(FailureKind::Auth));

        let service = PlannerError::Service {
            status: 503,
            body: "backendError".to_string(),
        };
        assert_eq!(service.failure_kind(), Some(FailureKind::Service));
    }
}
