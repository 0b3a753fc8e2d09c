use crate::error::PlannerError;

/// Environment variable holding the OAuth bearer token for the planner.
pub const TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Environment variable consulted for the project id when none is given
/// explicitly.
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";

pub const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";
pub const DEFAULT_LOCATION: &str = "EU";

/// Connection settings for the BigQuery planner endpoint.
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    /// Google Cloud project the dry runs are billed against (they cost
    /// nothing, but the API still scopes jobs to a project).
    pub project: String,
    pub location: String,
    pub base_url: String,
    pub access_token: String,
}

impl BigQueryConfig {
    pub fn new(project: impl Into<String>, access_token: impl Into<String>) -> Self {
        BigQueryConfig {
            project: project.into(),
            location: DEFAULT_LOCATION.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Builds a config with the token taken from [`TOKEN_ENV`]. A missing
    /// token fails here, at construction, so the batch never starts only to
    /// die on its first request.
    pub fn from_env(project: impl Into<String>) -> Result<Self, PlannerError> {
        let token =
            std::env::var(TOKEN_ENV).map_err(|_| PlannerError::MissingCredentials(TOKEN_ENV))?;
        Ok(Self::new(project, token))
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url: String = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}
