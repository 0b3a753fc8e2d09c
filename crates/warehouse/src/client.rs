use crate::{
    PlanSummary, QueryPlanner,
    api::{self, QueryResponse},
    config::BigQueryConfig,
    error::PlannerError,
};
use async_trait::async_trait;
use model::DryRunRequest;
use tracing::{error, info};

/// REST client for BigQuery's `jobs.query` endpoint, used exclusively in
/// dry-run mode: plan the query, never execute it, never bill it.
///
/// The handle is stateless and shared read-only across workers.
pub struct BigQueryPlanner {
    client: reqwest::Client,
    config: BigQueryConfig,
}

impl BigQueryPlanner {
    pub fn new(config: BigQueryConfig) -> Self {
        BigQueryPlanner {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &BigQueryConfig {
        &self.config
    }

    fn query_url(&self) -> String {
        format!(
            "{}/projects/{}/queries",
            self.config.base_url, self.config.project
        )
    }
}

#[async_trait]
impl QueryPlanner for BigQueryPlanner {
    async fn dry_run(&self, request: &DryRunRequest) -> Result<PlanSummary, PlannerError> {
        let body = api::dry_run_body(request.sql(), &self.config.location, request.options());

        let response = self
            .client
            .post(self.query_url())
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let parsed: QueryResponse = response
                .json()
                .await
                .map_err(|err| PlannerError::InvalidResponse(err.to_string()))?;
            let summary = PlanSummary {
                total_bytes_processed: parsed.bytes_processed(),
            };
            info!(
                model = request.identity(),
                bytes_processed = summary.total_bytes_processed,
                "Model is valid"
            );
            return Ok(summary);
        }

        // Error bodies are plain JSON; losing one to a read error should not
        // mask the status-derived classification.
        let raw_body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => {
                let (message, _) = api::first_error(&raw_body);
                Err(PlannerError::Unauthorized {
                    status: status.as_u16(),
                    message,
                })
            }
            code if (400..500).contains(&code) => {
                let (message, reason) = api::first_error(&raw_body);
                error!(
                    model = request.identity(),
                    reason = reason.as_deref().unwrap_or("unknown"),
                    "Dry run rejected: the server returned an error: {message}"
                );
                Err(PlannerError::Rejected { message, reason })
            }
            code => Err(PlannerError::Service {
                status: code,
                body: raw_body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::FailureKind;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Answers the first request on an ephemeral port with a canned
    /// response, just enough HTTP for one client call.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let read = stream.read(&mut chunk).await.unwrap();
                request.extend_from_slice(&chunk[..read]);
                if read == 0 || request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(headers_end) = request.windows(4).position(|win| win == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..headers_end]);
        let content_length = headers
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= headers_end + 4 + content_length
    }

    #[test]
    fn query_url_targets_the_configured_project() {
        let planner = BigQueryPlanner::new(
            BigQueryConfig::new("acme-dev", "token").with_base_url("http://localhost:9050/v2"),
        );
        assert_eq!(
            planner.query_url(),
            "http://localhost:9050/v2/projects/acme-dev/queries"
        );
    }

    #[tokio::test]
    async fn connection_failure_classifies_as_transport() {
        // Port 9 is the discard service; nothing answers HTTP there.
        let planner = BigQueryPlanner::new(
            BigQueryConfig::new("acme-dev", "token").with_base_url("http://127.0.0.1:9"),
        );
        let request = DryRunRequest::new("models/orders.sql", "select 1");

        let err = planner.dry_run(&request).await.unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Transport));
    }

    #[tokio::test]
    async fn unauthorized_status_is_an_infrastructure_failure() {
        let base = serve_once(
            "401 Unauthorized",
            r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","errors":[{"message":"Invalid Credentials","domain":"global","reason":"authError"}],"status":"UNAUTHENTICATED"}}"#,
        )
        .await;
        let planner = BigQueryPlanner::new(
            BigQueryConfig::new("acme-dev", "expired-token").with_base_url(base),
        );
        let request = DryRunRequest::new("models/orders.sql", "select 1");

        let err = planner.dry_run(&request).await.unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Auth));
        match err {
            PlannerError::Unauthorized { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Credentials");
            }
            other => panic!("expected Unauthorized, got {other}"),
        }
    }

    #[tokio::test]
    async fn bad_request_is_a_rejection_not_a_failure() {
        let base = serve_once(
            "400 Bad Request",
            r#"{"error":{"code":400,"message":"Unrecognized name: colunm_a","errors":[{"message":"Unrecognized name: colunm_a","domain":"global","reason":"invalidQuery","location":"query"}],"status":"INVALID_ARGUMENT"}}"#,
        )
        .await;
        let planner =
            BigQueryPlanner::new(BigQueryConfig::new("acme-dev", "token").with_base_url(base));
        let request = DryRunRequest::new("models/orders.sql", "select colunm_a from raw.orders");

        let err = planner.dry_run(&request).await.unwrap_err();
        assert_eq!(
            err.failure_kind(),
            None,
            "a rejection is a verdict on the SQL, not a malfunction"
        );
        match err {
            PlannerError::Rejected { message, reason } => {
                assert_eq!(message, "Unrecognized name: colunm_a");
                assert_eq!(reason.as_deref(), Some("invalidQuery"));
            }
            other => panic!("expected Rejected, got {other}"),
        }
    }
}
