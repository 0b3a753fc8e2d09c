//! Wire types for the BigQuery `jobs.query` REST surface, reduced to what a
//! dry run sends and receives.

use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Builds the JSON body for a plan-only `jobs.query` request.
///
/// Caller options are merged in first; the fixed keys go last so `dryRun`,
/// the SQL text and the dialect flag always win over caller options.
pub fn dry_run_body(sql: &str, location: &str, options: &BTreeMap<String, Value>) -> Value {
    let mut body = Map::new();
    for (key, value) in options {
        body.insert(key.clone(), value.clone());
    }
    body.insert("query".to_string(), json!(sql));
    body.insert("useLegacySql".to_string(), json!(false));
    body.insert("dryRun".to_string(), json!(true));
    if !location.is_empty() {
        body.insert("location".to_string(), json!(location));
    }
    Value::Object(body)
}

/// The slice of a `jobs.query` response a dry run cares about. BigQuery
/// serializes int64 fields as JSON strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub total_bytes_processed: Option<String>,
    #[serde(default)]
    pub job_complete: Option<bool>,
}

impl QueryResponse {
    pub fn bytes_processed(&self) -> Option<u64> {
        self.total_bytes_processed
            .as_deref()
            .and_then(|raw| raw.parse().ok())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorProto>,
}

#[derive(Debug, Deserialize)]
struct ErrorProto {
    #[serde(default)]
    message: String,
    #[serde(default)]
    reason: Option<String>,
}

/// Extracts the first error entry from a Google error envelope.
///
/// Falls back to the envelope-level message, then to the raw body, so the
/// report always carries something the server actually said.
pub fn first_error(body: &str) -> (String, Option<String>) {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.errors.into_iter().next() {
            Some(entry) => (entry.message, entry.reason),
            None => (envelope.error.message, None),
        },
        Err(_) => (body.trim().to_string(), None),
    }
}
