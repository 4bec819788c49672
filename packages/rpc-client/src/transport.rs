//! Transport seam between typed queries and the wire.
//!
//! The cache and queries only see this trait, so tests drive them with an
//! in-memory fake and the HTTP implementation stays thin.

use async_trait::async_trait;
use contract::{ErrorKind, RpcError};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one procedure call. `input` is the procedure's JSON input;
    /// the result is the raw JSON output.
    async fn call(&self, procedure: &str, input: Value) -> Result<Value, ClientError>;
}

/// Problem-details body as the server emits it. Only the fields the client
/// branches on.
#[derive(Debug, Deserialize)]
struct ProblemBody {
    code: String,
    kind: ErrorKind,
    detail: String,
    #[serde(default)]
    trace_id: Option<String>,
}

/// reqwest-backed transport: `POST {base_url}/api/rpc/{procedure}` with a
/// bearer token.
pub struct HttpTransport {
    base_url: String,
    bearer_token: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, procedure: &str, input: Value) -> Result<Value, ClientError> {
        let url = format!("{}/api/rpc/{procedure}", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .json(&input)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                detail: e.to_string(),
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport {
                detail: e.to_string(),
            })?;

        if status.is_success() {
            return serde_json::from_slice(&bytes).map_err(|e| ClientError::Transport {
                detail: format!("response body is not JSON: {e}"),
            });
        }

        // Structured failure path: problem details with code/kind/trace_id.
        match serde_json::from_slice::<ProblemBody>(&bytes) {
            Ok(problem) => Err(ClientError::Rpc(RpcError {
                kind: problem.kind,
                code: problem.code,
                detail: problem.detail,
                trace_id: problem.trace_id,
            })),
            Err(_) => Err(ClientError::Transport {
                detail: format!("HTTP {status} without problem details"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_body_parses_server_shape() {
        let body = r#"{
            "type": "https://tablescore.app/errors/GAME_NOT_FOUND",
            "title": "Game Not Found",
            "status": 404,
            "detail": "Game 9 not found",
            "code": "GAME_NOT_FOUND",
            "kind": "NOT_FOUND",
            "trace_id": "abc"
        }"#;
        let parsed: ProblemBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.code, "GAME_NOT_FOUND");
        assert_eq!(parsed.kind, ErrorKind::NotFound);
        assert_eq!(parsed.trace_id.as_deref(), Some("abc"));
    }
}
