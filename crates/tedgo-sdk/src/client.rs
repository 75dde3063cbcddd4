//! TedGo node client implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tedgo_core::{Operation, RemoteResult, Result, TedGoError};

/// Boundary to the remote node.
///
/// Implementations never retry; every call resolves to one [`RemoteResult`].
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// `GET /blocks`, decoded as JSON.
    async fn fetch_ledger(&self) -> RemoteResult<serde_json::Value>;

    /// `POST /mine` with the operation as body. Success carries the response text.
    async fn submit(&self, op: &Operation) -> RemoteResult<String>;
}

/// Per-call deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTimeouts {
    pub fetch_ms: u64,
    /// Mining can take longer than a read.
    pub submit_ms: u64,
}

impl Default for NodeTimeouts {
    fn default() -> Self {
        Self {
            fetch_ms: 6_000,
            submit_ms: 8_000,
        }
    }
}

/// Client for a node reachable over HTTP.
#[derive(Clone)]
pub struct HttpNodeClient {
    /// Base URL of the node.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,

    timeouts: NodeTimeouts,
}

impl HttpNodeClient {
    /// Create a client for the node at `url`. No request is made.
    pub fn new(url: &str, timeouts: NodeTimeouts) -> Result<Self> {
        let base_url = url.trim_end_matches('/').to_string();
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| TedGoError::Internal(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http_client,
            timeouts,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_blocks(&self) -> Result<serde_json::Value> {
        let url = format!("{}/blocks", self.base_url);
        let timeout_ms = self.timeouts.fetch_ms;

        let response = self
            .http_client
            .get(&url)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        let response = check_status(response).await?;

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn post_mine(&self, op: &Operation) -> Result<String> {
        let url = format!("{}/mine", self.base_url);
        let timeout_ms = self.timeouts.submit_ms;

        let response = self
            .http_client
            .post(&url)
            .json(op)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| transport_error(e, timeout_ms))?;

        let response = check_status(response).await?;

        response
            .text()
            .await
            .map_err(|e| transport_error(e, timeout_ms))
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn fetch_ledger(&self) -> RemoteResult<serde_json::Value> {
        let result = self.get_blocks().await;
        if let Err(e) = &result {
            tracing::debug!(node = %self.base_url, error = %e, "GET /blocks failed");
        }
        result.into()
    }

    async fn submit(&self, op: &Operation) -> RemoteResult<String> {
        let result = self.post_mine(op).await;
        if let Err(e) = &result {
            tracing::debug!(node = %self.base_url, error = %e, "POST /mine failed");
        }
        result.into()
    }
}

/// Turn a non-2xx answer into a transport error carrying status and body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    Err(if body.is_empty() {
        TedGoError::transport(format!("node answered {status}"))
    } else {
        TedGoError::transport(format!("node answered {status}: {body}"))
    })
}

fn transport_error(err: reqwest::Error, timeout_ms: u64) -> TedGoError {
    if err.is_timeout() {
        return TedGoError::Timeout {
            duration_ms: timeout_ms,
        };
    }
    TedGoError::transport(error_chain(&err))
}

/// `err` and its sources joined with `: `, so the root cause stays visible.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
    use tedgo_core::TransactionSpec;
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    struct StubNode {
        received: Arc<Mutex<Vec<serde_json::Value>>>,
    }

    async fn blocks() -> Json<serde_json::Value> {
        Json(serde_json::json!([
            {"hash": "00aa", "data": {"from": "Sistema", "to": "Ana", "amount": 50}},
            {"hash": "00bb", "data": {"from": "Ana", "to": "Bia", "amount": 5}}
        ]))
    }

    async fn mine(
        State(node): State<StubNode>,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, String) {
        let amount = body["amount"].as_f64().unwrap_or(0.0);
        node.received.lock().unwrap().push(body);
        if amount > 0.0 {
            (StatusCode::CREATED, "bloco minerado".to_string())
        } else {
            (StatusCode::BAD_REQUEST, "Transaçao Invalida".to_string())
        }
    }

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_millis(500)).await;
        "[]"
    }

    async fn spawn(router: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    async fn spawn_stub() -> (SocketAddr, StubNode) {
        let node = StubNode::default();
        let router = Router::new()
            .route("/blocks", get(blocks))
            .route("/mine", post(mine))
            .with_state(node.clone());
        (spawn(router).await, node)
    }

    fn op(amount: f64) -> Operation {
        Operation::new(TransactionSpec::new("Joao", "Maria", amount).unwrap())
    }

    #[tokio::test]
    async fn test_fetch_ledger() {
        let (addr, _) = spawn_stub().await;
        let client = HttpNodeClient::new(&format!("http://{addr}/"), NodeTimeouts::default()).unwrap();
        assert_eq!(client.base_url(), format!("http://{addr}"));

        match client.fetch_ledger().await {
            RemoteResult::Success(value) => {
                assert_eq!(value.as_array().unwrap().len(), 2);
                assert_eq!(value[1]["hash"], "00bb");
            }
            RemoteResult::Failure(cause) => panic!("unexpected failure: {cause}"),
        }
    }

    #[tokio::test]
    async fn test_submit_sends_operation_body() {
        let (addr, node) = spawn_stub().await;
        let client = HttpNodeClient::new(&format!("http://{addr}"), NodeTimeouts::default()).unwrap();

        let op = op(50.0);
        let result = client.submit(&op).await;
        assert_eq!(result, RemoteResult::Success("bloco minerado".to_string()));

        let received = node.received.lock().unwrap().clone();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0]["sender"], "Joao");
        assert_eq!(received[0]["recipient"], "Maria");
        assert_eq!(received[0]["amount"], 50.0);
        let sent: Operation = serde_json::from_value(received[0].clone()).unwrap();
        assert_eq!(sent, op);
    }

    #[tokio::test]
    async fn test_non_success_status_is_failure() {
        let (addr, _) = spawn_stub().await;
        let client = HttpNodeClient::new(&format!("http://{addr}"), NodeTimeouts::default()).unwrap();

        let cause = client.submit(&op(0.0)).await.cause().map(str::to_string).unwrap();
        assert!(cause.contains("400"), "{cause}");
        assert!(cause.contains("Transaçao Invalida"), "{cause}");
    }

    #[tokio::test]
    async fn test_unreachable_node_is_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpNodeClient::new(&format!("http://{addr}"), NodeTimeouts::default()).unwrap();
        assert!(!client.fetch_ledger().await.is_success());
        let cause = client.submit(&op(1.0)).await.cause().map(str::to_string).unwrap();
        assert!(!cause.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_failure() {
        let addr = spawn(Router::new().route("/blocks", get(slow))).await;
        let timeouts = NodeTimeouts {
            fetch_ms: 50,
            submit_ms: 50,
        };
        let client = HttpNodeClient::new(&format!("http://{addr}"), timeouts).unwrap();

        let cause = client.fetch_ledger().await.cause().map(str::to_string).unwrap();
        assert_eq!(cause, "Operation timed out after 50ms");
    }

    #[tokio::test]
    async fn test_invalid_json_is_failure() {
        let addr = spawn(Router::new().route("/blocks", get(|| async { "not json" }))).await;
        let client = HttpNodeClient::new(&format!("http://{addr}"), NodeTimeouts::default()).unwrap();

        let cause = client.fetch_ledger().await.cause().map(str::to_string).unwrap();
        assert!(cause.starts_with("Serialization error"), "{cause}");
    }
}
