//! Common types used across TedGo.

use serde::{Deserialize, Serialize};

/// Outcome of a call to the node.
///
/// Every call resolves to exactly one of the two variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "payload", rename_all = "snake_case")]
pub enum RemoteResult<T> {
    /// 2xx answer with its decoded payload.
    Success(T),
    /// Human-readable cause of the failure.
    Failure(String),
}

impl<T> RemoteResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, RemoteResult::Success(_))
    }

    /// Failure cause, if any.
    pub fn cause(&self) -> Option<&str> {
        match self {
            RemoteResult::Success(_) => None,
            RemoteResult::Failure(cause) => Some(cause),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            RemoteResult::Success(value) => Ok(value),
            RemoteResult::Failure(cause) => Err(cause),
        }
    }
}

impl<T, E: std::fmt::Display> From<std::result::Result<T, E>> for RemoteResult<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => RemoteResult::Success(value),
            Err(err) => RemoteResult::Failure(err.to_string()),
        }
    }
}

/// Display view of one ledger entry from `GET /blocks`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub hash: String,
    pub data: String,
}

impl LedgerEntry {
    /// Read the `hash` and `data` fields of a block.
    ///
    /// Non-object entries become their JSON text in `hash` with empty `data`.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value.as_object() {
            Some(block) => Self {
                hash: block.get("hash").map(text_of).unwrap_or_default(),
                data: block.get("data").map(text_of).unwrap_or_default(),
            },
            None => Self {
                hash: text_of(value),
                data: String::new(),
            },
        }
    }
}

fn text_of(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
