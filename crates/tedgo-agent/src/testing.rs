//! Test doubles shared by the agent's unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tedgo_core::{Operation, RemoteResult, TransactionSpec};
use tedgo_sdk::NodeClient;

pub fn op(sender: &str, recipient: &str, amount: f64) -> Operation {
    Operation::new(TransactionSpec::new(sender, recipient, amount).unwrap())
}

#[derive(Default)]
struct Script {
    submits: VecDeque<RemoteResult<String>>,
    ledger: Option<RemoteResult<serde_json::Value>>,
    submitted: Vec<Operation>,
    ledger_calls: usize,
}

/// Node whose answers are queued up front. Unscripted submits succeed with "ok".
#[derive(Clone, Default)]
pub struct ScriptedNode {
    script: Arc<Mutex<Script>>,
}

impl ScriptedNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeed(self, body: &str) -> Self {
        self.push(RemoteResult::Success(body.to_string()))
    }

    pub fn fail(self, cause: &str) -> Self {
        self.push(RemoteResult::Failure(cause.to_string()))
    }

    pub fn ledger(self, result: RemoteResult<serde_json::Value>) -> Self {
        self.script.lock().unwrap().ledger = Some(result);
        self
    }

    fn push(self, result: RemoteResult<String>) -> Self {
        self.script.lock().unwrap().submits.push_back(result);
        self
    }

    pub fn submitted(&self) -> Vec<Operation> {
        self.script.lock().unwrap().submitted.clone()
    }

    /// Number of calls that reached the node, reads and writes together.
    pub fn calls(&self) -> usize {
        let script = self.script.lock().unwrap();
        script.submitted.len() + script.ledger_calls
    }
}

#[async_trait]
impl NodeClient for ScriptedNode {
    async fn fetch_ledger(&self) -> RemoteResult<serde_json::Value> {
        let mut script = self.script.lock().unwrap();
        script.ledger_calls += 1;
        script
            .ledger
            .clone()
            .unwrap_or_else(|| RemoteResult::Success(serde_json::json!([])))
    }

    async fn submit(&self, op: &Operation) -> RemoteResult<String> {
        let mut script = self.script.lock().unwrap();
        script.submitted.push(op.clone());
        script
            .submits
            .pop_front()
            .unwrap_or_else(|| RemoteResult::Success("ok".to_string()))
    }
}
