//! Resubmission of locally cached operations.
//!
//! One pass submits every pending operation in stored order, then rewrites
//! the store with exactly the ones that failed. Delivery is at-least-once:
//! an operation whose success answer was lost will be sent again.

use std::sync::Arc;
use std::time::Duration;

use tedgo_core::{Operation, RemoteResult, Result};
use tedgo_sdk::NodeClient;
use tedgo_state::OperationStore;
use tracing::{info, warn};

use crate::replies;

/// Partition of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub succeeded: Vec<Operation>,
    /// Failed operations with their causes.
    pub failed: Vec<(Operation, String)>,
}

impl ReconcileReport {
    pub fn summary(&self) -> String {
        replies::resend_summary(self.succeeded.len(), self.failed.len())
    }
}

pub struct Reconciler {
    store: Arc<dyn OperationStore>,
    client: Arc<dyn NodeClient>,
    pause: Duration,
}

impl Reconciler {
    pub fn new(store: Arc<dyn OperationStore>, client: Arc<dyn NodeClient>, pause: Duration) -> Self {
        Self {
            store,
            client,
            pause,
        }
    }

    /// Run one pass. `Ok(None)` means nothing was pending.
    ///
    /// The report is returned even when committing the survivors fails; the
    /// error is then reported through the outer `Result`.
    pub async fn run(&self) -> Result<Option<ReconcileReport>> {
        let pending = self.store.load_pending().await;
        if pending.is_empty() {
            return Ok(None);
        }

        info!(count = pending.len(), "resending pending operations");
        let mut report = ReconcileReport::default();

        for (i, op) in pending.into_iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }

            match self.client.submit(&op).await {
                RemoteResult::Success(_) => report.succeeded.push(op),
                RemoteResult::Failure(cause) => {
                    warn!(sender = op.sender(), recipient = op.recipient(), %cause, "resend failed");
                    report.failed.push((op, cause));
                }
            }
        }

        let survivors = report.failed.iter().map(|(op, _)| op.clone()).collect();
        self.store.replace_pending(survivors).await?;

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "reconciliation pass complete"
        );
        Ok(Some(report))
    }

    /// Run one pass and describe it for the user.
    pub async fn reconcile(&self) -> String {
        match self.run().await {
            Ok(None) => replies::NOTHING_PENDING.to_string(),
            Ok(Some(report)) => report.summary(),
            Err(e) => {
                warn!(error = %e, "could not commit reconciliation result");
                format!("Reenvio interrompido: não consegui atualizar as pendências ({e}).")
            }
        }
    }
}
