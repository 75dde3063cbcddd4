//! Operations submitted to the node.
//!
//! An [`Operation`] is a transfer request stamped with its creation time.
//! It is immutable once built: retries resend the same value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TedGoError};

/// Transfer parameters extracted from user text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSpec {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl TransactionSpec {
    /// Create a validated transaction spec.
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Result<Self> {
        let spec = Self {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the party identifiers and the amount.
    pub fn validate(&self) -> Result<()> {
        check_transfer(&self.sender, &self.recipient, self.amount)
    }
}

fn check_transfer(sender: &str, recipient: &str, amount: f64) -> Result<()> {
    if sender.trim().is_empty() {
        return Err(TedGoError::InvalidTransaction("sender cannot be empty".to_string()));
    }
    if recipient.trim().is_empty() {
        return Err(TedGoError::InvalidTransaction(
            "recipient cannot be empty".to_string(),
        ));
    }
    if !amount.is_finite() || amount < 0.0 {
        return Err(TedGoError::InvalidTransaction(format!(
            "amount must be a non-negative number, got {amount}"
        )));
    }
    Ok(())
}

/// A transfer request as sent to `POST /mine` and kept in the pending file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    sender: String,
    recipient: String,
    amount: f64,
    created_at: DateTime<Utc>,
}

impl Operation {
    /// Build an operation from transfer parameters, stamped with the current time.
    pub fn new(spec: TransactionSpec) -> Self {
        Self::at(spec, Utc::now())
    }

    /// Build an operation with an explicit creation time.
    pub fn at(spec: TransactionSpec, created_at: DateTime<Utc>) -> Self {
        Self {
            sender: spec.sender,
            recipient: spec.recipient,
            amount: spec.amount,
            created_at,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply the transfer checks to an operation read back from storage.
    pub fn validate(&self) -> Result<()> {
        check_transfer(&self.sender, &self.recipient, self.amount)
    }

    /// Compact JSON form used in log lines.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!("{} -> {} {}", self.sender, self.recipient, self.amount)
        })
    }
}
