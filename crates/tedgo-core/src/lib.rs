//! # TedGo Core
//!
//! Core types for the TedGo chat agent.
//!
//! - [`Operation`] - Transfer request sent to the node
//! - [`Intent`] - Classified purpose of a line of user input
//! - [`RemoteResult`] - Outcome of a node call
//! - [`TedGoError`] - Error types

pub mod error;
pub mod intent;
pub mod operation;
pub mod types;

// Re-exports for convenience
pub use error::{Result, TedGoError};
pub use intent::{classify, extract_transaction, Intent};
pub use operation::{Operation, TransactionSpec};
pub use types::{LedgerEntry, RemoteResult};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Result, TedGoError};
    pub use crate::intent::{classify, extract_transaction, Intent};
    pub use crate::operation::{Operation, TransactionSpec};
    pub use crate::types::{LedgerEntry, RemoteResult};
}
