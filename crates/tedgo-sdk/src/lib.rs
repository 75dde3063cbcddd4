//! # TedGo SDK
//!
//! Client for the blockchain node HTTP API.

pub mod client;

pub use client::{HttpNodeClient, NodeClient, NodeTimeouts};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::{HttpNodeClient, NodeClient, NodeTimeouts};
    pub use tedgo_core::prelude::*;
}
