//! # TedGo Agent
//!
//! Intent dispatch, resubmission of cached operations and the interactive
//! session loop.

pub mod config;
pub mod dispatcher;
pub mod input;
pub mod reconciler;
pub mod replies;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::AgentConfig;
pub use dispatcher::{Dispatcher, Reply};
pub use input::{spawn_line_reader, LineReceiver};
pub use reconciler::{ReconcileReport, Reconciler};
pub use session::{run_session, SessionEnd};
