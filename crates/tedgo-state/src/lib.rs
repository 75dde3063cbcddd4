//! # TedGo State
//!
//! Local durable state: the pending-operation queue and the interaction log.

pub mod history;
pub mod store;

pub use history::{FileInteractionLog, InteractionLog, MemoryInteractionLog};
pub use store::{InMemoryOperationStore, JsonFileStore, OperationStore, PendingSet};
