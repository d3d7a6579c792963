//! Offline sync queue
//!
//! Durable persistence and retry orchestration for batches that could not
//! reach the backend.

pub mod entry;
pub mod queue;
pub mod summary;

pub use entry::{PendingSyncEntry, SyncState};
pub use queue::SyncQueue;
pub use summary::DrainSummary;
