//! Pending-store abstraction trait
//!
//! This trait defines the interface the sync queue uses to persist
//! entries. Implementations must make writes durable before returning.

use crate::core::queue::entry::{PendingSyncEntry, SyncState};
use crate::domain::Result;
use async_trait::async_trait;

/// Durable storage for pending sync entries
#[async_trait]
pub trait PendingStore: Send + Sync {
    /// Insert or overwrite the entry stored under its key
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Store` if the write fails; callers must treat
    /// this as data loss and surface it, not log-and-continue.
    async fn put(&self, entry: &PendingSyncEntry) -> Result<()>;

    /// Load an entry by key
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(entry))` if found, `Ok(None)` if not found.
    async fn get(&self, entry_key: &str) -> Result<Option<PendingSyncEntry>>;

    /// List all entries in a given state, oldest first
    async fn list_by_state(&self, state: SyncState) -> Result<Vec<PendingSyncEntry>>;

    /// List every entry regardless of state, oldest first
    async fn list_all(&self) -> Result<Vec<PendingSyncEntry>>;

    /// Remove an entry (operator cleanup only; drains never delete)
    ///
    /// # Returns
    ///
    /// Returns `true` if an entry was removed.
    async fn delete(&self, entry_key: &str) -> Result<bool>;
}
