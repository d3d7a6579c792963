//! In-memory pending store
//!
//! Keeps entries in a map guarded by a mutex. Nothing survives a process
//! restart, so this is for tests and dry runs only.

use super::traits::PendingStore;
use crate::core::queue::entry::{PendingSyncEntry, SyncState};
use crate::domain::{Result, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Non-durable [`PendingStore`] backed by a `HashMap`
#[derive(Default)]
pub struct MemoryPendingStore {
    entries: Mutex<HashMap<String, PendingSyncEntry>>,
}

impl MemoryPendingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, PendingSyncEntry>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Query("Store mutex poisoned".to_string()).into())
    }
}

#[async_trait]
impl PendingStore for MemoryPendingStore {
    async fn put(&self, entry: &PendingSyncEntry) -> Result<()> {
        self.lock()?
            .insert(entry.entry_key.clone(), entry.clone());
        Ok(())
    }

    async fn get(&self, entry_key: &str) -> Result<Option<PendingSyncEntry>> {
        Ok(self.lock()?.get(entry_key).cloned())
    }

    async fn list_by_state(&self, state: SyncState) -> Result<Vec<PendingSyncEntry>> {
        let mut entries: Vec<PendingSyncEntry> = self
            .lock()?
            .values()
            .filter(|e| e.state == state)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn list_all(&self) -> Result<Vec<PendingSyncEntry>> {
        let mut entries: Vec<PendingSyncEntry> = self.lock()?.values().cloned().collect();
        entries.sort_by_key(|e| e.created_at);
        Ok(entries)
    }

    async fn delete(&self, entry_key: &str) -> Result<bool> {
        Ok(self.lock()?.remove(entry_key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LabTestBatch, LabTestRecord};

    fn entry(visit: &str, patient: &str) -> PendingSyncEntry {
        let batch = LabTestBatch::new(visit, patient, vec![LabTestRecord::new("CBC")]).unwrap();
        PendingSyncEntry::from_batch(&batch)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = MemoryPendingStore::new();
        store.put(&entry("31", "026")).await.unwrap();

        assert!(store.get("31_026").await.unwrap().is_some());
        assert!(store.delete("31_026").await.unwrap());
        assert!(store.get("31_026").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_same_key() {
        let store = MemoryPendingStore::new();
        store.put(&entry("31", "026")).await.unwrap();
        store.put(&entry("31", "026")).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_state() {
        let store = MemoryPendingStore::new();
        let mut abandoned = entry("1", "A");
        for _ in 0..5 {
            abandoned.record_failure(5);
        }
        store.put(&abandoned).await.unwrap();
        store.put(&entry("2", "B")).await.unwrap();

        let pending = store.list_by_state(SyncState::Created).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].entry_key, "2_B");

        let abandoned = store.list_by_state(SyncState::Abandoned).await.unwrap();
        assert_eq!(abandoned.len(), 1);
    }
}
