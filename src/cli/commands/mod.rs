//! CLI command implementations

pub mod drain;
pub mod init;
pub mod status;
pub mod submit;
pub mod validate;

use crate::adapters::backend::HttpLabTestClient;
use crate::adapters::store::SqlitePendingStore;
use crate::config::RelayConfig;
use crate::core::queue::SyncQueue;
use std::sync::Arc;

/// Build the sync queue from loaded configuration
///
/// Shared by the commands that talk to the backend or the local store.
fn build_queue(config: &RelayConfig) -> anyhow::Result<SyncQueue> {
    let store = SqlitePendingStore::open(&config.queue.db_path)?;
    let client = HttpLabTestClient::new(config.backend.clone())?;
    Ok(SyncQueue::new(
        Arc::new(store),
        Arc::new(client),
        config.queue.max_sync_attempts,
    ))
}
