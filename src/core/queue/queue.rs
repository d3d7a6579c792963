//! Durable sync queue
//!
//! Orchestrates the offline path: batches that could not be delivered are
//! persisted locally, retried by drain sweeps, and abandoned once their
//! retry budget runs out. At most one drain sweep runs at a time.

use super::entry::{PendingSyncEntry, SyncState};
use super::summary::DrainSummary;
use crate::adapters::backend::LabTestDelivery;
use crate::adapters::store::PendingStore;
use crate::domain::{DeliveryError, DeliveryResult, LabTestBatch, RelayError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Queue of locally persisted batches awaiting delivery
pub struct SyncQueue {
    /// Durable entry storage
    store: Arc<dyn PendingStore>,

    /// Remote delivery client
    delivery: Arc<dyn LabTestDelivery>,

    /// Failed attempts allowed before an entry is abandoned
    max_sync_attempts: u32,

    /// Held for the duration of a drain sweep
    drain_lock: Mutex<()>,
}

impl SyncQueue {
    /// Create a queue over a store and a delivery client
    pub fn new(
        store: Arc<dyn PendingStore>,
        delivery: Arc<dyn LabTestDelivery>,
        max_sync_attempts: u32,
    ) -> Self {
        Self {
            store,
            delivery,
            max_sync_attempts,
            drain_lock: Mutex::new(()),
        }
    }

    /// Persist a batch for later delivery
    ///
    /// One entry exists per (visit, patient) pair. Enqueueing the same pair
    /// again replaces the stored entry wholesale and resets its attempt
    /// counter, so the newest submission is what eventually syncs.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Store` if the write fails. Callers must surface
    /// this: a failed enqueue means the batch is not safe anywhere.
    pub async fn enqueue(&self, batch: &LabTestBatch) -> Result<PendingSyncEntry> {
        let entry = PendingSyncEntry::from_batch(batch);
        self.store.put(&entry).await?;

        tracing::info!(
            entry_key = %entry.entry_key,
            records = entry.records.len(),
            "Batch enqueued for later sync"
        );
        Ok(entry)
    }

    /// Attempt immediate delivery, falling back to the queue on failure
    ///
    /// Validation failures are returned as-is and never enqueued; only
    /// delivery failures park the batch locally.
    pub async fn submit_or_enqueue(&self, batch: &LabTestBatch) -> Result<DeliveryResult> {
        match self.delivery.deliver_batch(batch).await {
            Ok(result) => Ok(result),
            Err(err @ RelayError::Delivery(_)) => {
                tracing::warn!(
                    visit_id = %batch.visit_id,
                    patient_id = %batch.patient_id,
                    error = %err,
                    "Immediate delivery failed, enqueueing batch"
                );
                self.enqueue(batch).await?;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// [`Self::submit_or_enqueue`] bounded by an overall deadline
    ///
    /// A single delivery attempt can fan out into many sequential requests
    /// across strategies and backoff delays; user-facing submits must not
    /// block for the sum of them. When the deadline expires the in-flight
    /// delivery is dropped, the batch is enqueued, and a `Timeout` delivery
    /// error is returned.
    pub async fn submit_or_enqueue_with_deadline(
        &self,
        batch: &LabTestBatch,
        deadline: Duration,
    ) -> Result<DeliveryResult> {
        match tokio::time::timeout(deadline, self.delivery.deliver_batch(batch)).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(err @ RelayError::Delivery(_))) => {
                tracing::warn!(
                    visit_id = %batch.visit_id,
                    patient_id = %batch.patient_id,
                    error = %err,
                    "Immediate delivery failed, enqueueing batch"
                );
                self.enqueue(batch).await?;
                Err(err)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                tracing::warn!(
                    visit_id = %batch.visit_id,
                    patient_id = %batch.patient_id,
                    deadline_secs = deadline.as_secs(),
                    "Delivery exceeded overall deadline, enqueueing batch"
                );
                self.enqueue(batch).await?;
                Err(RelayError::Delivery(DeliveryError::Timeout(format!(
                    "Delivery exceeded overall deadline of {}s",
                    deadline.as_secs()
                ))))
            }
        }
    }

    /// Retry every pending entry once
    ///
    /// Entries are processed oldest first. A delivery where the backend
    /// accepted at least one record marks the entry synced; anything else
    /// counts one failed attempt, abandoning the entry once the budget is
    /// spent. The entry is persisted after every attempt so progress
    /// survives a crash mid-sweep.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::DrainInProgress` if another sweep is running,
    /// `RelayError::Store` if persistence fails mid-sweep.
    pub async fn drain_pending(&self) -> Result<DrainSummary> {
        let _guard = self
            .drain_lock
            .try_lock()
            .map_err(|_| RelayError::DrainInProgress)?;

        let pending = self.store.list_by_state(SyncState::Created).await?;
        let mut summary = DrainSummary::default();

        tracing::debug!(pending = pending.len(), "Starting drain sweep");

        for mut entry in pending {
            let batch = match entry.to_batch() {
                Ok(batch) => batch,
                Err(err) => {
                    // A stored entry that no longer validates will never
                    // deliver; burn an attempt so it eventually abandons.
                    tracing::error!(
                        entry_key = %entry.entry_key,
                        error = %err,
                        "Stored entry failed validation"
                    );
                    entry.record_failure(self.max_sync_attempts);
                    self.update_counts(&entry, &mut summary);
                    self.store.put(&entry).await?;
                    continue;
                }
            };

            match self.delivery.deliver_batch(&batch).await {
                Ok(result) => {
                    entry.mark_synced();
                    summary.synced += 1;
                    tracing::info!(
                        entry_key = %entry.entry_key,
                        accepted = result.accepted_count(),
                        rejected = result.rejected_count(),
                        "Pending entry synced"
                    );
                }
                Err(err) => {
                    entry.record_failure(self.max_sync_attempts);
                    self.update_counts(&entry, &mut summary);
                    tracing::warn!(
                        entry_key = %entry.entry_key,
                        attempts = entry.sync_attempts,
                        state = %entry.state,
                        error = %err,
                        "Pending entry failed delivery"
                    );
                }
            }

            self.store.put(&entry).await?;
        }

        tracing::info!(
            synced = summary.synced,
            still_pending = summary.still_pending,
            abandoned = summary.abandoned,
            "Drain sweep finished"
        );
        Ok(summary)
    }

    fn update_counts(&self, entry: &PendingSyncEntry, summary: &mut DrainSummary) {
        if entry.is_abandoned() {
            summary.abandoned += 1;
        } else {
            summary.still_pending += 1;
        }
    }

    /// List entries that exhausted their retry budget
    ///
    /// These need manual follow-up; nothing in the queue removes them.
    pub async fn list_abandoned(&self) -> Result<Vec<PendingSyncEntry>> {
        self.store.list_by_state(SyncState::Abandoned).await
    }

    /// List entries still awaiting delivery
    pub async fn list_pending(&self) -> Result<Vec<PendingSyncEntry>> {
        self.store.list_by_state(SyncState::Created).await
    }

    /// List every entry regardless of state
    pub async fn list_all(&self) -> Result<Vec<PendingSyncEntry>> {
        self.store.list_all().await
    }
}
