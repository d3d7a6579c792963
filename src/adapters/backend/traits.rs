//! Backend abstraction trait
//!
//! The sync queue talks to the backend through this trait, not through the
//! HTTP client directly, so queue behavior can be tested with stubs.

use crate::domain::{DeliveryResult, LabTestBatch, Result};
use async_trait::async_trait;

/// Delivery interface for lab-test batches
#[async_trait]
pub trait LabTestDelivery: Send + Sync {
    /// Attempt to persist one validated batch to the remote backend
    ///
    /// # Returns
    ///
    /// Returns a [`DeliveryResult`] accounting for every record in the
    /// batch when at least one record was accepted.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Delivery` when no record could be delivered;
    /// the `Exhausted` variant carries the last underlying transport error.
    async fn deliver_batch(&self, batch: &LabTestBatch) -> Result<DeliveryResult>;
}
