//! Pending sync entry model
//!
//! A `PendingSyncEntry` is the durable wrapper persisted when a batch could
//! not be delivered. It tracks the retry budget and the lifecycle state of
//! the batch across process restarts and offline periods.

use crate::domain::ids::{PatientId, VisitId};
use crate::domain::{LabTestBatch, LabTestRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a pending entry
///
/// `Created → (retry) → Created | Synced | Abandoned`. `Synced` and
/// `Abandoned` are terminal; abandoned entries require manual follow-up and
/// are never auto-deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Persisted and awaiting delivery
    Created,
    /// Successfully delivered, retained for audit
    Synced,
    /// Retry budget exhausted, needs operator intervention
    Abandoned,
}

impl SyncState {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Created => "created",
            SyncState::Synced => "synced",
            SyncState::Abandoned => "abandoned",
        }
    }

    /// Parse the storage representation
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "created" => Ok(SyncState::Created),
            "synced" => Ok(SyncState::Synced),
            "abandoned" => Ok(SyncState::Abandoned),
            _ => Err(format!("Unknown sync state: {s}")),
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A locally persisted batch awaiting successful delivery
///
/// At most one entry exists per (visit, patient) pair; the entry key is
/// derived deterministically from the two identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSyncEntry {
    /// Unique key, format: "{visit_id}_{patient_id}"
    pub entry_key: String,

    /// Visit the batch belongs to
    pub visit_id: VisitId,

    /// Patient the batch belongs to
    pub patient_id: PatientId,

    /// Records awaiting delivery, in submission order
    pub records: Vec<LabTestRecord>,

    /// Timestamp of the first failed delivery
    pub created_at: DateTime<Utc>,

    /// Count of failed delivery attempts since the entry was created
    pub sync_attempts: u32,

    /// Lifecycle state
    pub state: SyncState,
}

impl PendingSyncEntry {
    /// Generate the entry key for a (visit, patient) pair
    pub fn generate_key(visit_id: &VisitId, patient_id: &PatientId) -> String {
        format!("{}_{}", visit_id, patient_id.as_str())
    }

    /// Create a fresh entry from a batch that just failed delivery
    pub fn from_batch(batch: &LabTestBatch) -> Self {
        Self {
            entry_key: Self::generate_key(&batch.visit_id, &batch.patient_id),
            visit_id: batch.visit_id,
            patient_id: batch.patient_id.clone(),
            records: batch.records.clone(),
            created_at: Utc::now(),
            sync_attempts: 0,
            state: SyncState::Created,
        }
    }

    /// Rebuild the validated batch held by this entry
    pub fn to_batch(&self) -> crate::domain::Result<LabTestBatch> {
        LabTestBatch::from_parts(self.visit_id, self.patient_id.clone(), self.records.clone())
    }

    /// True if the entry should be picked up by a drain sweep
    pub fn is_pending(&self) -> bool {
        self.state == SyncState::Created
    }

    /// True if the entry was delivered
    pub fn is_synced(&self) -> bool {
        self.state == SyncState::Synced
    }

    /// True if the entry exhausted its retry budget
    pub fn is_abandoned(&self) -> bool {
        self.state == SyncState::Abandoned
    }

    /// Mark the entry as delivered
    pub fn mark_synced(&mut self) {
        self.state = SyncState::Synced;
    }

    /// Record a failed delivery attempt
    ///
    /// Increments the attempt counter; once it reaches `max_attempts` the
    /// entry transitions to `Abandoned` and leaves the retry rotation.
    pub fn record_failure(&mut self, max_attempts: u32) {
        self.sync_attempts += 1;
        if self.sync_attempts >= max_attempts {
            self.state = SyncState::Abandoned;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LabTestRecord;

    fn entry() -> PendingSyncEntry {
        let batch = LabTestBatch::new("31", "026", vec![LabTestRecord::new("CBC")]).unwrap();
        PendingSyncEntry::from_batch(&batch)
    }

    #[test]
    fn test_generate_key() {
        let e = entry();
        assert_eq!(e.entry_key, "31_026");
    }

    #[test]
    fn test_fresh_entry_state() {
        let e = entry();
        assert!(e.is_pending());
        assert_eq!(e.sync_attempts, 0);
        assert_eq!(e.state, SyncState::Created);
    }

    #[test]
    fn test_record_failure_below_budget_stays_created() {
        let mut e = entry();
        e.record_failure(5);
        assert_eq!(e.sync_attempts, 1);
        assert!(e.is_pending());
    }

    #[test]
    fn test_record_failure_exhausts_budget() {
        let mut e = entry();
        for _ in 0..5 {
            e.record_failure(5);
        }
        assert_eq!(e.sync_attempts, 5);
        assert!(e.is_abandoned());
        assert!(!e.is_pending());
    }

    #[test]
    fn test_mark_synced() {
        let mut e = entry();
        e.mark_synced();
        assert!(e.is_synced());
        assert!(!e.is_pending());
    }

    #[test]
    fn test_to_batch_round_trip() {
        let e = entry();
        let batch = e.to_batch().unwrap();
        assert_eq!(batch.visit_id.as_i64(), 31);
        assert_eq!(batch.records.len(), 1);
    }

    #[test]
    fn test_sync_state_parse() {
        assert_eq!(SyncState::parse("created").unwrap(), SyncState::Created);
        assert_eq!(SyncState::parse("synced").unwrap(), SyncState::Synced);
        assert_eq!(SyncState::parse("abandoned").unwrap(), SyncState::Abandoned);
        assert!(SyncState::parse("bogus").is_err());
    }

    #[test]
    fn test_entry_serialization() {
        let e = entry();
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"entry_key\":\"31_026\""));
        assert!(json.contains("\"state\":\"created\""));

        let back: PendingSyncEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entry_key, e.entry_key);
        assert_eq!(back.sync_attempts, 0);
    }
}
