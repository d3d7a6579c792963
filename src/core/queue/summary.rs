//! Drain sweep summary

use serde::Serialize;

/// Counts from one drain sweep over the pending entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainSummary {
    /// Entries delivered during this sweep
    pub synced: usize,

    /// Entries that failed again but still have retry budget
    pub still_pending: usize,

    /// Entries that exhausted their retry budget during this sweep
    pub abandoned: usize,
}

impl DrainSummary {
    /// Total entries touched by the sweep
    pub fn total(&self) -> usize {
        self.synced + self.still_pending + self.abandoned
    }

    /// True if every touched entry was delivered
    pub fn all_synced(&self) -> bool {
        self.still_pending == 0 && self.abandoned == 0
    }
}
