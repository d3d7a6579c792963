//! Delivery result types
//!
//! A `DeliveryResult` accounts for every record in a submitted batch, so
//! callers can give accurate feedback on partial successes. Total failure is
//! never expressed as a result; it is a `DeliveryError::Exhausted`.

use serde::{Deserialize, Serialize};

/// Outcome of delivering one record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordOutcome {
    /// Canonical test name of the input record
    pub test_name: String,

    /// Whether the backend accepted the record
    pub accepted: bool,

    /// Identifier assigned by the backend, if any
    pub test_id: Option<i64>,

    /// Rejection reason reported by the backend, if any
    pub error: Option<String>,
}

impl RecordOutcome {
    /// Marks a record as accepted, with the backend-assigned ID if known
    pub fn accepted(test_name: impl Into<String>, test_id: Option<i64>) -> Self {
        Self {
            test_name: test_name.into(),
            accepted: true,
            test_id,
            error: None,
        }
    }

    /// Marks a record as rejected with a reason
    pub fn rejected(test_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            accepted: false,
            test_id: None,
            error: Some(error.into()),
        }
    }
}

/// Result of delivering a batch
///
/// Holds one outcome per input record, in input order, plus the strategy
/// that produced the successful response. A batch counts as saved when at
/// least one record was accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResult {
    /// Per-record outcomes, one per input record in input order
    pub outcomes: Vec<RecordOutcome>,

    /// Human-readable identifier of the winning strategy
    pub strategy: String,
}

impl DeliveryResult {
    /// Creates a result from per-record outcomes
    pub fn new(outcomes: Vec<RecordOutcome>, strategy: impl Into<String>) -> Self {
        Self {
            outcomes,
            strategy: strategy.into(),
        }
    }

    /// Number of records the backend accepted
    pub fn accepted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.accepted).count()
    }

    /// Number of records the backend rejected
    pub fn rejected_count(&self) -> usize {
        self.outcomes.len() - self.accepted_count()
    }

    /// True if every record was accepted
    pub fn all_accepted(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| o.accepted)
    }

    /// True if at least one record was accepted
    pub fn any_accepted(&self) -> bool {
        self.outcomes.iter().any(|o| o.accepted)
    }

    /// True if some but not all records were accepted
    pub fn is_partial(&self) -> bool {
        self.any_accepted() && !self.all_accepted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_accepted() {
        let result = DeliveryResult::new(
            vec![
                RecordOutcome::accepted("CBC", Some(101)),
                RecordOutcome::accepted("Lipid Panel", Some(102)),
            ],
            "POST /api/labtests/batch",
        );
        assert!(result.all_accepted());
        assert!(!result.is_partial());
        assert_eq!(result.accepted_count(), 2);
        assert_eq!(result.rejected_count(), 0);
    }

    #[test]
    fn test_partial_success() {
        let result = DeliveryResult::new(
            vec![
                RecordOutcome::accepted("CBC", Some(101)),
                RecordOutcome::rejected("Lipid Panel", "name is required"),
            ],
            "POST /api/labtests/batch",
        );
        assert!(!result.all_accepted());
        assert!(result.any_accepted());
        assert!(result.is_partial());
        assert_eq!(result.rejected_count(), 1);
    }

    #[test]
    fn test_empty_result_is_not_all_accepted() {
        let result = DeliveryResult::new(vec![], "none");
        assert!(!result.all_accepted());
        assert!(!result.any_accepted());
    }
}
