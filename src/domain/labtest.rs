//! Lab-test record and batch types
//!
//! A `LabTestRecord` is one ordered test tied to a clinical visit. Records
//! carry exactly one canonical name field (`test_name`); the wire-format
//! spellings the backend variants accept (`name`, `testName`, `test_name`)
//! exist only inside the backend adapter's serialization boundary.

use crate::domain::ids::{PatientId, VisitId};
use crate::domain::RelayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a lab test
///
/// A test starts `pending` and is moved through the remaining states by the
/// external lab system, never by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Ordered, no result yet
    Pending,
    /// Result within the reference range
    Normal,
    /// Result outside the reference range
    Abnormal,
    /// Result requires immediate clinical attention
    Critical,
    /// Test finished and reviewed
    Completed,
}

impl Default for TestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl TestStatus {
    /// Wire representation used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Pending => "pending",
            TestStatus::Normal => "normal",
            TestStatus::Abnormal => "abnormal",
            TestStatus::Critical => "critical",
            TestStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TestStatus::Pending),
            "normal" => Ok(TestStatus::Normal),
            "abnormal" => Ok(TestStatus::Abnormal),
            "critical" => Ok(TestStatus::Critical),
            "completed" => Ok(TestStatus::Completed),
            _ => Err(format!(
                "Unknown test status: {s}. Must be one of: pending, normal, abnormal, critical, completed"
            )),
        }
    }
}

/// One ordered lab test awaiting delivery
///
/// Immutable once delivered: `result`, `status` and `reference_range` are
/// updated by the external lab system, not by this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestRecord {
    /// Human-readable test name, e.g. "Complete Blood Count (CBC)"
    pub test_name: String,

    /// Lab result, empty until the lab enters one
    #[serde(default)]
    pub result: String,

    /// Reference range, "Pending" until populated
    #[serde(default = "default_reference_range")]
    pub reference_range: String,

    /// Test status
    #[serde(default)]
    pub status: TestStatus,
}

fn default_reference_range() -> String {
    "Pending".to_string()
}

impl LabTestRecord {
    /// Creates a freshly ordered test with default result fields
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            result: String::new(),
            reference_range: default_reference_range(),
            status: TestStatus::Pending,
        }
    }
}

/// A validated batch of lab tests for one (visit, patient) pair
///
/// Construction performs all input validation; a `LabTestBatch` that exists
/// is deliverable. Validation failures are `RelayError::Validation` and are
/// never retried and never reach the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabTestBatch {
    /// Visit the tests belong to
    pub visit_id: VisitId,

    /// Patient the tests belong to
    pub patient_id: PatientId,

    /// Ordered tests awaiting delivery
    pub records: Vec<LabTestRecord>,
}

impl LabTestBatch {
    /// Builds a batch from raw caller input, validating everything
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Validation` if the visit ID is not a positive
    /// integer, the patient ID is empty, the record list is empty, or any
    /// record has an empty `test_name`.
    pub fn new(
        visit_id: &str,
        patient_id: &str,
        records: Vec<LabTestRecord>,
    ) -> Result<Self, RelayError> {
        let visit_id = VisitId::from_str(visit_id).map_err(RelayError::Validation)?;
        let patient_id = PatientId::new(patient_id).map_err(RelayError::Validation)?;
        Self::from_parts(visit_id, patient_id, records)
    }

    /// Builds a batch from already-typed identifiers
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Validation` if the record list is empty or any
    /// record has an empty `test_name`.
    pub fn from_parts(
        visit_id: VisitId,
        patient_id: PatientId,
        records: Vec<LabTestRecord>,
    ) -> Result<Self, RelayError> {
        if records.is_empty() {
            return Err(RelayError::Validation(
                "A lab-test batch must contain at least one record".to_string(),
            ));
        }
        for (idx, record) in records.iter().enumerate() {
            if record.test_name.trim().is_empty() {
                return Err(RelayError::Validation(format!(
                    "Record {idx} has an empty test name"
                )));
            }
        }
        Ok(Self {
            visit_id,
            patient_id,
            records,
        })
    }

    /// Number of records in the batch
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the batch holds no records (never true for a validated batch)
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn cbc() -> LabTestRecord {
        LabTestRecord::new("Complete Blood Count (CBC)")
    }

    #[test]
    fn test_record_defaults() {
        let record = cbc();
        assert_eq!(record.result, "");
        assert_eq!(record.reference_range, "Pending");
        assert_eq!(record.status, TestStatus::Pending);
    }

    #[test_case("pending", TestStatus::Pending)]
    #[test_case("normal", TestStatus::Normal)]
    #[test_case("abnormal", TestStatus::Abnormal)]
    #[test_case("CRITICAL", TestStatus::Critical)]
    #[test_case("Completed", TestStatus::Completed)]
    fn test_status_parses(input: &str, expected: TestStatus) {
        assert_eq!(TestStatus::from_str(input).unwrap(), expected);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            TestStatus::Pending,
            TestStatus::Normal,
            TestStatus::Abnormal,
            TestStatus::Critical,
            TestStatus::Completed,
        ] {
            assert_eq!(TestStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(TestStatus::from_str("bogus").is_err());
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&TestStatus::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: LabTestRecord =
            serde_json::from_str(r#"{"test_name": "Lipid Panel"}"#).unwrap();
        assert_eq!(record.test_name, "Lipid Panel");
        assert_eq!(record.reference_range, "Pending");
        assert_eq!(record.status, TestStatus::Pending);
    }

    #[test]
    fn test_batch_valid() {
        let batch = LabTestBatch::new("31", "026", vec![cbc()]).unwrap();
        assert_eq!(batch.visit_id.as_i64(), 31);
        assert_eq!(batch.patient_id.as_str(), "026");
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_batch_rejects_non_numeric_visit() {
        let err = LabTestBatch::new("abc", "026", vec![cbc()]).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }

    #[test]
    fn test_batch_rejects_empty_records() {
        let err = LabTestBatch::new("31", "026", vec![]).unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }

    #[test]
    fn test_batch_rejects_empty_test_name() {
        let err =
            LabTestBatch::new("31", "026", vec![cbc(), LabTestRecord::new("  ")]).unwrap_err();
        match err {
            RelayError::Validation(msg) => assert!(msg.contains("Record 1")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }
}
