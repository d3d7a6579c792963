//! Backend response models
//!
//! Wire DTOs for the backend's responses and the mapping from them to
//! per-record [`RecordOutcome`]s. Request payloads are built in
//! [`super::strategy`]; this module only deserializes what comes back.

use crate::domain::{LabTestRecord, RecordOutcome};
use serde::Deserialize;

/// One lab test as echoed back by the backend after creation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLabTest {
    /// Backend-assigned identifier
    #[serde(default)]
    pub test_id: Option<i64>,

    /// Test name, under whichever spelling the backend uses
    #[serde(default, alias = "testName", alias = "test_name")]
    pub name: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

/// Response body of the batch-creation endpoints
///
/// The backend answers 201 with `status = "SUCCESS"` when everything was
/// created, or 207 with `status = "PARTIAL_SUCCESS"` and an `errors` list
/// when only some records made it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCreateResponse {
    #[serde(default)]
    pub created: Vec<CreatedLabTest>,

    #[serde(default)]
    pub total_created: usize,

    #[serde(default)]
    pub total_requested: usize,

    #[serde(default)]
    pub errors: Vec<String>,

    #[serde(default)]
    pub status: Option<String>,
}

impl BatchCreateResponse {
    /// Correlates the response back to the input records
    ///
    /// Created items are matched to inputs by test name first; items the
    /// backend echoed without a name are consumed positionally. Every input
    /// record gets exactly one outcome.
    pub fn into_outcomes(self, records: &[LabTestRecord]) -> Vec<RecordOutcome> {
        let mut consumed = vec![false; self.created.len()];
        let rejection_reason = if self.errors.is_empty() {
            "not created by backend".to_string()
        } else {
            self.errors.join("; ")
        };

        records
            .iter()
            .map(|record| {
                let matched = self
                    .created
                    .iter()
                    .enumerate()
                    .find(|(idx, created)| {
                        !consumed[*idx]
                            && match &created.name {
                                Some(name) => name == &record.test_name,
                                None => true,
                            }
                    })
                    .map(|(idx, created)| (idx, created.test_id));

                match matched {
                    Some((idx, test_id)) => {
                        consumed[idx] = true;
                        RecordOutcome::accepted(&record.test_name, test_id)
                    }
                    None => RecordOutcome::rejected(&record.test_name, &rejection_reason),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LabTestRecord;

    fn records() -> Vec<LabTestRecord> {
        vec![
            LabTestRecord::new("Complete Blood Count (CBC)"),
            LabTestRecord::new("Lipid Panel"),
        ]
    }

    #[test]
    fn test_full_success_response() {
        let resp: BatchCreateResponse = serde_json::from_str(
            r#"{
                "created": [
                    {"testId": 101, "name": "Complete Blood Count (CBC)", "status": "pending"},
                    {"testId": 102, "name": "Lipid Panel", "status": "pending"}
                ],
                "totalCreated": 2,
                "totalRequested": 2,
                "status": "SUCCESS"
            }"#,
        )
        .unwrap();

        let outcomes = resp.into_outcomes(&records());
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.accepted));
        assert_eq!(outcomes[0].test_id, Some(101));
        assert_eq!(outcomes[1].test_id, Some(102));
    }

    #[test]
    fn test_partial_success_response() {
        let resp: BatchCreateResponse = serde_json::from_str(
            r#"{
                "created": [{"testId": 101, "name": "Complete Blood Count (CBC)"}],
                "totalCreated": 1,
                "totalRequested": 2,
                "errors": ["name is required for one or more tests"],
                "status": "PARTIAL_SUCCESS"
            }"#,
        )
        .unwrap();

        let outcomes = resp.into_outcomes(&records());
        assert!(outcomes[0].accepted);
        assert!(!outcomes[1].accepted);
        assert_eq!(
            outcomes[1].error.as_deref(),
            Some("name is required for one or more tests")
        );
    }

    #[test]
    fn test_created_items_without_names_match_positionally() {
        let resp: BatchCreateResponse = serde_json::from_str(
            r#"{"created": [{"testId": 7}, {"testId": 8}], "totalCreated": 2, "totalRequested": 2}"#,
        )
        .unwrap();

        let outcomes = resp.into_outcomes(&records());
        assert_eq!(outcomes[0].test_id, Some(7));
        assert_eq!(outcomes[1].test_id, Some(8));
    }

    #[test]
    fn test_test_name_alias_accepted() {
        let created: CreatedLabTest =
            serde_json::from_str(r#"{"testId": 5, "testName": "CBC"}"#).unwrap();
        assert_eq!(created.name.as_deref(), Some("CBC"));
    }

    #[test]
    fn test_every_record_gets_an_outcome() {
        let resp: BatchCreateResponse = serde_json::from_str(r#"{"created": []}"#).unwrap();
        let outcomes = resp.into_outcomes(&records());
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.accepted));
    }
}
