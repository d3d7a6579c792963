//! Delivery strategies and the wire-serialization boundary
//!
//! Deployed backends disagree on both the route (`/api/labtests` vs the
//! legacy `/labtests`) and the casing of the test-name field (`name`,
//! `testName`, `test_name`). Each combination the client is willing to try
//! is a [`DeliveryStrategy`]; strategies are tried in a fixed priority
//! order and the first success wins.
//!
//! All mapping from the canonical [`LabTestRecord`] to a wire payload
//! happens here, and only here.

use crate::domain::{LabTestBatch, LabTestRecord};
use serde_json::{json, Value};
use std::fmt;

/// Request-payload casing accepted by one backend variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// camelCase keys, test name spelled `name` (current backend)
    CamelName,
    /// camelCase keys, test name spelled `testName` (older API clients)
    CamelTestName,
    /// snake_case keys throughout (direct table-shaped ingest)
    SnakeCase,
}

impl PayloadShape {
    /// Serializes one record for this shape
    ///
    /// The visit and patient identifiers travel inside each record object,
    /// matching what the backend's controllers expect.
    pub fn record_payload(&self, batch: &LabTestBatch, record: &LabTestRecord) -> Value {
        match self {
            PayloadShape::CamelName => json!({
                "visitId": batch.visit_id.as_i64(),
                "patientId": batch.patient_id.as_str(),
                "name": record.test_name,
                "result": record.result,
                "referenceRange": record.reference_range,
                "status": record.status.as_str(),
            }),
            PayloadShape::CamelTestName => json!({
                "visitId": batch.visit_id.as_i64(),
                "patientId": batch.patient_id.as_str(),
                "testName": record.test_name,
                "result": record.result,
                "referenceRange": record.reference_range,
                "status": record.status.as_str(),
            }),
            PayloadShape::SnakeCase => json!({
                "visit_id": batch.visit_id.as_i64(),
                "patient_id": batch.patient_id.as_str(),
                "test_name": record.test_name,
                "result": record.result,
                "reference_range": record.reference_range,
                "status": record.status.as_str(),
            }),
        }
    }

    /// Serializes a whole batch as a JSON array for this shape
    pub fn batch_payload(&self, batch: &LabTestBatch) -> Value {
        Value::Array(
            batch
                .records
                .iter()
                .map(|record| self.record_payload(batch, record))
                .collect(),
        )
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayloadShape::CamelName => "camelCase/name",
            PayloadShape::CamelTestName => "camelCase/testName",
            PayloadShape::SnakeCase => "snake_case",
        };
        write!(f, "{label}")
    }
}

/// One (endpoint, payload-shape) combination tried during delivery
#[derive(Debug, Clone, Copy)]
pub struct DeliveryStrategy {
    /// Path appended to the backend base URL
    pub path: &'static str,
    /// Payload casing used for this endpoint
    pub shape: PayloadShape,
}

impl DeliveryStrategy {
    const fn new(path: &'static str, shape: PayloadShape) -> Self {
        Self { path, shape }
    }
}

impl fmt::Display for DeliveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POST {} ({})", self.path, self.shape)
    }
}

/// Batch-endpoint strategies in priority order
pub const BATCH_STRATEGIES: &[DeliveryStrategy] = &[
    DeliveryStrategy::new("/api/labtests/batch", PayloadShape::CamelName),
    DeliveryStrategy::new("/api/labtests/batch", PayloadShape::CamelTestName),
    DeliveryStrategy::new("/labtests/batch", PayloadShape::CamelName),
];

/// Per-record fallback strategies in priority order
pub const RECORD_STRATEGIES: &[DeliveryStrategy] = &[
    DeliveryStrategy::new("/api/labtests", PayloadShape::CamelName),
    DeliveryStrategy::new("/api/labtests", PayloadShape::SnakeCase),
    DeliveryStrategy::new("/labtests", PayloadShape::CamelName),
];
