//! Core domain types and models
//!
//! This module contains the domain model for LabRelay:
//!
//! - [`ids`] - Validated identifier newtypes (visit, patient)
//! - [`labtest`] - Lab-test records and validated batches
//! - [`delivery`] - Per-record delivery outcomes
//! - [`errors`] - Domain error hierarchy
//! - [`result`] - Result type alias

pub mod delivery;
pub mod errors;
pub mod ids;
pub mod labtest;
pub mod result;

// Re-export commonly used types
pub use delivery::{DeliveryResult, RecordOutcome};
pub use errors::{DeliveryError, RelayError, StoreError};
pub use ids::{PatientId, VisitId};
pub use labtest::{LabTestBatch, LabTestRecord, TestStatus};
pub use result::Result;
