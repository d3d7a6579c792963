//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers that tie a
//! lab-test batch to a clinical visit and a patient. Each type ensures
//! type safety and validates format on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visit identifier newtype wrapper
///
/// Identifies the clinical visit a batch of lab tests belongs to. The
/// backend assigns visit identifiers as positive integers; anything else
/// is rejected at construction.
///
/// # Examples
///
/// ```
/// use labrelay::domain::ids::VisitId;
/// use std::str::FromStr;
///
/// let visit_id = VisitId::from_str("31").unwrap();
/// assert_eq!(visit_id.as_i64(), 31);
///
/// assert!(VisitId::from_str("abc").is_err());
/// assert!(VisitId::from_str("-4").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitId(i64);

impl VisitId {
    /// Creates a new VisitId from an integer
    ///
    /// # Returns
    ///
    /// Returns `Ok(VisitId)` if the value is positive, `Err` otherwise
    pub fn new(id: i64) -> Result<Self, String> {
        if id <= 0 {
            return Err(format!("Visit ID must be a positive integer, got: {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the visit ID as an i64
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VisitId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: i64 = s
            .trim()
            .parse()
            .map_err(|_| format!("Visit ID must be numeric, got: {s:?}"))?;
        Self::new(id)
    }
}

/// Patient identifier newtype wrapper
///
/// Patient identifiers are short opaque strings assigned by the hospital
/// system (e.g. "026"). They must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new PatientId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(PatientId)` if the ID is non-empty, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Patient ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the patient ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_id_positive() {
        let id = VisitId::new(31).unwrap();
        assert_eq!(id.as_i64(), 31);
        assert_eq!(id.to_string(), "31");
    }

    #[test]
    fn test_visit_id_rejects_zero_and_negative() {
        assert!(VisitId::new(0).is_err());
        assert!(VisitId::new(-1).is_err());
    }

    #[test]
    fn test_visit_id_from_str() {
        assert_eq!(VisitId::from_str("42").unwrap().as_i64(), 42);
        assert_eq!(VisitId::from_str(" 7 ").unwrap().as_i64(), 7);
    }

    #[test]
    fn test_visit_id_from_str_non_numeric() {
        let err = VisitId::from_str("abc").unwrap_err();
        assert!(err.contains("numeric"));
    }

    #[test]
    fn test_patient_id_valid() {
        let id = PatientId::new("026").unwrap();
        assert_eq!(id.as_str(), "026");
    }

    #[test]
    fn test_patient_id_rejects_empty() {
        assert!(PatientId::new("").is_err());
        assert!(PatientId::new("   ").is_err());
    }

    #[test]
    fn test_ids_serialize_transparently_enough() {
        let visit = VisitId::new(31).unwrap();
        let patient = PatientId::new("026").unwrap();
        assert_eq!(serde_json::to_string(&visit).unwrap(), "31");
        assert_eq!(serde_json::to_string(&patient).unwrap(), "\"026\"");
    }
}
