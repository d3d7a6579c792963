//! Submit command implementation
//!
//! Submits a batch of lab tests for a visit. If the backend cannot be
//! reached, the batch is queued locally and exits with the pending code.

use super::build_queue;
use crate::config::load_config;
use crate::domain::{LabTestBatch, LabTestRecord, RelayError};
use clap::Args;
use std::fs;
use std::time::Duration;

/// Arguments for the submit command
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Visit the lab tests belong to
    #[arg(long)]
    pub visit_id: String,

    /// Patient the lab tests belong to
    #[arg(long)]
    pub patient_id: String,

    /// Test name to submit; repeat for multiple tests
    #[arg(long = "test")]
    pub tests: Vec<String>,

    /// Path to a JSON file with full test records (overrides --test)
    #[arg(long)]
    pub input: Option<String>,
}

impl SubmitArgs {
    /// Execute the submit command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        let records = match self.load_records() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(2);
            }
        };

        let batch = match LabTestBatch::new(&self.visit_id, &self.patient_id, records) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("❌ Invalid batch: {e}");
                return Ok(2);
            }
        };

        let queue = build_queue(&config)?;

        println!(
            "📤 Submitting {} test(s) for visit {} / patient {}",
            batch.len(),
            batch.visit_id,
            batch.patient_id
        );

        let deadline = Duration::from_secs(config.backend.overall_timeout_seconds);
        match queue.submit_or_enqueue_with_deadline(&batch, deadline).await {
            Ok(result) => {
                println!(
                    "✅ Delivered via {}: {} accepted, {} rejected",
                    result.strategy,
                    result.accepted_count(),
                    result.rejected_count()
                );
                Ok(0)
            }
            Err(RelayError::Delivery(e)) => {
                println!("⚠️  Delivery failed: {e}");
                println!("   Batch queued locally; run `labrelay drain` when back online");
                Ok(3)
            }
            Err(e) => {
                eprintln!("❌ Submit failed: {e}");
                Ok(5)
            }
        }
    }

    fn load_records(&self) -> Result<Vec<LabTestRecord>, RelayError> {
        if let Some(ref path) = self.input {
            let contents = fs::read_to_string(path).map_err(|e| {
                RelayError::Configuration(format!("Failed to read input file {path}: {e}"))
            })?;
            let records: Vec<LabTestRecord> = serde_json::from_str(&contents)?;
            Ok(records)
        } else {
            Ok(self
                .tests
                .iter()
                .map(|name| LabTestRecord::new(name))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tests: Vec<&str>) -> SubmitArgs {
        SubmitArgs {
            visit_id: "31".to_string(),
            patient_id: "026".to_string(),
            tests: tests.into_iter().map(String::from).collect(),
            input: None,
        }
    }

    #[test]
    fn test_load_records_from_flags() {
        let records = args(vec!["CBC", "Lipid Panel"]).load_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].test_name, "CBC");
    }

    #[test]
    fn test_load_records_from_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"test_name": "CBC", "result": "12.4", "status": "normal"}]"#)
            .unwrap();
        file.flush().unwrap();

        let mut a = args(vec![]);
        a.input = Some(file.path().to_string_lossy().to_string());
        let records = a.load_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].result, "12.4");
    }

    #[test]
    fn test_load_records_missing_file() {
        let mut a = args(vec![]);
        a.input = Some("no-such-file.json".to_string());
        assert!(a.load_records().is_err());
    }
}
