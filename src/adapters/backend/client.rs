//! HTTP client for the hospital lab-test backend
//!
//! Implements [`LabTestDelivery`] over reqwest. Delivery tolerates
//! endpoint/payload skew between backend deployments by trying an ordered
//! list of strategies: batch endpoints first, then per-record submission
//! with a bounded, capped backoff between attempts.

use super::models::{BatchCreateResponse, CreatedLabTest};
use super::strategy::{DeliveryStrategy, BATCH_STRATEGIES, RECORD_STRATEGIES};
use super::traits::LabTestDelivery;
use crate::config::BackendConfig;
use crate::domain::{
    DeliveryError, DeliveryResult, LabTestBatch, LabTestRecord, RecordOutcome, RelayError, Result,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// HTTP client for submitting lab-test batches
pub struct HttpLabTestClient {
    /// Base URL of the backend, without a trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Backend configuration
    config: BackendConfig,
}

impl HttpLabTestClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        url::Url::parse(&base_url).map_err(|e| {
            RelayError::Configuration(format!("Invalid backend base URL {base_url:?}: {e}"))
        })?;

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| RelayError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Validate raw caller input and deliver the batch
    ///
    /// This is the caller-facing entry point: identifiers arrive as strings
    /// and are validated before any network traffic happens.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Validation` for malformed input (never retried)
    /// or `RelayError::Delivery` when every strategy failed.
    pub async fn submit_batch(
        &self,
        visit_id: &str,
        patient_id: &str,
        records: Vec<LabTestRecord>,
    ) -> Result<DeliveryResult> {
        let batch = LabTestBatch::new(visit_id, patient_id, records)?;
        self.deliver_batch(&batch).await
    }

    /// Build authorization header value
    fn auth_header_value(&self) -> Option<String> {
        if let (Some(ref username), Some(ref password)) =
            (&self.config.username, &self.config.password)
        {
            let credentials = format!("{username}:{password}");
            let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
            Some(format!("Basic {encoded}"))
        } else {
            None
        }
    }

    /// POST a JSON payload and map transport/status failures to domain errors
    async fn post_json(&self, path: &str, payload: &Value) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.post(&url).json(payload);
        if let Some(auth) = self.auth_header_value() {
            request = request.header("Authorization", auth);
        }

        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RelayError::Delivery(DeliveryError::Timeout(e.to_string()))
            } else {
                RelayError::Delivery(DeliveryError::ConnectionFailed(e.to_string()))
            }
        })?;

        let status = resp.status();
        // 207 Multi-Status carries partial batch results and is a success here.
        if status.is_success() || status == StatusCode::MULTI_STATUS {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let err = if status.is_server_error() {
            DeliveryError::ServerError {
                status: status.as_u16(),
                message: body,
            }
        } else {
            DeliveryError::ClientError {
                status: status.as_u16(),
                message: body,
            }
        };
        Err(RelayError::Delivery(err))
    }

    /// Try one batch strategy; success requires at least one accepted record
    async fn try_batch_strategy(
        &self,
        batch: &LabTestBatch,
        strategy: &DeliveryStrategy,
    ) -> Result<DeliveryResult> {
        let payload = strategy.shape.batch_payload(batch);
        let resp = self.post_json(strategy.path, &payload).await?;

        let parsed: BatchCreateResponse = resp.json().await.map_err(|e| {
            RelayError::Delivery(DeliveryError::InvalidResponse(e.to_string()))
        })?;

        let outcomes = parsed.into_outcomes(&batch.records);
        let result = DeliveryResult::new(outcomes, strategy.to_string());

        if !result.any_accepted() {
            return Err(RelayError::Delivery(DeliveryError::InvalidResponse(
                format!("Backend accepted none of {} records", batch.len()),
            )));
        }

        Ok(result)
    }

    /// Try one per-record strategy for a single record
    async fn try_record_strategy(
        &self,
        batch: &LabTestBatch,
        record: &LabTestRecord,
        strategy: &DeliveryStrategy,
    ) -> Result<RecordOutcome> {
        let payload = strategy.shape.record_payload(batch, record);
        let resp = self.post_json(strategy.path, &payload).await?;

        // Per-record endpoints echo the created test back; tolerate bodies
        // that don't parse as long as the status was a success.
        let created: Option<CreatedLabTest> = resp.json().await.ok();
        let test_id = created.and_then(|c| c.test_id);

        Ok(RecordOutcome::accepted(&record.test_name, test_id))
    }

    /// Deliver records one at a time after the batch endpoints failed
    async fn deliver_per_record(
        &self,
        batch: &LabTestBatch,
        mut attempts: u32,
        mut last_error: String,
    ) -> Result<DeliveryResult> {
        let retry = &self.config.retry;
        let mut outcomes = Vec::with_capacity(batch.len());

        for record in &batch.records {
            let mut delivered: Option<RecordOutcome> = None;
            let mut record_error = last_error.clone();

            'attempt: for attempt in 1..=retry.max_attempts {
                for strategy in RECORD_STRATEGIES {
                    attempts += 1;
                    match self.try_record_strategy(batch, record, strategy).await {
                        Ok(outcome) => {
                            tracing::debug!(
                                test_name = %record.test_name,
                                strategy = %strategy,
                                attempt = attempt,
                                "Record delivered"
                            );
                            delivered = Some(outcome);
                            break 'attempt;
                        }
                        Err(e) => {
                            tracing::warn!(
                                test_name = %record.test_name,
                                strategy = %strategy,
                                attempt = attempt,
                                error = %e,
                                "Per-record delivery attempt failed"
                            );
                            record_error = e.to_string();
                            last_error = record_error.clone();
                        }
                    }
                }

                if attempt < retry.max_attempts {
                    // Linear backoff capped at max_delay_ms, e.g. 500ms, 1s, 1.5s...
                    let delay_ms = retry
                        .initial_delay_ms
                        .saturating_mul(u64::from(attempt))
                        .min(retry.max_delay_ms);
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            match delivered {
                Some(outcome) => outcomes.push(outcome),
                None => outcomes.push(RecordOutcome::rejected(&record.test_name, &record_error)),
            }
        }

        let result = DeliveryResult::new(outcomes, "per-record fallback");
        if result.any_accepted() {
            Ok(result)
        } else {
            Err(RelayError::Delivery(DeliveryError::Exhausted {
                attempts,
                last_error,
            }))
        }
    }
}

#[async_trait]
impl LabTestDelivery for HttpLabTestClient {
    async fn deliver_batch(&self, batch: &LabTestBatch) -> Result<DeliveryResult> {
        let mut attempts: u32 = 0;
        let mut last_error = String::from("no strategies attempted");

        for strategy in BATCH_STRATEGIES {
            attempts += 1;
            match self.try_batch_strategy(batch, strategy).await {
                Ok(result) => {
                    tracing::info!(
                        visit_id = %batch.visit_id,
                        patient_id = %batch.patient_id,
                        strategy = %strategy,
                        accepted = result.accepted_count(),
                        rejected = result.rejected_count(),
                        "Batch delivered"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    tracing::warn!(
                        visit_id = %batch.visit_id,
                        strategy = %strategy,
                        error = %e,
                        "Batch strategy failed"
                    );
                    last_error = e.to_string();
                }
            }
        }

        tracing::info!(
            visit_id = %batch.visit_id,
            records = batch.len(),
            "All batch strategies failed, falling back to per-record delivery"
        );

        self.deliver_per_record(batch, attempts, last_error).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, RetryConfig};

    fn config(base_url: &str) -> BackendConfig {
        BackendConfig {
            base_url: base_url.to_string(),
            username: None,
            password: None,
            timeout_seconds: 5,
            overall_timeout_seconds: 15,
            tls_verify: true,
            retry: RetryConfig {
                max_attempts: 2,
                initial_delay_ms: 1,
                max_delay_ms: 2,
            },
        }
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = HttpLabTestClient::new(config("http://localhost:8080/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_rejects_invalid_base_url() {
        let result = HttpLabTestClient::new(config("not a url"));
        assert!(matches!(result, Err(RelayError::Configuration(_))));
    }

    #[test]
    fn test_auth_header_basic() {
        let mut cfg = config("http://localhost:8080");
        cfg.username = Some("doctor".to_string());
        cfg.password = Some("secret".to_string());
        let client = HttpLabTestClient::new(cfg).unwrap();

        let header = client.auth_header_value().unwrap();
        assert!(header.starts_with("Basic "));
    }

    #[test]
    fn test_no_auth_header_without_credentials() {
        let client = HttpLabTestClient::new(config("http://localhost:8080")).unwrap();
        assert!(client.auth_header_value().is_none());
    }

    #[tokio::test]
    async fn test_submit_batch_validates_before_network() {
        // Base URL points nowhere; validation must fail before any request.
        let client = HttpLabTestClient::new(config("http://127.0.0.1:1")).unwrap();
        let err = client
            .submit_batch("abc", "026", vec![LabTestRecord::new("CBC")])
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
    }
}
