// LabRelay - Offline-Resilient Lab Test Sync
// Copyright (c) 2025 LabRelay Contributors
// Licensed under the MIT License

//! # LabRelay - Offline-Resilient Lab Test Sync
//!
//! LabRelay submits batches of lab tests recorded during a clinical visit
//! to a hospital backend, and keeps working when the backend is not
//! reachable: failed batches are persisted in a local SQLite queue and
//! retried by drain sweeps until they deliver or exhaust their retry
//! budget.
//!
//! ## Architecture
//!
//! LabRelay follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (sync queue, drain orchestration)
//! - [`adapters`] - External integrations (hospital backend, local store)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labrelay::adapters::backend::HttpLabTestClient;
//! use labrelay::adapters::store::SqlitePendingStore;
//! use labrelay::config::load_config;
//! use labrelay::core::queue::SyncQueue;
//! use labrelay::domain::{LabTestBatch, LabTestRecord};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("labrelay.toml")?;
//!
//!     let store = Arc::new(SqlitePendingStore::open(&config.queue.db_path)?);
//!     let client = Arc::new(HttpLabTestClient::new(config.backend.clone())?);
//!     let queue = SyncQueue::new(store, client, config.queue.max_sync_attempts);
//!
//!     let batch = LabTestBatch::new("31", "026", vec![LabTestRecord::new("CBC")])?;
//!
//!     // Delivers immediately, or parks the batch in the local queue
//!     let _ = queue.submit_or_enqueue(&batch).await;
//!
//!     // Later, when connectivity returns
//!     let summary = queue.drain_pending().await?;
//!     println!("Synced {} pending batches", summary.synced);
//!     Ok(())
//! }
//! ```
//!
//! ## Delivery Strategies
//!
//! Backend deployments disagree on endpoint paths and payload field names.
//! The HTTP client tries an ordered list of (endpoint, payload shape)
//! strategies: batch endpoints first, then per-record submission with a
//! capped backoff. The first strategy the backend accepts wins.
//!
//! ## Error Handling
//!
//! LabRelay uses the [`domain::RelayError`] type for all errors:
//!
//! - Validation errors are returned before any network traffic and are
//!   never retried or enqueued
//! - Delivery errors are transient and route the batch into the queue
//! - Store errors mean local persistence failed and are always surfaced
//!
//! ## Logging
//!
//! LabRelay uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(entry_key = "31_026", "Batch enqueued");
//! warn!(attempts = 3, "Pending entry failed delivery");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
