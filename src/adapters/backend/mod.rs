//! Hospital backend adapter
//!
//! HTTP delivery of lab-test batches to the remote backend, tolerating
//! endpoint and payload-shape skew between deployments via an ordered
//! strategy list.

pub mod client;
pub mod models;
pub mod strategy;
pub mod traits;

pub use client::HttpLabTestClient;
pub use strategy::{DeliveryStrategy, PayloadShape, BATCH_STRATEGIES, RECORD_STRATEGIES};
pub use traits::LabTestDelivery;
