//! Logging infrastructure
//!
//! Structured logging via tracing, with console output and optional
//! rotating JSON file output.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
