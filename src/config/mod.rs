//! Configuration management for LabRelay.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! LabRelay uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment variable overrides (`LABRELAY_*` prefix)
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use labrelay::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("labrelay.toml")?;
//!
//! println!("Backend URL: {}", config.backend.base_url);
//! println!("Queue database: {}", config.queue.db_path);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "labrelay"
//! log_level = "info"
//!
//! [backend]
//! base_url = "http://localhost:8080"
//! username = "relay_user"
//! password = "${LABRELAY_BACKEND_PASSWORD}"
//!
//! [queue]
//! db_path = "labrelay-queue.db"
//! max_sync_attempts = 5
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BackendConfig, LoggingConfig, QueueConfig, RelayConfig, RetryConfig,
};
