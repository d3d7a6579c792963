//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the LabRelay configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config runs validation internally
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Backend URL: {}", config.backend.base_url);
        println!(
            "  Authentication: {}",
            if config.backend.username.is_some() {
                "basic"
            } else {
                "none"
            }
        );
        println!("  Request Timeout: {}s", config.backend.timeout_seconds);
        println!("  Queue Database: {}", config.queue.db_path);
        println!("  Max Sync Attempts: {}", config.queue.max_sync_attempts);
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        let _ = format!("{args:?}");
    }
}
