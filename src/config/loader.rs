//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::RelayConfig;
use crate::domain::errors::RelayError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RelayConfig
/// 4. Applies environment variable overrides (LABRELAY_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use labrelay::config::loader::load_config;
///
/// let config = load_config("labrelay.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RelayConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RelayError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RelayError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: RelayConfig = toml::from_str(&contents)
        .map_err(|e| RelayError::Configuration(format!("Failed to parse TOML: {e}")))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config
        .validate()
        .map_err(|e| RelayError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| RelayError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RelayError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using LABRELAY_* prefix
///
/// Environment variables follow the pattern: LABRELAY_<SECTION>_<KEY>
/// For example: LABRELAY_BACKEND_BASE_URL, LABRELAY_QUEUE_DB_PATH
fn apply_env_overrides(config: &mut RelayConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("LABRELAY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Backend overrides
    if let Ok(val) = std::env::var("LABRELAY_BACKEND_BASE_URL") {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("LABRELAY_BACKEND_USERNAME") {
        config.backend.username = Some(val);
    }
    if let Ok(val) = std::env::var("LABRELAY_BACKEND_PASSWORD") {
        config.backend.password = Some(val);
    }
    if let Ok(val) = std::env::var("LABRELAY_BACKEND_TLS_VERIFY") {
        config.backend.tls_verify = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("LABRELAY_BACKEND_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.backend.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("LABRELAY_BACKEND_RETRY_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.backend.retry.max_attempts = attempts;
        }
    }

    // Queue overrides
    if let Ok(val) = std::env::var("LABRELAY_QUEUE_DB_PATH") {
        config.queue.db_path = val;
    }
    if let Ok(val) = std::env::var("LABRELAY_QUEUE_MAX_SYNC_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.queue.max_sync_attempts = attempts;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LABRELAY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LABRELAY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
