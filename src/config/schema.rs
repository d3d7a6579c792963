//! Configuration schema
//!
//! TOML-backed configuration with serde defaults and a validation pass
//! that runs after loading.

use serde::{Deserialize, Serialize};

/// Root configuration for LabRelay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Hospital backend connection settings
    pub backend: BackendConfig,

    /// Local sync queue settings
    #[serde(default)]
    pub queue: QueueConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name used in log output
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Hospital backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. "http://localhost:8080"
    pub base_url: String,

    /// Username for basic authentication
    pub username: Option<String>,

    /// Password for basic authentication
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Overall deadline in seconds for one user-facing submit, covering
    /// every strategy attempt and backoff delay
    #[serde(default = "default_overall_timeout_seconds")]
    pub overall_timeout_seconds: u64,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Per-record retry behavior
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry behavior for per-record delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempt rounds per record before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay between attempt rounds in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound on the backoff delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Local sync queue settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Path to the SQLite database file holding pending entries
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Failed drain attempts before an entry is abandoned
    #[serde(default = "default_max_sync_attempts")]
    pub max_sync_attempts: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_sync_attempts: default_max_sync_attempts(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether to write logs to a local file in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log file rotation: "daily", "hourly" or "never"
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

fn default_app_name() -> String {
    "labrelay".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_overall_timeout_seconds() -> u64 {
    15
}

fn default_tls_verify() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    2000
}

fn default_db_path() -> String {
    "labrelay-queue.db".to_string()
}

fn default_max_sync_attempts() -> u32 {
    5
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

impl RelayConfig {
    /// Validates the configuration after loading
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field found.
    pub fn validate(&self) -> Result<(), String> {
        if self.backend.base_url.is_empty() {
            return Err("backend.base_url is required".to_string());
        }
        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(format!(
                "backend.base_url must start with http:// or https://, got: {}",
                self.backend.base_url
            ));
        }
        if self.backend.username.is_some() != self.backend.password.is_some() {
            return Err(
                "backend.username and backend.password must be set together".to_string(),
            );
        }
        if self.backend.timeout_seconds == 0 {
            return Err("backend.timeout_seconds must be greater than 0".to_string());
        }
        if self.backend.overall_timeout_seconds == 0 {
            return Err("backend.overall_timeout_seconds must be greater than 0".to_string());
        }
        if self.backend.retry.max_attempts == 0 {
            return Err("backend.retry.max_attempts must be greater than 0".to_string());
        }
        if self.backend.retry.max_delay_ms < self.backend.retry.initial_delay_ms {
            return Err(
                "backend.retry.max_delay_ms must be >= backend.retry.initial_delay_ms".to_string(),
            );
        }
        if self.queue.db_path.is_empty() {
            return Err("queue.db_path is required".to_string());
        }
        if self.queue.max_sync_attempts == 0 {
            return Err("queue.max_sync_attempts must be greater than 0".to_string());
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.as_str()) {
            return Err(format!(
                "application.log_level must be one of {:?}, got: {}",
                valid_levels, self.application.log_level
            ));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.logging.local_rotation.as_str()) {
            return Err(format!(
                "logging.local_rotation must be one of {:?}, got: {}",
                valid_rotations, self.logging.local_rotation
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_config() -> RelayConfig {
        RelayConfig {
            application: ApplicationConfig::default(),
            backend: BackendConfig {
                base_url: "http://localhost:8080".to_string(),
                username: None,
                password: None,
                timeout_seconds: default_timeout_seconds(),
                overall_timeout_seconds: default_overall_timeout_seconds(),
                tls_verify: true,
                retry: RetryConfig::default(),
            },
            queue: QueueConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn test_minimal_config_validates() {
        assert!(minimal_config().validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = minimal_config();
        assert_eq!(config.backend.timeout_seconds, 15);
        assert_eq!(config.backend.overall_timeout_seconds, 15);
        assert_eq!(config.backend.retry.max_attempts, 3);
        assert_eq!(config.backend.retry.initial_delay_ms, 500);
        assert_eq!(config.backend.retry.max_delay_ms, 2000);
        assert_eq!(config.queue.max_sync_attempts, 5);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let mut config = minimal_config();
        config.backend.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_username_without_password() {
        let mut config = minimal_config();
        config.backend.username = Some("doctor".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_overall_timeout() {
        let mut config = minimal_config();
        config.backend.overall_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_sync_attempts() {
        let mut config = minimal_config();
        config.queue.max_sync_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut config = minimal_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parses_minimal_toml() {
        let config: RelayConfig = toml::from_str(
            r#"
            [backend]
            base_url = "http://localhost:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.queue.max_sync_attempts, 5);
        assert_eq!(config.application.log_level, "info");
        assert!(config.validate().is_ok());
    }
}
