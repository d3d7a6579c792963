//! Configuration loading integration tests

use labrelay::config::load_config;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
[application]
name = "labrelay"
log_level = "debug"

[backend]
base_url = "https://hospital.example.com"
username = "relay_user"
password = "secret"
timeout_seconds = 30
tls_verify = false

[backend.retry]
max_attempts = 4
initial_delay_ms = 250
max_delay_ms = 1000

[queue]
db_path = "/var/lib/labrelay/queue.db"
max_sync_attempts = 3

[logging]
local_enabled = true
local_path = "/var/log/labrelay"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.backend.base_url, "https://hospital.example.com");
    assert_eq!(config.backend.timeout_seconds, 30);
    assert!(!config.backend.tls_verify);
    assert_eq!(config.backend.retry.max_attempts, 4);
    assert_eq!(config.queue.max_sync_attempts, 3);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_gets_defaults() {
    let file = write_config(
        r#"
[backend]
base_url = "http://localhost:8080"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.name, "labrelay");
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.backend.timeout_seconds, 15);
    assert_eq!(config.backend.retry.initial_delay_ms, 500);
    assert_eq!(config.backend.retry.max_delay_ms, 2000);
    assert_eq!(config.queue.db_path, "labrelay-queue.db");
    assert_eq!(config.queue.max_sync_attempts, 5);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    std::env::set_var("LABRELAY_IT_PASSWORD", "from-env");
    let file = write_config(
        r#"
[backend]
base_url = "http://localhost:8080"
username = "relay_user"
password = "${LABRELAY_IT_PASSWORD}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.backend.password.as_deref(), Some("from-env"));
    std::env::remove_var("LABRELAY_IT_PASSWORD");
}

#[test]
fn test_missing_env_var_fails_load() {
    std::env::remove_var("LABRELAY_IT_MISSING");
    let file = write_config(
        r#"
[backend]
base_url = "http://localhost:8080"
username = "relay_user"
password = "${LABRELAY_IT_MISSING}"
"#,
    );

    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_invalid_retry_bounds_rejected() {
    let file = write_config(
        r#"
[backend]
base_url = "http://localhost:8080"

[backend.retry]
initial_delay_ms = 5000
max_delay_ms = 1000
"#,
    );

    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_missing_backend_section_rejected() {
    let file = write_config(
        r#"
[application]
name = "labrelay"
"#,
    );

    assert!(load_config(file.path()).is_err());
}
