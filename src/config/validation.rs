//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("database.path is required")]
    MissingDatabasePath,
    #[error("database.path parent directory does not exist: {0}")]
    DatabasePathInvalid(String),
    #[error("auth.cookie_name is required")]
    MissingCookieName,
    #[error("rooms.{0} must be greater than zero")]
    ZeroCapacity(&'static str),
    #[error("websocket.max_message_size must be greater than zero")]
    ZeroMessageSize,
    #[error("websocket.allow_origins entry is not an origin: '{0}'")]
    InvalidOrigin(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    }

    // Database path validation
    let db_path = &config.database.path;
    if db_path.is_empty() {
        errors.push(ValidationError::MissingDatabasePath);
    } else if db_path != ":memory:"
        && let Some(parent) = Path::new(db_path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        errors.push(ValidationError::DatabasePathInvalid(db_path.clone()));
    }

    if config.auth.cookie_name.trim().is_empty() {
        errors.push(ValidationError::MissingCookieName);
    }

    // mpsc::channel panics on a zero capacity
    if config.rooms.mailbox_capacity == 0 {
        errors.push(ValidationError::ZeroCapacity("mailbox_capacity"));
    }
    if config.rooms.outbound_capacity == 0 {
        errors.push(ValidationError::ZeroCapacity("outbound_capacity"));
    }

    if config.websocket.max_message_size == 0 {
        errors.push(ValidationError::ZeroMessageSize);
    }
    for origin in &config.websocket.allow_origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            errors.push(ValidationError::InvalidOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> String {
        r#"
[listen]
address = "127.0.0.1:8787"

[database]
path = ":memory:"
"#
        .to_string()
    }

    #[test]
    fn test_valid_config_passes() {
        let config: Config = toml::from_str(&minimal_valid_config()).unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_server_name_fails() {
        let toml = r#"
[server]
name = ""

[listen]
address = "127.0.0.1:8787"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingServerName)));
    }

    #[test]
    fn test_zero_capacities_fail() {
        let toml = r#"
[listen]
address = "127.0.0.1:8787"

[rooms]
mailbox_capacity = 0
outbound_capacity = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::ZeroCapacity(_)))
                .count(),
            2
        );
    }

    #[test]
    fn test_missing_database_directory_fails() {
        let toml = r#"
[listen]
address = "127.0.0.1:8787"

[database]
path = "/nonexistent/dir/roomcast.db"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DatabasePathInvalid(_))));
    }

    #[test]
    fn test_bad_origin_fails() {
        let toml = r#"
[listen]
address = "127.0.0.1:8787"

[websocket]
allow_origins = ["natal.example"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidOrigin(_))));
    }
}
