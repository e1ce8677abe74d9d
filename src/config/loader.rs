//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a TOML configuration file. Missing sections take their defaults.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse TOML configuration text.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Validate a fully assembled configuration (file plus overrides).
pub fn ensure_valid(config: &ProxyConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config(
            r#"
            [recipients]
            list = "8051,8052"

            [timeouts]
            bid_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(config.recipients.list, "8051,8052");
        assert_eq!(config.recipients.bid_path, "/bid");
        assert_eq!(config.timeouts.bid_ms, 250);
        assert_eq!(config.timeouts.request_ms, 1000);
        assert_eq!(config.diagnostics.capacity, 1024);
        assert!(ensure_valid(&config).is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(parse_config("[timeouts]\nbid_ms = \"fast\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_error_lists_every_problem() {
        let config = parse_config("[diagnostics]\ncapacity = 0").unwrap();
        let message = ensure_valid(&config).unwrap_err().to_string();
        assert!(message.contains("recipients.list"));
        assert!(message.contains("diagnostics.capacity"));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/definitely/not/here.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
