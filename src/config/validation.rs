//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, rates within bounds)
//! - Check that addresses and the recipient list parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::recipients::RecipientSet;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("{:?} is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }

    match RecipientSet::from_config(&config.recipients) {
        Ok(set) if set.is_empty() => {
            errors.push(ValidationError::new("recipients.list", "at least one recipient is required"));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("recipients.list", e.to_string())),
    }
    if !config.recipients.bid_path.starts_with('/') {
        errors.push(ValidationError::new("recipients.bid_path", "must start with '/'"));
    }

    let timeouts = &config.timeouts;
    if timeouts.bid_ms == 0 {
        errors.push(ValidationError::new("timeouts.bid_ms", "must be greater than 0"));
    }
    if timeouts.connect_ms == 0 {
        errors.push(ValidationError::new("timeouts.connect_ms", "must be greater than 0"));
    }
    if timeouts.request_ms <= timeouts.bid_ms {
        errors.push(ValidationError::new(
            "timeouts.request_ms",
            format!("must exceed timeouts.bid_ms ({})", timeouts.bid_ms),
        ));
    }

    if config.diagnostics.capacity == 0 {
        errors.push(ValidationError::new("diagnostics.capacity", "must be greater than 0"));
    }
    if !(0.0..=1.0).contains(&config.diagnostics.sample_rate) {
        errors.push(ValidationError::new("diagnostics.sample_rate", "must be between 0.0 and 1.0"));
    }

    let observability = &config.observability;
    if !matches!(observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format {:?}, expected \"pretty\" or \"json\"", observability.log_format),
        ));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("{:?} is not a socket address", observability.metrics_address),
        ));
    }

    if config.admin.enabled && config.admin.api_key.trim().is_empty() {
        errors.push(ValidationError::new("admin.api_key", "must be set when the admin API is enabled"));
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

    fn valid() -> ProxyConfig {
        let mut config = ProxyConfig::default();
        config.recipients.list = "8051,8052".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_default_config_needs_recipients() {
        let errors = validate_config(&ProxyConfig::default()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "recipients.list");
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = valid();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.bid_ms = 0;
        config.diagnostics.sample_rate = 1.5;
        config.observability.log_format = "xml".into();

        let fields: Vec<&str> = validate_config(&config)
            .unwrap_err()
            .iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.bid_ms",
                "diagnostics.sample_rate",
                "observability.log_format",
            ]
        );
    }

    #[test]
    fn test_request_timeout_must_exceed_bid_deadline() {
        let mut config = valid();
        config.timeouts.request_ms = config.timeouts.bid_ms;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "timeouts.request_ms");
    }

    #[test]
    fn test_bad_recipient_entry() {
        let mut config = valid();
        config.recipients.list = "8051,,8052".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "recipients.list");
        assert!(errors[0].message.contains("empty"));
    }
}
