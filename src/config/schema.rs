//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::auction::BID_ENDPOINT;

/// Root configuration for the auction proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Recipients to fan auctions out to.
    pub recipients: RecipientsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Diagnostic ring buffer settings.
    pub diagnostics: DiagnosticsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8050").
    pub bind_address: String,

    /// Largest accepted inbound body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8050".to_string(),
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Recipient list configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecipientsConfig {
    /// Comma-separated recipients: ports, `host:port` pairs or URLs.
    pub list: String,

    /// Host used for entries given as a bare port.
    pub default_host: String,

    /// Path appended to entries without one.
    pub bid_path: String,
}

impl Default for RecipientsConfig {
    fn default() -> Self {
        Self {
            list: String::new(),
            default_host: "localhost".to_string(),
            bid_path: BID_ENDPOINT.to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for each recipient call, in milliseconds.
    pub bid_ms: u64,

    /// Outbound connection establishment timeout, in milliseconds.
    pub connect_ms: u64,

    /// Total time allowed for an inbound request, in milliseconds.
    pub request_ms: u64,

    /// Idle pooled connection lifetime, in seconds.
    pub idle_secs: u64,

    /// Idle pooled connections kept per recipient.
    pub max_idle_per_host: usize,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            bid_ms: 100,
            connect_ms: 500,
            request_ms: 1000,
            idle_secs: 3600,
            max_idle_per_host: 512,
        }
    }
}

/// Diagnostic ring buffer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Number of slots, allocated at startup.
    pub capacity: usize,

    /// Fraction of auctions recorded (0.0 to 1.0).
    pub sample_rate: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            sample_rate: 1.0,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount the admin API under `/admin`.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}
