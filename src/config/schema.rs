//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Client address allow-list.
    pub access: AccessConfig,

    /// Encryption key material.
    pub encryption: EncryptionConfig,

    /// Request payload limits.
    pub limits: LimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Client address allow-list configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AccessConfig {
    /// Allowed client addresses: literal IPs ("192.168.1.5") or CIDR
    /// ranges ("10.0.0.0/24"). An empty list denies every client.
    pub allowed_ips: Vec<String>,
}

/// Encryption key material.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// Secret passphrase the cipher key is derived from.
    /// Must be at least 32 characters.
    pub secret: String,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Change this in production.
            secret: "CHANGE_ME_IN_PRODUCTION_0123456789ABCDEF".to_string(),
        }
    }
}

/// Request payload limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum length of the `text` field in characters.
    pub max_text_chars: usize,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_text_chars: 10_000,
            max_body_bytes: 256 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
