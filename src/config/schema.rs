//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Domain whitelist and signal names.
    pub culture: CultureConfig,
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

    /// Log output format: "pretty" or "json".
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

/// Domain/culture resolution settings.
///
/// Mirrors the `[culture]` table:
///
/// ```toml
/// [culture]
/// default = "com"
///
/// [culture.white_list.com]
/// cultures = ["en-US", "fr-CA"]
/// default = "en-US"
///
/// [culture.query_params]
/// ignore = false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CultureConfig {
    /// Supported domains keyed by domain identifier.
    pub white_list: BTreeMap<String, DomainSettings>,

    /// Domain used when the request carries no usable domain signal.
    pub default: String,

    /// Query parameter names.
    pub query_params: QueryParamConfig,

    /// Header names.
    pub headers: HeaderConfig,
}

/// Raw, un-normalized settings for one whitelisted domain.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DomainSettings {
    /// Cultures served by the domain, in preference order.
    #[serde(default)]
    pub cultures: Vec<String>,

    /// Culture served when negotiation finds nothing better.
    pub default: String,
}

impl DomainSettings {
    pub fn new<I, S>(cultures: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cultures: cultures.into_iter().map(Into::into).collect(),
            default: default.into(),
        }
    }
}

/// Query parameter names carrying domain and culture signals.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryParamConfig {
    pub domain: String,
    pub culture: String,

    /// Never consult query parameters when set.
    pub ignore: bool,
}

impl Default for QueryParamConfig {
    fn default() -> Self {
        Self {
            domain: "domain".to_string(),
            culture: "culture".to_string(),
            ignore: false,
        }
    }
}

/// Header names carrying domain and culture signals.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub domain: String,
    pub culture: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            domain: "domain".to_string(),
            culture: "accept-language".to_string(),
        }
    }
}
