//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, timeouts and signal names
//! - Check the whitelist builds into a usable index
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::culture::{WhitelistError, WhitelistIndex};

/// A single semantic problem in an [`AppConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("observability.log_format must be 'pretty' or 'json', got '{0}'")]
    UnknownLogFormat(String),

    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("{field}: '{value}' is not a valid header name")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("culture: {0}")]
    Whitelist(#[from] WhitelistError),
}

/// Check every semantic rule, collecting all failures.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let observability = &config.observability;
    if !matches!(observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::UnknownLogFormat(observability.log_format.clone()));
    }
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: observability.metrics_address.clone(),
        });
    }

    let culture = &config.culture;
    for (field, value) in [
        ("culture.query_params.domain", &culture.query_params.domain),
        ("culture.query_params.culture", &culture.query_params.culture),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptyName(field));
        }
    }
    for (field, value) in [
        ("culture.headers.domain", &culture.headers.domain),
        ("culture.headers.culture", &culture.headers.culture),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptyName(field));
        } else if HeaderName::from_bytes(value.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName {
                field,
                value: value.clone(),
            });
        }
    }

    if let Err(e) = WhitelistIndex::build(&culture.white_list, &culture.default) {
        errors.push(e.into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
