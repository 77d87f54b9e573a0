//! Metrics collection and exposition.
//!
//! # Metrics
//! - `domain_culture_resolutions_total` (counter): resolutions by tier
//! - `domain_culture_config_reloads_total` (counter): reloads by outcome
//! - `domain_culture_whitelist_domains` (gauge): domains in the active whitelist

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::culture::Tier;

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_resolution(tier: Tier) {
    metrics::counter!("domain_culture_resolutions_total", "tier" => tier.as_str()).increment(1);
}

/// `outcome` is "applied" or "rejected".
pub fn record_config_reload(outcome: &'static str) {
    metrics::counter!("domain_culture_config_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_whitelist_size(domains: usize) {
    metrics::gauge!("domain_culture_whitelist_domains").set(domains as f64);
}
