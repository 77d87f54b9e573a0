//! Request domain/culture resolution.
//!
//! Classifies a request into a whitelisted `(domain, culture, language)`
//! triple from query parameter and header signals, falling back to configured
//! defaults whenever a signal is missing or unrecognized.
//!
//! The [`culture`] module is transport-free; [`http`] adapts it to axum.

// Core
pub mod config;
pub mod culture;

// Transport
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::AppConfig;
pub use culture::{DomainCulture, Resolver, Signals};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
