//! Request middleware.

pub mod domain_culture;

pub use domain_culture::{domain_culture_middleware, SharedResolver};
