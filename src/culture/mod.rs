//! Domain/culture resolution subsystem.
//!
//! # Data Flow
//! ```text
//! [culture] config table
//!     → whitelist.rs (normalize, lowercase keys, pick default entry)
//!     → WhitelistIndex (immutable)
//!
//! Per request:
//!     Signals (query params + lowercase headers)
//!     → resolver.rs (query tier → header tier → default tier)
//!     → negotiation.rs (weighted Accept-Language match)
//!     → DomainCulture { domain, culture, language, acceptLanguage }
//! ```
//!
//! # Design Decisions
//! - Invalid configuration fails at construction, never per request
//! - Resolution never fails; unusable signals fall back to defaults
//! - No transport types here; the http layer extracts [`Signals`]

pub mod negotiation;
pub mod resolver;
pub mod whitelist;

pub use resolver::{
    classify, resolve, DomainCulture, Resolution, ResolutionConfig, Resolver, Signals, Tier,
};
pub use whitelist::{DomainEntry, WhitelistError, WhitelistIndex};
