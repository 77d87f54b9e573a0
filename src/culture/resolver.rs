//! Per-request domain/culture resolution.
//!
//! # Precedence
//! ```text
//! query tier   : query params enabled AND domain query param present
//! header tier  : domain header AND culture header present
//! default tier : everything else, or an unknown domain in either tier above
//! ```
//!
//! # Design Decisions
//! - Pure and total: no I/O, no errors, same input gives same output
//! - Bad signals degrade to defaults instead of failing the request
//! - An unknown domain goes straight to the default tier; it does not
//!   retry with the header signals

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::schema::CultureConfig;
use crate::culture::negotiation::{language_of, negotiate};
use crate::culture::whitelist::{DomainEntry, WhitelistError, WhitelistIndex};

/// Resolved localization context for one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCulture {
    /// Lowercase whitelisted domain key.
    pub domain: String,
    /// Whitelisted culture tag.
    pub culture: String,
    /// Primary subtag of `culture`.
    pub language: String,
    /// The Accept-Language header as received, or `"<culture>, <language>, *"`.
    pub accept_language: String,
}

impl DomainCulture {
    /// Result for a culture that did not come from an Accept-Language header.
    fn synthesized(domain: &str, culture: &str) -> Self {
        let language = language_of(culture);
        Self {
            domain: domain.to_string(),
            culture: culture.to_string(),
            language: language.to_string(),
            accept_language: format!("{culture}, {language}, *"),
        }
    }

    fn echoed(domain: &str, culture: &str, accept_language: &str) -> Self {
        Self {
            domain: domain.to_string(),
            culture: culture.to_string(),
            language: language_of(culture).to_string(),
            accept_language: accept_language.to_string(),
        }
    }
}

/// Which precedence tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Query,
    Header,
    /// No usable domain signal.
    Default,
    /// A domain signal named a domain outside the whitelist.
    UnknownDomain,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Query => "query",
            Tier::Header => "header",
            Tier::Default => "default",
            Tier::UnknownDomain => "unknown_domain",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`DomainCulture`] and the tier it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub domain_culture: DomainCulture,
    pub tier: Tier,
}

/// Query parameters and headers already extracted from a request.
///
/// Header names are stored lowercase. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signals {
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter. The first value for a name wins.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_query(name, value);
        self
    }

    /// Add a header. The first value for a name wins.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn insert_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn insert_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .entry(name.as_ref().to_ascii_lowercase())
            .or_insert_with(|| value.into());
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        present(self.query.get(name))
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        present(self.headers.get(name))
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Signal names and switches, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionConfig {
    pub query_domain: String,
    pub query_culture: String,
    pub ignore_query_params: bool,
    /// Lowercase.
    pub header_domain: String,
    /// Lowercase.
    pub header_culture: String,
}

impl ResolutionConfig {
    pub fn from_config(config: &CultureConfig) -> Self {
        Self {
            query_domain: config.query_params.domain.clone(),
            query_culture: config.query_params.culture.clone(),
            ignore_query_params: config.query_params.ignore,
            header_domain: config.headers.domain.to_ascii_lowercase(),
            header_culture: config.headers.culture.to_ascii_lowercase(),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self::from_config(&CultureConfig::default())
    }
}

/// How the culture signal should be reported back.
#[derive(Clone, Copy)]
enum CultureSignal<'a> {
    /// Single tag from a query parameter, or nothing.
    Bare(Option<&'a str>),
    /// Full Accept-Language style header value.
    Header(&'a str),
}

/// Resolve a request's signals to a [`DomainCulture`].
pub fn resolve(signals: &Signals, index: &WhitelistIndex, config: &ResolutionConfig) -> DomainCulture {
    classify(signals, index, config).domain_culture
}

/// Like [`resolve`], also reporting the tier that produced the result.
pub fn classify(signals: &Signals, index: &WhitelistIndex, config: &ResolutionConfig) -> Resolution {
    let from_query = (!config.ignore_query_params)
        .then(|| signals.query(&config.query_domain))
        .flatten()
        .map(|domain| {
            let culture = signals.query(&config.query_culture);
            (domain, CultureSignal::Bare(culture), Tier::Query)
        });

    let selected = from_query.or_else(|| {
        let domain = signals.header(&config.header_domain)?;
        let culture = signals.header(&config.header_culture)?;
        Some((domain, CultureSignal::Header(culture), Tier::Header))
    });

    let Some((raw_domain, culture, tier)) = selected else {
        return default_resolution(index, Tier::Default);
    };

    let domain = raw_domain.to_lowercase();
    match index.get(&domain) {
        Some(entry) => Resolution {
            domain_culture: resolve_culture(&domain, entry, culture),
            tier,
        },
        None => default_resolution(index, Tier::UnknownDomain),
    }
}

fn default_resolution(index: &WhitelistIndex, tier: Tier) -> Resolution {
    Resolution {
        domain_culture: DomainCulture::synthesized(
            index.default_domain(),
            index.default_entry().default_culture(),
        ),
        tier,
    }
}

fn resolve_culture(domain: &str, entry: &DomainEntry, signal: CultureSignal<'_>) -> DomainCulture {
    match signal {
        CultureSignal::Header(raw) => DomainCulture::echoed(domain, best_culture(raw, entry), raw),
        CultureSignal::Bare(Some(raw)) => DomainCulture::synthesized(domain, best_culture(raw, entry)),
        CultureSignal::Bare(None) => DomainCulture::synthesized(domain, entry.default_culture()),
    }
}

fn best_culture<'e>(raw: &str, entry: &'e DomainEntry) -> &'e str {
    negotiate(raw, entry.cultures()).unwrap_or(entry.default_culture())
}

/// A [`WhitelistIndex`] together with its [`ResolutionConfig`].
#[derive(Debug, Clone)]
pub struct Resolver {
    index: WhitelistIndex,
    config: ResolutionConfig,
}

impl Resolver {
    pub fn new(index: WhitelistIndex, config: ResolutionConfig) -> Self {
        Self { index, config }
    }

    /// Build the whitelist index and signal names from the `[culture]` table.
    pub fn from_config(config: &CultureConfig) -> Result<Self, WhitelistError> {
        let index = WhitelistIndex::build(&config.white_list, &config.default)?;
        Ok(Self::new(index, ResolutionConfig::from_config(config)))
    }

    pub fn resolve(&self, signals: &Signals) -> DomainCulture {
        resolve(signals, &self.index, &self.config)
    }

    pub fn classify(&self, signals: &Signals) -> Resolution {
        classify(signals, &self.index, &self.config)
    }

    pub fn index(&self) -> &WhitelistIndex {
        &self.index
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }
}
