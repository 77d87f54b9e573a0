//! Normalized domain whitelist.
//!
//! # Responsibilities
//! - Lowercase domain keys for case-insensitive lookup
//! - Put each domain's default culture at the head of its culture list
//! - Resolve and memoize the default domain entry
//!
//! # Design Decisions
//! - Built once from configuration, immutable afterwards
//! - Construction is the only place that can fail; lookups are infallible

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::DomainSettings;

/// Errors raised while building a [`WhitelistIndex`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WhitelistError {
    /// No domains configured.
    #[error("white_list is missing or empty")]
    EmptyWhitelist,

    /// No default domain configured.
    #[error("default domain is missing")]
    MissingDefaultDomain,

    /// Default domain does not name a whitelisted domain.
    #[error("default domain '{0}' is not in the white_list")]
    UnknownDefaultDomain(String),

    /// Two keys map to the same domain once lowercased.
    #[error("domain '{0}' is configured more than once (keys are case-insensitive)")]
    DuplicateDomain(String),

    /// Domain has a blank default culture but other cultures configured.
    #[error("domain '{0}' has no default culture")]
    MissingDefaultCulture(String),

    /// Domain has nothing to serve.
    #[error("domain '{0}' has no cultures")]
    NoCultures(String),
}

/// One whitelisted domain, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainEntry {
    cultures: Vec<String>,
    default_culture: String,
}

impl DomainEntry {
    fn normalize(domain: &str, settings: &DomainSettings) -> Result<Self, WhitelistError> {
        let default_culture = settings.default.trim();
        if default_culture.is_empty() {
            let has_any = settings.cultures.iter().any(|c| !c.trim().is_empty());
            return Err(if has_any {
                WhitelistError::MissingDefaultCulture(domain.to_string())
            } else {
                WhitelistError::NoCultures(domain.to_string())
            });
        }

        let mut cultures = vec![default_culture.to_string()];
        for culture in settings.cultures.iter().map(|c| c.trim()) {
            if culture.is_empty() || cultures.iter().any(|c| c == culture) {
                continue;
            }
            cultures.push(culture.to_string());
        }

        Ok(Self {
            cultures,
            default_culture: default_culture.to_string(),
        })
    }

    /// Supported cultures; the default culture is always first.
    pub fn cultures(&self) -> &[String] {
        &self.cultures
    }

    pub fn default_culture(&self) -> &str {
        &self.default_culture
    }

    /// Whether `culture` is whitelisted for this domain (exact spelling).
    pub fn supports(&self, culture: &str) -> bool {
        self.cultures.iter().any(|c| c == culture)
    }
}

/// Lowercase domain key → [`DomainEntry`].
#[derive(Debug, Clone)]
pub struct WhitelistIndex {
    entries: HashMap<String, Arc<DomainEntry>>,
    default_domain: String,
    default_entry: Arc<DomainEntry>,
}

impl WhitelistIndex {
    /// Normalize the raw whitelist and resolve the default domain.
    pub fn build(
        raw: &BTreeMap<String, DomainSettings>,
        default_domain: &str,
    ) -> Result<Self, WhitelistError> {
        if raw.is_empty() {
            return Err(WhitelistError::EmptyWhitelist);
        }

        let default_domain = default_domain.trim().to_lowercase();
        if default_domain.is_empty() {
            return Err(WhitelistError::MissingDefaultDomain);
        }

        let mut entries = HashMap::with_capacity(raw.len());
        for (key, settings) in raw {
            let domain = key.trim().to_lowercase();
            let entry = DomainEntry::normalize(&domain, settings)?;
            if entries.insert(domain.clone(), Arc::new(entry)).is_some() {
                return Err(WhitelistError::DuplicateDomain(domain));
            }
        }

        let default_entry = entries
            .get(&default_domain)
            .cloned()
            .ok_or_else(|| WhitelistError::UnknownDefaultDomain(default_domain.clone()))?;

        tracing::debug!(
            domains = entries.len(),
            default_domain = %default_domain,
            default_culture = %default_entry.default_culture,
            "Whitelist index built"
        );

        Ok(Self {
            entries,
            default_domain,
            default_entry,
        })
    }

    /// Look up a domain. The key must already be lowercase.
    pub fn get(&self, domain: &str) -> Option<&DomainEntry> {
        self.entries.get(domain).map(Arc::as_ref)
    }

    pub fn default_domain(&self) -> &str {
        &self.default_domain
    }

    pub fn default_entry(&self) -> &DomainEntry {
        &self.default_entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by domain key, for stable output.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainEntry)> {
        let mut sorted: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_ref()))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        sorted.into_iter()
    }
}
