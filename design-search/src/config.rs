//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which providers are registered, HTTP client
//! behaviour, and the category cache lifetime. Defaults mirror production
//! behaviour: all six galleries, one-hour category cache, no request timeout.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::ProviderKind;

/// Default category directory cache lifetime (one hour).
pub const DEFAULT_CATEGORY_TTL_SECONDS: u64 = 60 * 60;

/// Configuration for the provider registry and its HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Providers to register, in merge order.
    pub sources: Vec<ProviderKind>,
    /// Custom User-Agent string. If `None`, a fixed desktop Chrome
    /// User-Agent is sent.
    pub user_agent: Option<String>,
    /// Per-request HTTP timeout in seconds. `None` leaves requests unbounded.
    pub timeout_seconds: Option<u64>,
    /// How long the Collect UI category directory is served from memory.
    pub category_cache_ttl_seconds: u64,
    /// Base URL overrides keyed by provider slug (e.g. for mirrors or tests).
    pub base_urls: BTreeMap<String, String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            sources: ProviderKind::all().to_vec(),
            user_agent: None,
            timeout_seconds: None,
            category_cache_ttl_seconds: DEFAULT_CATEGORY_TTL_SECONDS,
            base_urls: BTreeMap::new(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `sources` must not be empty or repeat a provider
    /// - `timeout_seconds`, when set, must be greater than 0
    /// - `category_cache_ttl_seconds` must be greater than 0
    /// - every `base_urls` key must be a known provider slug
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.sources.is_empty() {
            return Err(SearchError::Config(
                "at least one source must be enabled".into(),
            ));
        }
        if let Some(repeated) = self
            .sources
            .iter()
            .enumerate()
            .find_map(|(i, kind)| self.sources[..i].contains(kind).then_some(kind))
        {
            return Err(SearchError::Config(format!(
                "source `{}` is listed more than once",
                repeated.slug()
            )));
        }
        if self.timeout_seconds == Some(0) {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.category_cache_ttl_seconds == 0 {
            return Err(SearchError::Config(
                "category_cache_ttl_seconds must be greater than 0".into(),
            ));
        }
        if let Some(unknown) = self
            .base_urls
            .keys()
            .find(|slug| ProviderKind::parse(slug).is_none())
        {
            return Err(SearchError::Config(format!(
                "base_urls has unknown provider slug `{unknown}`"
            )));
        }
        Ok(())
    }

    /// Base URL for `kind`: the configured override, else the production site.
    /// Trailing slashes are stripped so paths can be appended directly.
    pub fn base_url(&self, kind: ProviderKind) -> String {
        self.base_urls
            .get(kind.slug())
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| kind.default_base_url().to_owned())
    }
}
