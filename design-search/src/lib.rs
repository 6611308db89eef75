//! # design-search
//!
//! Design-inspiration search across public gallery sites.
//!
//! This crate scrapes six curated galleries directly (Collect UI, Godly,
//! Land-book, Httpster, Brutalist Websites and Fonts In Use) and merges
//! their listings into one normalised result list. No API keys, no
//! external services.
//!
//! ## Design
//!
//! - Each gallery is a [`DesignProvider`] that parses HTML with CSS selectors
//! - Providers are queried concurrently and merged round-robin
//! - A failing gallery contributes nothing instead of failing the search
//! - The Collect UI category directory is cached in memory with a TTL
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - No network listeners; this is a library, not a server
//! - Search queries are logged only at trace level

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod http;
pub mod orchestrator;
pub mod provider;
pub mod providers;
pub(crate) mod scrape;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

pub use catalog::{match_categories, CategoryDirectory, Clock, ManualClock, SystemClock};
pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use provider::DesignProvider;
pub use types::{Category, DesignRecord, ProviderKind, SearchOutcome, SortOrder};

/// A provider registry plus the shared Collect UI category directory.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct DesignSearch {
    providers: Vec<Arc<dyn DesignProvider>>,
    directory: Arc<CategoryDirectory>,
}

impl DesignSearch {
    /// Build the registry described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation, or
    /// [`SearchError::Http`] if the HTTP client cannot be built.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn example() -> design_search::Result<()> {
    /// let search = design_search::DesignSearch::new(&design_search::SearchConfig::default())?;
    /// let outcome = search.search_all("dashboard", 12, None).await;
    /// for design in &outcome.designs {
    ///     println!("{} ({}): {}", design.title, design.source, design.image_url);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        let client = http::build_client(config)?;
        let directory = Arc::new(CategoryDirectory::with_base_url(
            client.clone(),
            config.base_url(ProviderKind::CollectUi),
            Duration::from_secs(config.category_cache_ttl_seconds),
        ));
        let providers = providers::build_registry(config, &client, &directory);
        Ok(Self::with_registry(providers, directory))
    }

    /// Assemble from an explicit registry, e.g. with mock providers.
    pub fn with_registry(
        providers: Vec<Arc<dyn DesignProvider>>,
        directory: Arc<CategoryDirectory>,
    ) -> Self {
        Self {
            providers,
            directory,
        }
    }

    /// Registered providers in merge order.
    pub fn providers(&self) -> &[Arc<dyn DesignProvider>] {
        &self.providers
    }

    /// Search the registered providers concurrently and merge the results.
    ///
    /// `sources` restricts the search to those provider slugs; `None` or an
    /// empty list searches them all. Provider failures are logged, never
    /// returned.
    pub async fn search_all(
        &self,
        query: &str,
        limit: usize,
        sources: Option<&[String]>,
    ) -> SearchOutcome {
        orchestrator::orchestrate_search(&self.providers, query, limit, sources).await
    }

    /// The Collect UI category directory, served from cache while fresh.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when a refresh is needed and fails.
    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>> {
        self.directory.list_categories().await
    }

    /// One live Collect UI listing page.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the page cannot be fetched.
    pub async fn browse_category(
        &self,
        slug: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<DesignRecord>> {
        self.directory.browse_category(slug, sort, limit).await
    }
}
