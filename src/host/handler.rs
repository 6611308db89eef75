//! Production query handler backed by the live gallery scrapers.

use crate::error::Result;
use crate::host::channel::{QueryHandler, SourceInfo};
use async_trait::async_trait;
use design_search::{Category, DesignRecord, DesignSearch, SearchConfig, SearchOutcome, SortOrder};
use std::sync::Arc;

/// Answers query commands with a [`DesignSearch`] registry.
pub struct DesignQueryHandler {
    search: DesignSearch,
}

impl DesignQueryHandler {
    /// Build the registry described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScoutError::Search`] when the search config is invalid
    /// or the HTTP client cannot be built.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let search = DesignSearch::new(config)?;
        tracing::info!(
            sources = search.providers().len(),
            "design search registry ready"
        );
        Ok(Self::from_search(search))
    }

    #[must_use]
    pub fn from_search(search: DesignSearch) -> Self {
        Self { search }
    }
}

#[async_trait]
impl QueryHandler for DesignQueryHandler {
    async fn design_search(
        &self,
        query: &str,
        limit: usize,
        sources: Option<&[String]>,
    ) -> Result<SearchOutcome> {
        Ok(self.search.search_all(query, limit, sources).await)
    }

    async fn list_categories(&self) -> Result<Arc<Vec<Category>>> {
        Ok(self.search.list_categories().await?)
    }

    async fn browse_category(
        &self,
        slug: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<DesignRecord>> {
        Ok(self.search.browse_category(slug, sort, limit).await?)
    }

    fn sources(&self) -> Vec<SourceInfo> {
        self.search
            .providers()
            .iter()
            .map(|p| SourceInfo {
                name: p.name().to_owned(),
                slug: p.slug().to_owned(),
            })
            .collect()
    }
}
