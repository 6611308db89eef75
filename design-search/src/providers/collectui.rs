//! Collect UI: UI shots organised into challenge categories.
//!
//! Search maps the query onto the category directory and browses up to
//! three matching categories by popularity. A query that matches no
//! category yields nothing.

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::{match_categories, CategoryDirectory};
use crate::error::SearchError;
use crate::orchestrator::per_provider_budget;
use crate::provider::DesignProvider;
use crate::scrape::RecordCollector;
use crate::types::{DesignRecord, ProviderKind, SortOrder};

/// Most categories browsed for one search.
const MAX_CATEGORIES: usize = 3;

/// Collect UI provider backed by a shared [`CategoryDirectory`].
pub struct CollectUiProvider {
    directory: Arc<CategoryDirectory>,
}

impl CollectUiProvider {
    pub fn new(directory: Arc<CategoryDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl DesignProvider for CollectUiProvider {
    fn name(&self) -> &str {
        ProviderKind::CollectUi.name()
    }

    fn slug(&self) -> &str {
        ProviderKind::CollectUi.slug()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DesignRecord>, SearchError> {
        tracing::trace!(query, "Collect UI search");
        let categories = self.directory.list_categories().await?;
        let matches = match_categories(query, &categories);
        if matches.is_empty() {
            tracing::debug!(query, "no Collect UI category matches");
            return Ok(Vec::new());
        }

        let per_category = per_provider_budget(limit, matches.len());
        let mut collector = RecordCollector::new(limit);

        for category in matches.iter().take(MAX_CATEGORIES) {
            if collector.is_full() {
                break;
            }
            match self
                .directory
                .browse_category(&category.slug, SortOrder::Popular, per_category)
                .await
            {
                Ok(designs) => {
                    for design in designs {
                        collector.push(design);
                    }
                }
                Err(err) => {
                    tracing::warn!(slug = %category.slug, error = %err, "category browse failed, skipping");
                }
            }
        }

        Ok(collector.into_records())
    }
}
