//! Core orchestrator: concurrent provider fan-out, failure isolation, merge.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::provider::DesignProvider;
use crate::types::{DesignRecord, SearchOutcome};

use super::budget::per_provider_budget;
use super::interleave::interleave;

/// Providers from `registry` that `selected` asks for, in registry order.
///
/// `None` or an empty selection means every provider. Unknown slugs are
/// ignored.
pub fn active_providers(
    registry: &[Arc<dyn DesignProvider>],
    selected: Option<&[String]>,
) -> Vec<Arc<dyn DesignProvider>> {
    match selected {
        Some(slugs) if !slugs.is_empty() => registry
            .iter()
            .filter(|p| slugs.iter().any(|s| s.eq_ignore_ascii_case(p.slug())))
            .cloned()
            .collect(),
        _ => registry.to_vec(),
    }
}

/// Search every active provider concurrently and merge the results.
///
/// # Pipeline
///
/// 1. Resolve the active providers (see [`active_providers`])
/// 2. Ask each for [`per_provider_budget`] results, all at once via
///    [`futures::future::join_all`]
/// 3. A provider error or panic becomes an empty contribution, logged at
///    warn level
/// 4. Drop invalid records and empty lists
/// 5. Interleave the lists round-robin in registry order
/// 6. Record the distinct sources seen, then truncate to `limit`
///
/// Never fails: no providers or no results yield an empty outcome.
pub async fn orchestrate_search(
    registry: &[Arc<dyn DesignProvider>],
    query: &str,
    limit: usize,
    selected: Option<&[String]>,
) -> SearchOutcome {
    let providers = active_providers(registry, selected);
    if providers.is_empty() {
        tracing::debug!("no active providers");
        return SearchOutcome::default();
    }

    let budget = per_provider_budget(limit, providers.len());
    tracing::trace!(query, limit, budget, providers = providers.len(), "fanning out");

    let futures: Vec<_> = providers
        .iter()
        .map(|provider| async move {
            let result = AssertUnwindSafe(provider.search(query, budget))
                .catch_unwind()
                .await;
            (provider.name(), result)
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;

    let mut lists: Vec<Vec<DesignRecord>> = Vec::with_capacity(outcomes.len());
    for (name, outcome) in outcomes {
        let Ok(outcome) = outcome else {
            tracing::warn!(provider = name, "provider search panicked");
            continue;
        };
        match outcome {
            Ok(records) => {
                let valid: Vec<DesignRecord> =
                    records.into_iter().filter(DesignRecord::is_valid).collect();
                tracing::debug!(provider = name, count = valid.len(), "provider returned results");
                if !valid.is_empty() {
                    lists.push(valid);
                }
            }
            Err(err) => {
                tracing::warn!(provider = name, error = %err, "provider search failed");
            }
        }
    }

    let mut designs = interleave(lists);
    let sources_used = distinct_sources(&designs);
    designs.truncate(limit);

    tracing::debug!(
        count = designs.len(),
        sources = sources_used.len(),
        "search complete"
    );
    SearchOutcome {
        designs,
        sources_used,
    }
}

/// Distinct `source` values in first-seen order.
fn distinct_sources(designs: &[DesignRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    designs
        .iter()
        .filter(|d| seen.insert(d.source.as_str()))
        .map(|d| d.source.clone())
        .collect()
}
