//! Best-effort local keyword filtering for galleries without native search.
//!
//! Filtering is deliberately lenient: when fewer than
//! [`MIN_FILTERED_RESULTS`] records survive, the unfiltered listing is
//! returned instead so that a search almost always yields something.

use crate::types::DesignRecord;

/// Smallest filtered subset that is returned as-is.
pub const MIN_FILTERED_RESULTS: usize = 2;

/// Filter `records` by a case-insensitive substring match of `query`.
///
/// `fields` selects which record fields are searched. A query equal to one
/// of `passthrough` (generic words like `design`) matches every record.
/// The result holds at most `limit` records; if filtering keeps fewer than
/// [`MIN_FILTERED_RESULTS`], the head of the unfiltered list is returned.
pub fn filter_by_keyword<F>(
    records: Vec<DesignRecord>,
    query: &str,
    passthrough: &[&str],
    fields: F,
    limit: usize,
) -> Vec<DesignRecord>
where
    F: Fn(&DesignRecord) -> Vec<&str>,
{
    let q = query.to_lowercase();
    let matches_all = passthrough.contains(&q.as_str());

    let filtered: Vec<DesignRecord> = records
        .iter()
        .filter(|record| {
            matches_all
                || fields(record)
                    .iter()
                    .any(|field| field.to_lowercase().contains(&q))
        })
        .cloned()
        .collect();

    let mut chosen = if filtered.len() >= MIN_FILTERED_RESULTS {
        filtered
    } else {
        tracing::debug!(
            query,
            matched = filtered.len(),
            total = records.len(),
            "keyword filter too narrow; returning unfiltered listing"
        );
        records
    };
    chosen.truncate(limit);
    chosen
}

/// Field accessor: title only.
pub fn title_field(record: &DesignRecord) -> Vec<&str> {
    vec![record.title.as_str()]
}

/// Field accessor: title and source URL.
pub fn title_and_url_fields(record: &DesignRecord) -> Vec<&str> {
    vec![record.title.as_str(), record.source_url.as_str()]
}
