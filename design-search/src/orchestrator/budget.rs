//! Result budgets for fan-out searches.

/// Lower bound on any per-source request size.
pub const MIN_BUDGET: usize = 3;

/// How many results to request from each of `sources` sources so that
/// together they can fill `limit`, never asking for fewer than
/// [`MIN_BUDGET`].
///
/// With zero sources the result is [`MIN_BUDGET`].
pub fn per_provider_budget(limit: usize, sources: usize) -> usize {
    if sources == 0 {
        return MIN_BUDGET;
    }
    limit.div_ceil(sources).max(MIN_BUDGET)
}
