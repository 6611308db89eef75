//! Round-robin merge of per-provider result lists.

/// Merge `lists` by taking element `i` from each list in turn, skipping
/// lists that are already exhausted.
///
/// `[A1, A2, A3]`, `[B1]`, `[C1, C2]` becomes
/// `[A1, B1, C1, A2, C2, A3]`. The output length is the sum of the input
/// lengths and relative order within each list is preserved.
pub fn interleave<T>(lists: Vec<Vec<T>>) -> Vec<T> {
    let total = lists.iter().map(Vec::len).sum();
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut merged = Vec::with_capacity(total);

    while merged.len() < total {
        for iter in &mut iters {
            if let Some(item) = iter.next() {
                merged.push(item);
            }
        }
    }
    merged
}
