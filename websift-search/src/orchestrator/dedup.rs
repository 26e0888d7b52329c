//! Result deduplication by exact URL.
//!
//! The first occurrence of a URL in the flattened sequence wins; later
//! occurrences are discarded whatever their score. Input order is preserved.

use std::collections::HashSet;

use crate::types::EnrichedResult;

/// Drop every result whose `url` was already seen earlier in `results`.
pub fn deduplicate(results: Vec<EnrichedResult>) -> Vec<EnrichedResult> {
    let mut seen_urls: HashSet<String> = HashSet::with_capacity(results.len());
    results
        .into_iter()
        .filter(|result| seen_urls.insert(result.url.clone()))
        .collect()
}
