//! Query planning: expands one base query into ordered search variants.

use crate::error::{Result, SearchError};

/// Substrings that mark a query as time-sensitive (matched case-insensitively).
const RECENCY_MARKERS: [&str; 3] = ["latest", "recent", "new"];

/// Suffixes appended to time-sensitive queries, in variant order.
const RECENCY_SUFFIXES: [&str; 2] = ["last 24 hours", "today"];

/// Expand `base_query` into the list of variants to search.
///
/// The first variant is always the base query unchanged. Queries that
/// mention recency get two extra variants narrowing the time window.
///
/// # Errors
///
/// Returns [`SearchError::MissingParameter`] for an empty or blank query.
pub fn plan_queries(base_query: &str) -> Result<Vec<String>> {
    if base_query.trim().is_empty() {
        return Err(SearchError::MissingParameter("query".into()));
    }

    let mut variants = vec![base_query.to_owned()];
    if is_time_sensitive(base_query) {
        variants.extend(
            RECENCY_SUFFIXES
                .iter()
                .map(|suffix| format!("{base_query} {suffix}")),
        );
    }
    Ok(variants)
}

/// Whether the query asks for recent material.
///
/// Plain substring matching, so "news" and "renewal" count too.
pub fn is_time_sensitive(query: &str) -> bool {
    let lower = query.to_lowercase();
    RECENCY_MARKERS.iter().any(|marker| lower.contains(marker))
}
