//! Error types for the websift-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Page-level crawl failures never appear here:
//! they are folded into a degraded result by the crawler.

/// Errors that can occur while planning, searching or browsing.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A required invocation parameter was absent or blank.
    #[error("missing required parameter: {0}")]
    MissingParameter(String),

    /// Invalid pipeline configuration.
    #[error("config error: {0}")]
    Config(String),

    /// An HTTP request failed at the transport level or returned an error status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A navigation did not complete within its bound.
    #[error("navigation timed out: {0}")]
    Timeout(String),

    /// The session's request filter aborted the request.
    #[error("request blocked: {0}")]
    Blocked(String),

    /// The page did not have the structure the caller expected.
    #[error("parse error: {0}")]
    Parse(String),

    /// The browsing engine could not open, or was used after release.
    #[error("browser error: {0}")]
    Browser(String),

    /// A search for one query variant failed; fatal for the whole invocation.
    #[error("search for \"{query}\" failed: {source}")]
    SearchEngine {
        /// The query variant that failed.
        query: String,
        /// What went wrong while driving the search engine.
        #[source]
        source: Box<SearchError>,
    },
}

impl SearchError {
    /// Wrap an error raised while searching for `query`.
    pub fn for_variant(query: &str, source: SearchError) -> Self {
        Self::SearchEngine {
            query: query.to_owned(),
            source: Box::new(source),
        }
    }
}

/// Convenience type alias for websift-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
