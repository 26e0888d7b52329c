//! Pipeline configuration with sensible defaults.
//!
//! [`PipelineConfig`] controls which search page is driven, navigation
//! timeouts, the request filter and how many results survive aggregation.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::browser::ResourceType;
use crate::error::SearchError;

/// Configuration for one search pipeline invocation.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Landing page of the search engine. Its form is filled and submitted.
    pub search_url: String,
    /// CSS selector of the query input inside the landing page form.
    pub query_input_selector: String,
    /// Maximum number of results kept after dedup and ranking.
    pub max_results: usize,
    /// Navigation timeout for each crawled result page, in seconds.
    pub page_timeout_seconds: u64,
    /// Navigation timeout for the search engine pages, in seconds.
    pub search_timeout_seconds: u64,
    /// Resource classes aborted by every session's request filter.
    pub blocked_resources: Vec<ResourceType>,
    /// Custom User-Agent string. If `None`, rotates through a built-in list
    /// of realistic browser User-Agents.
    pub user_agent: Option<String>,
    /// Maximum redirects followed per navigation.
    pub max_redirects: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.bing.com".into(),
            query_input_selector: r#"input[name="q"]"#.into(),
            max_results: 5,
            page_timeout_seconds: 10,
            search_timeout_seconds: 30,
            blocked_resources: vec![
                ResourceType::Image,
                ResourceType::Stylesheet,
                ResourceType::Font,
                ResourceType::Media,
            ],
            user_agent: None,
            max_redirects: 10,
        }
    }
}

impl PipelineConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - both timeouts must be greater than 0
    /// - `search_url` must be an absolute URL
    /// - `query_input_selector` must not be blank
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.page_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "page_timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.search_timeout_seconds == 0 {
            return Err(SearchError::Config(
                "search_timeout_seconds must be greater than 0".into(),
            ));
        }
        if url::Url::parse(&self.search_url).is_err() {
            return Err(SearchError::Config(format!(
                "search_url is not an absolute URL: {:?}",
                self.search_url
            )));
        }
        if self.query_input_selector.trim().is_empty() {
            return Err(SearchError::Config(
                "query_input_selector must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Navigation bound for crawled result pages.
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_seconds)
    }

    /// Navigation bound for the search engine landing and results pages.
    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_seconds)
    }
}
