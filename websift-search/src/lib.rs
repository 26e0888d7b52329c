//! # websift-search
//!
//! Concurrent web search with page extraction.
//!
//! One query becomes a handful of variants, each variant is searched on a
//! public search engine, every result page is crawled and analysed, and the
//! enriched results are merged into a short ranked report.
//!
//! ## Design
//!
//! - Query variants are searched concurrently; one failed search fails the invocation
//! - Result pages are crawled concurrently; one failed crawl only degrades its entry
//! - Results are deduplicated by URL and ranked by position within their variant
//! - A single browsing engine is acquired per invocation and always released
//! - Browsing goes through the [`browser::BrowsingEngine`] trait, so tests
//!   can drive the pipeline with deterministic fakes
//!
//! ## Security
//!
//! - No API keys or secrets to leak
//! - Images, stylesheets, fonts and media are never downloaded
//! - Search queries are logged only at trace level

pub mod browser;
pub mod config;
pub mod crawler;
pub mod engine;
pub mod error;
pub mod extract;
pub mod orchestrator;
pub mod planner;
pub mod types;

pub use browser::{BrowsingEngine, BrowsingSession, HttpBrowser, RequestFilter, ResourceType};
pub use config::PipelineConfig;
pub use crawler::PageCrawler;
pub use engine::SearchEngineClient;
pub use error::{Result, SearchError};
pub use orchestrator::{SearchPipeline, SearchReport};
pub use planner::plan_queries;
pub use types::{
    BasicResult, CrawlOutcome, EnrichedResult, PageAnalysis, PageContent, PageMetadata,
    PageStructure,
};

/// Search the web and crawl the results with a fresh [`HttpBrowser`].
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid `config`,
/// [`SearchError::MissingParameter`] for a blank query, or
/// [`SearchError::SearchEngine`] if any query variant fails.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> websift_search::Result<()> {
/// let config = websift_search::PipelineConfig::default();
/// let report = websift_search::search("rust programming", &config).await?;
/// println!("{report}");
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &PipelineConfig) -> Result<SearchReport> {
    config.validate()?;
    let browser = HttpBrowser::launch(config);
    SearchPipeline::new(browser, config.clone()).run(query).await
}
