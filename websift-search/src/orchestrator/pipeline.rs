//! Search pipeline: plan, search every variant, crawl every candidate, aggregate.
//!
//! # Stages
//!
//! 1. Plan query variants from the base query
//! 2. Stage A: search all variants concurrently; any failure is fatal
//! 3. Stage B: crawl every candidate of every variant concurrently; failures degrade
//! 4. Flatten, deduplicate, rank and truncate
//!
//! The browsing engine is owned by the pipeline for one invocation and closed
//! exactly once after both stages have joined, on success and failure alike.

use futures::future::join_all;

use crate::browser::BrowsingEngine;
use crate::config::PipelineConfig;
use crate::crawler::PageCrawler;
use crate::engine::SearchEngineClient;
use crate::error::{Result, SearchError};
use crate::planner::plan_queries;
use crate::types::BasicResult;

use super::aggregate::{aggregate, SearchReport};

/// One search invocation over a dedicated browsing engine.
#[derive(Debug)]
pub struct SearchPipeline<B: BrowsingEngine> {
    browser: B,
    config: PipelineConfig,
}

impl<B: BrowsingEngine> SearchPipeline<B> {
    pub fn new(browser: B, config: PipelineConfig) -> Self {
        Self { browser, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the whole pipeline for `query` and release the browsing engine.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Config`] if the configuration is invalid
    /// - [`SearchError::MissingParameter`] if `query` is blank (no session is opened)
    /// - [`SearchError::SearchEngine`] if any variant's search fails
    ///
    /// A failure to close the engine is logged and never replaces the result.
    pub async fn run(self, query: &str) -> Result<SearchReport> {
        let outcome = self.execute(query).await;
        if let Err(err) = self.browser.close().await {
            tracing::warn!(error = %err, "failed to close browsing engine");
        }
        outcome
    }

    async fn execute(&self, query: &str) -> Result<SearchReport> {
        self.config.validate()?;
        let variants = plan_queries(query)?;
        tracing::trace!(query, variants = variants.len(), "query planned");

        // Stage A: every variant runs to completion before failures are inspected.
        let client = SearchEngineClient::new(&self.config);
        let searches = variants
            .iter()
            .map(|variant| client.search(&self.browser, variant));
        let outcomes = join_all(searches).await;
        let candidates = collect_variant_results(&variants, outcomes)?;
        tracing::debug!(
            variants = candidates.len(),
            count = candidates.iter().map(Vec::len).sum::<usize>(),
            "search stage complete"
        );

        // Stage B: crawls never fail, they degrade.
        let crawler = &PageCrawler::new(&self.config);
        let browser = &self.browser;
        let crawls = candidates.into_iter().map(move |list| {
            join_all(
                list.into_iter()
                    .enumerate()
                    .map(move |(position, basic)| crawler.enrich(browser, basic, position)),
            )
        });
        let enriched = join_all(crawls).await;
        tracing::debug!(
            count = enriched.iter().map(Vec::len).sum::<usize>(),
            "crawl stage complete"
        );

        let results = aggregate(enriched, self.config.max_results);
        tracing::debug!(count = results.len(), "results aggregated");
        Ok(SearchReport::new(query, results))
    }
}

/// Pair each variant with its outcome; the first failure in variant order wins.
fn collect_variant_results(
    variants: &[String],
    outcomes: Vec<Result<Vec<BasicResult>>>,
) -> Result<Vec<Vec<BasicResult>>> {
    variants
        .iter()
        .zip(outcomes)
        .map(|(variant, outcome)| {
            outcome.map_err(|err| {
                tracing::warn!(variant = %variant, error = %err, "variant search failed");
                SearchError::for_variant(variant, err)
            })
        })
        .collect()
}
