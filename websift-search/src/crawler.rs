//! Page crawler: visits one result URL and analyses it.
//!
//! Crawl failures never propagate. A page that cannot be opened or parsed
//! yields [`CrawlOutcome::Degraded`], which still becomes an
//! [`EnrichedResult`] carrying the candidate's title, URL, snippet and score.

use crate::browser::{BrowsingEngine, BrowsingSession, RequestFilter};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::extract::PageAnalyzer;
use crate::orchestrator::scoring::position_score;
use crate::types::{BasicResult, CrawlOutcome, EnrichedResult, PageAnalysis};

/// Crawls result pages in sessions of a shared browsing engine.
#[derive(Debug, Clone, Copy)]
pub struct PageCrawler<'a> {
    config: &'a PipelineConfig,
}

impl<'a> PageCrawler<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Open `url` in a fresh session and run the page analysis.
    ///
    /// The session is closed on every path, including when opening it failed
    /// part way through navigation.
    pub async fn crawl_page<B: BrowsingEngine>(&self, browser: &B, url: &str) -> CrawlOutcome {
        let filter = RequestFilter::blocking(&self.config.blocked_resources);
        let mut session = match browser.new_session(filter).await {
            Ok(session) => session,
            Err(err) => return degraded(url, err.to_string()),
        };

        let analysis = self.analyze(&mut session, url).await;
        if let Err(err) = session.close().await {
            tracing::warn!(url, error = %err, "failed to close crawl session");
        }

        match analysis {
            Ok(analysis) => {
                tracing::trace!(url, "page analysed");
                CrawlOutcome::Extracted(analysis)
            }
            Err(err) => degraded(url, err.to_string()),
        }
    }

    /// Crawl `basic.url` and combine the outcome with the position score.
    pub async fn enrich<B: BrowsingEngine>(
        &self,
        browser: &B,
        basic: BasicResult,
        position: usize,
    ) -> EnrichedResult {
        let outcome = self.crawl_page(browser, &basic.url).await;
        EnrichedResult::from_outcome(basic, position_score(position), outcome)
    }

    async fn analyze<S: BrowsingSession>(
        &self,
        session: &mut S,
        url: &str,
    ) -> Result<PageAnalysis> {
        let page = session.open(url, self.config.page_timeout()).await?;
        Ok(session.extract(&page, &PageAnalyzer))
    }
}

fn degraded(url: &str, reason: String) -> CrawlOutcome {
    tracing::warn!(url, reason = %reason, "page crawl degraded");
    CrawlOutcome::Degraded { reason }
}
