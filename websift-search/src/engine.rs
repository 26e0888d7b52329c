//! Search engine client: drives one browsing session through a results page.
//!
//! The client opens the engine's landing page, types the query into its
//! search box, submits, and scrapes the organic results. It never visits the
//! result pages itself. Failures are not caught here: they belong to the
//! orchestrator, which treats them as fatal for the invocation.

use scraper::{Html, Selector};

use crate::browser::{BrowsingEngine, BrowsingSession, Extractor, RequestFilter};
use crate::config::PipelineConfig;
use crate::error::{Result, SearchError};
use crate::types::BasicResult;

/// Organic result containers on the Bing results page.
const RESULT_SELECTOR: &str = "#b_results .b_algo";
const TITLE_SELECTOR: &str = "h2";
const LINK_SELECTOR: &str = "a";
const SNIPPET_SELECTOR: &str = ".b_caption p, .b_lineclamp2";

/// Runs one query variant against the configured search engine.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngineClient<'a> {
    config: &'a PipelineConfig,
}

impl<'a> SearchEngineClient<'a> {
    pub fn new(config: &'a PipelineConfig) -> Self {
        Self { config }
    }

    /// Search for `query` in a fresh session of `browser`.
    ///
    /// The session's request filter is installed before the first navigation
    /// and the session is closed on every path.
    ///
    /// # Errors
    ///
    /// Returns the navigation, timeout or parse error that stopped the search.
    pub async fn search<B: BrowsingEngine>(
        &self,
        browser: &B,
        query: &str,
    ) -> Result<Vec<BasicResult>> {
        tracing::trace!(query, "search engine query");

        let filter = RequestFilter::blocking(&self.config.blocked_resources);
        let mut session = browser.new_session(filter).await?;
        let outcome = self.run(&mut session, query).await;
        if let Err(err) = session.close().await {
            tracing::warn!(error = %err, "failed to close search session");
        }

        let results = outcome?;
        tracing::debug!(count = results.len(), "search results extracted");
        Ok(results)
    }

    async fn run<S: BrowsingSession>(
        &self,
        session: &mut S,
        query: &str,
    ) -> Result<Vec<BasicResult>> {
        let timeout = self.config.search_timeout();
        let landing = session.open(&self.config.search_url, timeout).await?;
        let results_page = session
            .submit(&landing, &self.config.query_input_selector, query, timeout)
            .await?;
        session.extract(&results_page, &ResultListExtractor)
    }
}

/// Extractor for the organic result list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultListExtractor;

impl Extractor for ResultListExtractor {
    type Output = Result<Vec<BasicResult>>;

    fn extract(&self, document: &Html) -> Self::Output {
        parse_results(document)
    }
}

/// Parse a results document into candidates.
///
/// Containers missing a title, link or snippet are skipped silently.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] only if a built-in selector fails to parse.
pub fn parse_results(document: &Html) -> Result<Vec<BasicResult>> {
    let result_sel = selector(RESULT_SELECTOR)?;
    let title_sel = selector(TITLE_SELECTOR)?;
    let link_sel = selector(LINK_SELECTOR)?;
    let snippet_sel = selector(SNIPPET_SELECTOR)?;

    let mut results = Vec::new();
    for element in document.select(&result_sel) {
        let title = element
            .select(&title_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());
        let url = element
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string());
        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string());

        match (title, url, snippet) {
            (Some(title), Some(url), Some(snippet))
                if !title.is_empty() && !url.is_empty() && !snippet.is_empty() =>
            {
                results.push(BasicResult {
                    title,
                    url,
                    snippet,
                });
            }
            _ => continue,
        }
    }
    Ok(results)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
}
