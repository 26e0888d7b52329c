//! HTTP browsing driver with User-Agent rotation.
//!
//! [`HttpBrowser`] is the default [`BrowsingEngine`]: each session gets its own
//! [`reqwest::Client`] (and therefore its own cookie jar) with browser-like
//! headers. Documents are fetched without executing scripts or loading
//! subresources. A navigation whose URL names a blocked resource class is
//! aborted before it is sent; one whose response turns out to be blocked is
//! aborted before the body is read.

use rand::seq::SliceRandom;
use reqwest::header::CONTENT_TYPE;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::filter::{RequestFilter, ResourceRequest, ResourceType};
use super::form::{plan_submission, FormMethod};
use super::{BrowsingEngine, BrowsingSession, PageHandle};
use crate::config::PipelineConfig;
use crate::error::{Result, SearchError};

/// Realistic browser User-Agent strings, rotated per session.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:133.0) Gecko/20100101 Firefox/133.0",
];

const ACCEPT_DOCUMENT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Browsing engine backed by plain HTTP document fetches.
#[derive(Debug)]
pub struct HttpBrowser {
    user_agent: Option<String>,
    max_redirects: usize,
    closed: AtomicBool,
    sessions_opened: AtomicUsize,
}

impl HttpBrowser {
    /// Create an engine from the pipeline's User-Agent and redirect settings.
    pub fn launch(config: &PipelineConfig) -> Self {
        tracing::debug!(max_redirects = config.max_redirects, "HTTP browser launched");
        Self {
            user_agent: config.user_agent.clone(),
            max_redirects: config.max_redirects,
            closed: AtomicBool::new(false),
            sessions_opened: AtomicUsize::new(0),
        }
    }

    /// Number of sessions handed out so far.
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened.load(Ordering::SeqCst)
    }

    /// Whether [`BrowsingEngine::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl BrowsingEngine for HttpBrowser {
    type Session = HttpSession;

    async fn new_session(&self, filter: RequestFilter) -> Result<HttpSession> {
        if self.is_closed() {
            return Err(SearchError::Browser("browser already closed".into()));
        }
        let client = build_client(self.user_agent.as_deref(), self.max_redirects)?;
        self.sessions_opened.fetch_add(1, Ordering::SeqCst);
        Ok(HttpSession { client, filter })
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(SearchError::Browser("browser already closed".into()));
        }
        tracing::debug!(sessions = self.sessions_opened(), "HTTP browser closed");
        Ok(())
    }
}

/// One isolated HTTP browsing context.
#[derive(Debug)]
pub struct HttpSession {
    client: reqwest::Client,
    filter: RequestFilter,
}

impl HttpSession {
    /// Send `request` and load the response as a document within `timeout`.
    async fn load(
        &self,
        request: reqwest::RequestBuilder,
        target: &str,
        timeout: Duration,
    ) -> Result<PageHandle> {
        self.filter
            .check(&ResourceRequest::new(target, ResourceType::from_url(target)))?;

        let fetch = async {
            let response = request
                .header("Accept", ACCEPT_DOCUMENT)
                .header("Accept-Language", "en-US,en;q=0.9")
                .send()
                .await
                .map_err(|e| SearchError::Http(format!("request to {target} failed: {e}")))?
                .error_for_status()
                .map_err(|e| SearchError::Http(format!("{target}: {e}")))?;

            let final_url = response.url().to_string();
            if let Some(content_type) = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
            {
                let resource_type = ResourceType::from_content_type(content_type);
                self.filter
                    .check(&ResourceRequest::new(final_url.as_str(), resource_type))?;
            }

            let html = response
                .text()
                .await
                .map_err(|e| SearchError::Http(format!("reading {target} failed: {e}")))?;
            tracing::trace!(url = %final_url, bytes = html.len(), "document loaded");
            Ok::<_, SearchError>(PageHandle::new(final_url, html))
        };

        tokio::time::timeout(timeout, fetch).await.map_err(|_| {
            SearchError::Timeout(format!("{target} after {}s", timeout.as_secs_f64()))
        })?
    }
}

impl BrowsingSession for HttpSession {
    async fn open(&mut self, url: &str, timeout: Duration) -> Result<PageHandle> {
        let request = self.client.get(url);
        self.load(request, url, timeout).await
    }

    async fn submit(
        &mut self,
        page: &PageHandle,
        input_selector: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<PageHandle> {
        let submission = plan_submission(page.html(), page.url(), input_selector, value)?;
        match submission.method {
            FormMethod::Get => {
                let target = submission.get_url();
                let request = self.client.get(target.clone());
                self.load(request, target.as_str(), timeout).await
            }
            FormMethod::Post => {
                let request = self
                    .client
                    .post(submission.action.clone())
                    .form(&submission.fields);
                self.load(request, submission.action.as_str(), timeout).await
            }
        }
    }

    async fn close(self) -> Result<()> {
        // Dropping the client releases its connection pool and cookie jar.
        drop(self.client);
        Ok(())
    }
}

/// Build a [`reqwest::Client`] configured like a regular desktop browser.
///
/// The client has:
/// - Cookie store enabled (consent pages, search session cookies)
/// - Random User-Agent from built-in rotation list (or custom if configured)
/// - Redirects limited to `max_redirects`
///
/// Timeouts are applied per navigation, not per client.
///
/// # Errors
///
/// Returns [`SearchError::Browser`] if the client cannot be constructed.
pub fn build_client(user_agent: Option<&str>, max_redirects: usize) -> Result<reqwest::Client> {
    let ua = match user_agent {
        Some(ua) => ua.to_owned(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(max_redirects))
        .build()
        .map_err(|e| SearchError::Browser(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const array, choose only returns None on empty slices
        .unwrap_or(USER_AGENTS[0])
}
