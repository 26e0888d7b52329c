//! Browsing capability: the seam between the pipeline and whatever drives pages.
//!
//! A [`BrowsingEngine`] is acquired once per pipeline invocation and shared by
//! every concurrent task. Each task opens its own [`BrowsingSession`], which
//! is never shared, and closes it before returning. The pipeline is generic
//! over this pair, so the shipped [`HttpBrowser`] and deterministic test fakes
//! plug in the same way.

pub mod filter;
pub mod form;
pub mod http;

pub use filter::{RequestFilter, ResourceRequest, ResourceType};
pub use http::{HttpBrowser, HttpSession};

use scraper::Html;
use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// A loaded document inside a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle {
    url: String,
    html: String,
}

impl PageHandle {
    /// Wrap a document fetched from `url` (the final URL after redirects).
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// The URL the document was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The raw document markup.
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// A synchronous routine run against a parsed document.
///
/// The equivalent of an in-page script: it sees the DOM and returns plain data.
pub trait Extractor {
    type Output;

    fn extract(&self, document: &Html) -> Self::Output;
}

/// Shared browsing resource for one pipeline invocation.
///
/// All implementations must be `Send + Sync`: sessions are created from
/// many concurrent tasks through a shared reference.
pub trait BrowsingEngine: Send + Sync {
    type Session: BrowsingSession;

    /// Open an isolated session with `filter` installed before any navigation.
    fn new_session(
        &self,
        filter: RequestFilter,
    ) -> impl Future<Output = Result<Self::Session>> + Send;

    /// Release the engine. Called exactly once, after every session is closed.
    fn close(&self) -> impl Future<Output = Result<()>> + Send;
}

/// One isolated browsing context, owned by a single task.
pub trait BrowsingSession: Send + Sized {
    /// Navigate to `url`, waiting until the document is parsed or `timeout` elapses.
    fn open(
        &mut self,
        url: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<PageHandle>> + Send;

    /// Type `value` into the input matched by `input_selector` on `page`,
    /// submit its form and wait for the resulting document.
    fn submit(
        &mut self,
        page: &PageHandle,
        input_selector: &str,
        value: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<PageHandle>> + Send;

    /// Run `extractor` against the document loaded in `page`.
    fn extract<E: Extractor>(&self, page: &PageHandle, extractor: &E) -> E::Output {
        let document = Html::parse_document(page.html());
        extractor.extract(&document)
    }

    /// Close the session and everything it opened.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}
