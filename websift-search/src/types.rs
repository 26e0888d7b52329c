//! Core types for search candidates, crawled pages and ranked results.

use serde::{Deserialize, Serialize};

/// A raw result scraped from the search engine results page.
///
/// Entries missing a title, link or snippet never leave the search client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result page.
    pub url: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
}

/// Page metadata read from `<meta>` tags. Absent tags stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// `meta[name=author]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// `meta[property="article:published_time"]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<String>,
    /// `meta[name=keywords]`, split on commas.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// `meta[name=description]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PageMetadata {
    /// True when no metadata field was found.
    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.date_published.is_none()
            && self.keywords.is_none()
            && self.description.is_none()
    }
}

/// Readable content pulled from a crawled page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    /// Text of the main content area, or the body when none is marked up.
    pub main_text: String,
    /// Text of every `pre` and `code` element.
    pub code_snippets: Vec<String>,
    /// Text of every `h1`–`h3` heading, in document order.
    pub headings: Vec<String>,
    /// Text of every `ul` and `ol` list.
    pub lists: Vec<String>,
}

/// Coarse layout signals of a crawled page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStructure {
    pub has_navigation: bool,
    pub has_footer: bool,
    pub has_sidebar: bool,
    /// One label per `section` element: its class, else its id, else `unnamed-section`.
    pub sections: Vec<String>,
}

/// Everything the in-page extraction routine derives from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub metadata: PageMetadata,
    pub content: PageContent,
    pub page_structure: PageStructure,
}

/// Result of crawling one candidate page.
///
/// A crawl never fails outright: an unreachable or malformed page yields
/// [`CrawlOutcome::Degraded`] and the caller still gets a result for the URL.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlOutcome {
    /// Navigation and extraction succeeded.
    Extracted(PageAnalysis),
    /// Navigation or extraction failed; fields fall back to their defaults.
    Degraded {
        /// Human-readable cause, for logs only.
        reason: String,
    },
}

impl CrawlOutcome {
    /// True for [`CrawlOutcome::Degraded`].
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// The extracted analysis, or all-default fields for a degraded crawl.
    pub fn into_analysis(self) -> PageAnalysis {
        match self {
            Self::Extracted(analysis) => analysis,
            Self::Degraded { .. } => PageAnalysis::default(),
        }
    }
}

/// A search result enriched with the crawled page's analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Position score within the originating query variant (higher is better).
    /// Can go negative past the tenth position.
    pub relevance_score: f64,
    pub metadata: PageMetadata,
    pub content: PageContent,
    pub page_structure: PageStructure,
}

impl EnrichedResult {
    /// Combine a search candidate, its scored position and the crawl outcome.
    pub fn from_outcome(basic: BasicResult, relevance_score: f64, outcome: CrawlOutcome) -> Self {
        let PageAnalysis {
            metadata,
            content,
            page_structure,
        } = outcome.into_analysis();
        Self {
            title: basic.title,
            url: basic.url,
            snippet: basic.snippet,
            relevance_score,
            metadata,
            content,
            page_structure,
        }
    }
}
