//! Integration tests for the search pipeline.
//!
//! The pipeline runs against an in-memory browsing engine that serves canned
//! result lists and pages and counts every session and engine close. No
//! network calls are made. A live end-to-end test is marked `#[ignore]`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use websift_search::browser::{BrowsingEngine, BrowsingSession, PageHandle, RequestFilter};
use websift_search::{BasicResult, PipelineConfig, ResourceType, SearchError, SearchPipeline};

const ENGINE_URL: &str = "https://engine.test/";

const LANDING: &str = r#"<html><body><form action="/search"><input name="q"></form></body></html>"#;

#[derive(Default)]
struct Counters {
    sessions_opened: AtomicUsize,
    sessions_closed: AtomicUsize,
    engine_closes: AtomicUsize,
    searches_in_flight: AtomicUsize,
    max_searches_in_flight: AtomicUsize,
    searches: Mutex<Vec<String>>,
    filters: Mutex<Vec<Vec<ResourceType>>>,
}

impl Counters {
    fn searches(&self) -> Vec<String> {
        self.searches.lock().expect("lock").clone()
    }
}

/// Canned web: result lists per query, page bodies per URL.
#[derive(Default)]
struct FakeWeb {
    results: HashMap<String, Vec<BasicResult>>,
    failing_queries: Vec<String>,
    pages: HashMap<String, String>,
}

struct FakeBrowser {
    web: Arc<FakeWeb>,
    counters: Arc<Counters>,
    fail_close: bool,
}

impl FakeBrowser {
    fn new(web: FakeWeb) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let browser = Self {
            web: Arc::new(web),
            counters: Arc::clone(&counters),
            fail_close: false,
        };
        (browser, counters)
    }
}

impl BrowsingEngine for FakeBrowser {
    type Session = FakeSession;

    async fn new_session(&self, filter: RequestFilter) -> websift_search::Result<FakeSession> {
        self.counters.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.counters
            .filters
            .lock()
            .expect("lock")
            .push(filter.blocked().to_vec());
        Ok(FakeSession {
            web: Arc::clone(&self.web),
            counters: Arc::clone(&self.counters),
        })
    }

    async fn close(&self) -> websift_search::Result<()> {
        self.counters.engine_closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(SearchError::Browser("engine crashed on shutdown".into()));
        }
        Ok(())
    }
}

struct FakeSession {
    web: Arc<FakeWeb>,
    counters: Arc<Counters>,
}

impl BrowsingSession for FakeSession {
    async fn open(&mut self, url: &str, timeout: Duration) -> websift_search::Result<PageHandle> {
        if url == ENGINE_URL {
            return Ok(PageHandle::new(url, LANDING));
        }
        match self.web.pages.get(url) {
            Some(html) => Ok(PageHandle::new(url, html.as_str())),
            None => Err(SearchError::Timeout(format!(
                "{url} after {}s",
                timeout.as_secs()
            ))),
        }
    }

    async fn submit(
        &mut self,
        _page: &PageHandle,
        _input_selector: &str,
        value: &str,
        _timeout: Duration,
    ) -> websift_search::Result<PageHandle> {
        self.counters
            .searches
            .lock()
            .expect("lock")
            .push(value.to_string());

        let in_flight = self.counters.searches_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters
            .max_searches_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.counters.searches_in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.web.failing_queries.iter().any(|q| q == value) {
            return Err(SearchError::Http(format!("engine unavailable for {value}")));
        }
        let results = self.web.results.get(value).cloned().unwrap_or_default();
        Ok(PageHandle::new(
            format!("{ENGINE_URL}search"),
            results_page(&results),
        ))
    }

    async fn close(self) -> websift_search::Result<()> {
        self.counters.sessions_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn results_page(results: &[BasicResult]) -> String {
    let items: String = results
        .iter()
        .map(|r| {
            format!(
                r#"<li class="b_algo"><h2><a href="{}">{}</a></h2><div class="b_caption"><p>{}</p></div></li>"#,
                r.url, r.title, r.snippet
            )
        })
        .collect();
    format!(r#"<html><body><ol id="b_results">{items}</ol></body></html>"#)
}

fn make_basic(url: &str, title: &str) -> BasicResult {
    BasicResult {
        title: title.to_string(),
        url: url.to_string(),
        snippet: format!("About {title}"),
    }
}

fn article(description: &str) -> String {
    format!(
        r#"<html><head><meta name="description" content="{description}"></head>
        <body><nav>menu</nav><main><h1>{description}</h1><pre>let x = 1;</pre></main></body></html>"#
    )
}

fn config() -> PipelineConfig {
    PipelineConfig {
        search_url: ENGINE_URL.into(),
        ..Default::default()
    }
}

/// Serve every result with a page so nothing degrades.
fn web_with_pages(results: HashMap<String, Vec<BasicResult>>) -> FakeWeb {
    let pages = results
        .values()
        .flatten()
        .map(|r| (r.url.clone(), article(&r.title)))
        .collect();
    FakeWeb {
        results,
        pages,
        ..Default::default()
    }
}

// ── Scenarios ────────────────────────────────────────────────────────────

#[tokio::test]
async fn plain_query_issues_single_search() {
    let web = web_with_pages(HashMap::from([(
        "weather forecast".to_string(),
        vec![
            make_basic("https://weather.example/today", "Forecast Today"),
            make_basic("https://weather.example/week", "Weekly Outlook"),
        ],
    )]));
    let (browser, counters) = FakeBrowser::new(web);

    let report = SearchPipeline::new(browser, config())
        .run("weather forecast")
        .await
        .expect("pipeline should succeed");

    assert_eq!(counters.searches(), vec!["weather forecast"]);
    assert_eq!(report.results.len(), 2);
    assert!(report
        .render()
        .starts_with("Search Results for \"weather forecast\":\n\n1. Forecast Today\n"));
    // One search session plus one crawl session per candidate.
    assert_eq!(counters.sessions_opened.load(Ordering::SeqCst), 3);
    assert_eq!(counters.sessions_closed.load(Ordering::SeqCst), 3);
    assert_eq!(counters.engine_closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn recency_query_searches_three_variants_concurrently() {
    let (browser, counters) = FakeBrowser::new(FakeWeb::default());

    let report = SearchPipeline::new(browser, config())
        .run("latest AI news")
        .await
        .expect("pipeline should succeed");

    let mut searches = counters.searches();
    searches.sort();
    assert_eq!(
        searches,
        vec![
            "latest AI news",
            "latest AI news last 24 hours",
            "latest AI news today",
        ]
    );
    assert_eq!(counters.max_searches_in_flight.load(Ordering::SeqCst), 3);
    assert!(report.results.is_empty());
    assert_eq!(counters.engine_closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn duplicate_url_across_variants_kept_once_with_first_score() {
    let web = web_with_pages(HashMap::from([
        (
            "new releases".to_string(),
            vec![
                make_basic("https://first.example", "First"),
                make_basic("http://example.com/a", "Shared from base"),
            ],
        ),
        (
            "new releases last 24 hours".to_string(),
            vec![make_basic("http://example.com/a", "Shared from recent")],
        ),
    ]));
    let (browser, _counters) = FakeBrowser::new(web);

    let report = SearchPipeline::new(browser, config())
        .run("new releases")
        .await
        .expect("pipeline should succeed");

    let shared: Vec<_> = report
        .results
        .iter()
        .filter(|r| r.url == "http://example.com/a")
        .collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].title, "Shared from base");
    assert!((shared[0].relevance_score - 0.9).abs() < 1e-9);
    assert_eq!(report.render().matches("URL: http://example.com/a").count(), 1);
}

#[tokio::test]
async fn eight_results_truncated_to_top_five() {
    let candidates: Vec<BasicResult> = (0..8)
        .map(|i| make_basic(&format!("https://site{i}.example"), &format!("Site {i}")))
        .collect();
    let web = web_with_pages(HashMap::from([("rust crates".to_string(), candidates)]));
    let (browser, counters) = FakeBrowser::new(web);

    let report = SearchPipeline::new(browser, config())
        .run("rust crates")
        .await
        .expect("pipeline should succeed");

    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://site0.example",
            "https://site1.example",
            "https://site2.example",
            "https://site3.example",
            "https://site4.example",
        ]
    );
    // All eight pages are crawled even though only five are kept.
    assert_eq!(counters.sessions_opened.load(Ordering::SeqCst), 9);
}

#[tokio::test]
async fn dead_page_is_reported_without_enrichment() {
    let mut web = web_with_pages(HashMap::from([(
        "rust tutorial".to_string(),
        vec![
            make_basic("https://alive.example", "Alive"),
            make_basic("http://dead.example", "Dead"),
        ],
    )]));
    web.pages.remove("http://dead.example");
    let (browser, counters) = FakeBrowser::new(web);

    let report = SearchPipeline::new(browser, config())
        .run("rust tutorial")
        .await
        .expect("a dead page must not fail the search");

    let dead = report
        .results
        .iter()
        .find(|r| r.url == "http://dead.example")
        .expect("dead page still listed");
    assert_eq!(dead.title, "Dead");
    assert_eq!(dead.snippet, "About Dead");
    assert!((dead.relevance_score - 0.9).abs() < 1e-9);
    assert!(dead.content.main_text.is_empty());
    assert!(dead.content.code_snippets.is_empty());
    assert!(!dead.page_structure.has_navigation);

    let text = report.render();
    let dead_block = text
        .split("\n\n")
        .find(|block| block.contains("URL: http://dead.example"))
        .expect("dead block rendered");
    assert!(!dead_block.contains("Description:"));
    assert!(!dead_block.contains("Code Examples:"));
    assert!(!dead_block.contains("Main Topics:"));

    let alive_block = text
        .split("\n\n")
        .find(|block| block.contains("URL: https://alive.example"))
        .expect("alive block rendered");
    assert!(alive_block.contains("Description: Alive"));
    assert!(alive_block.contains("Code Examples: 1 found"));
    assert!(alive_block.contains("Main Topics: Alive"));

    assert_eq!(
        counters.sessions_opened.load(Ordering::SeqCst),
        counters.sessions_closed.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn empty_query_opens_no_sessions() {
    let (browser, counters) = FakeBrowser::new(FakeWeb::default());

    let err = SearchPipeline::new(browser, config())
        .run("")
        .await
        .unwrap_err();

    assert!(matches!(err, SearchError::MissingParameter(ref p) if p == "query"));
    assert_eq!(counters.sessions_opened.load(Ordering::SeqCst), 0);
    assert!(counters.searches().is_empty());
    assert_eq!(counters.engine_closes.load(Ordering::SeqCst), 1);
}

// ── Failure and lifecycle properties ─────────────────────────────────────

#[tokio::test]
async fn failed_variant_fails_whole_invocation() {
    let mut web = web_with_pages(HashMap::from([
        (
            "recent papers".to_string(),
            vec![make_basic("https://papers.example", "Papers")],
        ),
        (
            "recent papers today".to_string(),
            vec![make_basic("https://today.example", "Today")],
        ),
    ]));
    web.failing_queries = vec!["recent papers last 24 hours".to_string()];
    let (browser, counters) = FakeBrowser::new(web);

    let err = SearchPipeline::new(browser, config())
        .run("recent papers")
        .await
        .unwrap_err();

    match err {
        SearchError::SearchEngine { query, source } => {
            assert_eq!(query, "recent papers last 24 hours");
            assert!(matches!(*source, SearchError::Http(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Every variant ran; no page was crawled.
    assert_eq!(counters.searches().len(), 3);
    assert_eq!(counters.sessions_opened.load(Ordering::SeqCst), 3);
    assert_eq!(counters.sessions_closed.load(Ordering::SeqCst), 3);
    assert_eq!(counters.engine_closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn engine_close_failure_does_not_mask_result() {
    let web = web_with_pages(HashMap::from([(
        "tokio".to_string(),
        vec![make_basic("https://tokio.rs", "Tokio")],
    )]));
    let (mut browser, counters) = FakeBrowser::new(web);
    browser.fail_close = true;

    let report = SearchPipeline::new(browser, config())
        .run("tokio")
        .await
        .expect("close failure is only logged");
    assert_eq!(report.results.len(), 1);
    assert_eq!(counters.engine_closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_config_rejected_before_browsing() {
    let (browser, counters) = FakeBrowser::new(FakeWeb::default());
    let config = PipelineConfig {
        max_results: 0,
        ..config()
    };

    let err = SearchPipeline::new(browser, config)
        .run("anything")
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Config(_)));
    assert_eq!(counters.sessions_opened.load(Ordering::SeqCst), 0);
    assert_eq!(counters.engine_closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn every_session_gets_the_resource_filter() {
    let web = web_with_pages(HashMap::from([(
        "docs".to_string(),
        vec![make_basic("https://docs.example", "Docs")],
    )]));
    let (browser, counters) = FakeBrowser::new(web);

    SearchPipeline::new(browser, config())
        .run("docs")
        .await
        .expect("pipeline should succeed");

    let filters = counters.filters.lock().expect("lock").clone();
    assert_eq!(filters.len(), 2);
    for blocked in filters {
        for kind in [
            ResourceType::Image,
            ResourceType::Stylesheet,
            ResourceType::Font,
            ResourceType::Media,
        ] {
            assert!(blocked.contains(&kind));
        }
        assert!(!blocked.contains(&ResourceType::Document));
    }
}

#[tokio::test]
async fn later_variant_top_result_can_outrank_earlier_tail() {
    let web = web_with_pages(HashMap::from([
        (
            "new tools".to_string(),
            vec![
                make_basic("https://a.example", "A"),
                make_basic("https://b.example", "B"),
            ],
        ),
        (
            "new tools today".to_string(),
            vec![make_basic("https://c.example", "C")],
        ),
    ]));
    let (browser, _counters) = FakeBrowser::new(web);

    let report = SearchPipeline::new(browser, config())
        .run("new tools")
        .await
        .expect("pipeline should succeed");

    let urls: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://a.example", "https://c.example", "https://b.example"]
    );
    for pair in report.results.windows(2) {
        assert!(pair[0].relevance_score >= pair[1].relevance_score);
    }
}

#[tokio::test]
#[ignore] // Live test: run with `cargo test -- --ignored`
async fn live_search_produces_report() {
    let report = websift_search::search("rust programming language", &PipelineConfig::default())
        .await
        .expect("live search should work");
    assert!(!report.results.is_empty());
    assert!(report.results.len() <= 5);
}
