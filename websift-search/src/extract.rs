//! Page analysis: metadata, readable content and layout signals from one document.
//!
//! Every query is permissive. Missing elements produce `None` or empty lists,
//! never an error, so a parsed document always yields a [`PageAnalysis`].

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::browser::Extractor;
use crate::types::{PageAnalysis, PageContent, PageMetadata, PageStructure};

/// Candidate main-content containers; the first one in document order wins.
const MAIN_CONTENT_SELECTOR: &str = "main, article, .content, #content";

/// Elements whose text never counts as readable content.
const NON_TEXT_TAGS: [&str; 3] = ["script", "style", "noscript"];

/// Extractor deriving a [`PageAnalysis`] from a crawled document.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAnalyzer;

impl Extractor for PageAnalyzer {
    type Output = PageAnalysis;

    fn extract(&self, document: &Html) -> PageAnalysis {
        analyze_document(document)
    }
}

/// Run all three analyses over `document`.
pub fn analyze_document(document: &Html) -> PageAnalysis {
    PageAnalysis {
        metadata: extract_metadata(document),
        content: extract_page_content(document),
        page_structure: analyze_structure(document),
    }
}

/// Read author, publish date, keywords and description from `<meta>` tags.
pub fn extract_metadata(document: &Html) -> PageMetadata {
    let keywords = meta_content(document, r#"meta[name="keywords"]"#).and_then(|raw| {
        let list: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_owned)
            .collect();
        (!list.is_empty()).then_some(list)
    });

    PageMetadata {
        author: meta_content(document, r#"meta[name="author"]"#),
        date_published: meta_content(document, r#"meta[property="article:published_time"]"#),
        keywords,
        description: meta_content(document, r#"meta[name="description"]"#),
    }
}

/// Main text, code snippets, headings and lists.
pub fn extract_page_content(document: &Html) -> PageContent {
    PageContent {
        main_text: extract_main_text(document),
        code_snippets: texts_of(document, "pre, code"),
        headings: texts_of(document, "h1, h2, h3"),
        lists: texts_of(document, "ul, ol"),
    }
}

/// Detect navigation, footer and sidebar regions and label each `<section>`.
pub fn analyze_structure(document: &Html) -> PageStructure {
    let sections = match Selector::parse("section") {
        Ok(selector) => document
            .select(&selector)
            .map(|el| {
                let attr = |name: &str| el.value().attr(name).filter(|v| !v.is_empty());
                attr("class")
                    .or_else(|| attr("id"))
                    .unwrap_or("unnamed-section")
                    .to_owned()
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    PageStructure {
        has_navigation: exists(document, "nav, header"),
        has_footer: exists(document, "footer"),
        has_sidebar: exists(document, "aside, .sidebar, #sidebar"),
        sections,
    }
}

/// Text of the main content container, falling back to `<body>`.
fn extract_main_text(document: &Html) -> String {
    for selector_str in [MAIN_CONTENT_SELECTOR, "body"] {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = text_content(element);
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return trimmed.to_owned();
            }
        }
    }
    String::new()
}

/// Trimmed, non-empty text of every element matching `selector_str`.
fn texts_of(document: &Html, selector_str: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector_str) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| text_content(el).trim().to_owned())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Concatenated descendant text, skipping script and style bodies.
fn text_content(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };
        let inside_non_text = node
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|parent| NON_TEXT_TAGS.contains(&parent.value().name()));
        if !inside_non_text {
            text.push_str(chunk);
        }
    }
    text
}

/// Trimmed `content` attribute of the first element matching `selector_str`.
fn meta_content(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_owned)
}

fn exists(document: &Html, selector_str: &str) -> bool {
    Selector::parse(selector_str)
        .map(|selector| document.select(&selector).next().is_some())
        .unwrap_or(false)
}
