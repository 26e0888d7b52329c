//! Result aggregation and report rendering.
//!
//! Per-variant result lists are flattened in variant order, deduplicated by
//! URL, stable-sorted by descending relevance and truncated. The surviving
//! results render into the plain-text report handed back to the host.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::types::EnrichedResult;

use super::dedup::deduplicate;

/// Headings listed under "Main Topics".
const MAX_TOPICS: usize = 3;

/// Combine per-variant results into the final ranked list.
///
/// Ties in `relevance_score` keep their flattened order (variant order, then
/// position within the variant).
pub fn aggregate(per_variant: Vec<Vec<EnrichedResult>>, max_results: usize) -> Vec<EnrichedResult> {
    let flattened: Vec<EnrichedResult> = per_variant.into_iter().flatten().collect();
    let mut results = deduplicate(flattened);

    // `sort_by` is stable.
    results.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    results.truncate(max_results);
    results
}

/// Ranked results for one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    /// The query as the user typed it, before variant expansion.
    pub query: String,
    pub results: Vec<EnrichedResult>,
}

impl SearchReport {
    pub fn new(query: impl Into<String>, results: Vec<EnrichedResult>) -> Self {
        Self {
            query: query.into(),
            results,
        }
    }

    /// Render the numbered plain-text report.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Search Results for \"{}\":\n\n", self.query)?;
        for (index, result) in self.results.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write_block(f, index + 1, result)?;
        }
        Ok(())
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, number: usize, result: &EnrichedResult) -> fmt::Result {
    write!(
        f,
        "{number}. {}\n   URL: {}\n   {}",
        result.title, result.url, result.snippet
    )?;

    if let Some(description) = result
        .metadata
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
    {
        write!(f, "\n   Description: {description}")?;
    }

    let code_count = result.content.code_snippets.len();
    if code_count > 0 {
        write!(f, "\n   Code Examples: {code_count} found")?;
    }

    if !result.content.headings.is_empty() {
        let topics: Vec<&str> = result
            .content
            .headings
            .iter()
            .take(MAX_TOPICS)
            .map(String::as_str)
            .collect();
        write!(f, "\n   Main Topics: {}", topics.join(", "))?;
    }

    f.write_str("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PageContent, PageMetadata};

    fn make_result(url: &str, score: f64) -> EnrichedResult {
        EnrichedResult {
            title: format!("Title {url}"),
            url: url.to_string(),
            snippet: format!("Snippet {url}"),
            relevance_score: score,
            metadata: PageMetadata::default(),
            content: PageContent::default(),
            page_structure: Default::default(),
        }
    }

    #[test]
    fn keeps_top_five_by_score() {
        let variant: Vec<EnrichedResult> = (0..8)
            .map(|i| make_result(&format!("https://site{i}.com"), [0.3, 0.9, 0.1, 1.0, 0.5, 0.8, 0.2, 0.7][i]))
            .collect();
        let ranked = aggregate(vec![variant], 5);
        let scores: Vec<f64> = ranked.iter().map(|r| r.relevance_score).collect();
        assert_eq!(scores, vec![1.0, 0.9, 0.8, 0.7, 0.5]);
    }

    #[test]
    fn fewer_than_limit_returns_all_distinct() {
        let ranked = aggregate(
            vec![
                vec![make_result("https://a.com", 1.0), make_result("https://b.com", 0.9)],
                vec![make_result("https://a.com", 1.0)],
            ],
            5,
        );
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn duplicate_keeps_first_variant_score() {
        let ranked = aggregate(
            vec![
                vec![
                    make_result("https://first.com", 1.0),
                    make_result("http://example.com/a", 0.9),
                ],
                vec![make_result("http://example.com/a", 1.0)],
            ],
            5,
        );
        let hits: Vec<&EnrichedResult> = ranked
            .iter()
            .filter(|r| r.url == "http://example.com/a")
            .collect();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].relevance_score - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn ties_keep_flattened_order() {
        let ranked = aggregate(
            vec![
                vec![make_result("https://v1-a.com", 1.0), make_result("https://v1-b.com", 0.9)],
                vec![make_result("https://v2-a.com", 1.0), make_result("https://v2-b.com", 0.9)],
            ],
            5,
        );
        let urls: Vec<&str> = ranked.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://v1-a.com",
                "https://v2-a.com",
                "https://v1-b.com",
                "https://v2-b.com",
            ]
        );
    }

    #[test]
    fn negative_scores_rank_last() {
        let variant: Vec<EnrichedResult> = (0..12)
            .map(|i| make_result(&format!("https://r{i}.com"), 1.0 - i as f64 * 0.1))
            .collect();
        let ranked = aggregate(vec![vec![make_result("https://late.com", -0.1)], variant], 20);
        assert_eq!(ranked.last().map(|r| r.url.as_str()), Some("https://r11.com"));
    }

    #[test]
    fn render_minimal_block() {
        let report = SearchReport::new("weather forecast", vec![make_result("https://a.com", 1.0)]);
        assert_eq!(
            report.render(),
            "Search Results for \"weather forecast\":\n\n\
             1. Title https://a.com\n   URL: https://a.com\n   Snippet https://a.com\n"
        );
    }

    #[test]
    fn render_optional_lines() {
        let mut result = make_result("https://a.com", 1.0);
        result.metadata.description = Some("About A".into());
        result.content.code_snippets = vec!["x".into(), "y".into()];
        result.content.headings = vec!["One".into(), "Two".into(), "Three".into(), "Four".into()];

        let report = SearchReport::new("q", vec![result]);
        let text = report.render();
        assert!(text.contains("\n   Description: About A"));
        assert!(text.contains("\n   Code Examples: 2 found"));
        assert!(text.contains("\n   Main Topics: One, Two, Three\n"));
        assert!(!text.contains("Four"));
    }

    #[test]
    fn render_blocks_separated_by_blank_line() {
        let report = SearchReport::new(
            "q",
            vec![make_result("https://a.com", 1.0), make_result("https://b.com", 0.9)],
        );
        let text = report.render();
        assert!(text.contains("Snippet https://a.com\n\n2. Title https://b.com"));
        assert!(text.ends_with("Snippet https://b.com\n"));
    }

    #[test]
    fn render_empty_report() {
        let report = SearchReport::new("nothing", vec![]);
        assert_eq!(report.render(), "Search Results for \"nothing\":\n\n");
    }

    #[test]
    fn degraded_result_has_no_optional_lines() {
        let report = SearchReport::new("q", vec![make_result("http://dead.example", 1.0)]);
        let text = report.render();
        assert!(text.contains("URL: http://dead.example"));
        assert!(!text.contains("Description:"));
        assert!(!text.contains("Code Examples:"));
        assert!(!text.contains("Main Topics:"));
    }
}
