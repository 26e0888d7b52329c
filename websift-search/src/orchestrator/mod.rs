//! Search orchestrator: concurrent searches and crawls, dedup, scoring, ranking.
//!
//! This module fans query variants out to the search engine concurrently,
//! crawls every candidate concurrently, scores candidates by position,
//! deduplicates by URL and renders the final report.

pub mod aggregate;
pub mod dedup;
pub mod pipeline;
pub mod scoring;

pub use aggregate::{aggregate, SearchReport};
pub use pipeline::SearchPipeline;
