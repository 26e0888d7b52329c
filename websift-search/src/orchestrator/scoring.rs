//! Position scoring for search candidates.
//!
//! Formula: `score = 1.0 - position * 0.1`, where `position` is the 0-based
//! index within the originating query variant's result list. Scores are not
//! clamped and go negative past the tenth position. Each variant is scored
//! independently, so a late candidate of an early variant can outrank the
//! top candidate of a later one.

/// Score decrement per result position.
const POSITION_STEP: f64 = 0.1;

/// Relevance score for the candidate at `position` (0-based).
pub fn position_score(position: usize) -> f64 {
    1.0 - position as f64 * POSITION_STEP
}
