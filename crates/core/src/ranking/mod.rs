//! Inventory-aware relevance scoring
//!
//! Ranks catalog products against an extracted intent. A product must share
//! at least one occasion or vibe tag with the intent before audience or stock
//! are considered.

mod engine;
mod scoring;
mod types;

pub use engine::RelevanceScorer;
pub use scoring::{rank_order, ScoreCalculator, ScoringWeights};
pub use types::*;

/// Default point weights
pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights { occasion: 3, vibe: 2, audience: 1 };

/// Hard ceiling on returned results
pub const HARD_MAX_RESULTS: usize = 2;

/// Result cap used when the caller requests none
pub const DEFAULT_MAX_RESULTS: usize = 2;

pub trait ProductRanker: Send + Sync {
    fn rank(&self, request: &RankRequest<'_>) -> ScoringResult;
}

/// Resolves a caller-requested cap into `[1, HARD_MAX_RESULTS]`.
pub fn clamp_max_results(requested: Option<i64>, default: usize) -> usize {
    match requested {
        Some(value) => value.clamp(1, HARD_MAX_RESULTS as i64) as usize,
        None => default.clamp(1, HARD_MAX_RESULTS),
    }
}
