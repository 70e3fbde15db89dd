//! Types for the relevance scorer

use serde::{Deserialize, Serialize};

use crate::domain::product::{Audience, Product, ProductId};
use crate::intent::Intent;

/// Caller-resolved constraints for one ranking call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankContext {
    /// Audience requested by the caller; falls back to the intent's hint when unset
    pub audience: Option<Audience>,
    /// Result cap, clamped into `[1, HARD_MAX_RESULTS]` by the scorer
    pub max_results: usize,
}

impl Default for RankContext {
    fn default() -> Self {
        Self { audience: None, max_results: super::DEFAULT_MAX_RESULTS }
    }
}

/// Input to [`super::ProductRanker::rank`]
#[derive(Debug, Clone, Copy)]
pub struct RankRequest<'a> {
    pub products: &'a [Product],
    pub intent: &'a Intent,
    pub context: RankContext,
}

impl<'a> RankRequest<'a> {
    pub fn new(products: &'a [Product], intent: &'a Intent) -> Self {
        Self { products, intent, context: RankContext::default() }
    }

    pub fn with_context(mut self, context: RankContext) -> Self {
        self.context = context;
        self
    }
}

/// How a product earned its score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub matched_occasion: Vec<String>,
    pub matched_vibe: Vec<String>,
    pub occasion_points: u32,
    pub vibe_points: u32,
    pub audience_points: u32,
    /// Stock eligibility at scoring time
    pub in_stock: bool,
}

impl ScoreBreakdown {
    pub fn semantic_points(&self) -> u32 {
        self.occasion_points.saturating_add(self.vibe_points)
    }
}

/// A ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEntry {
    pub product_id: ProductId,
    pub score: u32,
    #[serde(default)]
    pub price: Option<f64>,
    pub breakdown: ScoreBreakdown,
}

/// Diagnostic trace of one ranking call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringDebug {
    /// No occasion or vibe overlap with the intent
    pub excluded_no_semantic_match: Vec<ProductId>,
    /// Semantically matched but explicitly out of stock
    pub excluded_out_of_stock: Vec<ProductId>,
    /// Same products as `excluded_out_of_stock`; drives the no-stock mode
    pub out_of_stock_matched: Vec<ProductId>,
    pub zero_score: Vec<ProductId>,
    /// Catalog entries ignored for lacking an id
    pub skipped_without_id: usize,
    pub tie_break_applied: bool,
}

/// Single signal summarizing what a ranking call found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankOutcome {
    /// At least one in-stock product ranked
    Ranked,
    /// Nothing ranked, but some product matched and is out of stock
    OutOfStockOnly,
    /// Nothing matched at all
    NoMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    /// Highest score first, tie-broken
    pub ranked: Vec<ScoredEntry>,
    /// Prefix of `ranked`, bounded by the result cap
    pub top3: Vec<ScoredEntry>,
    pub debug: ScoringDebug,
}

impl ScoringResult {
    pub fn outcome(&self) -> RankOutcome {
        if !self.top3.is_empty() {
            RankOutcome::Ranked
        } else if !self.debug.out_of_stock_matched.is_empty() {
            RankOutcome::OutOfStockOnly
        } else {
            RankOutcome::NoMatch
        }
    }
}
