//! Point arithmetic and ordering for ranked products

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::domain::product::{Audience, Product};
use crate::intent::Intent;

use super::types::{ScoreBreakdown, ScoredEntry};

/// Points awarded per matched tag, and for an audience match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Per matched occasion tag (default: 3)
    pub occasion: u32,
    /// Per matched vibe tag (default: 2)
    pub vibe: u32,
    /// Flat bonus when the product's audience equals the desired one (default: 1)
    pub audience: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
}

impl ScoreCalculator {
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default() }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// Semantic and audience points for one product. Stock is recorded, not applied.
    pub fn breakdown(
        &self,
        intent: &Intent,
        product: &Product,
        desired_audience: Option<Audience>,
    ) -> ScoreBreakdown {
        let matched_occasion = intersect(&intent.occasion, &product.tags.occasion);
        let matched_vibe = intersect(&intent.vibe, &product.tags.vibe);

        let occasion_points = points(matched_occasion.len(), self.weights.occasion);
        let vibe_points = points(matched_vibe.len(), self.weights.vibe);
        let audience_points = match desired_audience {
            Some(audience) if product.audience == audience => self.weights.audience,
            _ => 0,
        };

        ScoreBreakdown {
            matched_occasion,
            matched_vibe,
            occasion_points,
            vibe_points,
            audience_points,
            in_stock: product.in_stock,
        }
    }

    pub fn total(&self, breakdown: &ScoreBreakdown) -> u32 {
        breakdown.semantic_points().saturating_add(breakdown.audience_points)
    }
}

/// Scores saturate at `u32::MAX` instead of wrapping.
fn points(matches: usize, weight: u32) -> u32 {
    u32::try_from(matches).unwrap_or(u32::MAX).saturating_mul(weight)
}

fn intersect(wanted: &BTreeSet<String>, offered: &[String]) -> Vec<String> {
    let offered =
        offered.iter().map(|tag| tag.trim().to_ascii_lowercase()).collect::<BTreeSet<_>>();
    wanted.iter().filter(|tag| offered.contains(tag.as_str())).cloned().collect()
}

/// Score descending, then price ascending, then id ascending.
///
/// On a score tie, a priced entry sorts ahead of one without a comparable
/// price so the ordering stays total.
pub fn rank_order(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| match (a.price, b.price) {
            (Some(left), Some(right)) => left.total_cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.product_id.cmp(&b.product_id))
}
