//! Relevance scorer implementation

use super::scoring::{rank_order, ScoreCalculator, ScoringWeights};
use super::types::*;
use super::{ProductRanker, HARD_MAX_RESULTS};

/// Ranks a catalog snapshot against an intent. Pure and synchronous.
#[derive(Debug, Clone, Default)]
pub struct RelevanceScorer {
    calculator: ScoreCalculator,
}

impl RelevanceScorer {
    pub fn new() -> Self {
        Self { calculator: ScoreCalculator::new() }
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { calculator: ScoreCalculator::with_weights(weights) }
    }

    pub fn rank_products(&self, request: &RankRequest<'_>) -> ScoringResult {
        let intent = request.intent;
        if intent.missing_intent {
            return ScoringResult::default();
        }

        let desired_audience = request
            .context
            .audience
            .and_then(|audience| audience.known())
            .or(intent.audience_hint.known());

        let mut trace = ScoringDebug::default();
        let mut candidates = Vec::new();

        for product in request.products {
            if product.id.is_blank() {
                trace.skipped_without_id += 1;
                continue;
            }

            let breakdown = self.calculator.breakdown(intent, product, desired_audience);
            if breakdown.semantic_points() == 0 {
                trace.excluded_no_semantic_match.push(product.id.clone());
                continue;
            }

            let score = self.calculator.total(&breakdown);

            if !product.in_stock {
                trace.excluded_out_of_stock.push(product.id.clone());
                trace.out_of_stock_matched.push(product.id.clone());
                continue;
            }

            if score == 0 {
                trace.zero_score.push(product.id.clone());
                continue;
            }

            candidates.push(ScoredEntry {
                product_id: product.id.clone(),
                score,
                price: product.price,
                breakdown,
            });
        }

        candidates.sort_by(rank_order);
        trace.tie_break_applied = candidates.windows(2).any(|pair| pair[0].score == pair[1].score);

        let max_results = request.context.max_results.clamp(1, HARD_MAX_RESULTS);
        let top3 = candidates.iter().take(max_results).cloned().collect::<Vec<_>>();

        tracing::debug!(
            event_name = "concierge.ranking.completed",
            candidates = candidates.len(),
            returned = top3.len(),
            out_of_stock_matched = trace.out_of_stock_matched.len(),
            no_semantic_match = trace.excluded_no_semantic_match.len(),
            tie_break_applied = trace.tie_break_applied,
            "ranked catalog snapshot"
        );

        ScoringResult { ranked: candidates, top3, debug: trace }
    }
}

impl ProductRanker for RelevanceScorer {
    fn rank(&self, request: &RankRequest<'_>) -> ScoringResult {
        self.rank_products(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{Audience, Product, ProductId};
    use crate::intent::{IntentExtractor, ParseOptions};

    fn intent(text: &str) -> crate::intent::Intent {
        IntentExtractor::new().extract(text, &ParseOptions::default()).expect("parse")
    }

    fn ids(entries: &[ScoredEntry]) -> Vec<&str> {
        entries.iter().map(|entry| entry.product_id.as_str()).collect()
    }

    #[test]
    fn missing_intent_short_circuits() {
        let products = vec![Product::new("p1").with_occasions(&["business"])];
        let intent = intent("hello");
        let result = RelevanceScorer::new().rank_products(&RankRequest::new(&products, &intent));

        assert!(result.ranked.is_empty());
        assert!(result.top3.is_empty());
        assert_eq!(result.debug, ScoringDebug::default());
        assert_eq!(result.outcome(), RankOutcome::NoMatch);
    }

    #[test]
    fn audience_alone_never_creates_a_match() {
        let products = vec![
            Product::new("menswear").with_audience(Audience::Men),
            Product::new("suit").with_occasions(&["business"]).with_audience(Audience::Men),
        ];
        let intent = intent("business meeting for him");
        let result = RelevanceScorer::new().rank_products(&RankRequest::new(&products, &intent));

        assert_eq!(ids(&result.ranked), vec!["suit"]);
        assert_eq!(result.ranked[0].score, 4);
        assert_eq!(result.debug.excluded_no_semantic_match, vec![ProductId::from("menswear")]);
    }

    #[test]
    fn out_of_stock_matches_are_recorded_separately() {
        let products = vec![
            Product::new("gown").with_occasions(&["wedding"]).out_of_stock(),
            Product::new("tee").with_occasions(&["casual"]),
        ];
        let intent = intent("formal wedding");
        let result = RelevanceScorer::new().rank_products(&RankRequest::new(&products, &intent));

        assert!(result.ranked.is_empty());
        assert_eq!(result.debug.excluded_out_of_stock, vec![ProductId::from("gown")]);
        assert_eq!(result.debug.out_of_stock_matched, vec![ProductId::from("gown")]);
        assert_eq!(result.debug.excluded_no_semantic_match, vec![ProductId::from("tee")]);
        assert_eq!(result.outcome(), RankOutcome::OutOfStockOnly);
    }

    #[test]
    fn equal_score_and_price_rank_by_id() {
        let products = vec![
            Product::new("b-blazer").with_occasions(&["business"]).with_price(100.0),
            Product::new("a-blazer").with_occasions(&["business"]).with_price(100.0),
        ];
        let intent = intent("business");
        let result = RelevanceScorer::new().rank_products(&RankRequest::new(&products, &intent));

        assert_eq!(ids(&result.ranked), vec!["a-blazer", "b-blazer"]);
        assert!(result.debug.tie_break_applied);
    }

    #[test]
    fn equal_score_ranks_cheaper_first_regardless_of_id() {
        let products = vec![
            Product::new("a-pricey").with_occasions(&["business"]).with_price(300.0),
            Product::new("z-cheap").with_occasions(&["business"]).with_price(80.0),
        ];
        let intent = intent("business");
        let result = RelevanceScorer::new().rank_products(&RankRequest::new(&products, &intent));

        assert_eq!(ids(&result.ranked), vec!["z-cheap", "a-pricey"]);
    }

    #[test]
    fn higher_score_wins_and_no_tie_is_flagged() {
        let products = vec![
            Product::new("one").with_occasions(&["party"]).with_price(10.0),
            Product::new("two").with_occasions(&["party"]).with_vibes(&["bold"]).with_price(500.0),
        ];
        let intent = intent("bold party");
        let result = RelevanceScorer::new().rank_products(&RankRequest::new(&products, &intent));

        assert_eq!(ids(&result.ranked), vec!["two", "one"]);
        assert_eq!(result.ranked[0].score, 5);
        assert!(!result.debug.tie_break_applied);
    }

    #[test]
    fn result_cap_is_clamped() {
        let products = (0..5)
            .map(|index| Product::new(format!("p{index}")).with_vibes(&["classic"]))
            .collect::<Vec<_>>();
        let intent = intent("classic");

        for (requested, expected) in [(0, 1), (1, 1), (2, 2), (50, 2), (usize::MAX, 2)] {
            let context = RankContext { audience: None, max_results: requested };
            let result = RelevanceScorer::new()
                .rank_products(&RankRequest::new(&products, &intent).with_context(context));
            assert_eq!(result.top3.len(), expected, "requested {requested}");
            assert_eq!(result.ranked.len(), 5);
            assert_eq!(result.top3[..], result.ranked[..expected]);
        }
    }

    #[test]
    fn context_audience_overrides_hint() {
        let products = vec![
            Product::new("for-her").with_vibes(&["elegant"]).with_audience(Audience::Woman),
            Product::new("for-him").with_vibes(&["elegant"]).with_audience(Audience::Men),
        ];
        let intent = intent("elegant look for her");
        let context = RankContext { audience: Some(Audience::Men), max_results: 2 };
        let result = RelevanceScorer::new()
            .rank_products(&RankRequest::new(&products, &intent).with_context(context));

        assert_eq!(ids(&result.ranked), vec!["for-him", "for-her"]);
    }

    #[test]
    fn blank_ids_are_skipped() {
        let products =
            vec![Product::new("  ").with_vibes(&["edgy"]), Product::new("x").with_vibes(&["edgy"])];
        let intent = intent("edgy");
        let result = RelevanceScorer::new().rank_products(&RankRequest::new(&products, &intent));

        assert_eq!(ids(&result.ranked), vec!["x"]);
        assert_eq!(result.debug.skipped_without_id, 1);
    }

    #[test]
    fn zero_weights_trip_the_semantic_gate() {
        let scorer =
            RelevanceScorer::with_weights(ScoringWeights { occasion: 0, vibe: 0, audience: 0 });
        let products = vec![Product::new("x").with_vibes(&["edgy"])];
        let intent = intent("edgy");
        let result = scorer.rank_products(&RankRequest::new(&products, &intent));

        assert_eq!(result.debug.excluded_no_semantic_match, vec![ProductId::from("x")]);
        assert!(result.debug.zero_score.is_empty());
    }
}
