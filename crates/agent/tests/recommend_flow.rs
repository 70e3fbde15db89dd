use concierge_agent::{Concierge, RecommendRequest, ResponseReason};
use concierge_core::{
    ApplicationError, Audience, Confidence, DomainError, ErrorCode, InterfaceError,
    IntentExtractor, PersonaComposer, PersonaMode, Product, ProductId, ProductRanker,
    RankOutcome, RankRequest, RelevanceScorer, ScoreBreakdown, ScoredEntry, ScoringDebug,
    ScoringResult,
};

fn ids(entries: &[concierge_core::ScoredEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.product_id.as_str()).collect()
}

#[tokio::test]
async fn empty_input_asks_for_clarification_without_scoring() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("   ")
        .with_products(vec![Product::new("p1").with_occasions(&["business"])]);

    let response = concierge.recommend(request).await.expect("response");

    assert!(response.success);
    assert!(response.needs_clarification);
    assert!(response.top3.is_empty());
    assert_eq!(response.debug.reason, ResponseReason::EmptyInput);
    assert_eq!(response.debug.mode, PersonaMode::Clarify);
    assert!(response.debug.scoring.is_none());
    assert!(response.intent.missing_intent);
    assert!(response.persona.follow_up_question.is_some());
}

#[tokio::test]
async fn business_meeting_returns_only_in_stock_match() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("business meeting").with_products(vec![
        Product::new("desk-blazer").with_occasions(&["business"]).with_price(150.0),
        Product::new("board-suit").with_occasions(&["business"]).with_price(90.0).out_of_stock(),
    ]);

    let response = concierge.recommend(request).await.expect("response");

    assert_eq!(ids(&response.top3), vec!["desk-blazer"]);
    assert_eq!(response.debug.mode, PersonaMode::Curated);
    assert_eq!(response.debug.reason, ResponseReason::Ranked);
    assert_eq!(response.debug.outcome, Some(RankOutcome::Ranked));
    assert!(!response.needs_clarification);
    assert!(response.persona.persona_id.starts_with("curated."));

    let scoring = response.debug.scoring.expect("scoring debug");
    assert_eq!(scoring.out_of_stock_matched, vec![ProductId::from("board-suit")]);
    assert_eq!(response.debug.counts.products, 2);
    assert_eq!(response.debug.counts.ranked, 1);
    assert_eq!(response.debug.counts.top3, 1);
}

#[tokio::test]
async fn out_of_stock_only_match_selects_no_stock_mode() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("formal wedding").with_products(vec![
        Product::new("lace-gown").with_occasions(&["wedding"]).out_of_stock(),
        Product::new("tee").with_occasions(&["casual"]),
    ]);

    let response = concierge.recommend(request).await.expect("response");

    assert!(response.top3.is_empty());
    assert_eq!(response.debug.mode, PersonaMode::NoStock);
    assert_eq!(response.debug.reason, ResponseReason::NoStock);
    assert!(response.needs_clarification);
    assert!(response.persona.persona_id.starts_with("no-stock."));
    assert!(response.persona.follow_up_question.is_some());
}

#[tokio::test]
async fn vibe_only_request_scores_without_occasion_points() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("modern minimalist").with_products(vec![
        Product::new("clean-tee").with_vibes(&["minimalist"]),
        Product::new("party-top").with_occasions(&["party"]),
    ]);

    let response = concierge.recommend(request).await.expect("response");

    assert!(response.intent.occasion.is_empty());
    assert_eq!(response.intent.confidence, Confidence::Medium);
    assert_eq!(ids(&response.top3), vec!["clean-tee"]);
    let breakdown = &response.top3[0].breakdown;
    assert_eq!(breakdown.occasion_points, 0);
    assert!(breakdown.vibe_points > 0);
}

#[tokio::test]
async fn unrecognized_text_reports_missing_intent() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("what should I wear")
        .with_products(vec![Product::new("p1").with_vibes(&["bold"])]);

    let response = concierge.recommend(request).await.expect("response");

    assert!(response.needs_clarification);
    assert_eq!(response.debug.reason, ResponseReason::MissingIntent);
    assert_eq!(response.intent.confidence, Confidence::None);
    assert!(response.debug.scoring.is_none());
    assert_eq!(response.debug.counts.ranked, 0);
}

#[tokio::test]
async fn semantic_match_with_nothing_ranked_falls_back_to_clarify() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("boho vacation")
        .with_products(vec![Product::new("suit").with_occasions(&["business"])]);

    let response = concierge.recommend(request).await.expect("response");

    assert!(response.top3.is_empty());
    assert_eq!(response.debug.reason, ResponseReason::Clarify);
    assert_eq!(response.debug.outcome, Some(RankOutcome::NoMatch));
}

#[tokio::test]
async fn requested_result_cap_is_clamped() {
    let concierge = Concierge::standard().build();
    let products = (0..4)
        .map(|index| Product::new(format!("look-{index}")).with_vibes(&["bold"]))
        .collect::<Vec<_>>();

    for (requested, expected) in [(-3, 1), (0, 1), (1, 1), (2, 2), (99, 2)] {
        let request =
            RecommendRequest::new("bold").with_products(products.clone()).with_max_results(requested);
        let response = concierge.recommend(request).await.expect("response");
        assert_eq!(response.top3.len(), expected, "requested {requested}");
        assert_eq!(response.debug.max_results, expected);
    }
}

#[tokio::test]
async fn context_audience_adds_a_point_and_prefixes_persona() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("elegant dinner")
        .with_audience("woman")
        .with_products(vec![
            Product::new("a-tux").with_vibes(&["elegant"]).with_audience(Audience::Men),
            Product::new("z-gown").with_vibes(&["elegant"]).with_audience(Audience::Woman),
        ]);

    let response = concierge.recommend(request).await.expect("response");

    assert_eq!(response.intent.audience_hint, Audience::Woman);
    assert_eq!(ids(&response.top3), vec!["z-gown", "a-tux"]);
    assert_eq!(response.top3[0].score, 3);
    assert!(response.persona.intro.starts_with("For her: "));
}

#[tokio::test]
async fn default_catalog_is_used_when_request_has_none() {
    let concierge = Concierge::standard()
        .default_catalog(vec![Product::new("house-blazer").with_occasions(&["business"])])
        .build();

    let response =
        concierge.recommend(RecommendRequest::new("office meeting")).await.expect("response");

    assert_eq!(ids(&response.top3), vec!["house-blazer"]);
}

#[tokio::test]
async fn missing_catalog_is_reported() {
    let concierge = Concierge::standard().build();

    let error = concierge
        .recommend(RecommendRequest::new("business"))
        .await
        .expect_err("catalog unavailable");

    assert!(matches!(error, ApplicationError::CatalogUnavailable(_)));
    assert_eq!(InterfaceError::from(error).code, ErrorCode::CatalogUnavailable);
}

#[tokio::test]
async fn missing_components_are_named() {
    let concierge = Concierge::builder().intent_parser(IntentExtractor::new()).build();
    let request = RecommendRequest::new("business").with_products(Vec::new());

    let error = concierge.recommend(request).await.expect_err("dependency missing");

    assert_eq!(
        error,
        ApplicationError::DependencyMissing(vec![
            "product_ranker".to_owned(),
            "persona_renderer".to_owned(),
        ])
    );
}

#[tokio::test]
async fn dependency_check_runs_before_catalog_resolution() {
    let concierge = Concierge::builder()
        .product_ranker(RelevanceScorer::new())
        .persona_renderer(PersonaComposer::new())
        .build();

    let error = concierge.recommend(RecommendRequest::new("")).await.expect_err("missing");

    assert_eq!(error, ApplicationError::DependencyMissing(vec!["intent_parser".to_owned()]));
}

#[tokio::test]
async fn oversized_text_is_invalid_input() {
    let concierge = Concierge::builder()
        .intent_parser(IntentExtractor::new().with_max_input_chars(16))
        .product_ranker(RelevanceScorer::new())
        .persona_renderer(PersonaComposer::new())
        .build();
    let request = RecommendRequest::new("business ".repeat(4)).with_products(Vec::new());

    let error = concierge.recommend(request).await.expect_err("too long");
    let interface = InterfaceError::from(error);

    assert_eq!(interface.code, ErrorCode::InvalidInput);
    assert_eq!(interface.details["limit"], 16);
}

#[tokio::test]
async fn identical_requests_pick_identical_personas() {
    let concierge = Concierge::standard().build();
    let request = RecommendRequest::new("bold party night")
        .with_products(vec![Product::new("sequins").with_occasions(&["party"])]);

    let first = concierge.recommend(request.clone()).await.expect("response");
    let second = concierge.recommend(request).await.expect("response");

    assert_eq!(first.persona, second.persona);
    assert_eq!(first.top3, second.top3);
    assert_ne!(first.debug.request_id, second.debug.request_id);
}

#[tokio::test]
async fn concurrent_calls_do_not_interfere() {
    let concierge = std::sync::Arc::new(
        Concierge::standard()
            .default_catalog(vec![
                Product::new("suit").with_occasions(&["business"]),
                Product::new("dress").with_occasions(&["wedding"]),
            ])
            .build(),
    );

    let handles = ["business", "wedding", "business", "wedding"]
        .into_iter()
        .map(|text| {
            let concierge = concierge.clone();
            tokio::spawn(async move { concierge.recommend(RecommendRequest::new(text)).await })
        })
        .collect::<Vec<_>>();

    for (handle, expected) in handles.into_iter().zip(["suit", "dress", "suit", "dress"]) {
        let response = handle.await.expect("join").expect("response");
        assert_eq!(ids(&response.top3), vec![expected]);
    }
}

struct Inventing;

impl ProductRanker for Inventing {
    fn rank(&self, _request: &RankRequest<'_>) -> ScoringResult {
        let entry = ScoredEntry {
            product_id: ProductId::from("phantom"),
            score: 9,
            price: None,
            breakdown: ScoreBreakdown::default(),
        };
        ScoringResult {
            ranked: vec![entry.clone()],
            top3: vec![entry],
            debug: ScoringDebug::default(),
        }
    }
}

#[tokio::test]
async fn ranker_inventing_products_is_rejected() {
    let concierge = Concierge::builder()
        .intent_parser(IntentExtractor::new())
        .product_ranker(Inventing)
        .persona_renderer(PersonaComposer::new())
        .build();
    let request = RecommendRequest::new("business meeting")
        .with_products(vec![Product::new("desk-blazer").with_occasions(&["business"])]);

    let error = concierge.recommend(request).await.expect_err("invariant violation");

    assert!(matches!(
        error,
        ApplicationError::Domain(DomainError::InvariantViolation(ref message)) if message.contains("phantom")
    ));
    assert_eq!(InterfaceError::from(error).code, ErrorCode::InvalidInput);
}

struct Overeager;

impl ProductRanker for Overeager {
    fn rank(&self, request: &RankRequest<'_>) -> ScoringResult {
        let entries = request
            .products
            .iter()
            .map(|product| ScoredEntry {
                product_id: product.id.clone(),
                score: 3,
                price: product.price,
                breakdown: ScoreBreakdown::default(),
            })
            .collect::<Vec<_>>();
        ScoringResult { ranked: entries.clone(), top3: entries, debug: ScoringDebug::default() }
    }
}

#[tokio::test]
async fn persona_describes_the_capped_picks() {
    let concierge = Concierge::builder()
        .intent_parser(IntentExtractor::new())
        .product_ranker(Overeager)
        .persona_renderer(PersonaComposer::new())
        .build();
    let request = RecommendRequest::new("business meeting").with_max_results(1).with_products(
        ["a-blazer", "b-suit", "c-shirt"]
            .into_iter()
            .map(|id| Product::new(id).with_occasions(&["business"]))
            .collect(),
    );

    let response = concierge.recommend(request).await.expect("response");

    assert_eq!(ids(&response.top3), vec!["a-blazer"]);
    assert_eq!(response.debug.counts.ranked, 3);
    assert!(response.persona.intro.contains("1 look"), "{}", response.persona.intro);
    assert!(!response.persona.intro.contains("3 looks"));
}
