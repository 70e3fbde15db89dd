use std::sync::Arc;

use uuid::Uuid;

use concierge_core::{
    clamp_max_results, AppConfig, ApplicationError, Audience, ComposeRequest, DomainError, Intent,
    IntentExtractor, IntentParser, ParseOptions, Persona, PersonaComposer, PersonaMode,
    PersonaRenderer, Product, ProductRanker, RankContext, RankOutcome, RankRequest,
    RelevanceScorer, ScoredEntry, ScoringDebug, ScoringResult, Taxonomy,
};

use crate::enhancer::{Enhancer, EnhancerInput};
use crate::request::{RecommendRequest, RequestContext};
use crate::response::{Response, ResponseCounts, ResponseDebug, ResponseReason};

const DEFAULT_MAX_RESULTS: usize = concierge_core::ranking::DEFAULT_MAX_RESULTS;

/// Recommendation orchestrator.
///
/// Holds the three pipeline components, an optional default catalog and an
/// optional enhancer. All of them are read-only during a call, so one
/// instance can serve concurrent requests.
#[derive(Clone)]
pub struct Concierge {
    intent_parser: Option<Arc<dyn IntentParser>>,
    product_ranker: Option<Arc<dyn ProductRanker>>,
    persona_renderer: Option<Arc<dyn PersonaRenderer>>,
    default_catalog: Option<Arc<[Product]>>,
    enhancer: Option<Arc<dyn Enhancer>>,
    default_max_results: usize,
}

#[derive(Clone, Default)]
pub struct ConciergeBuilder {
    intent_parser: Option<Arc<dyn IntentParser>>,
    product_ranker: Option<Arc<dyn ProductRanker>>,
    persona_renderer: Option<Arc<dyn PersonaRenderer>>,
    default_catalog: Option<Arc<[Product]>>,
    enhancer: Option<Arc<dyn Enhancer>>,
    default_max_results: Option<usize>,
}

impl ConciergeBuilder {
    pub fn intent_parser(mut self, parser: impl IntentParser + 'static) -> Self {
        self.intent_parser = Some(Arc::new(parser));
        self
    }

    pub fn product_ranker(mut self, ranker: impl ProductRanker + 'static) -> Self {
        self.product_ranker = Some(Arc::new(ranker));
        self
    }

    pub fn persona_renderer(mut self, renderer: impl PersonaRenderer + 'static) -> Self {
        self.persona_renderer = Some(Arc::new(renderer));
        self
    }

    pub fn default_catalog(mut self, products: Vec<Product>) -> Self {
        self.default_catalog = Some(products.into());
        self
    }

    pub fn enhancer(mut self, enhancer: impl Enhancer + 'static) -> Self {
        self.enhancer = Some(Arc::new(enhancer));
        self
    }

    pub fn default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = Some(max_results);
        self
    }

    /// Never fails. Missing components surface on each `recommend` call.
    pub fn build(self) -> Concierge {
        Concierge {
            intent_parser: self.intent_parser,
            product_ranker: self.product_ranker,
            persona_renderer: self.persona_renderer,
            default_catalog: self.default_catalog,
            enhancer: self.enhancer,
            default_max_results: self.default_max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        }
    }
}

struct Components<'a> {
    parser: &'a dyn IntentParser,
    ranker: &'a dyn ProductRanker,
    renderer: &'a dyn PersonaRenderer,
}

impl Concierge {
    pub fn builder() -> ConciergeBuilder {
        ConciergeBuilder::default()
    }

    /// Builder preloaded with the built-in extractor, scorer and composer.
    pub fn standard() -> ConciergeBuilder {
        Self::builder()
            .intent_parser(IntentExtractor::new())
            .product_ranker(RelevanceScorer::new())
            .persona_renderer(PersonaComposer::new())
    }

    /// Builder wired from application configuration.
    pub fn from_config(config: &AppConfig, taxonomy: Taxonomy) -> ConciergeBuilder {
        Self::builder()
            .intent_parser(
                IntentExtractor::new()
                    .with_taxonomy(taxonomy)
                    .with_max_input_chars(config.engine.max_input_chars),
            )
            .product_ranker(RelevanceScorer::with_weights(config.scoring.weights()))
            .persona_renderer(PersonaComposer::new())
            .default_max_results(config.engine.default_max_results)
    }

    pub fn set_enhancer(&mut self, enhancer: impl Enhancer + 'static) {
        self.enhancer = Some(Arc::new(enhancer));
    }

    pub fn clear_enhancer(&mut self) {
        self.enhancer = None;
    }

    pub fn has_enhancer(&self) -> bool {
        self.enhancer.is_some()
    }

    pub fn missing_components(&self) -> Vec<String> {
        [
            ("intent_parser", self.intent_parser.is_none()),
            ("product_ranker", self.product_ranker.is_none()),
            ("persona_renderer", self.persona_renderer.is_none()),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| name.to_owned())
        .collect()
    }

    fn components(&self) -> Result<Components<'_>, ApplicationError> {
        match (&self.intent_parser, &self.product_ranker, &self.persona_renderer) {
            (Some(parser), Some(ranker), Some(renderer)) => Ok(Components {
                parser: parser.as_ref(),
                ranker: ranker.as_ref(),
                renderer: renderer.as_ref(),
            }),
            _ => Err(ApplicationError::DependencyMissing(self.missing_components())),
        }
    }

    pub async fn recommend(&self, request: RecommendRequest) -> Result<Response, ApplicationError> {
        let request_id = Uuid::new_v4();
        let result = self.run(request_id, request).await;

        if let Err(error) = &result {
            tracing::warn!(
                event_name = "concierge.recommend.failed",
                request_id = %request_id,
                error = %error,
                "recommendation request failed"
            );
        }

        result
    }

    #[tracing::instrument(name = "concierge.recommend", skip_all, fields(request_id = %request_id))]
    async fn run(
        &self,
        request_id: Uuid,
        request: RecommendRequest,
    ) -> Result<Response, ApplicationError> {
        let components = self.components()?;

        let products: &[Product] = match (&request.products, &self.default_catalog) {
            (Some(products), _) => products.as_slice(),
            (None, Some(catalog)) => catalog.as_ref(),
            (None, None) => {
                return Err(ApplicationError::CatalogUnavailable(
                    "request carried no product array and no default catalog is set".to_owned(),
                ))
            }
        };

        let max_results = clamp_max_results(request.context.max_results, self.default_max_results);
        let options = ParseOptions { context_audience: request.context.audience.clone() };

        tracing::debug!(
            event_name = "concierge.recommend.started",
            request_id = %request_id,
            text_chars = request.text.chars().count(),
            products = products.len(),
            max_results,
            "recommendation request started"
        );

        let trace = CallTrace { request_id, max_results, products: products.len() };

        if request.text.trim().is_empty() {
            let intent = components.parser.parse("", &options)?;
            let persona = components.renderer.compose(&ComposeRequest::new(
                PersonaMode::Clarify,
                &intent,
                &[],
            ));
            let response = trace.response(
                intent,
                Vec::new(),
                persona,
                PersonaMode::Clarify,
                ResponseReason::EmptyInput,
                None,
            );
            return Ok(self.finish(response));
        }

        let intent = components.parser.parse(&request.text, &options)?;

        if intent.missing_intent {
            let persona = components.renderer.compose(&ComposeRequest::new(
                PersonaMode::Clarify,
                &intent,
                &[],
            ));
            let response = trace.response(
                intent.clone(),
                Vec::new(),
                persona,
                PersonaMode::Clarify,
                ResponseReason::MissingIntent,
                None,
            );
            let input = enhancer_input(&request, intent, Vec::new());
            let response = self.apply_enhancer(input, response).await;
            return Ok(self.finish(response));
        }

        let context = RankContext {
            audience: request
                .context
                .audience
                .as_deref()
                .map(Audience::from_label)
                .and_then(Audience::known),
            max_results,
        };
        let result =
            components.ranker.rank(&RankRequest::new(products, &intent).with_context(context));
        ensure_known_candidates(&result.top3, products)?;
        let outcome = result.outcome();
        let (mode, reason) = ResponseReason::from_outcome(outcome);

        let ScoringResult { ranked, mut top3, debug } = result;
        top3.truncate(max_results);
        let persona = components.renderer.compose(&ComposeRequest::new(mode, &intent, &top3));
        let summary = ScoringSummary { outcome, ranked: ranked.len(), debug };
        let response = trace.response(intent.clone(), top3, persona, mode, reason, Some(summary));

        let input = enhancer_input(&request, intent, ranked);
        let response = self.apply_enhancer(input, response).await;
        Ok(self.finish(response))
    }

    async fn apply_enhancer(&self, input: EnhancerInput, mut response: Response) -> Response {
        let Some(enhancer) = &self.enhancer else {
            return response;
        };

        match enhancer.enhance(&input).await {
            Ok(Some(output)) if !output.is_empty() => {
                if let Some(mut top3) = output.top3 {
                    top3.truncate(response.debug.max_results);
                    response.top3 = top3;
                }
                if let Some(persona) = output.persona_override {
                    response.persona = persona;
                }
                if let Some(confidence) = output.confidence_override {
                    response.intent.confidence = confidence;
                }
                response.debug.enhancer_applied = true;
            }
            Ok(_) => {}
            Err(error) => {
                let message = format!("{error:#}");
                tracing::warn!(
                    event_name = "concierge.enhancer.failed",
                    request_id = %response.debug.request_id,
                    error = %message,
                    "enhancer failed; returning base response"
                );
                response.debug.enhancer_error = Some(message);
            }
        }

        response
    }

    fn finish(&self, mut response: Response) -> Response {
        response.debug.counts.top3 = response.top3.len();

        tracing::info!(
            event_name = "concierge.recommend.completed",
            request_id = %response.debug.request_id,
            reason = response.debug.reason.as_str(),
            mode = response.debug.mode.as_str(),
            top3 = response.debug.counts.top3,
            ranked = response.debug.counts.ranked,
            enhancer_applied = response.debug.enhancer_applied,
            "recommendation request completed"
        );

        response
    }
}

impl Default for Concierge {
    fn default() -> Self {
        Self::standard().build()
    }
}

impl std::fmt::Debug for Concierge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Concierge")
            .field("missing_components", &self.missing_components())
            .field("default_catalog", &self.default_catalog.as_ref().map(|catalog| catalog.len()))
            .field("has_enhancer", &self.has_enhancer())
            .field("default_max_results", &self.default_max_results)
            .finish()
    }
}

struct ScoringSummary {
    outcome: RankOutcome,
    ranked: usize,
    debug: ScoringDebug,
}

/// Per-call values shared by every response shape.
struct CallTrace {
    request_id: Uuid,
    max_results: usize,
    products: usize,
}

impl CallTrace {
    fn response(
        &self,
        intent: Intent,
        top3: Vec<ScoredEntry>,
        persona: Persona,
        mode: PersonaMode,
        reason: ResponseReason,
        scoring: Option<ScoringSummary>,
    ) -> Response {
        let counts = ResponseCounts {
            products: self.products,
            ranked: scoring.as_ref().map(|summary| summary.ranked).unwrap_or_default(),
            top3: top3.len(),
        };
        let (outcome, scoring) = match scoring {
            Some(summary) => (Some(summary.outcome), Some(summary.debug)),
            None => (None, None),
        };

        Response {
            success: true,
            intent,
            top3,
            needs_clarification: mode != PersonaMode::Curated,
            persona,
            debug: ResponseDebug {
                reason,
                request_id: self.request_id,
                mode,
                max_results: self.max_results,
                counts,
                outcome,
                scoring,
                enhancer_applied: false,
                enhancer_error: None,
            },
        }
    }
}

/// A swapped-in ranker may only pick from the candidates it was given.
fn ensure_known_candidates(top3: &[ScoredEntry], products: &[Product]) -> Result<(), DomainError> {
    match top3.iter().find(|entry| !products.iter().any(|product| product.id == entry.product_id)) {
        Some(entry) => Err(DomainError::InvariantViolation(format!(
            "ranker returned product `{}` that is not in the candidate list",
            entry.product_id
        ))),
        None => Ok(()),
    }
}

fn enhancer_input(
    request: &RecommendRequest,
    intent: Intent,
    ranked: Vec<ScoredEntry>,
) -> EnhancerInput {
    EnhancerInput {
        text: request.text.clone(),
        context: RequestContext {
            audience: request.context.audience.clone(),
            max_results: request.context.max_results,
        },
        intent,
        ranked,
    }
}
