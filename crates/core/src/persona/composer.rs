use crate::domain::product::Audience;

use super::templates::{pool, RenderParams};
use super::{ComposeRequest, Persona, PersonaMode, PersonaRenderer};

const OCCASION_FALLBACK: &str = "your occasion";
const VIBE_FALLBACK: &str = "refined";

const FOLLOW_UP_KNOWN_AUDIENCE: &str =
    "What's the occasion, and what kind of vibe are you going for?";
const FOLLOW_UP_UNKNOWN_AUDIENCE: &str =
    "What's the occasion, what vibe are you after, and are you shopping for men or women?";
const FOLLOW_UP_NO_STOCK: &str =
    "Want me to broaden the search to similar styles that are in stock?";

/// Picks and renders a template deterministically from the mode and a seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaComposer;

impl PersonaComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose_persona(&self, request: &ComposeRequest<'_>) -> Persona {
        let mode = request.mode;
        let templates = pool(mode);
        let seed = request.seed.map(str::to_owned).unwrap_or_else(|| seed_string(request));
        let index = (djb2(&seed) as usize) % templates.len();
        let template = &templates[index];

        let occasion = join_tags(request.intent.occasion.iter(), OCCASION_FALLBACK);
        let vibe = join_tags(request.intent.vibe.iter(), VIBE_FALLBACK);
        let count = count_phrase(request.top3.len());
        let mut intro =
            template.render(&RenderParams { occasion: &occasion, vibe: &vibe, count: &count });

        let audience = request.intent.audience_hint;
        let follow_up_question = match mode {
            PersonaMode::Curated => {
                if let Some(prefix) = audience_prefix(audience) {
                    intro = format!("{prefix}{intro}");
                }
                None
            }
            PersonaMode::Clarify => Some(
                if audience.known().is_some() {
                    FOLLOW_UP_KNOWN_AUDIENCE
                } else {
                    FOLLOW_UP_UNKNOWN_AUDIENCE
                }
                .to_owned(),
            ),
            PersonaMode::NoStock => Some(FOLLOW_UP_NO_STOCK.to_owned()),
        };

        Persona { intro, persona_id: template.id.to_owned(), follow_up_question }
    }
}

impl PersonaRenderer for PersonaComposer {
    fn compose(&self, request: &ComposeRequest<'_>) -> Persona {
        self.compose_persona(request)
    }
}

/// `mode|occasions|vibes|product ids`, each list comma-joined in stable order.
pub fn seed_string(request: &ComposeRequest<'_>) -> String {
    let occasion = request.intent.occasion.iter().cloned().collect::<Vec<_>>().join(",");
    let vibe = request.intent.vibe.iter().cloned().collect::<Vec<_>>().join(",");
    let ids = request
        .top3
        .iter()
        .map(|entry| entry.product_id.as_str())
        .collect::<Vec<_>>()
        .join(",");
    format!("{}|{occasion}|{vibe}|{ids}", request.mode.as_str())
}

/// DJB2 over UTF-16 code units: start at 5381, `hash * 33 + unit`, wrapping at 32 bits.
pub fn djb2(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(5381u32, |hash, unit| hash.wrapping_mul(33).wrapping_add(u32::from(unit)))
}

fn join_tags<'a>(tags: impl Iterator<Item = &'a String>, fallback: &str) -> String {
    let tags = tags.map(String::as_str).filter(|tag| !tag.is_empty()).collect::<Vec<_>>();
    match tags.as_slice() {
        [] => fallback.to_owned(),
        [only] => (*only).to_owned(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    }
}

fn count_phrase(count: usize) -> String {
    if count == 1 {
        "1 look".to_owned()
    } else {
        format!("{count} looks")
    }
}

fn audience_prefix(audience: Audience) -> Option<&'static str> {
    match audience {
        Audience::Men => Some("For him: "),
        Audience::Woman => Some("For her: "),
        Audience::None => None,
    }
}
