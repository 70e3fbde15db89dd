//! Fixed response template pools, one per mode.

use super::PersonaMode;

/// Values substituted into parameterized templates.
#[derive(Debug, Clone, Copy)]
pub struct RenderParams<'a> {
    pub occasion: &'a str,
    pub vibe: &'a str,
    pub count: &'a str,
}

#[derive(Clone, Copy)]
pub enum TemplateBody {
    Render(fn(&RenderParams<'_>) -> String),
    Fixed(&'static str),
}

#[derive(Clone, Copy)]
pub struct PersonaTemplate {
    pub id: &'static str,
    pub body: TemplateBody,
}

impl PersonaTemplate {
    pub fn render(&self, params: &RenderParams<'_>) -> String {
        match self.body {
            TemplateBody::Render(render) => render(params),
            TemplateBody::Fixed(text) => text.to_owned(),
        }
    }
}

impl std::fmt::Debug for PersonaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonaTemplate").field("id", &self.id).finish_non_exhaustive()
    }
}

fn curated_stylist(params: &RenderParams<'_>) -> String {
    format!(
        "I pulled {} for your {} plans with a {} feel.",
        params.count, params.occasion, params.vibe
    )
}

fn curated_editor(params: &RenderParams<'_>) -> String {
    format!("Your {} short-list: {} with a {} edge.", params.occasion, params.count, params.vibe)
}

fn curated_friend(params: &RenderParams<'_>) -> String {
    format!(
        "Good news, {} that suit {} and still feel {}.",
        params.count, params.occasion, params.vibe
    )
}

fn no_stock_apology(params: &RenderParams<'_>) -> String {
    format!(
        "I found {} pieces for {}, but every match is out of stock right now.",
        params.vibe, params.occasion
    )
}

fn no_stock_sold_out(params: &RenderParams<'_>) -> String {
    format!(
        "The {} looks with a {} style you'd love are sold out at the moment.",
        params.occasion, params.vibe
    )
}

pub const CURATED_TEMPLATES: &[PersonaTemplate] = &[
    PersonaTemplate { id: "curated.stylist", body: TemplateBody::Render(curated_stylist) },
    PersonaTemplate { id: "curated.editor", body: TemplateBody::Render(curated_editor) },
    PersonaTemplate { id: "curated.friend", body: TemplateBody::Render(curated_friend) },
];

pub const CLARIFY_TEMPLATES: &[PersonaTemplate] = &[
    PersonaTemplate {
        id: "clarify.warm",
        body: TemplateBody::Fixed(
            "Happy to help you find something. Tell me a little more about what you're shopping for.",
        ),
    },
    PersonaTemplate {
        id: "clarify.narrow",
        body: TemplateBody::Fixed("Let's narrow it down together."),
    },
    PersonaTemplate {
        id: "clarify.careful",
        body: TemplateBody::Fixed("I want to get this right for you, so I need a few details."),
    },
];

pub const NO_STOCK_TEMPLATES: &[PersonaTemplate] = &[
    PersonaTemplate { id: "no-stock.apology", body: TemplateBody::Render(no_stock_apology) },
    PersonaTemplate { id: "no-stock.sold-out", body: TemplateBody::Render(no_stock_sold_out) },
];

pub fn pool(mode: PersonaMode) -> &'static [PersonaTemplate] {
    match mode {
        PersonaMode::Curated => CURATED_TEMPLATES,
        PersonaMode::Clarify => CLARIFY_TEMPLATES,
        PersonaMode::NoStock => NO_STOCK_TEMPLATES,
    }
}
