//! Persona composition: short intro lines and follow-up questions.
//!
//! Selection is deterministic. The same mode, intent tags and product ids
//! always produce the same template.

pub mod composer;
pub mod templates;

use serde::{Deserialize, Serialize};

use crate::intent::Intent;
use crate::ranking::ScoredEntry;

pub use composer::{djb2, seed_string, PersonaComposer};

/// Which template pool a response draws from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersonaMode {
    Curated,
    #[default]
    Clarify,
    NoStock,
}

impl PersonaMode {
    /// Unknown labels fall back to `Clarify`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "curated" => Self::Curated,
            "no-stock" => Self::NoStock,
            _ => Self::Clarify,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Curated => "curated",
            Self::Clarify => "clarify",
            Self::NoStock => "no-stock",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub intro: String,
    pub persona_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_question: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ComposeRequest<'a> {
    pub mode: PersonaMode,
    pub intent: &'a Intent,
    pub top3: &'a [ScoredEntry],
    /// Overrides the seed derived from mode, tags and ids
    pub seed: Option<&'a str>,
}

impl<'a> ComposeRequest<'a> {
    pub fn new(mode: PersonaMode, intent: &'a Intent, top3: &'a [ScoredEntry]) -> Self {
        Self { mode, intent, top3, seed: None }
    }

    pub fn with_seed(mut self, seed: &'a str) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Turns a mode plus ranking output into customer-facing copy. Never fails.
pub trait PersonaRenderer: Send + Sync {
    fn compose(&self, request: &ComposeRequest<'_>) -> Persona;
}
