//! Types produced by intent extraction

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::product::Audience;

/// Semantic families a canonical tag can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagFamily {
    Occasion,
    Vibe,
}

impl TagFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagFamily::Occasion => "occasion",
            TagFamily::Vibe => "vibe",
        }
    }
}

/// Confidence in an extracted intent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// No tag matched
    #[default]
    None,
    /// One tag matched
    Low,
    /// Two tags matched
    Medium,
    /// Three or more tags matched
    High,
}

impl Confidence {
    /// Fixed step function over the total number of matched tags.
    pub fn from_match_count(matches: usize) -> Self {
        match matches {
            0 => Confidence::None,
            1 => Confidence::Low,
            2 => Confidence::Medium,
            _ => Confidence::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// Structured reading of one shopper message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    /// Canonical occasion tags found
    pub occasion: BTreeSet<String>,
    /// Canonical vibe tags found
    pub vibe: BTreeSet<String>,
    /// Deduplicated normalized tokens, first-seen order
    pub keywords: Vec<String>,
    pub confidence: Confidence,
    pub audience_hint: Audience,
    /// True iff both `occasion` and `vibe` are empty
    pub missing_intent: bool,
}

impl Intent {
    pub fn new(
        occasion: BTreeSet<String>,
        vibe: BTreeSet<String>,
        keywords: Vec<String>,
        audience_hint: Audience,
    ) -> Self {
        let confidence = Confidence::from_match_count(occasion.len() + vibe.len());
        let missing_intent = occasion.is_empty() && vibe.is_empty();
        Self { occasion, vibe, keywords, confidence, audience_hint, missing_intent }
    }

    pub fn tags(&self, family: TagFamily) -> &BTreeSet<String> {
        match family {
            TagFamily::Occasion => &self.occasion,
            TagFamily::Vibe => &self.vibe,
        }
    }

    pub fn match_count(&self) -> usize {
        self.occasion.len() + self.vibe.len()
    }
}

/// Per-call options for [`super::IntentParser::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Audience supplied by the caller; only `men` or `woman` are honored.
    pub context_audience: Option<String>,
}

impl ParseOptions {
    pub fn with_context_audience(mut self, audience: impl Into<String>) -> Self {
        self.context_audience = Some(audience.into());
        self
    }
}
