use serde::{Deserialize, Serialize};
use uuid::Uuid;

use concierge_core::{
    ApplicationError, ErrorResponse, Intent, Persona, PersonaMode, RankOutcome, ScoredEntry,
    ScoringDebug,
};

/// Why the response took the shape it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseReason {
    /// Blank text; nothing was scored
    EmptyInput,
    /// No occasion or vibe detected; nothing was scored
    MissingIntent,
    Ranked,
    NoStock,
    Clarify,
}

impl ResponseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyInput => "empty-input",
            Self::MissingIntent => "missing-intent",
            Self::Ranked => "ranked",
            Self::NoStock => "no-stock",
            Self::Clarify => "clarify",
        }
    }

    /// Mode and reason for a scored intent.
    pub fn from_outcome(outcome: RankOutcome) -> (PersonaMode, Self) {
        match outcome {
            RankOutcome::Ranked => (PersonaMode::Curated, Self::Ranked),
            RankOutcome::OutOfStockOnly => (PersonaMode::NoStock, Self::NoStock),
            RankOutcome::NoMatch => (PersonaMode::Clarify, Self::Clarify),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseCounts {
    /// Catalog entries considered
    pub products: usize,
    pub ranked: usize,
    pub top3: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDebug {
    pub reason: ResponseReason,
    pub request_id: Uuid,
    pub mode: PersonaMode,
    pub max_results: usize,
    pub counts: ResponseCounts,
    /// Absent when scoring was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RankOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringDebug>,
    #[serde(default)]
    pub enhancer_applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enhancer_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    pub intent: Intent,
    pub top3: Vec<ScoredEntry>,
    pub needs_clarification: bool,
    pub persona: Persona,
    pub debug: ResponseDebug,
}

/// Either wire shape of a recommend call. Callers branch on `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Success(Response),
    Failure(ErrorResponse),
}

impl Reply {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<Response, ApplicationError>> for Reply {
    fn from(result: Result<Response, ApplicationError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(error) => Self::Failure(error.into()),
        }
    }
}
