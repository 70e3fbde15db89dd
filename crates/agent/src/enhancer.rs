//! Optional augmentation step run after the deterministic pipeline.
//!
//! An enhancer may override the picks, the persona copy or the stated
//! confidence. Its failures are recorded on the response and never fail the
//! call.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use concierge_core::{Confidence, Intent, Persona, ScoredEntry};

use crate::request::RequestContext;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancerInput {
    pub text: String,
    pub context: RequestContext,
    pub intent: Intent,
    /// Full ranked list; empty when no intent was detected
    pub ranked: Vec<ScoredEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancerOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top3: Option<Vec<ScoredEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_override: Option<Persona>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_override: Option<Confidence>,
}

impl EnhancerOutput {
    /// Reads an override object from loosely shaped JSON.
    ///
    /// Non-objects yield `None`. Fields that do not parse are dropped
    /// individually.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str| object.get(name).cloned();
        Some(Self {
            top3: field("top3").and_then(|value| serde_json::from_value(value).ok()),
            persona_override: field("personaOverride")
                .and_then(|value| serde_json::from_value(value).ok()),
            confidence_override: field("confidenceOverride")
                .and_then(|value| serde_json::from_value(value).ok()),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.top3.is_none() && self.persona_override.is_none() && self.confidence_override.is_none()
    }
}

/// Host-supplied augmentation hook, invoked at most once per call.
///
/// `Ok(None)` leaves the base response untouched.
#[async_trait]
pub trait Enhancer: Send + Sync {
    async fn enhance(&self, input: &EnhancerInput) -> Result<Option<EnhancerOutput>>;
}

/// Adapts a synchronous closure into an [`Enhancer`].
pub struct FnEnhancer<F> {
    inner: F,
}

impl<F> FnEnhancer<F>
where
    F: Fn(&EnhancerInput) -> Result<Option<EnhancerOutput>> + Send + Sync,
{
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<F> Enhancer for FnEnhancer<F>
where
    F: Fn(&EnhancerInput) -> Result<Option<EnhancerOutput>> + Send + Sync,
{
    async fn enhance(&self, input: &EnhancerInput) -> Result<Option<EnhancerOutput>> {
        (self.inner)(input)
    }
}

impl<F> std::fmt::Debug for FnEnhancer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnEnhancer").finish_non_exhaustive()
    }
}
