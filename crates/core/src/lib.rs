//! Concierge core: synchronous building blocks for turning shopper text into
//! a short, inventory-aware product list.
//!
//! - [`text`] normalizes raw input for phrase matching
//! - [`intent`] extracts occasion, vibe and audience tags
//! - [`ranking`] scores a catalog snapshot against an intent
//! - [`persona`] renders deterministic customer-facing copy
//!
//! Nothing here performs I/O except [`catalog`] and [`config`] loading.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;
pub mod persona;
pub mod ranking;
pub mod text;

pub use catalog::{demo_catalog, load_products, load_taxonomy, CatalogError};
pub use config::{AppConfig, ConfigError, LoadOptions};
pub use domain::product::{products_from_value, Audience, Product, ProductId, ProductTags};
pub use errors::{
    ApplicationError, DomainError, ErrorCode, ErrorResponse, InterfaceError,
};
pub use intent::{
    Confidence, Intent, IntentExtractor, IntentParser, ParseOptions, TagFamily, Taxonomy,
};
pub use persona::{ComposeRequest, Persona, PersonaComposer, PersonaMode, PersonaRenderer};
pub use ranking::{
    clamp_max_results, ProductRanker, RankContext, RankOutcome, RankRequest, RelevanceScorer,
    ScoreBreakdown, ScoredEntry, ScoringDebug, ScoringResult, ScoringWeights,
};
