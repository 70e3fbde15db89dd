//! Concierge runtime: the asynchronous recommendation orchestrator.
//!
//! The runtime sequences the synchronous components from `concierge-core`:
//! 1. **Intent extraction** (`IntentParser`) - free text to occasion/vibe tags
//! 2. **Ranking** (`ProductRanker`) - catalog snapshot to a short, in-stock list
//! 3. **Persona** (`PersonaRenderer`) - deterministic copy for the outcome mode
//! 4. **Enhancement** (`enhancer`) - optional host hook, failure-isolated
//!
//! # Key Types
//!
//! - [`Concierge`] - orchestrator, assembled with [`ConciergeBuilder`]
//! - [`RecommendRequest`] / [`Response`] - the wire contract
//! - [`Enhancer`] - async augmentation seam; [`FnEnhancer`] wraps a closure
//!
//! The enhancer only ever overrides presentation. Matching, gating and
//! ordering stay deterministic.

pub mod enhancer;
pub mod request;
pub mod response;
pub mod runtime;

pub use enhancer::{Enhancer, EnhancerInput, EnhancerOutput, FnEnhancer};
pub use request::{RecommendRequest, RequestContext};
pub use response::{Reply, Response, ResponseCounts, ResponseDebug, ResponseReason};
pub use runtime::{Concierge, ConciergeBuilder};
