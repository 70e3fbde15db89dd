//! Intent extraction
//!
//! Maps free-form shopper text to canonical occasion and vibe tags, an
//! audience hint and a confidence level. Matching is fixed-vocabulary and
//! whole-phrase only; there is no fuzzy or learned component.

mod extractor;
mod lexicon;
mod taxonomy;
mod types;

pub use extractor::IntentExtractor;
pub use lexicon::{Lexicon, LexiconEntry};
pub use taxonomy::Taxonomy;
pub use types::*;

use crate::errors::DomainError;

/// Longest input, in characters, accepted by the default extractor.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 2_000;

pub trait IntentParser: Send + Sync {
    fn parse(&self, text: &str, options: &ParseOptions) -> Result<Intent, DomainError>;
}
