use std::collections::BTreeSet;

use crate::domain::product::Audience;
use crate::errors::DomainError;
use crate::text::{keywords, normalize};

use super::lexicon::Lexicon;
use super::taxonomy::Taxonomy;
use super::types::{Intent, ParseOptions, TagFamily};
use super::{IntentParser, DEFAULT_MAX_INPUT_CHARS};

/// Lexicon-driven extractor: whole-phrase matches only, optionally narrowed by
/// an external taxonomy.
#[derive(Clone, Debug)]
pub struct IntentExtractor {
    lexicon: &'static Lexicon,
    taxonomy: Taxonomy,
    max_input_chars: usize,
}

impl IntentExtractor {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::builtin(),
            taxonomy: Taxonomy::default(),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }

    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Extracts an intent from `text`.
    pub fn extract(&self, text: &str, options: &ParseOptions) -> Result<Intent, DomainError> {
        let len = text.chars().count();
        if len > self.max_input_chars {
            return Err(DomainError::InputTooLong { len, max: self.max_input_chars });
        }

        let normalized = normalize(text);
        let occasion = self.detect_family(TagFamily::Occasion, &normalized);
        let vibe = self.detect_family(TagFamily::Vibe, &normalized);
        let audience_hint = self.resolve_audience(options, &normalized);

        Ok(Intent::new(occasion, vibe, keywords(&normalized), audience_hint))
    }

    fn detect_family(&self, family: TagFamily, normalized: &str) -> BTreeSet<String> {
        self.lexicon
            .detect(family, normalized)
            .into_iter()
            .filter(|tag| self.taxonomy.allows(family, tag))
            .map(str::to_owned)
            .collect()
    }

    fn resolve_audience(&self, options: &ParseOptions, normalized: &str) -> Audience {
        options
            .context_audience
            .as_deref()
            .and_then(|label| Audience::from_label(label).known())
            .unwrap_or_else(|| self.lexicon.detect_audience(normalized))
    }
}

impl Default for IntentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentParser for IntentExtractor {
    fn parse(&self, text: &str, options: &ParseOptions) -> Result<Intent, DomainError> {
        self.extract(text, options)
    }
}
