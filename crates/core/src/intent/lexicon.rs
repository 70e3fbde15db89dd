//! Fixed phrase vocabularies for occasion, vibe and audience detection.
//!
//! The tables are compiled in and normalized once into a process-wide,
//! read-only [`Lexicon`]. Nothing mutates it after first use.

use std::sync::OnceLock;

use crate::domain::product::Audience;
use crate::text::{contains_phrase, normalize};

use super::TagFamily;

#[derive(Debug, Clone, Copy)]
struct LexiconSeed {
    tag: &'static str,
    synonyms: &'static [&'static str],
}

const OCCASION_SEEDS: &[LexiconSeed] = &[
    LexiconSeed {
        tag: "business",
        synonyms: &[
            "work",
            "office",
            "meeting",
            "business meeting",
            "corporate",
            "interview",
            "conference",
            "presentation",
        ],
    },
    LexiconSeed {
        tag: "wedding",
        synonyms: &["bridal", "bride", "groom", "reception", "ceremony", "rehearsal dinner"],
    },
    LexiconSeed {
        tag: "formal",
        synonyms: &["black tie", "black-tie", "gala", "evening event", "banquet", "opera"],
    },
    LexiconSeed {
        tag: "party",
        synonyms: &["celebration", "birthday", "night out", "cocktail", "club", "new year"],
    },
    LexiconSeed {
        tag: "casual",
        synonyms: &["everyday", "weekend", "brunch", "errands", "laid back", "day off"],
    },
    LexiconSeed {
        tag: "date",
        synonyms: &["date night", "romantic dinner", "anniversary", "first date"],
    },
    LexiconSeed {
        tag: "vacation",
        synonyms: &["holiday", "beach", "travel", "resort", "getaway", "trip"],
    },
];

const VIBE_SEEDS: &[LexiconSeed] = &[
    LexiconSeed { tag: "modern", synonyms: &["contemporary", "sleek", "current", "fresh"] },
    LexiconSeed { tag: "minimalist", synonyms: &["minimal", "clean", "simple", "understated"] },
    LexiconSeed { tag: "classic", synonyms: &["timeless", "traditional", "tailored", "preppy"] },
    LexiconSeed { tag: "bold", synonyms: &["statement", "daring", "bright", "colorful", "loud"] },
    LexiconSeed {
        tag: "elegant",
        synonyms: &["sophisticated", "refined", "polished", "chic", "luxurious"],
    },
    LexiconSeed { tag: "boho", synonyms: &["bohemian", "free spirited", "earthy", "flowy"] },
    LexiconSeed { tag: "edgy", synonyms: &["rock", "grunge", "punk", "leather"] },
    LexiconSeed { tag: "romantic", synonyms: &["feminine", "soft", "lace", "floral", "dreamy"] },
    LexiconSeed { tag: "relaxed", synonyms: &["comfy", "comfortable", "cozy", "easygoing"] },
];

#[derive(Debug, Clone, Copy)]
struct AudienceSeed {
    audience: Audience,
    synonyms: &'static [&'static str],
}

const AUDIENCE_SEEDS: &[AudienceSeed] = &[
    AudienceSeed {
        audience: Audience::Men,
        synonyms: &[
            "men",
            "mens",
            "man",
            "male",
            "him",
            "his",
            "guy",
            "guys",
            "gentleman",
            "husband",
            "boyfriend",
            "menswear",
        ],
    },
    AudienceSeed {
        audience: Audience::Woman,
        synonyms: &[
            "woman",
            "women",
            "womens",
            "female",
            "her",
            "she",
            "lady",
            "ladies",
            "wife",
            "girlfriend",
            "womenswear",
        ],
    },
];

/// One canonical tag plus every normalized phrase that signals it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    pub tag: String,
    pub phrases: Vec<String>,
}

impl LexiconEntry {
    fn from_seed(seed: &LexiconSeed) -> Self {
        let mut phrases = vec![normalize(seed.tag)];
        for synonym in seed.synonyms {
            let phrase = normalize(synonym);
            if !phrase.is_empty() && !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }
        Self { tag: normalize(seed.tag), phrases }
    }

    pub fn matches(&self, normalized_text: &str) -> bool {
        self.phrases.iter().any(|phrase| contains_phrase(normalized_text, phrase))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    occasion: Vec<LexiconEntry>,
    vibe: Vec<LexiconEntry>,
    audience: Vec<(Audience, Vec<String>)>,
}

static BUILTIN: OnceLock<Lexicon> = OnceLock::new();

impl Lexicon {
    pub fn builtin() -> &'static Lexicon {
        BUILTIN.get_or_init(|| Lexicon {
            occasion: OCCASION_SEEDS.iter().map(LexiconEntry::from_seed).collect(),
            vibe: VIBE_SEEDS.iter().map(LexiconEntry::from_seed).collect(),
            audience: AUDIENCE_SEEDS
                .iter()
                .map(|seed| {
                    (seed.audience, seed.synonyms.iter().map(|phrase| normalize(phrase)).collect())
                })
                .collect(),
        })
    }

    pub fn entries(&self, family: TagFamily) -> &[LexiconEntry] {
        match family {
            TagFamily::Occasion => &self.occasion,
            TagFamily::Vibe => &self.vibe,
        }
    }

    /// Canonical tags of `family` present in `normalized_text`, in table order.
    pub fn detect<'a>(&'a self, family: TagFamily, normalized_text: &str) -> Vec<&'a str> {
        self.entries(family)
            .iter()
            .filter(|entry| entry.matches(normalized_text))
            .map(|entry| entry.tag.as_str())
            .collect()
    }

    /// First audience whose vocabulary occurs in the text.
    pub fn detect_audience(&self, normalized_text: &str) -> Audience {
        self.audience
            .iter()
            .find(|(_, phrases)| {
                phrases.iter().any(|phrase| contains_phrase(normalized_text, phrase))
            })
            .map(|(audience, _)| *audience)
            .unwrap_or_default()
    }
}
