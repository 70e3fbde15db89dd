//! Text canonicalization shared by phrase matching and tokenization.

/// Lower-cases `text`, folds every run of characters outside `[a-z0-9]` into a
/// single space and trims the result.
///
/// Total: empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut pending_space = false;

    for character in text.chars() {
        if character.is_ascii_alphanumeric() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(character.to_ascii_lowercase());
        } else {
            pending_space = true;
        }
    }

    normalized
}

/// Splits normalized text into tokens, keeping the first occurrence of each.
pub fn keywords(normalized: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    normalized
        .split(' ')
        .filter(|token| !token.is_empty())
        .filter(|token| seen.insert(*token))
        .map(str::to_owned)
        .collect()
}

/// Whole-phrase containment: `phrase` must sit between token boundaries of
/// `normalized`. Both sides are expected to be normalized already.
pub fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    if phrase.is_empty() || normalized.is_empty() {
        return false;
    }

    let haystack = format!(" {normalized} ");
    let needle = format!(" {phrase} ");
    haystack.contains(&needle)
}
