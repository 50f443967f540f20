//! Tokenization for the text index.
//!
//! Tokens are diacritic-folded, lowercased, split on non-alphanumeric
//! characters, and filtered: anything shorter than two characters and
//! German/English stopwords are dropped. The same tokenizer runs at index
//! time and at query time so both sides agree on terms.

use pinakos_core::text::normalize;
use std::collections::HashSet;
use std::sync::OnceLock;
use stop_words::{LANGUAGE, get};

/// Minimum token length; single characters carry no signal.
const MIN_TOKEN_LEN: usize = 2;

fn stopwords() -> &'static HashSet<String> {
    static STOPWORDS: OnceLock<HashSet<String>> = OnceLock::new();
    STOPWORDS.get_or_init(|| {
        let mut words: HashSet<String> = get(LANGUAGE::German)
            .iter()
            .map(|w| normalize(w))
            .collect();
        words.extend(get(LANGUAGE::English).iter().map(|w| normalize(w)));
        words
    })
}

/// Tokenize text into index terms.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .filter(|token| !stopwords().contains(*token))
        .map(String::from)
        .collect()
}

/// Tokenize and deduplicate, preserving first-seen order.
///
/// Used on the query side, where repeating a term must not double its
/// contribution to the rank.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
