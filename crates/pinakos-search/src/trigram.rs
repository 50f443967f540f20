//! Trigram string similarity.
//!
//! The fuzzy half of the relevance score. Strings are folded and split
//! into words; each word is padded with two leading and one trailing
//! space before its three-character windows are extracted, so word
//! boundaries weigh in and no trigram spans two words. Similarity between
//! two trigram sets is their Jaccard coefficient.
//!
//! [`word_similarity`] compares a needle against the *most similar
//! contiguous run of words* of the haystack, which is what makes a
//! one-word query score highly against a long title containing that word.

use pinakos_core::text::normalize;
use std::collections::HashSet;

/// Similarity gate for autocomplete user lookups.
pub const SIMILARITY_THRESHOLD: f32 = 0.6;

fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

fn word_trigrams(word: &str) -> HashSet<String> {
    let padded: Vec<char> = format!("  {word} ").chars().collect();
    padded
        .windows(3)
        .map(|window| window.iter().collect())
        .collect()
}

/// The trigram set of a whole string (union over its words).
pub fn trigrams(text: &str) -> HashSet<String> {
    let mut set = HashSet::new();
    for word in words(text) {
        set.extend(word_trigrams(&word));
    }
    set
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f32 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f32 / union as f32
    }
}

/// Jaccard similarity of the two strings' trigram sets.
pub fn similarity(a: &str, b: &str) -> f32 {
    jaccard(&trigrams(a), &trigrams(b))
}

/// Similarity between `needle` and the most similar contiguous word run
/// of `haystack`.
///
/// Returns 0.0 when either side has no trigrams.
pub fn word_similarity(needle: &str, haystack: &str) -> f32 {
    let needle_set = trigrams(needle);
    if needle_set.is_empty() {
        return 0.0;
    }

    let word_sets: Vec<HashSet<String>> = words(haystack)
        .iter()
        .map(|w| word_trigrams(w))
        .collect();
    if word_sets.is_empty() {
        return 0.0;
    }

    let mut best = 0.0f32;
    for start in 0..word_sets.len() {
        let mut extent: HashSet<String> = HashSet::new();
        for set in &word_sets[start..] {
            extent.extend(set.iter().cloned());
            best = best.max(jaccard(&needle_set, &extent));
        }
    }
    best
}

// ============================================================================
// Tests
// ============================================================================
