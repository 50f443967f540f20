//! Composite relevance scoring.
//!
//! A query's score against an artwork combines the weighted full-text
//! rank with four trigram word similarities, computed independently and
//! summed. The similarities double as tie-breakers: the ordering cascade
//! is score, title similarity, English-title similarity, person
//! similarity, recency — fixed, not configurable per call.

use pinakos_catalog::Person;

use crate::trigram::word_similarity;
use crate::vector::SearchVector;

/// Minimum composite score for an artwork to count as a match.
pub const RANK_THRESHOLD: f32 = 0.1;

/// Relevance of one artwork against one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relevance {
    /// Composite score: full-text rank plus all similarity terms.
    pub rank: f32,
    /// Trigram similarity of the query against the title.
    pub sim_title: f32,
    /// Trigram similarity against the English title.
    pub sim_title_english: f32,
    /// Best trigram similarity against artist names or synonyms.
    pub sim_persons: f32,
}

impl Relevance {
    /// The constant relevance used when no query is present.
    pub fn constant() -> Self {
        Self {
            rank: 1.0,
            sim_title: 0.0,
            sim_title_english: 0.0,
            sim_persons: 0.0,
        }
    }

    /// Returns `true` if the score clears the match threshold.
    pub fn is_match(&self) -> bool {
        self.rank >= RANK_THRESHOLD
    }
}

/// Score a query against one artwork.
///
/// `query_tokens` must be the deduplicated tokenization of `query`;
/// callers tokenize once per request, not per artwork.
pub fn score(
    query: &str,
    query_tokens: &[String],
    vector: &SearchVector,
    title: &str,
    title_english: &str,
    artists: &[Person],
) -> Relevance {
    let fts_rank = vector.rank(query_tokens);

    let sim_title = word_similarity(query, title);
    let sim_title_english = word_similarity(query, title_english);

    let mut sim_artists_name = 0.0f32;
    let mut sim_artists_synonyms = 0.0f32;
    for artist in artists {
        sim_artists_name = sim_artists_name.max(word_similarity(query, &artist.name));
        if !artist.synonyms.is_empty() {
            let joined = artist.synonyms.join(" ");
            sim_artists_synonyms = sim_artists_synonyms.max(word_similarity(query, &joined));
        }
    }

    Relevance {
        rank: fts_rank + sim_title + sim_title_english + sim_artists_name + sim_artists_synonyms,
        sim_title,
        sim_title_english,
        sim_persons: sim_artists_name.max(sim_artists_synonyms),
    }
}

// ============================================================================
// Tests
// ============================================================================
