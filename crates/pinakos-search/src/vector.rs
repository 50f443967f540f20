//! The precomputed weighted text index.
//!
//! Every artwork carries a [`SearchVector`]: a map from token to an
//! accumulated weight. Three weight classes order the fields by
//! importance — titles and person names rank above keyword, location and
//! comment text, which in turn ranks above credits, materials, dimensions
//! and dates. Vectors are derived state: they are rebuilt by the indexer
//! whenever the artwork or a related entity changes and never edited
//! directly.

use pinakos_catalog::{Artwork, CatalogStore};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::tokenize::tokenize;

/// Field weight classes, most important first.
pub mod weight {
    /// Titles and person names.
    pub const A: f32 = 1.0;
    /// Comments, keywords, locations.
    pub const B: f32 = 0.4;
    /// Credits, materials, dimensions, links, dates.
    pub const C: f32 = 0.2;
}

/// Weighted token index of a single artwork.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchVector {
    weights: HashMap<String, f32>,
}

impl SearchVector {
    /// Add every token of `text` with the given weight.
    ///
    /// Repeated occurrences accumulate, so a term that appears in several
    /// fields (or several times in one) weighs more.
    pub fn add(&mut self, text: &str, weight: f32) {
        for token in tokenize(text) {
            *self.weights.entry(token).or_insert(0.0) += weight;
        }
    }

    /// Full-text rank of a query against this vector.
    ///
    /// The raw rank is the sum of the accumulated weights of the query
    /// tokens present in the vector, normalized to `raw / (1 + raw)` so
    /// that ranks stay comparable across documents of different length
    /// and never exceed 1.0.
    pub fn rank(&self, query_tokens: &[String]) -> f32 {
        let raw: f32 = query_tokens
            .iter()
            .filter_map(|token| self.weights.get(token))
            .sum();
        raw / (1.0 + raw)
    }

    /// Returns `true` if the query token is present in the vector.
    pub fn contains(&self, token: &str) -> bool {
        self.weights.contains_key(token)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if the vector holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Build the search vector of an artwork from the catalog.
///
/// Pulls in, per weight class:
/// - **A**: title, English title, and the names plus synonyms of every
///   person attached in any of the four roles
/// - **B**: both comment fields; the names (and English names) of the
///   artwork's keywords *and their descendants*; the names, English names
///   and synonyms of its production/current locations *and their
///   descendants*
/// - **C**: credits, credit link, material names and descriptions,
///   dimensions, external link, and the display date
///
/// Descendant names are indexed so that a search for a district also
/// finds artworks catalogued under the enclosing region.
pub fn build_vector(artwork: &Artwork, catalog: &CatalogStore) -> SearchVector {
    let mut vector = SearchVector::default();

    // A: titles and persons
    vector.add(&artwork.title, weight::A);
    vector.add(&artwork.title_english, weight::A);

    let person_ids: HashSet<_> = artwork.person_ids().collect();
    for person_id in person_ids {
        if let Some(person) = catalog.person(person_id) {
            vector.add(&person.name, weight::A);
            for synonym in &person.synonyms {
                vector.add(synonym, weight::A);
            }
        }
    }

    // B: comments
    vector.add(&artwork.comments_de, weight::B);
    vector.add(&artwork.comments_en, weight::B);

    // B: keywords with their subtrees
    catalog.with_keywords(|tree| {
        let mut seen = HashSet::new();
        for &keyword_id in &artwork.keywords {
            for id in tree.descendants(keyword_id, true) {
                if seen.insert(id) {
                    if let Some(node) = tree.get(id) {
                        vector.add(&node.name, weight::B);
                        vector.add(&node.name_en, weight::B);
                    }
                }
            }
        }
    });

    // B: locations with their subtrees
    catalog.with_locations(|tree| {
        let mut seen = HashSet::new();
        for location_id in artwork.location_ids() {
            for id in tree.descendants(location_id, true) {
                if seen.insert(id) {
                    if let Some(node) = tree.get(id) {
                        vector.add(&node.name, weight::B);
                        vector.add(&node.name_en, weight::B);
                        for synonym in &node.synonyms {
                            vector.add(synonym, weight::B);
                        }
                    }
                }
            }
        }
    });

    // C: everything else
    vector.add(&artwork.credits, weight::C);
    vector.add(&artwork.credits_link, weight::C);
    for &material_id in &artwork.materials {
        if let Some(material) = catalog.material(material_id) {
            vector.add(&material.name, weight::C);
            vector.add(&material.name_en, weight::C);
        }
    }
    vector.add(&artwork.material_description_de, weight::C);
    vector.add(&artwork.material_description_en, weight::C);
    vector.add(&artwork.dimensions_display, weight::C);
    vector.add(&artwork.link, weight::C);
    vector.add(&artwork.date, weight::C);

    vector
}

// ============================================================================
// Tests
// ============================================================================
