//! The search orchestrator.
//!
//! One synchronous pipeline per request: validate the paging parameters,
//! score or constant-rank the published artworks, drop exclusions, apply
//! every facet filter, order by the fixed cascade, and cut one page. The
//! total count and the page come out of the same pass, so no second
//! counting query is ever needed.

use parking_lot::RwLock;
use pinakos_catalog::{Artwork, CatalogStore};
use pinakos_core::{ArtworkId, Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use crate::filters::{self, FilterSpec};
use crate::scorer::{self, Relevance};
use crate::tokenize::tokenize_unique;
use crate::vector::{SearchVector, build_vector};

/// Default page size of the search endpoint.
pub const DEFAULT_SEARCH_LIMIT: usize = 30;

/// Validate a limit parameter.
pub fn check_limit(limit: i64) -> Result<usize> {
    if limit <= 0 {
        return Err(Error::validation("limit must be a positive integer"));
    }
    Ok(limit as usize)
}

/// Validate an offset parameter.
pub fn check_offset(offset: i64) -> Result<usize> {
    if offset < 0 {
        return Err(Error::validation("negative offset is not allowed"));
    }
    Ok(offset as usize)
}

/// A search request as received from the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    #[serde(default)]
    pub q: Option<String>,
    /// Facet filters, AND-combined.
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
    /// Artwork ids to omit from the results.
    #[serde(default)]
    pub exclude: Vec<ArtworkId>,
    /// Page size; defaults to [`DEFAULT_SEARCH_LIMIT`].
    #[serde(default)]
    pub limit: Option<i64>,
    /// Page start; defaults to 0.
    #[serde(default)]
    pub offset: Option<i64>,
}

/// One matched artwork with its relevance.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched artwork.
    pub artwork: Artwork,
    /// Its relevance against the request.
    pub relevance: Relevance,
}

/// One page of results plus the total match count.
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Number of matches across all pages.
    pub total: usize,
    /// The requested page.
    pub hits: Vec<SearchHit>,
}

/// The search engine: precomputed vectors over a shared catalog.
pub struct SearchEngine {
    catalog: Arc<CatalogStore>,
    vectors: RwLock<HashMap<ArtworkId, SearchVector>>,
}

impl SearchEngine {
    /// Create an engine over the given catalog. Vectors start empty;
    /// call [`SearchEngine::reindex_all`] or attach the indexer.
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self {
            catalog,
            vectors: RwLock::new(HashMap::new()),
        }
    }

    /// The catalog this engine searches.
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }

    /// Rebuild one artwork's vector, or drop it if the artwork is gone.
    pub fn rebuild(&self, id: ArtworkId) {
        match self.catalog.artwork(id) {
            Some(artwork) => {
                let vector = build_vector(&artwork, &self.catalog);
                self.vectors.write().insert(id, vector);
            }
            None => {
                self.vectors.write().remove(&id);
            }
        }
    }

    /// Rebuild every vector synchronously.
    pub fn reindex_all(&self) {
        let ids = self.catalog.artwork_ids();
        let count = ids.len();
        for id in ids {
            self.rebuild(id);
        }
        log::info!("reindexed {count} artworks");
    }

    /// Number of artworks currently indexed.
    pub fn indexed_count(&self) -> usize {
        self.vectors.read().len()
    }

    /// Snapshot of one artwork's vector, for diagnostics.
    pub fn vector(&self, id: ArtworkId) -> Option<SearchVector> {
        self.vectors.read().get(&id).cloned()
    }

    /// Execute a search request.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let limit = check_limit(request.limit.unwrap_or(DEFAULT_SEARCH_LIMIT as i64))?;
        let offset = check_offset(request.offset.unwrap_or(0))?;

        // fail fast on any invalid filter before touching the index
        let parsed = request
            .filters
            .iter()
            .map(|spec| filters::parse_filter(spec, &self.catalog))
            .collect::<Result<Vec<_>>>()?;

        let query = request
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty());
        let query_tokens = query.map(tokenize_unique).unwrap_or_default();
        let exclude: HashSet<ArtworkId> = request.exclude.iter().copied().collect();

        let empty_vector = SearchVector::default();
        let vectors = self.vectors.read();

        let mut matches: Vec<SearchHit> = Vec::new();
        for artwork in self.catalog.artworks() {
            if !artwork.published || exclude.contains(&artwork.id) {
                continue;
            }

            let relevance = match query {
                Some(q) => {
                    let vector = vectors.get(&artwork.id).unwrap_or(&empty_vector);
                    let artists = self.catalog.resolve_persons(&artwork.artists);
                    scorer::score(
                        q,
                        &query_tokens,
                        vector,
                        &artwork.title,
                        &artwork.title_english,
                        &artists,
                    )
                }
                None => Relevance::constant(),
            };
            if !relevance.is_match() {
                continue;
            }

            if !parsed
                .iter()
                .all(|filter| filter.matches(&artwork, &self.catalog))
            {
                continue;
            }

            matches.push(SearchHit { artwork, relevance });
        }
        drop(vectors);

        if query.is_some() {
            matches.sort_by(order_by_relevance);
        } else if !request.filters.is_empty() {
            matches.sort_by(|a, b| a.artwork.title.cmp(&b.artwork.title));
        } else {
            // no search activity at all: newest changes first
            matches.sort_by(|a, b| {
                b.artwork
                    .date_changed
                    .cmp(&a.artwork.date_changed)
                    .then_with(|| a.artwork.title.cmp(&b.artwork.title))
            });
        }

        let total = matches.len();
        let hits = matches.into_iter().skip(offset).take(limit).collect();

        Ok(SearchPage { total, hits })
    }
}

fn desc(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// The fixed ordering cascade for ranked results.
fn order_by_relevance(a: &SearchHit, b: &SearchHit) -> Ordering {
    desc(a.relevance.rank, b.relevance.rank)
        .then_with(|| desc(a.relevance.sim_title, b.relevance.sim_title))
        .then_with(|| desc(a.relevance.sim_title_english, b.relevance.sim_title_english))
        .then_with(|| desc(a.relevance.sim_persons, b.relevance.sim_persons))
        .then_with(|| b.artwork.date_changed.cmp(&a.artwork.date_changed))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pinakos_catalog::Person;
    use pinakos_core::{KeywordId, LocationId};
    use pinakos_taxonomy::Taxon;
    use proptest::prelude::*;
    use serde_json::json;

    fn engine() -> SearchEngine {
        SearchEngine::new(Arc::new(CatalogStore::new()))
    }

    fn publish(catalog: &CatalogStore, mut artwork: Artwork) -> ArtworkId {
        artwork.published = true;
        catalog.create_artwork(artwork)
    }

    fn request(q: Option<&str>) -> SearchRequest {
        SearchRequest {
            q: q.map(String::from),
            ..Default::default()
        }
    }

    fn filter(id: &str, values: serde_json::Value) -> FilterSpec {
        FilterSpec {
            id: id.to_string(),
            filter_values: values,
        }
    }

    #[test]
    fn test_query_with_artist_filter() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let artist = catalog.create_person(Person::new("TestArtist"));
        let mut first = Artwork::new("Test Artwork 1");
        first.artists = vec![artist];
        publish(&catalog, first);

        let mut second = Artwork::new("Test Artwork 2");
        second.artists = vec![artist];
        let second_id = publish(&catalog, second);

        // the second artwork is touched last and wins the recency tie-break
        let touched = catalog.artwork(second_id).unwrap();
        catalog.save_artwork(touched).unwrap();
        engine.reindex_all();

        let mut req = request(Some("test"));
        req.filters = vec![filter("artists", json!(["artist"]))];
        let page = engine.search(&req).unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.hits[0].artwork.title, "Test Artwork 2");
        assert_eq!(page.hits[1].artwork.title, "Test Artwork 1");
    }

    #[test]
    fn test_filter_by_artist_id() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let artist = catalog.create_person(Person::new("TestArtist"));
        let mut artwork = Artwork::new("Mit Künstler");
        artwork.artists = vec![artist];
        publish(&catalog, artwork);
        publish(&catalog, Artwork::new("Ohne Künstler"));
        engine.reindex_all();

        let mut req = request(None);
        req.filters = vec![filter("artists", json!([{"id": artist.value()}]))];
        let page = engine.search(&req).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0].artwork.title, "Mit Künstler");
        // constant rank without a query
        assert_eq!(page.hits[0].relevance.rank, 1.0);
    }

    #[test]
    fn test_unpublished_never_surfaces() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let mut hidden = Artwork::new("Geheimnis");
        hidden.published = false;
        catalog.create_artwork(hidden);
        engine.reindex_all();

        assert_eq!(engine.search(&request(Some("geheimnis"))).unwrap().total, 0);
        assert_eq!(engine.search(&request(None)).unwrap().total, 0);
    }

    #[test]
    fn test_substring_of_title_matches() {
        let engine = engine();
        let catalog = engine.catalog().clone();
        publish(&catalog, Artwork::new("Lucretia"));
        engine.reindex_all();

        let page = engine.search(&request(Some("lucretia"))).unwrap();
        assert_eq!(page.total, 1);
        assert!(page.hits[0].relevance.rank >= 1.0);
    }

    #[test]
    fn test_exclusion_list() {
        let engine = engine();
        let catalog = engine.catalog().clone();
        let keep = publish(&catalog, Artwork::new("Bleibt"));
        let drop = publish(&catalog, Artwork::new("Fällt weg"));
        engine.reindex_all();

        let mut req = request(None);
        req.exclude = vec![drop];
        let page = engine.search(&req).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0].artwork.id, keep);
    }

    #[test]
    fn test_hierarchical_location_filter() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let austria = catalog
            .create_location(Taxon::new(LocationId(0), "Österreich"), None)
            .unwrap();
        let carinthia = catalog
            .create_location(Taxon::new(LocationId(0), "Kärnten"), Some(austria))
            .unwrap();
        let eisenkappel = catalog
            .create_location(Taxon::new(LocationId(0), "Bad Eisenkappel"), Some(carinthia))
            .unwrap();
        let vienna = catalog
            .create_location(Taxon::new(LocationId(0), "Wien"), Some(austria))
            .unwrap();

        let mut at_leaf = Artwork::new("loc test zelez");
        at_leaf.location = Some(eisenkappel);
        let leaf_id = publish(&catalog, at_leaf);

        let mut in_vienna = Artwork::new("Wiener Ansicht");
        in_vienna.location = Some(vienna);
        publish(&catalog, in_vienna);
        engine.reindex_all();

        // filtering by Carinthia returns exactly the subtree's artworks
        let mut req = request(None);
        req.filters = vec![filter("location", json!([{"id": carinthia.value()}]))];
        let page = engine.search(&req).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0].artwork.id, leaf_id);

        // filtering by the country returns both
        let mut req = request(None);
        req.filters = vec![filter("location", json!([{"id": austria.value()}]))];
        assert_eq!(engine.search(&req).unwrap().total, 2);
    }

    #[test]
    fn test_location_text_filter() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let node = catalog
            .create_location(
                Taxon {
                    id: LocationId(0),
                    name: "Bad Eisenkappel".to_string(),
                    name_en: String::new(),
                    synonyms: vec!["Železna Kapla".to_string()],
                },
                None,
            )
            .unwrap();

        let mut artwork = Artwork::new("loc test zelez");
        artwork.location = Some(node);
        publish(&catalog, artwork);
        engine.reindex_all();

        for value in ["Eisenkappel", "zelezna"] {
            let mut req = request(None);
            req.filters = vec![filter("location", json!([value]))];
            let page = engine.search(&req).unwrap();
            assert_eq!(page.total, 1, "value {value:?} should match");
            assert_eq!(page.hits[0].artwork.title, "loc test zelez");
        }
    }

    #[test]
    fn test_place_of_production_filter() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let node = catalog
            .create_location(Taxon::new(LocationId(0), "Bad Eisenkappel"), None)
            .unwrap();
        let mut artwork = Artwork::new("Place of Production Test Artwork");
        artwork.place_of_production = vec![node];
        publish(&catalog, artwork);
        engine.reindex_all();

        let mut req = request(None);
        req.filters = vec![filter("place_of_production", json!(["Eisenkappel"]))];
        let page = engine.search(&req).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(
            page.hits[0].artwork.title,
            "Place of Production Test Artwork"
        );
    }

    #[test]
    fn test_multi_keyword_match_is_not_duplicated() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let arch = catalog
            .create_keyword(Taxon::new(KeywordId(0), "Architektur"), None)
            .unwrap();
        let sacral = catalog
            .create_keyword(Taxon::new(KeywordId(0), "Sakralbau"), Some(arch))
            .unwrap();
        let profan = catalog
            .create_keyword(Taxon::new(KeywordId(0), "Profanbau"), Some(arch))
            .unwrap();

        // two keywords under the same referenced node
        let mut artwork = Artwork::new("kw test arch + profan");
        artwork.keywords = vec![sacral, profan];
        publish(&catalog, artwork);
        engine.reindex_all();

        let mut req = request(None);
        req.filters = vec![filter("keywords", json!([{"id": arch.value()}]))];
        let page = engine.search(&req).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.hits.len(), 1);
    }

    #[test]
    fn test_invalid_facet_key_rejected() {
        let engine = engine();
        let mut req = request(None);
        req.filters = vec![filter("frame_colour", json!(["gold"]))];

        let err = engine.search(&req).unwrap_err();
        assert_eq!(err.to_string(), "Invalid filter id 'frame_colour'");
    }

    #[test]
    fn test_invalid_date_range_rejected() {
        let engine = engine();
        let mut req = request(None);
        req.filters = vec![filter(
            "date",
            json!({"date_from": "2000", "date_to": "1999"}),
        )];

        let err = engine.search(&req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "date_from needs to be less than or equal to date_to."
        );
    }

    #[test]
    fn test_date_filter_end_to_end() {
        let engine = engine();
        let catalog = engine.catalog().clone();

        let mut exact = Artwork::new("Genau");
        exact.date = "1642/1643".to_string();
        exact.date_year_from = Some(1642);
        exact.date_year_to = Some(1643);
        publish(&catalog, exact);

        let mut outside = Artwork::new("Außerhalb");
        outside.date_year_from = Some(1800);
        outside.date_year_to = Some(1810);
        publish(&catalog, outside);
        engine.reindex_all();

        let mut req = request(None);
        req.filters = vec![filter(
            "date",
            json!({"date_from": "1642", "date_to": "1643"}),
        )];
        let page = engine.search(&req).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0].artwork.date, "1642/1643");
    }

    #[test]
    fn test_limit_validation() {
        let engine = engine();
        for bad in [0, -1] {
            let mut req = request(None);
            req.limit = Some(bad);
            let err = engine.search(&req).unwrap_err();
            assert_eq!(err.to_string(), "limit must be a positive integer");
        }
    }

    #[test]
    fn test_negative_offset_rejected() {
        let engine = engine();
        let mut req = request(None);
        req.offset = Some(-5);
        let err = engine.search(&req).unwrap_err();
        assert_eq!(err.to_string(), "negative offset is not allowed");
    }

    #[test]
    fn test_offset_beyond_total() {
        let engine = engine();
        let catalog = engine.catalog().clone();
        publish(&catalog, Artwork::new("Einzig"));
        engine.reindex_all();

        let mut req = request(None);
        req.offset = Some(10);
        let page = engine.search(&req).unwrap();
        assert_eq!(page.total, 1);
        assert!(page.hits.is_empty());
    }

    #[test]
    fn test_pagination_window() {
        let engine = engine();
        let catalog = engine.catalog().clone();
        for i in 0..5 {
            publish(&catalog, Artwork::new(format!("Blatt {i}")));
        }
        engine.reindex_all();

        let mut req = request(None);
        req.filters = vec![filter("title", json!(["blatt"]))];
        req.limit = Some(2);
        req.offset = Some(2);
        let page = engine.search(&req).unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.hits.len(), 2);
        // filtered, unranked results are ordered by title
        assert_eq!(page.hits[0].artwork.title, "Blatt 2");
        assert_eq!(page.hits[1].artwork.title, "Blatt 3");
    }

    #[test]
    fn test_recency_ordering_without_search() {
        let engine = engine();
        let catalog = engine.catalog().clone();
        let older = publish(&catalog, Artwork::new("Alt"));
        let newer = publish(&catalog, Artwork::new("Neu"));

        // touch the older one so it becomes the most recently changed
        let touched = catalog.artwork(older).unwrap();
        catalog.save_artwork(touched).unwrap();
        engine.reindex_all();

        let page = engine.search(&request(None)).unwrap();
        assert_eq!(page.hits[0].artwork.id, older);
        assert_eq!(page.hits[1].artwork.id, newer);
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    proptest! {
        /// Any published artwork is found by querying one word of its title.
        #[test]
        fn prop_title_word_query_finds_artwork(
            words in proptest::collection::vec(
                prop_oneof![
                    Just("fresko"), Just("lucretia"), Just("vedute"),
                    Just("bildnis"), Just("landschaft"), Just("stilleben"),
                ],
                1..4,
            ),
            pick in 0usize..4,
        ) {
            let engine = engine();
            let catalog = engine.catalog().clone();

            let title = words.join(" ");
            let mut artwork = Artwork::new(title);
            artwork.published = true;
            let id = catalog.create_artwork(artwork);
            engine.reindex_all();

            let query = words[pick % words.len()];
            let page = engine.search(&SearchRequest {
                q: Some(query.to_string()),
                ..Default::default()
            }).unwrap();

            prop_assert!(page.hits.iter().any(|hit| hit.artwork.id == id));
        }
    }
}
