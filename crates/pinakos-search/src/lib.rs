//! Search and ranking for the Pinakos catalog.
//!
//! This crate implements the full retrieval contract over published
//! artworks: a precomputed weighted text index, a composite relevance
//! score, per-facet filter predicates with hierarchical expansion, a
//! single-pass paginated orchestrator, autocomplete sources, and the
//! background reindexer that keeps vectors in sync with catalog edits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      pinakos-search                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  SearchEngine (orchestrator)                                │
//! │  ├── SearchVector (weighted text index, A > B > C)          │
//! │  ├── Relevance (full-text rank + trigram similarities)      │
//! │  └── FacetFilter (per-facet predicates, tree expansion)     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  autocomplete (six typed sources, 0.6 similarity gate)      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Indexer (async vector recomputation on catalog events)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Ranking
//!
//! With a query, an artwork's score is the sum of its normalized weighted
//! full-text rank and four trigram word similarities (title, English
//! title, artist names, artist synonyms); only scores of at least 0.1
//! qualify. Ordering is a fixed cascade: score, then the three similarity
//! groups, then recency. Without a query the score is a constant and
//! ordering falls back to title (filtered) or recency (unfiltered).

pub mod autocomplete;
pub mod engine;
pub mod filters;
pub mod indexer;
pub mod scorer;
pub mod tokenize;
pub mod trigram;
pub mod vector;

// Re-exports
pub use autocomplete::{AutocompleteEntry, AutocompleteKind, AutocompleteResponse};
pub use engine::{SearchEngine, SearchHit, SearchPage, SearchRequest, DEFAULT_SEARCH_LIMIT};
pub use filters::{FilterSpec, FACET_KEYS};
pub use indexer::{Indexer, IndexerState};
pub use scorer::{Relevance, RANK_THRESHOLD};
pub use vector::SearchVector;
