//! Shared application state.

use pinakos_catalog::CatalogStore;
use pinakos_search::{IndexerState, SearchEngine};
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::Config;

/// State handed to every handler. Cheap to clone (Arc internals).
#[derive(Clone)]
pub struct AppState {
    /// The catalog.
    pub catalog: Arc<CatalogStore>,
    /// The search engine over the catalog.
    pub engine: Arc<SearchEngine>,
    /// Runtime configuration.
    pub config: Arc<Config>,
    /// Indexer lifecycle, when a background indexer is attached.
    pub indexer_state: Option<watch::Receiver<IndexerState>>,
}

impl AppState {
    /// Build state over an engine, without a background indexer.
    pub fn new(engine: Arc<SearchEngine>, config: Config) -> Self {
        Self {
            catalog: engine.catalog().clone(),
            engine,
            config: Arc::new(config),
            indexer_state: None,
        }
    }

    /// Attach the indexer's state receiver for the health endpoint.
    pub fn with_indexer_state(mut self, state: watch::Receiver<IndexerState>) -> Self {
        self.indexer_state = Some(state);
        self
    }
}
