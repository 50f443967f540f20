//! Background search-vector maintenance.
//!
//! Catalog saves enqueue [`CatalogEvent`]s; the indexer's task drains the
//! queue and rebuilds the vectors of every affected artwork. The queue is
//! unbounded: renaming a top-level taxonomy node fans out to every artwork
//! beneath it, and the enqueue side never blocks a request. Staleness
//! between a save and its reindex is tolerated.
//!
//! Editing a Keyword or Location affects not only artworks attached to
//! that node but also those attached to any of its *ancestors*, because
//! an artwork's indexed text includes the names of its facet nodes'
//! entire subtrees.

use pinakos_catalog::{CatalogEvent, CatalogStore};
use pinakos_core::ArtworkId;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::engine::SearchEngine;

/// Lifecycle state of the indexer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexerState {
    /// The task has been spawned but not yet entered its loop.
    Starting,
    /// Draining events.
    Ready,
    /// The event queue closed and the task has ended.
    Stopped,
}

impl IndexerState {
    /// Wire representation for the health endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Stopped => "stopped",
        }
    }
}

/// Handle to the background reindex task.
pub struct Indexer {
    engine: Arc<SearchEngine>,
    state: watch::Receiver<IndexerState>,
    handle: JoinHandle<()>,
}

impl Indexer {
    /// Wire a new indexer into the engine's catalog and spawn its task.
    pub fn attach(engine: Arc<SearchEngine>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        engine.catalog().set_event_sink(tx);
        Self::spawn(engine, rx)
    }

    /// Spawn the drain task over an existing event receiver.
    pub fn spawn(
        engine: Arc<SearchEngine>,
        mut events: mpsc::UnboundedReceiver<CatalogEvent>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(IndexerState::Starting);
        let task_engine = engine.clone();

        let handle = tokio::spawn(async move {
            state_tx.send_replace(IndexerState::Ready);
            log::info!("search indexer ready");

            while let Some(event) = events.recv().await {
                let affected = affected_artworks(event, task_engine.catalog());
                log::debug!("{event:?} affects {} artworks", affected.len());
                for id in affected {
                    task_engine.rebuild(id);
                }
            }

            state_tx.send_replace(IndexerState::Stopped);
            log::info!("search indexer stopped");
        });

        Self {
            engine,
            state: state_rx,
            handle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> IndexerState {
        *self.state.borrow()
    }

    /// A receiver for observing state changes (health endpoint).
    pub fn state_receiver(&self) -> watch::Receiver<IndexerState> {
        self.state.clone()
    }

    /// Detach from the catalog and wait for the drain task to finish.
    pub async fn shutdown(self) {
        self.engine.catalog().clear_event_sink();
        let _ = self.handle.await;
    }
}

/// Map a catalog event to the artworks whose vectors it invalidates.
fn affected_artworks(event: CatalogEvent, catalog: &CatalogStore) -> Vec<ArtworkId> {
    match event {
        CatalogEvent::ArtworkSaved(id) => vec![id],
        CatalogEvent::PersonSaved(person_id) => catalog
            .artworks()
            .into_iter()
            .filter(|artwork| artwork.person_ids().any(|id| id == person_id))
            .map(|artwork| artwork.id)
            .collect(),
        CatalogEvent::MaterialSaved(material_id) => catalog
            .artworks()
            .into_iter()
            .filter(|artwork| artwork.materials.contains(&material_id))
            .map(|artwork| artwork.id)
            .collect(),
        CatalogEvent::KeywordSaved(keyword_id) => {
            let ancestors: HashSet<_> = catalog
                .with_keywords(|tree| tree.ancestors(keyword_id, true))
                .into_iter()
                .collect();
            catalog
                .artworks()
                .into_iter()
                .filter(|artwork| artwork.keywords.iter().any(|id| ancestors.contains(id)))
                .map(|artwork| artwork.id)
                .collect()
        }
        CatalogEvent::LocationSaved(location_id) => {
            let ancestors: HashSet<_> = catalog
                .with_locations(|tree| tree.ancestors(location_id, true))
                .into_iter()
                .collect();
            catalog
                .artworks()
                .into_iter()
                .filter(|artwork| artwork.location_ids().any(|id| ancestors.contains(&id)))
                .map(|artwork| artwork.id)
                .collect()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
