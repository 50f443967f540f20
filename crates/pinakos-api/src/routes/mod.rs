//! Route assembly.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::state::AppState;

pub mod albums;
pub mod autocomplete;
pub mod search;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/search/", search::routes())
        .nest("/albums/", albums::routes())
        .route("/autocomplete/", get(autocomplete::autocomplete_view))
        .route("/health", get(health))
        .with_state(state)
}

/// Service state probe.
async fn health(State(state): State<AppState>) -> Json<Value> {
    let indexer = state
        .indexer_state
        .as_ref()
        .map(|rx| rx.borrow().as_str())
        .unwrap_or("detached");

    Json(json!({
        "status": "ok",
        "indexer": indexer,
        "artworks": state.catalog.artwork_count(),
        "indexed": state.engine.indexed_count(),
    }))
}
