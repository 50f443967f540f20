//! Search routes.
//!
//! `POST /search/` runs the full pipeline; `GET /search/filters/` serves
//! the static facet schema the frontend form builder renders.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use pinakos_search::filters::filters_schema;
use pinakos_search::SearchRequest;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiResult;
use crate::extract::RequestLang;
use crate::project::{SearchResultItem, project_hit};
use crate::state::AppState;

/// Search routes, nested under `/search`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(search))
        .route("/filters/", get(search_filters))
}

/// Search response envelope.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Matches across all pages.
    pub total: usize,
    /// The requested page.
    pub results: Vec<SearchResultItem>,
}

async fn search(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(mut request): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    if request.limit.is_none() {
        request.limit = Some(state.config.search_limit as i64);
    }

    let page = state.engine.search(&request)?;
    let results = page
        .hits
        .iter()
        .map(|hit| project_hit(hit, &state.catalog, &state.config.media_base_url, lang))
        .collect();

    Ok(Json(SearchResponse {
        total: page.total,
        results,
    }))
}

async fn search_filters(RequestLang(lang): RequestLang) -> Json<Value> {
    Json(filters_schema(lang))
}
