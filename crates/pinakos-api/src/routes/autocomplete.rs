//! Autocomplete route.

use axum::Json;
use axum::extract::{Query, State};
use pinakos_core::Error;
use pinakos_search::autocomplete::{autocomplete, parse_kinds};
use pinakos_search::engine::check_limit;
use pinakos_search::AutocompleteResponse;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::{RequestLang, RequestUser};
use crate::state::AppState;

/// Query parameters of `GET /autocomplete/`.
#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
    /// Lookup string.
    pub q: Option<String>,
    /// Comma-separated list of recognized type ids.
    #[serde(rename = "type")]
    pub types: Option<String>,
    /// Per-type result cap.
    pub limit: Option<i64>,
}

/// `GET /autocomplete/?q=&type=&limit=`.
pub async fn autocomplete_view(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    RequestUser(user): RequestUser,
    Query(params): Query<AutocompleteParams>,
) -> ApiResult<Json<AutocompleteResponse>> {
    let q = params
        .q
        .ok_or_else(|| Error::validation("q parameter is required"))?;
    let types = params
        .types
        .ok_or_else(|| Error::validation("type parameter is required"))?;

    let kinds = parse_kinds(&types)?;
    let limit = check_limit(
        params
            .limit
            .unwrap_or(state.config.autocomplete_limit as i64),
    )?;

    Ok(Json(autocomplete(
        &state.catalog,
        &q,
        &kinds,
        limit,
        user.as_deref(),
        lang,
    )))
}
