//! Album routes.
//!
//! Albums are the personal workspace: every route requires a request
//! user. Owners see an album's full share list; editors see the other
//! editors; viewers see only themselves. Sharing replaces the whole list
//! and is owner-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pinakos_catalog::{Album, AlbumPermission, CatalogStore};
use pinakos_core::{AlbumId, Error};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extract::RequestUser;
use crate::state::AppState;

/// Album routes, nested under `/albums`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_albums).post(create_album))
        .route("/{id}/", get(album_detail))
        .route("/{id}/permissions/", post(set_permissions))
}

fn require_user(user: Option<String>) -> ApiResult<String> {
    user.ok_or_else(|| Error::permission("Authentication required").into())
}

/// `{id, name}` user reference.
#[derive(Debug, Serialize)]
pub struct UserRef {
    /// Username.
    pub id: String,
    /// Display name.
    pub name: String,
}

fn user_ref(catalog: &CatalogStore, username: &str) -> UserRef {
    UserRef {
        id: username.to_string(),
        name: catalog
            .user(username)
            .map(|user| user.full_name())
            .unwrap_or_else(|| username.to_string()),
    }
}

/// A granted permission, `{"id": "EDIT"}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionRef {
    /// Permission value.
    pub id: String,
}

/// One share entry of an album response.
#[derive(Debug, Serialize)]
pub struct PermissionEntry {
    /// The user the album is shared with.
    pub user: UserRef,
    /// Their granted permissions.
    pub permissions: Vec<PermissionRef>,
}

/// External shape of an album.
#[derive(Debug, Serialize)]
pub struct AlbumResponse {
    /// Album id.
    pub id: AlbumId,
    /// Title.
    pub title: String,
    /// Artworks across all slides.
    pub number_of_artworks: usize,
    /// The owner.
    pub owner: UserRef,
    /// Share entries visible to the requester.
    pub permissions: Vec<PermissionEntry>,
}

fn album_response(album: &Album, catalog: &CatalogStore, requester: &str) -> AlbumResponse {
    let permissions = catalog
        .visible_album_permissions(album, requester)
        .into_iter()
        .map(|rel| PermissionEntry {
            user: user_ref(catalog, &rel.user),
            permissions: vec![PermissionRef {
                id: rel.permissions.as_str().to_string(),
            }],
        })
        .collect();

    AlbumResponse {
        id: album.id,
        title: album.title.clone(),
        number_of_artworks: album.size(),
        owner: user_ref(catalog, &album.owner),
        permissions,
    }
}

async fn list_albums(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
) -> ApiResult<Json<Vec<AlbumResponse>>> {
    let username = require_user(user)?;
    let albums = state
        .catalog
        .albums_for_user(&username)
        .iter()
        .map(|album| album_response(album, &state.catalog, &username))
        .collect();
    Ok(Json(albums))
}

/// Body of `POST /albums/`.
#[derive(Debug, Deserialize)]
pub struct CreateAlbumRequest {
    /// Album title.
    pub title: String,
}

async fn create_album(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Json(request): Json<CreateAlbumRequest>,
) -> ApiResult<(StatusCode, Json<AlbumResponse>)> {
    let username = require_user(user)?;
    if request.title.trim().is_empty() {
        return Err(Error::validation("title must not be empty").into());
    }

    let id = state.catalog.create_album(request.title.trim(), &username);
    let album = state
        .catalog
        .album(id)
        .ok_or_else(|| Error::not_found("album", id))?;
    Ok((
        StatusCode::CREATED,
        Json(album_response(&album, &state.catalog, &username)),
    ))
}

async fn album_detail(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Path(id): Path<u64>,
) -> ApiResult<Json<AlbumResponse>> {
    let username = require_user(user)?;
    let album_id = AlbumId(id);
    let album = state
        .catalog
        .album(album_id)
        .ok_or_else(|| Error::not_found("album", album_id))?;

    if album.owner != username
        && !state
            .catalog
            .has_album_permission(album_id, &username, AlbumPermission::View)
    {
        return Err(Error::permission("You do not have access to this album").into());
    }

    Ok(Json(album_response(&album, &state.catalog, &username)))
}

/// One entry of the share-list body.
#[derive(Debug, Deserialize)]
pub struct ShareEntry {
    /// Username to share with.
    pub user: String,
    /// Granted permissions; the strongest one wins.
    pub permissions: Vec<PermissionRef>,
}

async fn set_permissions(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Path(id): Path<u64>,
    Json(entries): Json<Vec<ShareEntry>>,
) -> ApiResult<Json<Vec<PermissionEntry>>> {
    let username = require_user(user)?;

    let mut grants = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut level: Option<AlbumPermission> = None;
        for permission in &entry.permissions {
            let parsed: AlbumPermission = permission.id.parse()?;
            // EDIT implies VIEW, keep the strongest grant
            if level != Some(AlbumPermission::Edit) {
                level = Some(parsed);
            }
        }
        let level = level
            .ok_or_else(|| Error::validation("at least one permission value is required"))?;
        grants.push((entry.user, level));
    }

    let saved = state
        .catalog
        .set_album_permissions(AlbumId(id), &username, grants)?;

    let response = saved
        .into_iter()
        .map(|rel| PermissionEntry {
            user: user_ref(&state.catalog, &rel.user),
            permissions: vec![PermissionRef {
                id: rel.permissions.as_str().to_string(),
            }],
        })
        .collect();
    Ok(Json(response))
}
