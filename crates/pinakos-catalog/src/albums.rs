//! Albums and their share permissions.
//!
//! An album belongs to exactly one owner and can be shared with other users
//! at one of two levels: `VIEW` or `EDIT`. Owners may always do everything;
//! sharing is replaced wholesale through the permissions endpoint, and only
//! the owner may share.

use chrono::{DateTime, Utc};
use pinakos_core::{AlbumId, ArtworkId, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::CatalogStore;

/// Share level for an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlbumPermission {
    /// May open the album and its slides.
    View,
    /// May also modify slides and see other editors.
    Edit,
}

impl AlbumPermission {
    /// The wire value, e.g. `"EDIT"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Edit => "EDIT",
        }
    }
}

impl fmt::Display for AlbumPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlbumPermission {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "VIEW" => Ok(Self::View),
            "EDIT" => Ok(Self::Edit),
            other => Err(Error::validation(format!(
                "Invalid permission value '{other}', must be one of VIEW, EDIT"
            ))),
        }
    }
}

/// A user-curated collection of artworks, organised into slides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    /// Identifier, assigned by the store.
    pub id: AlbumId,
    /// Album title.
    pub title: String,
    /// Username of the owner.
    pub owner: String,
    /// Slides, each holding one or two artworks.
    #[serde(default)]
    pub slides: Vec<Vec<ArtworkId>>,
    /// Creation timestamp.
    pub date_created: DateTime<Utc>,
    /// Last-modified timestamp.
    pub date_changed: DateTime<Utc>,
}

impl Album {
    /// Total number of artworks across all slides.
    pub fn size(&self) -> usize {
        self.slides.iter().map(Vec::len).sum()
    }
}

/// A single share entry: `user` holds `permissions` on `album`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsRelation {
    /// Shared album.
    pub album: AlbumId,
    /// Username the album is shared with.
    pub user: String,
    /// Granted level.
    pub permissions: AlbumPermission,
}

impl CatalogStore {
    /// Create an album for the given owner.
    pub fn create_album(&self, title: impl Into<String>, owner: &str) -> AlbumId {
        let id = AlbumId(self.next_id());
        let now = Utc::now();
        let album = Album {
            id,
            title: title.into(),
            owner: owner.to_string(),
            slides: Vec::new(),
            date_created: now,
            date_changed: now,
        };
        self.albums.write().insert(id, album);
        id
    }

    /// Get an album by id.
    pub fn album(&self, id: AlbumId) -> Option<Album> {
        self.albums.read().get(&id).cloned()
    }

    /// Save an existing album, bumping `date_changed`.
    pub fn save_album(&self, mut album: Album) -> Result<()> {
        let mut albums = self.albums.write();
        if !albums.contains_key(&album.id) {
            return Err(Error::not_found("album", album.id));
        }
        album.date_changed = Utc::now();
        albums.insert(album.id, album);
        Ok(())
    }

    /// Albums the user owns or that are shared with them at any level.
    pub fn albums_for_user(&self, username: &str) -> Vec<Album> {
        let shared: Vec<AlbumId> = self
            .permissions
            .read()
            .iter()
            .filter(|rel| rel.user == username)
            .map(|rel| rel.album)
            .collect();

        let mut albums: Vec<Album> = self
            .albums
            .read()
            .values()
            .filter(|album| album.owner == username || shared.contains(&album.id))
            .cloned()
            .collect();
        albums.sort_by_key(|album| album.id);
        albums
    }

    /// Albums the user owns or holds `EDIT` on.
    pub fn editable_albums(&self, username: &str) -> Vec<Album> {
        let editable: Vec<AlbumId> = self
            .permissions
            .read()
            .iter()
            .filter(|rel| rel.user == username && rel.permissions == AlbumPermission::Edit)
            .map(|rel| rel.album)
            .collect();

        let mut albums: Vec<Album> = self
            .albums
            .read()
            .values()
            .filter(|album| album.owner == username || editable.contains(&album.id))
            .cloned()
            .collect();
        albums.sort_by_key(|album| album.id);
        albums
    }

    /// Returns `true` if the user owns the album or holds at least the
    /// given permission on it.
    pub fn has_album_permission(
        &self,
        album_id: AlbumId,
        username: &str,
        permission: AlbumPermission,
    ) -> bool {
        let Some(album) = self.album(album_id) else {
            return false;
        };
        if album.owner == username {
            return true;
        }
        self.permissions.read().iter().any(|rel| {
            rel.album == album_id
                && rel.user == username
                && (rel.permissions == permission || rel.permissions == AlbumPermission::Edit)
        })
    }

    /// Replace the share list of an album.
    ///
    /// Only the owner may share; entries naming the owner are skipped.
    pub fn set_album_permissions(
        &self,
        album_id: AlbumId,
        acting_user: &str,
        entries: Vec<(String, AlbumPermission)>,
    ) -> Result<Vec<PermissionsRelation>> {
        let album = self
            .album(album_id)
            .ok_or_else(|| Error::not_found("album", album_id))?;
        if album.owner != acting_user {
            return Err(Error::permission(
                "Only the owner of the album can share it",
            ));
        }

        let mut permissions = self.permissions.write();
        permissions.retain(|rel| rel.album != album_id);
        for (user, level) in entries {
            if user == album.owner {
                continue;
            }
            permissions.push(PermissionsRelation {
                album: album_id,
                user,
                permissions: level,
            });
        }

        Ok(permissions
            .iter()
            .filter(|rel| rel.album == album_id)
            .cloned()
            .collect())
    }

    /// All share entries of an album.
    pub fn album_permissions(&self, album_id: AlbumId) -> Vec<PermissionsRelation> {
        self.permissions
            .read()
            .iter()
            .filter(|rel| rel.album == album_id)
            .cloned()
            .collect()
    }

    /// The share entries a requesting user is allowed to see.
    ///
    /// Owners see all entries. Users holding `EDIT` see the other `EDIT`
    /// entries. Everyone else sees only their own entry.
    pub fn visible_album_permissions(
        &self,
        album: &Album,
        requester: &str,
    ) -> Vec<PermissionsRelation> {
        let all = self.album_permissions(album.id);
        if album.owner == requester {
            return all;
        }

        let requester_has_edit = all
            .iter()
            .any(|rel| rel.user == requester && rel.permissions == AlbumPermission::Edit);

        all.into_iter()
            .filter(|rel| {
                if requester_has_edit {
                    rel.permissions == AlbumPermission::Edit
                } else {
                    rel.user == requester
                }
            })
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
