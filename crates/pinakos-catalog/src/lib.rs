//! Pinakos catalog — the domain model and its in-process store.
//!
//! The catalog holds artworks and the entities they reference (people,
//! keywords, locations, materials), plus user-facing albums with share
//! permissions. Persistence is out of scope; the store is a thread-safe
//! in-memory repository behind [`CatalogStore`].
//!
//! Every mutation that can feed an artwork's search text emits a
//! [`CatalogEvent`] into a fire-and-forget queue. The search crate's
//! indexer drains that queue and recomputes the affected search vectors
//! asynchronously; staleness between an edit and the reindex is tolerated.

pub mod albums;
pub mod model;
pub mod store;

pub use albums::{Album, AlbumPermission, PermissionsRelation};
pub use model::{Artwork, Material, Person, User};
pub use store::{CatalogEvent, CatalogStore};
