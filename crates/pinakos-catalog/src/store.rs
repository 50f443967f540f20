//! The in-memory catalog store.
//!
//! `CatalogStore` is the single shared repository behind the API and the
//! search engine. Reads hand out clones; writes go through save methods
//! that stamp `date_changed`, clean titles, and emit a [`CatalogEvent`]
//! for the search indexer. Emitting is fire-and-forget: if no indexer is
//! attached the event is dropped.

use chrono::Utc;
use parking_lot::RwLock;
use pinakos_core::text::remove_non_printable;
use pinakos_core::{ArtworkId, Error, KeywordId, LocationId, MaterialId, PersonId, Result};
use pinakos_taxonomy::{Taxon, Taxonomy};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;

use crate::albums::{Album, PermissionsRelation};
use crate::model::{Artwork, Material, Person, User};
use pinakos_core::AlbumId;

/// A change notification for the search indexer.
///
/// One event per saved entity; the indexer fans each event out to the
/// artworks whose search text it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEvent {
    /// An artwork was created or saved.
    ArtworkSaved(ArtworkId),
    /// A person was created or saved.
    PersonSaved(PersonId),
    /// A material was created or saved.
    MaterialSaved(MaterialId),
    /// A keyword node was created or saved.
    KeywordSaved(KeywordId),
    /// A location node was created or saved.
    LocationSaved(LocationId),
}

/// Thread-safe in-memory catalog.
pub struct CatalogStore {
    artworks: RwLock<HashMap<ArtworkId, Artwork>>,
    people: RwLock<HashMap<PersonId, Person>>,
    materials: RwLock<HashMap<MaterialId, Material>>,
    users: RwLock<HashMap<String, User>>,
    keywords: RwLock<Taxonomy<KeywordId>>,
    locations: RwLock<Taxonomy<LocationId>>,
    pub(crate) albums: RwLock<HashMap<AlbumId, Album>>,
    pub(crate) permissions: RwLock<Vec<PermissionsRelation>>,
    sequence: AtomicU64,
    events: RwLock<Option<UnboundedSender<CatalogEvent>>>,
}

impl CatalogStore {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            artworks: RwLock::new(HashMap::new()),
            people: RwLock::new(HashMap::new()),
            materials: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            keywords: RwLock::new(Taxonomy::new()),
            locations: RwLock::new(Taxonomy::new()),
            albums: RwLock::new(HashMap::new()),
            permissions: RwLock::new(Vec::new()),
            sequence: AtomicU64::new(1),
            events: RwLock::new(None),
        }
    }

    /// Attach the indexer's event queue.
    ///
    /// Until a sink is attached, events are dropped.
    pub fn set_event_sink(&self, sink: UnboundedSender<CatalogEvent>) {
        *self.events.write() = Some(sink);
    }

    /// Detach the event queue, closing the indexer's receiving end.
    pub fn clear_event_sink(&self) {
        *self.events.write() = None;
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }

    fn emit(&self, event: CatalogEvent) {
        if let Some(sink) = &*self.events.read() {
            // the receiver may already be gone during shutdown
            if sink.send(event).is_err() {
                log::debug!("catalog event dropped, indexer queue closed: {event:?}");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Artworks
    // ------------------------------------------------------------------------

    /// Insert a new artwork, assigning its id and cleaning its titles.
    pub fn create_artwork(&self, mut artwork: Artwork) -> ArtworkId {
        let id = ArtworkId(self.next_id());
        artwork.id = id;
        artwork.title = remove_non_printable(&artwork.title);
        artwork.title_english = remove_non_printable(&artwork.title_english);
        let now = Utc::now();
        artwork.date_created = now;
        artwork.date_changed = now;

        self.artworks.write().insert(id, artwork);
        self.emit(CatalogEvent::ArtworkSaved(id));
        id
    }

    /// Save an existing artwork, bumping `date_changed`.
    pub fn save_artwork(&self, mut artwork: Artwork) -> Result<()> {
        let mut artworks = self.artworks.write();
        if !artworks.contains_key(&artwork.id) {
            return Err(Error::not_found("artwork", artwork.id));
        }

        artwork.title = remove_non_printable(&artwork.title);
        artwork.title_english = remove_non_printable(&artwork.title_english);
        artwork.date_changed = Utc::now();
        let id = artwork.id;
        artworks.insert(id, artwork);
        drop(artworks);

        self.emit(CatalogEvent::ArtworkSaved(id));
        Ok(())
    }

    /// Get an artwork by id.
    pub fn artwork(&self, id: ArtworkId) -> Option<Artwork> {
        self.artworks.read().get(&id).cloned()
    }

    /// All artworks, in unspecified order.
    pub fn artworks(&self) -> Vec<Artwork> {
        self.artworks.read().values().cloned().collect()
    }

    /// All artwork ids.
    pub fn artwork_ids(&self) -> Vec<ArtworkId> {
        self.artworks.read().keys().copied().collect()
    }

    /// Number of artworks in the catalog.
    pub fn artwork_count(&self) -> usize {
        self.artworks.read().len()
    }

    // ------------------------------------------------------------------------
    // People
    // ------------------------------------------------------------------------

    /// Insert a new person, assigning the id.
    pub fn create_person(&self, mut person: Person) -> PersonId {
        let id = PersonId(self.next_id());
        person.id = id;
        self.people.write().insert(id, person);
        self.emit(CatalogEvent::PersonSaved(id));
        id
    }

    /// Save an existing person.
    pub fn save_person(&self, person: Person) -> Result<()> {
        let mut people = self.people.write();
        if !people.contains_key(&person.id) {
            return Err(Error::not_found("person", person.id));
        }
        let id = person.id;
        people.insert(id, person);
        drop(people);

        self.emit(CatalogEvent::PersonSaved(id));
        Ok(())
    }

    /// Get a person by id.
    pub fn person(&self, id: PersonId) -> Option<Person> {
        self.people.read().get(&id).cloned()
    }

    /// All people.
    pub fn people(&self) -> Vec<Person> {
        self.people.read().values().cloned().collect()
    }

    /// Resolve a list of person ids, skipping dangling references.
    pub fn resolve_persons(&self, ids: &[PersonId]) -> Vec<Person> {
        let people = self.people.read();
        ids.iter().filter_map(|id| people.get(id).cloned()).collect()
    }

    // ------------------------------------------------------------------------
    // Materials
    // ------------------------------------------------------------------------

    /// Insert a new material, assigning the id.
    pub fn create_material(&self, mut material: Material) -> MaterialId {
        let id = MaterialId(self.next_id());
        material.id = id;
        self.materials.write().insert(id, material);
        self.emit(CatalogEvent::MaterialSaved(id));
        id
    }

    /// Save an existing material.
    pub fn save_material(&self, material: Material) -> Result<()> {
        let mut materials = self.materials.write();
        if !materials.contains_key(&material.id) {
            return Err(Error::not_found("material", material.id));
        }
        let id = material.id;
        materials.insert(id, material);
        drop(materials);

        self.emit(CatalogEvent::MaterialSaved(id));
        Ok(())
    }

    /// Get a material by id.
    pub fn material(&self, id: MaterialId) -> Option<Material> {
        self.materials.read().get(&id).cloned()
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// Insert or replace a user, keyed by username.
    pub fn upsert_user(&self, user: User) {
        self.users.write().insert(user.username.clone(), user);
    }

    /// Get a user by username.
    pub fn user(&self, username: &str) -> Option<User> {
        self.users.read().get(username).cloned()
    }

    /// All users.
    pub fn users(&self) -> Vec<User> {
        self.users.read().values().cloned().collect()
    }

    // ------------------------------------------------------------------------
    // Keywords
    // ------------------------------------------------------------------------

    /// Insert a new keyword node under an optional parent; the id is
    /// assigned by the store.
    pub fn create_keyword(
        &self,
        mut taxon: Taxon<KeywordId>,
        parent: Option<KeywordId>,
    ) -> Result<KeywordId> {
        let id = KeywordId(self.next_id());
        taxon.id = id;
        self.keywords.write().insert(taxon, parent)?;
        self.emit(CatalogEvent::KeywordSaved(id));
        Ok(id)
    }

    /// Save an existing keyword node.
    pub fn save_keyword(&self, taxon: Taxon<KeywordId>) -> Result<()> {
        let id = taxon.id;
        self.keywords.write().update(taxon)?;
        self.emit(CatalogEvent::KeywordSaved(id));
        Ok(())
    }

    /// Get a keyword node by id.
    pub fn keyword(&self, id: KeywordId) -> Option<Taxon<KeywordId>> {
        self.keywords.read().get(id).cloned()
    }

    /// Run a closure against the keyword tree.
    pub fn with_keywords<R>(&self, f: impl FnOnce(&Taxonomy<KeywordId>) -> R) -> R {
        f(&self.keywords.read())
    }

    // ------------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------------

    /// Insert a new location node under an optional parent; the id is
    /// assigned by the store.
    pub fn create_location(
        &self,
        mut taxon: Taxon<LocationId>,
        parent: Option<LocationId>,
    ) -> Result<LocationId> {
        let id = LocationId(self.next_id());
        taxon.id = id;
        self.locations.write().insert(taxon, parent)?;
        self.emit(CatalogEvent::LocationSaved(id));
        Ok(id)
    }

    /// Save an existing location node.
    pub fn save_location(&self, taxon: Taxon<LocationId>) -> Result<()> {
        let id = taxon.id;
        self.locations.write().update(taxon)?;
        self.emit(CatalogEvent::LocationSaved(id));
        Ok(())
    }

    /// Get a location node by id.
    pub fn location(&self, id: LocationId) -> Option<Taxon<LocationId>> {
        self.locations.read().get(id).cloned()
    }

    /// Run a closure against the location tree.
    pub fn with_locations<R>(&self, f: impl FnOnce(&Taxonomy<LocationId>) -> R) -> R {
        f(&self.locations.read())
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
