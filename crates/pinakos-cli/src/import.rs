//! Catalog import from a JSON export.
//!
//! The export carries its own ids; the store assigns fresh ones, so the
//! loader keeps a mapping from export id to store id and resolves every
//! reference through it. Taxonomy nodes may appear in any order; parents
//! are resolved over multiple passes.

use pinakos_catalog::{Artwork, CatalogStore, Material, Person, User};
use pinakos_core::{Error, KeywordId, LocationId, MaterialId, PersonId, Result};
use pinakos_taxonomy::Taxon;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    people: Vec<SeedPerson>,
    #[serde(default)]
    keywords: Vec<SeedTaxon>,
    #[serde(default)]
    locations: Vec<SeedTaxon>,
    #[serde(default)]
    materials: Vec<SeedMaterial>,
    #[serde(default)]
    artworks: Vec<SeedArtwork>,
}

#[derive(Debug, Deserialize)]
struct SeedPerson {
    id: u64,
    name: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeedTaxon {
    id: u64,
    name: String,
    #[serde(default)]
    name_en: String,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    parent: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct SeedMaterial {
    id: u64,
    name: String,
    #[serde(default)]
    name_en: String,
}

#[derive(Debug, Deserialize)]
struct SeedArtwork {
    title: String,
    #[serde(default)]
    title_english: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    date_year_from: Option<i32>,
    #[serde(default)]
    date_year_to: Option<i32>,
    #[serde(default)]
    credits: String,
    #[serde(default)]
    dimensions_display: String,
    #[serde(default)]
    comments_de: String,
    #[serde(default)]
    comments_en: String,
    #[serde(default)]
    image_original: Option<String>,
    #[serde(default = "default_published")]
    published: bool,
    #[serde(default)]
    discriminatory_terms: Vec<String>,
    #[serde(default)]
    artists: Vec<u64>,
    #[serde(default)]
    photographers: Vec<u64>,
    #[serde(default)]
    authors: Vec<u64>,
    #[serde(default)]
    graphic_designers: Vec<u64>,
    #[serde(default)]
    keywords: Vec<u64>,
    #[serde(default)]
    place_of_production: Vec<u64>,
    #[serde(default)]
    location: Option<u64>,
    #[serde(default)]
    materials: Vec<u64>,
}

fn default_published() -> bool {
    true
}

/// Counts of imported entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImportStats {
    /// Imported users.
    pub users: usize,
    /// Imported people.
    pub people: usize,
    /// Imported keyword nodes.
    pub keywords: usize,
    /// Imported location nodes.
    pub locations: usize,
    /// Imported materials.
    pub materials: usize,
    /// Imported artworks.
    pub artworks: usize,
}

impl fmt::Display for ImportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} artworks, {} people, {} keywords, {} locations, {} materials, {} users",
            self.artworks, self.people, self.keywords, self.locations, self.materials, self.users
        )
    }
}

/// Insert taxonomy nodes, resolving parents across passes.
fn load_taxonomy<I: Copy>(
    nodes: Vec<SeedTaxon>,
    mut create: impl FnMut(Taxon<I>, Option<I>) -> Result<I>,
    placeholder: I,
) -> Result<HashMap<u64, I>> {
    let mut id_map: HashMap<u64, I> = HashMap::new();
    let mut pending = nodes;

    while !pending.is_empty() {
        let before = pending.len();
        let mut still_pending = Vec::new();

        for node in pending {
            let parent = match node.parent {
                None => None,
                Some(seed_parent) => match id_map.get(&seed_parent) {
                    Some(&mapped) => Some(mapped),
                    None => {
                        still_pending.push(node);
                        continue;
                    }
                },
            };

            let seed_id = node.id;
            let taxon = Taxon {
                id: placeholder,
                name: node.name,
                name_en: node.name_en,
                synonyms: node.synonyms,
            };
            let assigned = create(taxon, parent)?;
            id_map.insert(seed_id, assigned);
        }

        if still_pending.len() == before {
            let unresolved: Vec<String> = still_pending
                .iter()
                .map(|node| node.id.to_string())
                .collect();
            return Err(Error::validation(format!(
                "taxonomy nodes with unresolved parents: {}",
                unresolved.join(", ")
            )));
        }
        pending = still_pending;
    }

    Ok(id_map)
}

fn map_refs<I: Copy>(kind: &'static str, ids: &[u64], map: &HashMap<u64, I>) -> Result<Vec<I>> {
    ids.iter()
        .map(|id| {
            map.get(id)
                .copied()
                .ok_or_else(|| Error::not_found(kind, *id))
        })
        .collect()
}

/// Load a JSON export into the catalog.
pub fn load_seed_file(catalog: &CatalogStore, path: &Path) -> Result<ImportStats> {
    let text = std::fs::read_to_string(path)?;
    let seed: SeedFile = serde_json::from_str(&text)
        .map_err(|e| Error::validation(format!("invalid import file: {e}")))?;

    let mut stats = ImportStats::default();

    for user in seed.users {
        catalog.upsert_user(user);
        stats.users += 1;
    }

    let mut person_map: HashMap<u64, PersonId> = HashMap::new();
    for person in seed.people {
        let mut entity = Person::new(person.name);
        entity.synonyms = person.synonyms;
        person_map.insert(person.id, catalog.create_person(entity));
        stats.people += 1;
    }

    let keyword_map = load_taxonomy(
        seed.keywords,
        |taxon, parent| catalog.create_keyword(taxon, parent),
        KeywordId(0),
    )?;
    stats.keywords = keyword_map.len();

    let location_map = load_taxonomy(
        seed.locations,
        |taxon, parent| catalog.create_location(taxon, parent),
        LocationId(0),
    )?;
    stats.locations = location_map.len();

    let mut material_map: HashMap<u64, MaterialId> = HashMap::new();
    for material in seed.materials {
        let id = catalog.create_material(Material {
            id: MaterialId(0),
            name: material.name,
            name_en: material.name_en,
        });
        material_map.insert(material.id, id);
        stats.materials += 1;
    }

    for seed_artwork in seed.artworks {
        let mut artwork = Artwork::new(seed_artwork.title);
        artwork.title_english = seed_artwork.title_english;
        artwork.date = seed_artwork.date;
        artwork.date_year_from = seed_artwork.date_year_from;
        artwork.date_year_to = seed_artwork.date_year_to;
        artwork.credits = seed_artwork.credits;
        artwork.dimensions_display = seed_artwork.dimensions_display;
        artwork.comments_de = seed_artwork.comments_de;
        artwork.comments_en = seed_artwork.comments_en;
        artwork.image_original = seed_artwork.image_original;
        artwork.published = seed_artwork.published;
        artwork.discriminatory_terms = seed_artwork.discriminatory_terms;
        artwork.artists = map_refs("person", &seed_artwork.artists, &person_map)?;
        artwork.photographers = map_refs("person", &seed_artwork.photographers, &person_map)?;
        artwork.authors = map_refs("person", &seed_artwork.authors, &person_map)?;
        artwork.graphic_designers =
            map_refs("person", &seed_artwork.graphic_designers, &person_map)?;
        artwork.keywords = map_refs("keyword", &seed_artwork.keywords, &keyword_map)?;
        artwork.place_of_production =
            map_refs("location", &seed_artwork.place_of_production, &location_map)?;
        artwork.location = match seed_artwork.location {
            Some(id) => Some(
                location_map
                    .get(&id)
                    .copied()
                    .ok_or_else(|| Error::not_found("location", id))?,
            ),
            None => None,
        };
        artwork.materials = map_refs("material", &seed_artwork.materials, &material_map)?;

        catalog.create_artwork(artwork);
        stats.artworks += 1;
    }

    Ok(stats)
}

// ============================================================================
// Tests
// ============================================================================
