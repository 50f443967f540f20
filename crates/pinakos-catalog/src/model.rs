//! Catalog entity types.
//!
//! Field names follow the collection's cataloguing conventions: the default
//! language is German, English variants sit next to their default fields
//! (`title` / `title_english`, `comments_de` / `comments_en`). Dates are
//! kept twice — a free-text display form (`date`) and a numeric year range
//! (`date_year_from` / `date_year_to`) that the date facet filters against.

use chrono::{DateTime, Utc};
use pinakos_core::{ArtworkId, KeywordId, Lang, LocationId, MaterialId, PersonId};
use serde::{Deserialize, Serialize};

/// A person connected to artworks in one of four roles: artist,
/// photographer, author, or graphic designer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Identifier, assigned by the store.
    pub id: PersonId,
    /// Canonical name.
    pub name: String,
    /// Alternate spellings.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Person {
    /// Create a person with no synonyms; the store assigns the id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PersonId(0),
            name: name.into(),
            synonyms: Vec::new(),
        }
    }
}

/// A material lookup entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Identifier, assigned by the store.
    pub id: MaterialId,
    /// Default-language name.
    pub name: String,
    /// English variant, empty if none exists.
    #[serde(default)]
    pub name_en: String,
}

/// A registered user (autocomplete source and album owner).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Login name, the user's stable identifier.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl User {
    /// "First Last", the display form used in API payloads.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// The searchable entity of the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artwork {
    /// Identifier, assigned by the store.
    pub id: ArtworkId,
    /// Default-language title.
    pub title: String,
    /// English title variant, empty if none exists.
    #[serde(default)]
    pub title_english: String,
    /// Free-text date as displayed, e.g. "1642/1643" or "um 1500".
    #[serde(default)]
    pub date: String,
    /// Numeric start of the dating range.
    #[serde(default)]
    pub date_year_from: Option<i32>,
    /// Numeric end of the dating range.
    #[serde(default)]
    pub date_year_to: Option<i32>,
    /// Credit line.
    #[serde(default)]
    pub credits: String,
    /// Credit link.
    #[serde(default)]
    pub credits_link: String,
    /// Display form of the dimensions.
    #[serde(default)]
    pub dimensions_display: String,
    /// External reference link.
    #[serde(default)]
    pub link: String,
    /// German comments.
    #[serde(default)]
    pub comments_de: String,
    /// English comments.
    #[serde(default)]
    pub comments_en: String,
    /// German material description.
    #[serde(default)]
    pub material_description_de: String,
    /// English material description.
    #[serde(default)]
    pub material_description_en: String,
    /// Relative media path of the original image.
    #[serde(default)]
    pub image_original: Option<String>,
    /// Relative media path of the full-size rendition.
    #[serde(default)]
    pub image_fullsize: Option<String>,
    /// Only published artworks are visible to search.
    #[serde(default)]
    pub published: bool,
    /// Editorially checked flag.
    #[serde(default)]
    pub checked: bool,
    /// Terms in title or metadata that need a content note in the UI.
    #[serde(default)]
    pub discriminatory_terms: Vec<String>,
    /// Artists.
    #[serde(default)]
    pub artists: Vec<PersonId>,
    /// Photographers.
    #[serde(default)]
    pub photographers: Vec<PersonId>,
    /// Authors.
    #[serde(default)]
    pub authors: Vec<PersonId>,
    /// Graphic designers.
    #[serde(default)]
    pub graphic_designers: Vec<PersonId>,
    /// Keyword taxonomy nodes.
    #[serde(default)]
    pub keywords: Vec<KeywordId>,
    /// Where the work was produced.
    #[serde(default)]
    pub place_of_production: Vec<LocationId>,
    /// Current whereabouts.
    #[serde(default)]
    pub location: Option<LocationId>,
    /// Materials.
    #[serde(default)]
    pub materials: Vec<MaterialId>,
    /// Creation timestamp.
    pub date_created: DateTime<Utc>,
    /// Last-modified timestamp; every save bumps it.
    pub date_changed: DateTime<Utc>,
}

impl Artwork {
    /// Create an unpublished artwork with the given title; the store
    /// assigns the id on insert.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ArtworkId(0),
            title: title.into(),
            title_english: String::new(),
            date: String::new(),
            date_year_from: None,
            date_year_to: None,
            credits: String::new(),
            credits_link: String::new(),
            dimensions_display: String::new(),
            link: String::new(),
            comments_de: String::new(),
            comments_en: String::new(),
            material_description_de: String::new(),
            material_description_en: String::new(),
            image_original: None,
            image_fullsize: None,
            published: false,
            checked: false,
            discriminatory_terms: Vec::new(),
            artists: Vec::new(),
            photographers: Vec::new(),
            authors: Vec::new(),
            graphic_designers: Vec::new(),
            keywords: Vec::new(),
            place_of_production: Vec::new(),
            location: None,
            materials: Vec::new(),
            date_created: now,
            date_changed: now,
        }
    }

    /// The title in the requested language.
    pub fn title_localized(&self, lang: Lang) -> &str {
        lang.pick(&self.title, &self.title_english)
    }

    /// Ids of every person attached to the artwork, across all four roles.
    pub fn person_ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.artists
            .iter()
            .chain(&self.photographers)
            .chain(&self.authors)
            .chain(&self.graphic_designers)
            .copied()
    }

    /// Location nodes the artwork is attached to (place of production plus
    /// current location).
    pub fn location_ids(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.place_of_production
            .iter()
            .copied()
            .chain(self.location)
    }
}

// ============================================================================
// Tests
// ============================================================================
