//! Typed autocomplete sources.
//!
//! Each requested type is looked up independently and capped at the
//! caller's limit. Artwork titles, artist names and taxonomy labels match
//! by substring; user names go through the trigram similarity gate.
//! When exactly one type is requested the response collapses to a flat
//! list instead of the type-keyed wrapper — the frontend relies on this
//! asymmetry, so it is part of the contract.

use pinakos_catalog::CatalogStore;
use pinakos_core::text::contains_fold;
use pinakos_core::{Error, Lang, Result};
use serde::Serialize;
use serde_json::Value;

use crate::trigram::{SIMILARITY_THRESHOLD, word_similarity};

/// Default per-type result cap.
pub const DEFAULT_AUTOCOMPLETE_LIMIT: usize = 10;

/// A recognized autocomplete source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteKind {
    /// Published artwork titles.
    Titles,
    /// Person names.
    Artists,
    /// Registered users, fuzzy-matched.
    Users,
    /// Keyword taxonomy labels.
    Keywords,
    /// Location taxonomy labels.
    Locations,
    /// Albums the requesting user may edit.
    UserAlbumsEditable,
}

impl AutocompleteKind {
    /// All recognized type ids, in display order.
    pub const ALL: [AutocompleteKind; 6] = [
        Self::Titles,
        Self::Artists,
        Self::Users,
        Self::Keywords,
        Self::Locations,
        Self::UserAlbumsEditable,
    ];

    /// The wire id of this type.
    pub fn id(self) -> &'static str {
        match self {
            Self::Titles => "titles",
            Self::Artists => "artists",
            Self::Users => "users",
            Self::Keywords => "keywords",
            Self::Locations => "locations",
            Self::UserAlbumsEditable => "user_albums_editable",
        }
    }

    /// Parse a wire id.
    pub fn parse(id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| Error::validation(format!("Invalid autocomplete type '{id}'")))
    }

    /// Group label shown above the type's results.
    pub fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Self::Titles, Lang::De) => "Titel",
            (Self::Titles, Lang::En) => "Titles",
            (Self::Artists, Lang::De) => "Künstler*innen",
            (Self::Artists, Lang::En) => "Artists",
            (Self::Users, Lang::De) => "Benutzer*innen",
            (Self::Users, Lang::En) => "Users",
            (Self::Keywords, Lang::De) => "Schlagwörter",
            (Self::Keywords, Lang::En) => "Keywords",
            (Self::Locations, Lang::De) => "Orte",
            (Self::Locations, Lang::En) => "Locations",
            (Self::UserAlbumsEditable, Lang::De) => "Bearbeitbare Alben",
            (Self::UserAlbumsEditable, Lang::En) => "Editable Albums",
        }
    }
}

/// Parse a comma-separated type list.
pub fn parse_kinds(types: &str) -> Result<Vec<AutocompleteKind>> {
    types
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(AutocompleteKind::parse)
        .collect::<Result<Vec<_>>>()
        .and_then(|kinds| {
            if kinds.is_empty() {
                Err(Error::validation("type parameter is required"))
            } else {
                Ok(kinds)
            }
        })
}

/// One autocomplete suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteEntry {
    /// Entity id: an integer for catalog entities, a username for users.
    pub id: Value,
    /// Display label.
    pub label: String,
    /// Content notes for title entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminatory_terms: Option<Vec<String>>,
}

impl AutocompleteEntry {
    fn new(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            discriminatory_terms: None,
        }
    }
}

/// Results of one requested type.
#[derive(Debug, Clone, Serialize)]
pub struct AutocompleteGroup {
    /// The type id.
    pub id: String,
    /// Localized group label.
    pub label: String,
    /// Suggestions, capped at the request limit.
    pub data: Vec<AutocompleteEntry>,
}

/// Flat for a single requested type, grouped for several.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AutocompleteResponse {
    /// Single-type response: the bare entry list.
    Flat(Vec<AutocompleteEntry>),
    /// Multi-type response: one group per requested type, in order.
    Grouped(Vec<AutocompleteGroup>),
}

/// Run an autocomplete lookup.
///
/// `user` is the requesting user; without one, `user_albums_editable`
/// yields no results.
pub fn autocomplete(
    catalog: &CatalogStore,
    q: &str,
    kinds: &[AutocompleteKind],
    limit: usize,
    user: Option<&str>,
    lang: Lang,
) -> AutocompleteResponse {
    let mut groups = Vec::with_capacity(kinds.len());

    for &kind in kinds {
        let data = match kind {
            AutocompleteKind::Titles => lookup_titles(catalog, q, limit, lang),
            AutocompleteKind::Artists => lookup_artists(catalog, q, limit),
            AutocompleteKind::Users => lookup_users(catalog, q, limit),
            AutocompleteKind::Keywords => lookup_keywords(catalog, q, limit, lang),
            AutocompleteKind::Locations => lookup_locations(catalog, q, limit, lang),
            AutocompleteKind::UserAlbumsEditable => lookup_editable_albums(catalog, q, limit, user),
        };

        groups.push(AutocompleteGroup {
            id: kind.id().to_string(),
            label: kind.label(lang).to_string(),
            data,
        });
    }

    if groups.len() == 1 {
        AutocompleteResponse::Flat(groups.remove(0).data)
    } else {
        AutocompleteResponse::Grouped(groups)
    }
}

fn lookup_titles(catalog: &CatalogStore, q: &str, limit: usize, lang: Lang) -> Vec<AutocompleteEntry> {
    let mut artworks = catalog.artworks();
    artworks.sort_by_key(|artwork| artwork.id);
    artworks
        .into_iter()
        .filter(|artwork| artwork.published)
        .filter(|artwork| {
            contains_fold(&artwork.title, q) || contains_fold(&artwork.title_english, q)
        })
        .take(limit)
        .map(|artwork| {
            let mut entry = AutocompleteEntry::new(
                artwork.id.value(),
                artwork.title_localized(lang),
            );
            entry.discriminatory_terms = Some(artwork.discriminatory_terms.clone());
            entry
        })
        .collect()
}

fn lookup_artists(catalog: &CatalogStore, q: &str, limit: usize) -> Vec<AutocompleteEntry> {
    let mut people = catalog.people();
    people.sort_by_key(|person| person.id);
    people
        .into_iter()
        .filter(|person| contains_fold(&person.name, q))
        .take(limit)
        .map(|person| AutocompleteEntry::new(person.id.value(), person.name))
        .collect()
}

fn lookup_users(catalog: &CatalogStore, q: &str, limit: usize) -> Vec<AutocompleteEntry> {
    let mut scored: Vec<(f32, AutocompleteEntry)> = catalog
        .users()
        .into_iter()
        .filter_map(|user| {
            let full_name = user.full_name();
            let similarity = word_similarity(q, &full_name);
            if similarity >= SIMILARITY_THRESHOLD {
                Some((
                    similarity,
                    AutocompleteEntry::new(user.username.clone(), full_name),
                ))
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.label.cmp(&b.1.label))
    });
    scored.into_iter().take(limit).map(|(_, entry)| entry).collect()
}

fn lookup_keywords(catalog: &CatalogStore, q: &str, limit: usize, lang: Lang) -> Vec<AutocompleteEntry> {
    catalog.with_keywords(|tree| {
        let mut nodes: Vec<_> = tree
            .iter()
            .filter(|node| contains_fold(&node.name, q) || contains_fold(&node.name_en, q))
            .collect();
        nodes.sort_by_key(|node| node.id);
        nodes
            .into_iter()
            .take(limit)
            .map(|node| AutocompleteEntry::new(node.id.value(), node.name_localized(lang)))
            .collect()
    })
}

fn lookup_locations(catalog: &CatalogStore, q: &str, limit: usize, lang: Lang) -> Vec<AutocompleteEntry> {
    catalog.with_locations(|tree| {
        let mut nodes: Vec<_> = tree
            .iter()
            .filter(|node| contains_fold(&node.name, q) || contains_fold(&node.name_en, q))
            .collect();
        nodes.sort_by_key(|node| node.id);
        nodes
            .into_iter()
            .take(limit)
            .map(|node| AutocompleteEntry::new(node.id.value(), node.name_localized(lang)))
            .collect()
    })
}

fn lookup_editable_albums(
    catalog: &CatalogStore,
    q: &str,
    limit: usize,
    user: Option<&str>,
) -> Vec<AutocompleteEntry> {
    let Some(username) = user else {
        return Vec::new();
    };
    catalog
        .editable_albums(username)
        .into_iter()
        .filter(|album| contains_fold(&album.title, q))
        .take(limit)
        .map(|album| AutocompleteEntry::new(album.id.value(), album.title))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pinakos_catalog::{AlbumPermission, Artwork, Person, User};

    fn seeded() -> CatalogStore {
        let catalog = CatalogStore::new();

        let mut artwork = Artwork::new("Lucretia");
        artwork.published = true;
        artwork.discriminatory_terms = vec!["Begriff".to_string()];
        catalog.create_artwork(artwork);

        let mut unpublished = Artwork::new("Lucretia Studie");
        unpublished.published = false;
        catalog.create_artwork(unpublished);

        catalog.create_person(Person::new("Maria Lassnig"));

        catalog.upsert_user(User {
            username: "rsmith".to_string(),
            first_name: "Robin".to_string(),
            last_name: "Smith".to_string(),
        });
        catalog.upsert_user(User {
            username: "mmuster".to_string(),
            first_name: "Max".to_string(),
            last_name: "Mustermann".to_string(),
        });

        catalog
    }

    #[test]
    fn test_parse_kinds() {
        let kinds = parse_kinds("titles,artists").unwrap();
        assert_eq!(kinds, vec![AutocompleteKind::Titles, AutocompleteKind::Artists]);

        assert!(parse_kinds("titles,paintings").is_err());
        assert!(parse_kinds("").is_err());
    }

    #[test]
    fn test_single_type_is_flat() {
        let catalog = seeded();
        let response = autocomplete(
            &catalog,
            "lucre",
            &[AutocompleteKind::Titles],
            10,
            None,
            Lang::De,
        );

        let AutocompleteResponse::Flat(entries) = response else {
            panic!("single type must collapse to a flat list");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "Lucretia");
        assert_eq!(
            entries[0].discriminatory_terms.as_deref(),
            Some(&["Begriff".to_string()][..])
        );
    }

    #[test]
    fn test_multiple_types_are_grouped() {
        let catalog = seeded();
        let response = autocomplete(
            &catalog,
            "las",
            &[AutocompleteKind::Titles, AutocompleteKind::Artists],
            10,
            None,
            Lang::En,
        );

        let AutocompleteResponse::Grouped(groups) = response else {
            panic!("multiple types must stay grouped");
        };
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "titles");
        assert!(groups[0].data.is_empty());
        assert_eq!(groups[1].id, "artists");
        assert_eq!(groups[1].data.len(), 1);
        assert_eq!(groups[1].data[0].label, "Maria Lassnig");
    }

    #[test]
    fn test_users_similarity_gate() {
        let catalog = seeded();

        let response = autocomplete(
            &catalog,
            "robin smith",
            &[AutocompleteKind::Users],
            10,
            None,
            Lang::En,
        );
        let AutocompleteResponse::Flat(entries) = response else {
            panic!("flat expected");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, Value::from("rsmith"));

        // a vague query stays below the 0.6 gate
        let response = autocomplete(&catalog, "xyz", &[AutocompleteKind::Users], 10, None, Lang::En);
        let AutocompleteResponse::Flat(entries) = response else {
            panic!("flat expected");
        };
        assert!(entries.is_empty());
    }

    #[test]
    fn test_editable_albums_require_user() {
        let catalog = seeded();
        let album = catalog.create_album("Barocke Skizzen", "rsmith");
        catalog
            .set_album_permissions(
                album,
                "rsmith",
                vec![("mmuster".to_string(), AlbumPermission::View)],
            )
            .unwrap();

        // no request user: nothing
        let response = autocomplete(
            &catalog,
            "skizzen",
            &[AutocompleteKind::UserAlbumsEditable],
            10,
            None,
            Lang::De,
        );
        let AutocompleteResponse::Flat(entries) = response else {
            panic!("flat expected");
        };
        assert!(entries.is_empty());

        // the owner sees it
        let response = autocomplete(
            &catalog,
            "skizzen",
            &[AutocompleteKind::UserAlbumsEditable],
            10,
            Some("rsmith"),
            Lang::De,
        );
        let AutocompleteResponse::Flat(entries) = response else {
            panic!("flat expected");
        };
        assert_eq!(entries.len(), 1);

        // a VIEW-only user does not
        let response = autocomplete(
            &catalog,
            "skizzen",
            &[AutocompleteKind::UserAlbumsEditable],
            10,
            Some("mmuster"),
            Lang::De,
        );
        let AutocompleteResponse::Flat(entries) = response else {
            panic!("flat expected");
        };
        assert!(entries.is_empty());
    }

    #[test]
    fn test_unpublished_titles_hidden() {
        let catalog = seeded();
        let response = autocomplete(
            &catalog,
            "studie",
            &[AutocompleteKind::Titles],
            10,
            None,
            Lang::De,
        );
        let AutocompleteResponse::Flat(entries) = response else {
            panic!("flat expected");
        };
        assert!(entries.is_empty());
    }

    #[test]
    fn test_limit_caps_each_type() {
        let catalog = CatalogStore::new();
        for i in 0..5 {
            let mut artwork = Artwork::new(format!("Serie {i}"));
            artwork.published = true;
            catalog.create_artwork(artwork);
        }

        let response = autocomplete(&catalog, "serie", &[AutocompleteKind::Titles], 3, None, Lang::De);
        let AutocompleteResponse::Flat(entries) = response else {
            panic!("flat expected");
        };
        assert_eq!(entries.len(), 3);
    }
}
