//! Result projection.
//!
//! Shapes matched artworks into the external result objects: relative
//! media paths become absolute URLs against the configured media base,
//! artist references are resolved into `{id, value}` pairs, and the title
//! honors the request language.

use pinakos_catalog::CatalogStore;
use pinakos_core::{ArtworkId, Lang, PersonId};
use pinakos_search::SearchHit;
use serde::Serialize;

/// An `{id, value}` artist reference.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistRef {
    /// Person id.
    pub id: PersonId,
    /// Person name.
    pub value: String,
}

/// One row of the search response.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultItem {
    /// Artwork id.
    pub id: ArtworkId,
    /// Absolute URL of the original image, if any.
    pub image_original: Option<String>,
    /// Absolute URL of the full-size rendition, if any.
    pub image_fullsize: Option<String>,
    /// Credit line.
    pub credits: String,
    /// Localized title.
    pub title: String,
    /// Content notes for the title.
    pub discriminatory_terms: Vec<String>,
    /// Display date.
    pub date: String,
    /// Resolved artists.
    pub artists: Vec<ArtistRef>,
    /// Relevance score (1.0 when no query was given).
    pub score: f32,
}

/// Join a relative media path onto the media base URL.
pub fn media_url(base: &str, path: Option<&str>) -> Option<String> {
    path.map(|p| {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            p.trim_start_matches('/')
        )
    })
}

/// Project one hit into the response shape.
pub fn project_hit(
    hit: &SearchHit,
    catalog: &CatalogStore,
    media_base: &str,
    lang: Lang,
) -> SearchResultItem {
    let artwork = &hit.artwork;
    let artists = catalog
        .resolve_persons(&artwork.artists)
        .into_iter()
        .map(|person| ArtistRef {
            id: person.id,
            value: person.name,
        })
        .collect();

    SearchResultItem {
        id: artwork.id,
        image_original: media_url(media_base, artwork.image_original.as_deref()),
        image_fullsize: media_url(media_base, artwork.image_fullsize.as_deref()),
        credits: artwork.credits.clone(),
        title: artwork.title_localized(lang).to_string(),
        discriminatory_terms: artwork.discriminatory_terms.clone(),
        date: artwork.date.clone(),
        artists,
        score: hit.relevance.rank,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pinakos_catalog::{Artwork, Person};
    use pinakos_search::Relevance;

    #[test]
    fn test_media_url_joins_cleanly() {
        assert_eq!(
            media_url("http://host/media/", Some("/artworks/1.jpg")),
            Some("http://host/media/artworks/1.jpg".to_string())
        );
        assert_eq!(
            media_url("http://host/media", Some("artworks/1.jpg")),
            Some("http://host/media/artworks/1.jpg".to_string())
        );
        assert_eq!(media_url("http://host/media", None), None);
    }

    #[test]
    fn test_project_hit_resolves_artists_and_title() {
        let catalog = CatalogStore::new();
        let artist = catalog.create_person(Person::new("Maria Lassnig"));

        let mut artwork = Artwork::new("Der Kuss");
        artwork.title_english = "The Kiss".to_string();
        artwork.artists = vec![artist];
        artwork.image_original = Some("artworks/image_original/1/a.jpg".to_string());
        let id = catalog.create_artwork(artwork);

        let hit = SearchHit {
            artwork: catalog.artwork(id).unwrap(),
            relevance: Relevance::constant(),
        };

        let item = project_hit(&hit, &catalog, "http://host/media", Lang::En);
        assert_eq!(item.title, "The Kiss");
        assert_eq!(item.artists.len(), 1);
        assert_eq!(item.artists[0].value, "Maria Lassnig");
        assert_eq!(
            item.image_original.as_deref(),
            Some("http://host/media/artworks/image_original/1/a.jpg")
        );
        assert!(item.image_fullsize.is_none());
        assert_eq!(item.score, 1.0);
    }
}
