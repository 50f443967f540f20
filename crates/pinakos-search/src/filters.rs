//! Facet filters.
//!
//! A search request carries a list of `{id, filter_values}` specs. The id
//! must be one of the six recognized facet keys; the shape of
//! `filter_values` depends on the facet. List facets take an array whose
//! elements are either free text (accent-insensitive substring match) or
//! an `{"id": N}` reference (exact match; expanded to the whole subtree
//! for the hierarchical facets). The date facet takes a single object
//! with `date_from`/`date_to` bounds.
//!
//! Validation is fail-fast: one malformed value aborts the whole request
//! with a descriptive message, nothing is skipped silently.

use pinakos_catalog::{Artwork, CatalogStore};
use pinakos_core::text::contains_fold;
use pinakos_core::{ArtworkId, Error, KeywordId, Lang, LocationId, PersonId, Result};
use pinakos_taxonomy::Taxon;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::hash::Hash;

/// The fixed set of recognized facet keys.
pub const FACET_KEYS: [&str; 6] = [
    "title",
    "artists",
    "place_of_production",
    "location",
    "keywords",
    "date",
];

const DATE_FORMAT_MSG: &str = "Invalid filter_value format for date filter.";
const DATE_VALUE_MSG: &str = "Invalid format of at least one filter_value for date filter.";
const DATE_ORDER_MSG: &str = "date_from needs to be less than or equal to date_to.";

/// One filter entry of a search request, still unparsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Facet key, e.g. `"artists"`.
    pub id: String,
    /// Facet-specific payload.
    pub filter_values: Value,
}

fn invalid_value(facet: &str) -> Error {
    Error::validation(format!(
        "Invalid format of at least one filter_value for {facet} filter."
    ))
}

/// A raw list-facet value: free text or an id reference.
#[derive(Debug)]
pub(crate) enum RawValue {
    Text(String),
    Id(u64),
}

fn parse_value_list(facet: &str, values: &Value) -> Result<Vec<RawValue>> {
    let list = values.as_array().ok_or_else(|| invalid_value(facet))?;
    list.iter()
        .map(|value| match value {
            Value::String(text) => Ok(RawValue::Text(text.clone())),
            Value::Object(map) => map
                .get("id")
                .and_then(Value::as_u64)
                .map(RawValue::Id)
                .ok_or_else(|| invalid_value(facet)),
            _ => Err(invalid_value(facet)),
        })
        .collect()
}

/// A value against a hierarchical facet: text matches the node's own
/// labels, an id reference is pre-expanded to the full subtree.
#[derive(Debug)]
pub(crate) enum TreeValue<I> {
    Text(String),
    Subtree(HashSet<I>),
}

fn parse_tree_values<I, F>(facet: &str, values: &Value, expand: F) -> Result<Vec<TreeValue<I>>>
where
    I: Copy + Eq + Hash,
    F: Fn(u64) -> Vec<I>,
{
    parse_value_list(facet, values)?
        .into_iter()
        .map(|raw| match raw {
            RawValue::Text(text) => Ok(TreeValue::Text(text)),
            RawValue::Id(id) => Ok(TreeValue::Subtree(expand(id).into_iter().collect())),
        })
        .collect()
}

fn taxon_matches_text<I>(node: &Taxon<I>, text: &str) -> bool {
    contains_fold(&node.name, text)
        || contains_fold(&node.name_en, text)
        || node.synonyms.iter().any(|syn| contains_fold(syn, text))
}

/// Inclusive date range bounds parsed from the date facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DateFilter {
    from: Option<i64>,
    to: Option<i64>,
}

impl DateFilter {
    fn parse_bound(value: Option<&Value>) -> Result<Option<i64>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
            Some(Value::String(text)) => text
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| Error::validation(DATE_VALUE_MSG)),
            Some(Value::Number(number)) => number
                .as_i64()
                .map(Some)
                .ok_or_else(|| Error::validation(DATE_VALUE_MSG)),
            Some(_) => Err(Error::validation(DATE_VALUE_MSG)),
        }
    }

    pub(crate) fn parse(values: &Value) -> Result<Self> {
        let map = values
            .as_object()
            .ok_or_else(|| Error::validation(DATE_FORMAT_MSG))?;
        if !map.contains_key("date_from") && !map.contains_key("date_to") {
            return Err(Error::validation(DATE_FORMAT_MSG));
        }

        let from = Self::parse_bound(map.get("date_from"))?;
        let to = Self::parse_bound(map.get("date_to"))?;

        if from.is_none() && to.is_none() {
            return Err(Error::validation(DATE_FORMAT_MSG));
        }
        if let (Some(from), Some(to)) = (from, to) {
            if to < from {
                return Err(Error::validation(DATE_ORDER_MSG));
            }
        }

        Ok(Self { from, to })
    }

    /// Match against the artwork's numeric year range.
    ///
    /// With only a lower bound, anything ending or starting at or after it
    /// matches; with only an upper bound, anything starting or ending at
    /// or before it. With both, the artwork's range must intersect the
    /// window or fully contain it. Missing year fields never match the
    /// comparison they are needed for.
    pub(crate) fn matches(&self, artwork: &Artwork) -> bool {
        let start = artwork.date_year_from.map(i64::from);
        let end = artwork.date_year_to.map(i64::from);

        match (self.from, self.to) {
            (Some(from), None) => {
                start.is_some_and(|y| y >= from) || end.is_some_and(|y| y >= from)
            }
            (None, Some(to)) => start.is_some_and(|y| y <= to) || end.is_some_and(|y| y <= to),
            (Some(from), Some(to)) => {
                let start_inside = start.is_some_and(|y| y >= from && y <= to);
                let end_inside = end.is_some_and(|y| y >= from && y <= to);
                let covers_window = start.is_some_and(|y| y <= from) && end.is_some_and(|y| y >= to);
                start_inside || end_inside || covers_window
            }
            (None, None) => false,
        }
    }
}

/// A parsed, ready-to-apply facet filter.
///
/// All values of one facet must hold for an artwork to pass (logical
/// AND), and different facets AND-combine across.
#[derive(Debug)]
pub(crate) enum FacetFilter {
    Title(Vec<RawValue>),
    Artists(Vec<RawValue>),
    PlaceOfProduction(Vec<TreeValue<LocationId>>),
    Location(Vec<TreeValue<LocationId>>),
    Keywords(Vec<TreeValue<KeywordId>>),
    Date(DateFilter),
}

/// Parse a filter spec, expanding hierarchical id references.
///
/// An unknown facet key is rejected; an unknown node id inside a known
/// facet simply matches nothing.
pub(crate) fn parse_filter(spec: &FilterSpec, catalog: &CatalogStore) -> Result<FacetFilter> {
    match spec.id.as_str() {
        "title" => Ok(FacetFilter::Title(parse_value_list(
            "title",
            &spec.filter_values,
        )?)),
        "artists" => Ok(FacetFilter::Artists(parse_value_list(
            "artists",
            &spec.filter_values,
        )?)),
        "place_of_production" => Ok(FacetFilter::PlaceOfProduction(parse_tree_values(
            "place_of_production",
            &spec.filter_values,
            |id| catalog.with_locations(|tree| tree.descendants(LocationId(id), true)),
        )?)),
        "location" => Ok(FacetFilter::Location(parse_tree_values(
            "location",
            &spec.filter_values,
            |id| catalog.with_locations(|tree| tree.descendants(LocationId(id), true)),
        )?)),
        "keywords" => Ok(FacetFilter::Keywords(parse_tree_values(
            "keywords",
            &spec.filter_values,
            |id| catalog.with_keywords(|tree| tree.descendants(KeywordId(id), true)),
        )?)),
        "date" => Ok(FacetFilter::Date(DateFilter::parse(&spec.filter_values)?)),
        other => Err(Error::validation(format!("Invalid filter id '{other}'"))),
    }
}

impl FacetFilter {
    /// Returns `true` if the artwork satisfies every value of this facet.
    pub(crate) fn matches(&self, artwork: &Artwork, catalog: &CatalogStore) -> bool {
        match self {
            Self::Title(values) => values.iter().all(|value| match value {
                RawValue::Text(text) => {
                    contains_fold(&artwork.title, text)
                        || contains_fold(&artwork.title_english, text)
                }
                RawValue::Id(id) => artwork.id == ArtworkId(*id),
            }),
            Self::Artists(values) => {
                let artists = catalog.resolve_persons(&artwork.artists);
                values.iter().all(|value| match value {
                    RawValue::Text(text) => artists.iter().any(|person| {
                        contains_fold(&person.name, text)
                            || person.synonyms.iter().any(|syn| contains_fold(syn, text))
                    }),
                    RawValue::Id(id) => artwork.artists.contains(&PersonId(*id)),
                })
            }
            Self::PlaceOfProduction(values) => values.iter().all(|value| {
                tree_value_matches(value, &artwork.place_of_production, |id| {
                    catalog.location(id)
                })
            }),
            Self::Location(values) => values.iter().all(|value| {
                tree_value_matches(value, artwork.location.as_slice(), |id| {
                    catalog.location(id)
                })
            }),
            Self::Keywords(values) => values.iter().all(|value| {
                tree_value_matches(value, &artwork.keywords, |id| catalog.keyword(id))
            }),
            Self::Date(filter) => filter.matches(artwork),
        }
    }
}

fn tree_value_matches<I>(
    value: &TreeValue<I>,
    attached: &[I],
    lookup: impl Fn(I) -> Option<Taxon<I>>,
) -> bool
where
    I: Copy + Eq + Hash,
{
    match value {
        TreeValue::Text(text) => attached
            .iter()
            .any(|&id| lookup(id).is_some_and(|node| taxon_matches_text(&node, text))),
        TreeValue::Subtree(ids) => attached.iter().any(|id| ids.contains(id)),
    }
}

// ============================================================================
// Filters metadata (the /search/filters/ schema)
// ============================================================================

fn facet_label(facet: &str, lang: Lang) -> &'static str {
    match (facet, lang) {
        ("title", Lang::De) => "Titel",
        ("title", Lang::En) => "Title",
        ("artists", Lang::De) => "Künstler*in",
        ("artists", Lang::En) => "Artist",
        ("place_of_production", Lang::De) => "Entstehungsort",
        ("place_of_production", Lang::En) => "Place of Production",
        ("location", Lang::De) => "Standort",
        ("location", Lang::En) => "Location",
        ("keywords", Lang::De) => "Schlagwörter",
        ("keywords", Lang::En) => "Keywords",
        ("date", Lang::De) => "Datum von, bis",
        ("date", Lang::En) => "Date from, to",
        _ => "",
    }
}

fn placeholder(label: &str, lang: Lang) -> String {
    match lang {
        Lang::De => format!("{label} eingeben"),
        Lang::En => format!("Enter {label}"),
    }
}

fn chips_facet(
    facet: &str,
    lang: Lang,
    field_format: &str,
    source_type: &str,
    allow_unknown_entries: bool,
    order: u32,
) -> Value {
    let label = facet_label(facet, lang);
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "label": {"type": "string"},
            },
        },
        "title": label,
        "x-attrs": {
            "field_format": field_format,
            "field_type": "chips",
            "dynamic_autosuggest": true,
            "allow_unknown_entries": allow_unknown_entries,
            "source": format!("/autocomplete/?type={source_type}"),
            "placeholder": placeholder(label, lang),
            "order": order,
        },
    })
}

/// The static facet schema served by `/search/filters/`, consumed by the
/// frontend form builder.
pub fn filters_schema(lang: Lang) -> Value {
    let date_label = facet_label("date", lang);
    let year_placeholder = match lang {
        Lang::De => "Jahr",
        Lang::En => "Year",
    };
    json!({
        "title": chips_facet("title", lang, "half", "titles", true, 1),
        "artists": chips_facet("artists", lang, "half", "artists", true, 2),
        "place_of_production": chips_facet("place_of_production", lang, "third", "locations", true, 3),
        "location": chips_facet("location", lang, "third", "locations", true, 4),
        "keywords": chips_facet("keywords", lang, "third", "keywords", false, 5),
        "date": {
            "type": "object",
            "properties": {
                "date_from": {"type": "string"},
                "date_to": {"type": "string"},
            },
            "title": date_label,
            "additionalProperties": false,
            "x-attrs": {
                "field_format": "full",
                "field_type": "date",
                "date_format": "year",
                "placeholder": {"date": placeholder(year_placeholder, lang)},
                "order": 6,
            },
        },
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pinakos_catalog::Person;

    fn spec(id: &str, values: Value) -> FilterSpec {
        FilterSpec {
            id: id.to_string(),
            filter_values: values,
        }
    }

    #[test]
    fn test_unknown_facet_rejected() {
        let catalog = CatalogStore::new();
        let err = parse_filter(&spec("colour", json!(["blue"])), &catalog).unwrap_err();
        assert_eq!(err.to_string(), "Invalid filter id 'colour'");
    }

    #[test]
    fn test_malformed_value_rejected() {
        let catalog = CatalogStore::new();
        let err = parse_filter(&spec("title", json!([42])), &catalog).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid format of at least one filter_value for title filter."
        );

        // an object without an id key is just as malformed
        let err = parse_filter(&spec("artists", json!([{"label": "x"}])), &catalog).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid format of at least one filter_value for artists filter."
        );
    }

    #[test]
    fn test_title_text_matches_unaccented() {
        let catalog = CatalogStore::new();
        let mut artwork = Artwork::new("Selbstporträt");
        artwork.id = ArtworkId(1);

        let filter = parse_filter(&spec("title", json!(["selbstportrat"])), &catalog).unwrap();
        assert!(filter.matches(&artwork, &catalog));

        let filter = parse_filter(&spec("title", json!(["landschaft"])), &catalog).unwrap();
        assert!(!filter.matches(&artwork, &catalog));
    }

    #[test]
    fn test_title_id_matches_exactly() {
        let catalog = CatalogStore::new();
        let mut artwork = Artwork::new("Lucretia");
        artwork.id = ArtworkId(7);

        let filter = parse_filter(&spec("title", json!([{"id": 7}])), &catalog).unwrap();
        assert!(filter.matches(&artwork, &catalog));

        let filter = parse_filter(&spec("title", json!([{"id": 8}])), &catalog).unwrap();
        assert!(!filter.matches(&artwork, &catalog));
    }

    #[test]
    fn test_artists_text_covers_synonyms() {
        let catalog = CatalogStore::new();
        let mut person = Person::new("Maria Lassnig");
        person.synonyms = vec!["Lasznig".to_string()];
        let person_id = catalog.create_person(person);

        let mut artwork = Artwork::new("Ohne Titel");
        artwork.artists = vec![person_id];

        let filter = parse_filter(&spec("artists", json!(["lasznig"])), &catalog).unwrap();
        assert!(filter.matches(&artwork, &catalog));
    }

    #[test]
    fn test_artists_and_combination() {
        let catalog = CatalogStore::new();
        let lassnig = catalog.create_person(Person::new("Maria Lassnig"));
        let other = catalog.create_person(Person::new("Egon Schiele"));

        let mut both = Artwork::new("Gemeinsam");
        both.artists = vec![lassnig, other];
        let mut only_one = Artwork::new("Allein");
        only_one.artists = vec![lassnig];

        let filter = parse_filter(
            &spec("artists", json!(["lassnig", {"id": other.value()}])),
            &catalog,
        )
        .unwrap();
        assert!(filter.matches(&both, &catalog));
        assert!(!filter.matches(&only_one, &catalog));
    }

    #[test]
    fn test_keyword_subtree_expansion() {
        let catalog = CatalogStore::new();
        let root = catalog
            .create_keyword(Taxon::new(KeywordId(0), "Architektur"), None)
            .unwrap();
        let child = catalog
            .create_keyword(Taxon::new(KeywordId(0), "Profanbau"), Some(root))
            .unwrap();

        let mut tagged_child = Artwork::new("kw test arch + profan");
        tagged_child.keywords = vec![child];
        let mut untagged = Artwork::new("anders");
        untagged.keywords = vec![];

        let filter = parse_filter(
            &spec("keywords", json!([{"id": root.value()}])),
            &catalog,
        )
        .unwrap();
        assert!(filter.matches(&tagged_child, &catalog));
        assert!(!filter.matches(&untagged, &catalog));
    }

    #[test]
    fn test_tree_text_does_not_expand() {
        let catalog = CatalogStore::new();
        let root = catalog
            .create_keyword(Taxon::new(KeywordId(0), "Architektur"), None)
            .unwrap();
        let child = catalog
            .create_keyword(Taxon::new(KeywordId(0), "Profanbau"), Some(root))
            .unwrap();

        // tagged with the child only; searching the parent's name as text
        // must not match through the hierarchy
        let mut artwork = Artwork::new("Stadt");
        artwork.keywords = vec![child];

        let filter = parse_filter(&spec("keywords", json!(["Architektur"])), &catalog).unwrap();
        assert!(!filter.matches(&artwork, &catalog));

        let filter = parse_filter(&spec("keywords", json!(["profanbau"])), &catalog).unwrap();
        assert!(filter.matches(&artwork, &catalog));
    }

    #[test]
    fn test_unknown_tree_id_matches_nothing() {
        let catalog = CatalogStore::new();
        let mut artwork = Artwork::new("Irgendwas");
        artwork.keywords = vec![];

        let filter = parse_filter(&spec("keywords", json!([{"id": 999}])), &catalog).unwrap();
        assert!(!filter.matches(&artwork, &catalog));
    }

    // ------------------------------------------------------------------------
    // Date filter
    // ------------------------------------------------------------------------

    fn dated(from: Option<i32>, to: Option<i32>) -> Artwork {
        let mut artwork = Artwork::new("Datiert");
        artwork.date_year_from = from;
        artwork.date_year_to = to;
        artwork
    }

    #[test]
    fn test_date_missing_bounds_rejected() {
        assert_eq!(
            DateFilter::parse(&json!({})).unwrap_err().to_string(),
            DATE_FORMAT_MSG
        );
        assert_eq!(
            DateFilter::parse(&json!({"date_from": "", "date_to": ""}))
                .unwrap_err()
                .to_string(),
            DATE_FORMAT_MSG
        );
        assert_eq!(
            DateFilter::parse(&json!(["2000"])).unwrap_err().to_string(),
            DATE_FORMAT_MSG
        );
    }

    #[test]
    fn test_date_non_integer_rejected() {
        for bad in ["A", "2000.5"] {
            assert_eq!(
                DateFilter::parse(&json!({"date_from": bad, "date_to": "2010"}))
                    .unwrap_err()
                    .to_string(),
                DATE_VALUE_MSG
            );
        }
    }

    #[test]
    fn test_date_inverted_range_rejected() {
        assert_eq!(
            DateFilter::parse(&json!({"date_from": "2000", "date_to": "1999"}))
                .unwrap_err()
                .to_string(),
            DATE_ORDER_MSG
        );
    }

    #[test]
    fn test_date_window_matching() {
        let filter = DateFilter::parse(&json!({"date_from": "10", "date_to": "50"})).unwrap();

        assert!(filter.matches(&dated(Some(10), Some(50)))); // exact
        assert!(filter.matches(&dated(Some(40), Some(80)))); // start inside
        assert!(filter.matches(&dated(Some(1), Some(20)))); // end inside
        assert!(filter.matches(&dated(Some(1), Some(100)))); // contains window
        assert!(!filter.matches(&dated(Some(60), Some(90))));
        assert!(!filter.matches(&dated(None, None)));
    }

    #[test]
    fn test_date_open_bounds() {
        let from_only = DateFilter::parse(&json!({"date_from": "1900"})).unwrap();
        assert!(from_only.matches(&dated(Some(1880), Some(1920))));
        assert!(from_only.matches(&dated(Some(1950), None)));
        assert!(!from_only.matches(&dated(Some(1700), Some(1750))));

        let to_only = DateFilter::parse(&json!({"date_to": "1800"})).unwrap();
        assert!(to_only.matches(&dated(Some(1750), Some(1850))));
        assert!(!to_only.matches(&dated(Some(1900), Some(1950))));
    }

    #[test]
    fn test_date_numeric_bounds_accepted() {
        let filter = DateFilter::parse(&json!({"date_from": 1642, "date_to": 1643})).unwrap();
        assert!(filter.matches(&dated(Some(1642), Some(1643))));
    }

    // ------------------------------------------------------------------------
    // Filters metadata
    // ------------------------------------------------------------------------

    #[test]
    fn test_filters_schema_has_all_facets() {
        let schema = filters_schema(Lang::En);
        let map = schema.as_object().unwrap();
        for key in FACET_KEYS {
            assert!(map.contains_key(key), "missing facet {key}");
        }
        assert_eq!(schema["title"]["x-attrs"]["order"], 1);
        assert_eq!(schema["keywords"]["x-attrs"]["allow_unknown_entries"], false);
        assert_eq!(
            schema["location"]["x-attrs"]["source"],
            "/autocomplete/?type=locations"
        );
    }

    #[test]
    fn test_filters_schema_localized() {
        assert_eq!(filters_schema(Lang::En)["title"]["title"], "Title");
        assert_eq!(filters_schema(Lang::De)["title"]["title"], "Titel");
    }
}
