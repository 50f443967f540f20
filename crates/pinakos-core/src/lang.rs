//! Request language and localized field selection.
//!
//! The catalog stores German values as the default and optional English
//! variants next to them (`name` / `name_en`, `title` / `title_english`).
//! A request's `Accept-Language` header decides which variant is preferred;
//! the English variant is only used when it is non-empty, otherwise the
//! default value is returned.

use serde::{Deserialize, Serialize};

/// Language of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// German, the catalog's default language.
    #[default]
    De,
    /// English.
    En,
}

impl Lang {
    /// Derive the request language from an `Accept-Language` header value.
    ///
    /// Only the first (highest-priority) tag is considered; any `en` variant
    /// selects English, everything else falls back to the default.
    pub fn from_accept_language(header: &str) -> Self {
        let first = header
            .split(',')
            .next()
            .unwrap_or("")
            .split(';')
            .next()
            .unwrap_or("")
            .trim();

        let tag = first.to_ascii_lowercase();
        if tag == "en" || tag.starts_with("en-") || tag.starts_with("en_") {
            Self::En
        } else {
            Self::De
        }
    }

    /// Pick the localized variant of a field.
    ///
    /// Returns `english` under [`Lang::En`] when it is non-empty, otherwise
    /// the default value.
    pub fn pick<'a>(self, default: &'a str, english: &'a str) -> &'a str {
        match self {
            Self::En if !english.is_empty() => english,
            _ => default,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
