//! Typed integer identifiers for catalog entities.
//!
//! Every entity is addressed by a sequential `u64` wrapped in a newtype, so
//! an `ArtworkId` can never be confused with a `PersonId` at a call site.
//! The wrapped value is what appears on the wire (serde-transparent), which
//! keeps API payloads identical to plain integer ids.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// The raw integer value.
            pub fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of an artwork.
    ArtworkId
);
define_id!(
    /// Identifier of a person (artist, photographer, author, graphic designer).
    PersonId
);
define_id!(
    /// Identifier of a keyword taxonomy node.
    KeywordId
);
define_id!(
    /// Identifier of a location taxonomy node.
    LocationId
);
define_id!(
    /// Identifier of a material.
    MaterialId
);
define_id!(
    /// Identifier of an album.
    AlbumId
);

// ============================================================================
// Tests
// ============================================================================
