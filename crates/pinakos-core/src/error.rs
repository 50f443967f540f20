//! Error taxonomy shared by all Pinakos crates.
//!
//! The variants mirror how failures surface at the API boundary: request
//! validation problems, missing entities, and insufficient permissions.
//! Errors are raised close to the point of detection and propagate
//! unmodified — there is no retry or silent recovery anywhere in the
//! pipeline.

use thiserror::Error;

/// Result type alias for Pinakos operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Pinakos crates.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A request parameter or filter payload failed validation.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "artwork" or "album".
        kind: &'static str,
        /// Stringified identifier of the missing entity.
        id: String,
    },

    /// The acting user lacks the required ownership or permission.
    #[error("{0}")]
    PermissionDenied(String),

    /// An underlying I/O operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for the given entity kind and id.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create a permission-denied error with the given message.
    pub fn permission(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Returns `true` if this is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
