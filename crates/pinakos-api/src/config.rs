//! Service configuration.
//!
//! Loaded from a TOML file selected with the CLI's `--config` flag; every
//! field has a default so an empty file (or none at all) works for local
//! development.

use pinakos_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime configuration of the API service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL that relative media paths are resolved against.
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,

    /// Default page size of the search endpoint.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Default per-type cap of the autocomplete endpoint.
    #[serde(default = "default_autocomplete_limit")]
    pub autocomplete_limit: usize,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_media_base_url() -> String {
    "http://127.0.0.1:8000/media".to_string()
}

fn default_search_limit() -> usize {
    30
}

fn default_autocomplete_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            media_base_url: default_media_base_url(),
            search_limit: default_search_limit(),
            autocomplete_limit: default_autocomplete_limit(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| Error::validation(format!("invalid configuration: {e}")))
    }
}

// ============================================================================
// Tests
// ============================================================================
