//! HTTP API for the Pinakos catalog.
//!
//! Exposes the search, filters-metadata, autocomplete, album, and health
//! endpoints over axum. All request validation errors surface as
//! `400 {"detail": "..."}`; missing entities as 404; permission problems
//! as 403 — fail-fast, never partial results.
//!
//! # Endpoints
//!
//! | Method | Path                        | Purpose                         |
//! |--------|-----------------------------|---------------------------------|
//! | POST   | `/search/`                  | Ranked, filtered artwork search |
//! | GET    | `/search/filters/`          | Static facet schema             |
//! | GET    | `/autocomplete/`            | Typed lookups                   |
//! | GET    | `/albums/`                  | Albums visible to the user      |
//! | POST   | `/albums/`                  | Create an album                 |
//! | GET    | `/albums/{id}/`             | Album details                   |
//! | POST   | `/albums/{id}/permissions/` | Replace the share list          |
//! | GET    | `/health`                   | Service state                   |
//!
//! The request user is taken from the `X-User` header (session handling
//! lives in front of this service); the request language from
//! `Accept-Language`.

pub mod config;
pub mod error;
pub mod extract;
pub mod project;
pub mod routes;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use server::serve;
pub use state::AppState;
