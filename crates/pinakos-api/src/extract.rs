//! Request extractors.
//!
//! Identity and language travel in headers: session handling happens in
//! front of this service, which trusts `X-User`, and the first
//! `Accept-Language` tag selects the response language.

use axum::extract::FromRequestParts;
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use pinakos_core::Lang;
use std::convert::Infallible;

/// Name of the trusted identity header.
pub const USER_HEADER: &str = "x-user";

/// The request's language, derived from `Accept-Language`.
#[derive(Debug, Clone, Copy)]
pub struct RequestLang(pub Lang);

impl<S> FromRequestParts<S> for RequestLang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Lang::from_accept_language)
            .unwrap_or_default();
        Ok(Self(lang))
    }
}

/// The requesting user, if the `X-User` header is present.
#[derive(Debug, Clone)]
pub struct RequestUser(pub Option<String>);

impl<S> FromRequestParts<S> for RequestUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(String::from);
        Ok(Self(user))
    }
}
