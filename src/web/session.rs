//! Session cookie handling and the authenticated-user extractor.

use super::AppState;
use crate::{core::auth, entities::user, errors::Error};
use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap,
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
    },
};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "stock_buddy_session";

/// The user behind a valid session. Extracting it rejects anonymous requests
/// with a redirect to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The logged-in account
    pub user: user::Model,
    /// The session token that authenticated the request
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<Self>() {
            return Ok(current.clone());
        }

        let token = session_token(&parts.headers).ok_or(Error::Unauthorized)?;
        let user = auth::authenticate_token(&state.db, &token).await?;
        let current = Self { user, token };
        parts.extensions.insert(current.clone());
        Ok(current)
    }
}

/// Reads the session token from an `Authorization: Bearer` header or the session cookie.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value that stores `token` for `ttl_hours`.
#[must_use]
pub fn session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        ttl_hours.saturating_mul(3600)
    )
}

/// `Set-Cookie` value that removes the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}
