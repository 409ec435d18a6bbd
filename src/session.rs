//! Browser sessions identified by a signed cookie.
//!
//! The cookie value is `<ulid>.<sig>` where `sig` is the hex SHA-256 of the
//! secret and the id. A missing, malformed or tampered cookie yields a fresh
//! session.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::types::SessionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    /// True when the request carried no valid session cookie
    pub is_new: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            is_new: true,
        }
    }

    /// Resolve the session from request headers
    pub fn from_headers(headers: &HeaderMap, config: &AppConfig) -> Self {
        cookie_value(headers, &config.cookie_name)
            .and_then(|value| verify(&value, &config.session_secret))
            .map(|id| Self { id, is_new: false })
            .unwrap_or_else(Self::new)
    }

    /// `Set-Cookie` header value for this session.
    /// Sent on every response so the cookie expiry follows activity.
    pub fn cookie(&self, config: &AppConfig) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            config.cookie_name,
            sign(&self.id, &config.session_secret),
            config.cookie_max_age.as_secs()
        )
    }

    /// Attach the session cookie to a response
    pub fn finish(&self, response: impl IntoResponse, config: &AppConfig) -> Response {
        let mut response = response.into_response();
        match HeaderValue::from_str(&self.cookie(config)) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::error!("Invalid session cookie header: {}", e),
        }
        response
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_headers(&parts.headers, &state.config);
        if session.is_new {
            tracing::debug!(session = %session.id, "New session");
        }
        Ok(session)
    }
}

fn signature(id: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b":");
    hasher.update(id.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn sign(id: &str, secret: &str) -> String {
    format!("{}.{}", id, signature(id, secret))
}

/// Returns the session id if the value is a well-formed, correctly signed
/// cookie value
pub fn verify(value: &str, secret: &str) -> Option<SessionId> {
    let (id, sig) = value.split_once('.')?;
    ulid::Ulid::from_string(id).ok()?;
    if constant_time_eq(signature(id, secret).as_bytes(), sig.as_bytes()) {
        Some(id.to_string())
    } else {
        None
    }
}

/// Find a cookie by name across all `Cookie` headers
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
