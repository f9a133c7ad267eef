//! Authorization header parsing
//!
//! Strict `Bearer` scheme extraction for token-based authentication.

use axum::http::{HeaderMap, header};
use thiserror::Error;

/// Exact prefix required by the Bearer scheme (trailing space included)
const BEARER_PREFIX: &str = "Bearer ";

/// Error when extracting a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearerError {
    /// Authorization header is absent
    #[error("Access token required")]
    MissingHeader,

    /// Header present but not `Bearer <token>`
    #[error("Authorization header must start with Bearer")]
    MalformedHeader,
}

/// Extract a bearer token from an `Authorization` header value
///
/// Requires the exact `"Bearer "` prefix; anything else (other schemes,
/// missing space, empty token) is `MalformedHeader`.
pub fn extract_bearer(header_value: &str) -> Result<&str, BearerError> {
    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::MalformedHeader)?;

    if token.is_empty() {
        return Err(BearerError::MalformedHeader);
    }

    Ok(token)
}

/// Extract a bearer token from a request header map
///
/// `MissingHeader` when no `Authorization` header is present.
pub fn extract_bearer_from_headers(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(BearerError::MissingHeader)?;

    extract_bearer(value)
}
