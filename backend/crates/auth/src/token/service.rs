//! Token Service
//!
//! Application-facing facade over the signer: issues the access/refresh
//! pair with configured lifetimes and collapses every verification
//! failure into `AuthError::InvalidToken`.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entity::user::User;
use crate::error::{AuthError, AuthResult};
use crate::token::claims::{Claims, TokenKind};
use crate::token::signer::TokenSigner;

/// Issues and verifies tokens with configured lifetimes
#[derive(Clone)]
pub struct TokenService {
    signer: Arc<dyn TokenSigner>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(
        signer: Arc<dyn TokenSigner>,
        access_ttl: chrono::Duration,
        refresh_ttl: chrono::Duration,
    ) -> Self {
        Self {
            signer,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a short-lived access token for a user
    pub fn issue_access(&self, user: &User) -> AuthResult<String> {
        let claims = Claims::access(user, self.access_ttl, Utc::now());
        self.signer
            .sign(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Issue a long-lived refresh token for a user
    pub fn issue_refresh(&self, user: &User) -> AuthResult<String> {
        let claims = Claims::refresh(user, self.refresh_ttl, Utc::now());
        self.signer
            .sign(&claims)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Verify an access token
    ///
    /// The reason for failure (signature, expiry, audience) is not
    /// exposed to callers.
    pub fn verify_access(&self, token: &str) -> AuthResult<Claims> {
        self.signer
            .verify(token, TokenKind::Access)
            .map_err(|_| AuthError::InvalidToken)
    }

    /// Verify a refresh token
    pub fn verify_refresh(&self, token: &str) -> AuthResult<Claims> {
        self.signer
            .verify(token, TokenKind::Refresh)
            .map_err(|_| AuthError::InvalidToken)
    }
}
