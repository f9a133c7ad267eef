//! Token Signer
//!
//! HS256 signing behind the `TokenSigner` capability trait. The signing
//! algorithm is a wiring-time decision; verification callers only name
//! the token kind they expect.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::token::claims::{Claims, TokenKind, ISSUER};

/// Signing or verification failure
///
/// Callers do not distinguish the cause; every failure collapses to an
/// invalid token at the API boundary.
#[derive(Debug, Error)]
#[error("Token operation failed: {0}")]
pub struct TokenError(#[from] jsonwebtoken::errors::Error);

/// Capability interface for token signing and verification
pub trait TokenSigner: Send + Sync {
    /// Sign a claim set into a compact token string
    fn sign(&self, claims: &Claims) -> Result<String, TokenError>;

    /// Verify a token string, checking signature, expiry, issuer and
    /// the audience of the expected kind
    fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError>;
}

/// HS256 JWT signer
///
/// Access and refresh tokens share one secret; the audience claim is
/// what keeps the two families apart.
pub struct JwtSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl TokenSigner for JwtSigner {
    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)?;
        Ok(token)
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[kind.audience()]);

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::{
        display_name::DisplayName, email::Email, user_password::UserPassword,
    };
    use chrono::Utc;

    fn signer() -> JwtSigner {
        JwtSigner::new("test-secret")
    }

    fn test_user() -> User {
        User::new(
            Email::new("alice@example.com").unwrap(),
            DisplayName::new("Alice").unwrap(),
            UserPassword::from_db("$2b$04$abcdefghijklmnopqrstuv").unwrap(),
        )
    }

    #[test]
    fn test_sign_and_verify_access() {
        let signer = signer();
        let user = test_user();
        let claims = Claims::access(&user, chrono::Duration::minutes(15), Utc::now());

        let token = signer.sign(&claims).unwrap();
        let verified = signer.verify(&token, TokenKind::Access).unwrap();

        assert_eq!(verified.sub, user.user_id.to_string());
        assert_eq!(verified.email.as_deref(), Some("alice@example.com"));
        assert_eq!(verified.role.as_deref(), Some("user"));
    }

    #[test]
    fn test_audience_isolation() {
        let signer = signer();
        let user = test_user();

        let access = signer
            .sign(&Claims::access(&user, chrono::Duration::minutes(15), Utc::now()))
            .unwrap();
        let refresh = signer
            .sign(&Claims::refresh(&user, chrono::Duration::days(7), Utc::now()))
            .unwrap();

        // Each kind only verifies as itself
        assert!(signer.verify(&access, TokenKind::Refresh).is_err());
        assert!(signer.verify(&refresh, TokenKind::Access).is_err());
        assert!(signer.verify(&access, TokenKind::Access).is_ok());
        assert!(signer.verify(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let signer = signer();
        let user = test_user();

        // Issued two hours in the past, already past its 15 minute TTL
        // and outside the default verification leeway
        let issued = Utc::now() - chrono::Duration::hours(2);
        let claims = Claims::access(&user, chrono::Duration::minutes(15), issued);

        let token = signer.sign(&claims).unwrap();
        assert!(signer.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let signer = signer();
        let other = JwtSigner::new("another-secret");
        let user = test_user();

        let token = signer
            .sign(&Claims::access(&user, chrono::Duration::minutes(15), Utc::now()))
            .unwrap();
        assert!(other.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(signer().verify("not.a.token", TokenKind::Access).is_err());
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let signer = signer();
        let user = test_user();
        let now = Utc::now();

        let a = signer
            .sign(&Claims::refresh(&user, chrono::Duration::days(7), now))
            .unwrap();
        let b = signer
            .sign(&Claims::refresh(&user, chrono::Duration::days(7), now))
            .unwrap();
        assert_ne!(a, b);
    }
}
