//! Access token issue and verification.
//!
//! Tokens carry only the subject email. Role is looked up fresh from the
//! user store on every gated operation, so a role change takes effect on
//! the next lookup rather than requiring token reissue.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject email.
    pub sub: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
}

/// Issues and verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Create a token manager from a shared secret.
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for the given subject email.
    pub fn issue(&self, email: &str) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: email.to_lowercase(),
            exp: now + self.ttl_secs,
            iat: now,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("failed to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Any signature or expiry failure maps to `Unauthenticated`; the caller
    /// must not learn which check failed.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let manager = TokenManager::new("test-secret", 3600);
        let token = manager.issue("Donor@Example.com").unwrap();
        let claims = manager.verify(&token).unwrap();

        assert_eq!(claims.sub, "donor@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let manager = TokenManager::new("test-secret", 3600);
        let result = manager.verify("not-a-token");

        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenManager::new("secret-a", 3600);
        let verifier = TokenManager::new("secret-b", 3600);

        let token = issuer.issue("donor@example.com").unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_verify_rejects_expired() {
        let manager = TokenManager::new("test-secret", -120);
        let token = manager.issue("donor@example.com").unwrap();

        assert!(matches!(
            manager.verify(&token),
            Err(AppError::Unauthenticated)
        ));
    }
}
