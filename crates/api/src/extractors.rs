//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

/// Verified caller identity, set by the auth middleware.
///
/// Carries only the email; the role is resolved fresh from the user store on
/// each gated operation.
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: String,
}

/// Authenticated identity extractor. Rejects with 401 when the request
/// carried no valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when the token verified
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthIdentity)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
