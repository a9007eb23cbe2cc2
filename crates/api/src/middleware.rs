//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use redwave_common::TokenManager;
use redwave_core::{
    ContentService, DirectoryService, DonationRequestService, FundService, StatsService,
    UserService,
};
use redwave_db::entities::user::UserRole;

use crate::extractors::Identity;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub directory_service: DirectoryService,
    pub donation_request_service: DonationRequestService,
    pub stats_service: StatsService,
    pub fund_service: FundService,
    pub content_service: ContentService,
    pub token_manager: Arc<TokenManager>,
}

impl AppState {
    /// Resolve the caller's role from the user store.
    pub async fn role_of(&self, email: &str) -> redwave_common::AppResult<UserRole> {
        self.user_service.resolve_role(email).await
    }
}

/// Authentication middleware.
///
/// Verifies the bearer token and stores the caller identity in request
/// extensions; endpoints requiring auth reject via the extractor. Invalid
/// tokens are treated the same as absent ones.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = state.token_manager.verify(token)
    {
        req.extensions_mut().insert(Identity { email: claims.sub });
    }

    next.run(req).await
}
