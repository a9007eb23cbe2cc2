//! Auth endpoints.

use axum::{extract::State, routing::post, Json, Router};
use redwave_common::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/jwt", post(issue_token))
}

/// Token issue request.
#[derive(Debug, Deserialize)]
pub struct IssueTokenRequest {
    pub email: String,
}

/// Token issue response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue an access token for the given email.
///
/// The upstream identity provider has already authenticated the user before
/// the client calls this; the token only names the subject, role is looked
/// up per request.
async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<IssueTokenRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("invalid email".to_string()));
    }

    let token = state.token_manager.issue(&email)?;
    info!(email = %email, "Issued access token");

    Ok(ApiResponse::ok(TokenResponse { token }))
}
