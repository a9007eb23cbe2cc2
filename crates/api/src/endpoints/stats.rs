//! Statistics endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use redwave_common::AppResult;
use redwave_core::{authorize, Operation, Totals};
use redwave_db::entities::donation_request::DonationStatus;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Create statistics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/total-statistics", get(total_statistics))
        .route(
            "/total-donation-request-for-user/{email}",
            get(request_count_for_user),
        )
}

/// Dashboard totals response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub total_users: u64,
    pub total_requests: u64,
    pub total_funds_minor: i64,
}

impl From<Totals> for TotalsResponse {
    fn from(totals: Totals) -> Self {
        Self {
            total_users: totals.user_count,
            total_requests: totals.request_count,
            total_funds_minor: totals.fund_total_minor,
        }
    }
}

/// Dashboard totals. Admin and volunteer only.
async fn total_statistics(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<TotalsResponse>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::ViewStatistics)?;

    let totals = state.stats_service.totals().await?;
    Ok(ApiResponse::ok(TotalsResponse::from(totals)))
}

/// Count query.
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub status: Option<DonationStatus>,
}

/// Count response.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: u64,
}

/// Per-requester request count. Self or privileged.
async fn request_count_for_user(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(query): Query<CountQuery>,
) -> AppResult<ApiResponse<CountResponse>> {
    let email = email.to_lowercase();
    if identity.email != email {
        let role = state.role_of(&identity.email).await?;
        authorize(role, Operation::ViewStatistics)?;
    }

    let total = state
        .stats_service
        .count_for_requester(&email, query.status)
        .await?;

    Ok(ApiResponse::ok(CountResponse { total }))
}
