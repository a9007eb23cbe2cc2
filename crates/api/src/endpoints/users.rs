//! User endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use redwave_common::{AppError, AppResult};
use redwave_core::{authorize, Operation, UpsertProfileInput};
use redwave_db::{
    entities::{
        user,
        user::{UserRole, UserStatus},
    },
    repositories::DonorSearchCriteria,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Create user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(list_users).put(upsert_profile).patch(update_role_status),
        )
        .route("/users/{email}", get(get_user))
        .route("/users-by-search", get(search_donors))
}

/// User response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub blood_group: String,
    pub district: String,
    pub upazila: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar_url: user.avatar_url,
            blood_group: user.blood_group,
            district: user.district,
            upazila: user.upazila,
            role: user.role,
            status: user.status,
            created_at: user.created_at.with_timezone(&Utc),
            updated_at: user.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Profile upsert request, sent on every sign-in.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub avatar_url: Option<String>,
    #[validate(length(min = 1, max = 8))]
    pub blood_group: String,
    pub district: String,
    pub upazila: String,
}

/// Upsert a profile keyed by email. Callers may only write their own record.
///
/// Role and status are not accepted here; an existing record keeps the
/// values an admin assigned.
async fn upsert_profile(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<UpsertProfileRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    req.validate()?;

    if req.email.trim().to_lowercase() != identity.email {
        return Err(AppError::Forbidden(
            "profile can only be saved for the signed-in account".to_string(),
        ));
    }

    let saved = state
        .user_service
        .upsert_profile(UpsertProfileInput {
            email: req.email,
            name: req.name,
            avatar_url: req.avatar_url,
            blood_group: req.blood_group,
            district: req.district,
            upazila: req.upazila,
        })
        .await?;

    Ok(ApiResponse::ok(UserResponse::from(saved)))
}

/// List users query.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub status: Option<UserStatus>,
}

/// List users, optionally filtered by status. Admin only.
async fn list_users(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::ListUsers)?;

    let users = state.user_service.list(query.status).await?;
    Ok(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// Role/status mutation request.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleStatusRequest {
    pub id: String,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

/// Change a user's role and/or status. Admin only.
async fn update_role_status(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<UpdateRoleStatusRequest>,
) -> AppResult<ApiResponse<()>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::MutateUserRoleStatus)?;

    info!(admin = %identity.email, user_id = %req.id, "Changing user role/status");
    state
        .user_service
        .set_role_status(&req.id, req.role, req.status)
        .await?;

    Ok(ApiResponse::ok(()))
}

/// Fetch a profile by email. Self or admin.
async fn get_user(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let email = email.to_lowercase();
    if identity.email != email {
        let role = state.role_of(&identity.email).await?;
        authorize(role, Operation::ListUsers)?;
    }

    let user = state.user_service.get_by_email(&email).await?;
    Ok(ApiResponse::ok(UserResponse::from(user)))
}

/// Donor search query. All fields optional, exact-equality, AND-combined.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDonorsQuery {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

/// Search active donors. Public.
async fn search_donors(
    State(state): State<AppState>,
    Query(query): Query<SearchDonorsQuery>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let donors = state
        .directory_service
        .search(&DonorSearchCriteria {
            blood_group: query.blood_group,
            district: query.district,
            upazila: query.upazila,
        })
        .await?;

    Ok(ApiResponse::ok(
        donors.into_iter().map(UserResponse::from).collect(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_serialization() {
        let response = UserResponse {
            id: "u1".to_string(),
            email: "donor@example.com".to_string(),
            name: "Donor".to_string(),
            avatar_url: None,
            blood_group: "O+".to_string(),
            district: "Dhaka".to_string(),
            upazila: "Savar".to_string(),
            role: UserRole::Donor,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"bloodGroup\":\"O+\""));
        assert!(json.contains("\"role\":\"donor\""));
        assert!(json.contains("\"status\":\"active\""));
    }
}
