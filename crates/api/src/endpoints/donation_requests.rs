//! Donation request endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use redwave_common::{AppError, AppResult};
use redwave_core::{authorize, CreateRequestInput, ListRequestsQuery, Operation};
use redwave_db::entities::{donation_request, donation_request::DonationStatus};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Create donation request router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/donation-requests",
            get(list_all_requests).post(create_request),
        )
        .route("/donation-requests/{id}", delete(delete_request))
        .route(
            "/donation-requests-for-user/{email}",
            get(list_requests_for_user),
        )
        .route(
            "/donation-request-single/{id}",
            get(get_request).put(edit_request),
        )
        .route("/blood-donation-apply", patch(claim_request))
        .route("/blood-donation-updated", patch(update_request_status))
        .route("/recent-donation-requests", get(recent_requests))
        .route("/pending-donation-requests", get(pending_requests))
}

/// Donation request response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequestResponse {
    pub id: String,
    pub requester_email: String,
    pub requester_name: String,
    pub recipient_name: String,
    pub recipient_district: String,
    pub recipient_upazila: String,
    pub hospital_name: String,
    pub full_address: String,
    pub blood_group: String,
    pub donation_date: DateTime<Utc>,
    pub donation_time: String,
    pub request_message: String,
    pub donation_status: DonationStatus,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<donation_request::Model> for DonationRequestResponse {
    fn from(request: donation_request::Model) -> Self {
        Self {
            id: request.id,
            requester_email: request.requester_email,
            requester_name: request.requester_name,
            recipient_name: request.recipient_name,
            recipient_district: request.recipient_district,
            recipient_upazila: request.recipient_upazila,
            hospital_name: request.hospital_name,
            full_address: request.full_address,
            blood_group: request.blood_group,
            donation_date: request.donation_date.with_timezone(&Utc),
            donation_time: request.donation_time,
            request_message: request.request_message,
            donation_status: request.donation_status,
            donor_name: request.donor_name,
            donor_email: request.donor_email,
            created_at: request.created_at.with_timezone(&Utc),
            updated_at: request.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Create or edit request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequestBody {
    #[validate(length(min = 1))]
    pub requester_name: String,
    #[validate(length(min = 1))]
    pub recipient_name: String,
    #[validate(length(min = 1))]
    pub recipient_district: String,
    #[validate(length(min = 1))]
    pub recipient_upazila: String,
    pub hospital_name: String,
    pub full_address: String,
    #[validate(length(min = 1, max = 8))]
    pub blood_group: String,
    pub donation_date: DateTime<Utc>,
    pub donation_time: String,
    pub request_message: String,
}

impl From<DonationRequestBody> for CreateRequestInput {
    fn from(body: DonationRequestBody) -> Self {
        Self {
            requester_name: body.requester_name,
            recipient_name: body.recipient_name,
            recipient_district: body.recipient_district,
            recipient_upazila: body.recipient_upazila,
            hospital_name: body.hospital_name,
            full_address: body.full_address,
            blood_group: body.blood_group,
            donation_date: body.donation_date,
            donation_time: body.donation_time,
            request_message: body.request_message,
        }
    }
}

/// Create a donation request. The caller becomes the owner; any status or
/// donor fields sent by the client are ignored.
async fn create_request(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<DonationRequestBody>,
) -> AppResult<ApiResponse<DonationRequestResponse>> {
    body.validate()?;

    let created = state
        .donation_request_service
        .create(&identity.email, body.into())
        .await?;

    Ok(ApiResponse::ok(DonationRequestResponse::from(created)))
}

/// List query for request collections.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<DonationStatus>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// List every donation request. Admin and volunteer only.
async fn list_all_requests(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<DonationRequestResponse>>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::ListAllRequests)?;

    let requests = state
        .donation_request_service
        .list(&ListRequestsQuery {
            status: query.status,
            requester_email: None,
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(ApiResponse::ok(
        requests
            .into_iter()
            .map(DonationRequestResponse::from)
            .collect(),
    ))
}

/// List one requester's donation requests. Self or privileged.
async fn list_requests_for_user(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<DonationRequestResponse>>> {
    let email = email.to_lowercase();
    if identity.email != email {
        let role = state.role_of(&identity.email).await?;
        authorize(role, Operation::ListAllRequests)?;
    }

    let requests = state
        .donation_request_service
        .list(&ListRequestsQuery {
            status: query.status,
            requester_email: Some(email),
            limit: query.limit,
            offset: query.offset,
        })
        .await?;

    Ok(ApiResponse::ok(
        requests
            .into_iter()
            .map(DonationRequestResponse::from)
            .collect(),
    ))
}

/// Fetch one donation request.
async fn get_request(
    AuthIdentity(_identity): AuthIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<DonationRequestResponse>> {
    let request = state.donation_request_service.get(&id).await?;
    Ok(ApiResponse::ok(DonationRequestResponse::from(request)))
}

/// Replace the editable fields of a pending request. Owner only.
async fn edit_request(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<DonationRequestBody>,
) -> AppResult<ApiResponse<DonationRequestResponse>> {
    body.validate()?;

    let edited = state
        .donation_request_service
        .edit(&id, &identity.email, body.into())
        .await?;

    Ok(ApiResponse::ok(DonationRequestResponse::from(edited)))
}

/// Claim request body.
#[derive(Debug, Deserialize)]
pub struct ClaimRequestBody {
    pub id: String,
}

/// Claim a pending request as the signed-in donor.
///
/// Donor name and email come from the caller's stored profile, never from
/// the request body.
async fn claim_request(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<ClaimRequestBody>,
) -> AppResult<ApiResponse<DonationRequestResponse>> {
    let donor = state.user_service.get_by_email(&identity.email).await?;

    let claimed = state
        .donation_request_service
        .claim(&body.id, &donor.name, &donor.email)
        .await?;

    info!(request_id = %body.id, donor = %identity.email, "Donor applied to donation request");
    Ok(ApiResponse::ok(DonationRequestResponse::from(claimed)))
}

/// Status update body for the done/cancel transitions.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub id: String,
    pub status: DonationStatus,
}

/// Move a request to `done` or `canceled`.
async fn update_request_status(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(body): Json<UpdateStatusBody>,
) -> AppResult<ApiResponse<DonationRequestResponse>> {
    let role = state.role_of(&identity.email).await?;

    let updated = match body.status {
        DonationStatus::Done => {
            state
                .donation_request_service
                .complete(&body.id, &identity.email, role)
                .await?
        }
        DonationStatus::Canceled => {
            state
                .donation_request_service
                .cancel(&body.id, &identity.email, role)
                .await?
        }
        DonationStatus::Pending | DonationStatus::InProgress => {
            return Err(AppError::BadRequest(
                "status must be done or canceled".to_string(),
            ));
        }
    };

    Ok(ApiResponse::ok(DonationRequestResponse::from(updated)))
}

/// Delete a request. Owner or admin.
async fn delete_request(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let role = state.role_of(&identity.email).await?;
    state
        .donation_request_service
        .delete(&id, &identity.email, role)
        .await?;

    Ok(ApiResponse::ok(()))
}

/// Urgent needs for the landing page: donation dates inside the last 24
/// hours, at most six. Public.
async fn recent_requests(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DonationRequestResponse>>> {
    let requests = state.donation_request_service.recent().await?;
    Ok(ApiResponse::ok(
        requests
            .into_iter()
            .map(DonationRequestResponse::from)
            .collect(),
    ))
}

/// Every pending request, for browsing donors. Public.
async fn pending_requests(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DonationRequestResponse>>> {
    let requests = state.donation_request_service.pending().await?;
    Ok(ApiResponse::ok(
        requests
            .into_iter()
            .map(DonationRequestResponse::from)
            .collect(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_request_response_serialization() {
        let response = DonationRequestResponse {
            id: "req1".to_string(),
            requester_email: "requester@example.com".to_string(),
            requester_name: "Requester".to_string(),
            recipient_name: "Recipient".to_string(),
            recipient_district: "Dhaka".to_string(),
            recipient_upazila: "Dhanmondi".to_string(),
            hospital_name: "City Hospital".to_string(),
            full_address: "12 Road".to_string(),
            blood_group: "A+".to_string(),
            donation_date: Utc::now(),
            donation_time: "10:00".to_string(),
            request_message: "Urgent".to_string(),
            donation_status: DonationStatus::InProgress,
            donor_name: Some("Donor".to_string()),
            donor_email: Some("donor@example.com".to_string()),
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"donationStatus\":\"inprogress\""));
        assert!(json.contains("\"donorEmail\":\"donor@example.com\""));
    }

    #[test]
    fn test_status_body_rejects_unknown_status() {
        let result = serde_json::from_str::<UpdateStatusBody>(r#"{"id":"r1","status":"paused"}"#);
        assert!(result.is_err());
    }
}
