//! Fund endpoints.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use redwave_common::AppResult;
use redwave_core::{authorize, Operation, RecordFundInput};
use redwave_db::entities::fund;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Create fund router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/funds", get(list_funds).post(record_fund))
}

/// Fund response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FundResponse {
    pub id: String,
    pub contributor_name: String,
    pub contributor_email: String,
    pub amount_minor: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl From<fund::Model> for FundResponse {
    fn from(fund: fund::Model) -> Self {
        Self {
            id: fund.id,
            contributor_name: fund.contributor_name,
            contributor_email: fund.contributor_email,
            amount_minor: fund.amount_minor,
            currency: fund.currency,
            created_at: fund.created_at.with_timezone(&Utc),
        }
    }
}

/// Payment intent request. Amount is in the smallest currency unit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub amount_minor: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "usd".to_string()
}

/// Payment intent response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentResponse {
    pub client_secret: String,
}

/// Create a payment intent with the provider and hand the client secret
/// back to the browser.
async fn create_payment_intent(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<CreateIntentRequest>,
) -> AppResult<ApiResponse<CreateIntentResponse>> {
    let client_secret = state
        .fund_service
        .create_intent(req.amount_minor, &req.currency)
        .await?;

    info!(contributor = %identity.email, amount_minor = req.amount_minor, "Created payment intent");
    Ok(ApiResponse::ok(CreateIntentResponse { client_secret }))
}

/// Record fund request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFundRequest {
    pub name: String,
    pub amount_minor: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Record a completed contribution. The contributor email is the caller's
/// identity, not taken from the body.
async fn record_fund(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<RecordFundRequest>,
) -> AppResult<ApiResponse<FundResponse>> {
    let saved = state
        .fund_service
        .record(RecordFundInput {
            contributor_name: req.name,
            contributor_email: identity.email,
            amount_minor: req.amount_minor,
            currency: req.currency,
        })
        .await?;

    Ok(ApiResponse::ok(FundResponse::from(saved)))
}

/// List funds query.
#[derive(Debug, Deserialize)]
pub struct ListFundsQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// List contributions, newest first. Admin and volunteer only.
async fn list_funds(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListFundsQuery>,
) -> AppResult<ApiResponse<Vec<FundResponse>>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::ListFunds)?;

    let funds = state.fund_service.list(query.limit, query.offset).await?;
    Ok(ApiResponse::ok(
        funds.into_iter().map(FundResponse::from).collect(),
    ))
}
