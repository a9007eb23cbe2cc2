//! Geographic reference data endpoints.

use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use redwave_common::AppResult;
use redwave_db::entities::{district, upazila};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Create geo router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/districts", get(list_districts))
        .route("/upazilas", get(list_upazilas))
}

/// District response.
#[derive(Debug, Serialize)]
pub struct DistrictResponse {
    pub id: i32,
    pub name: String,
}

impl From<district::Model> for DistrictResponse {
    fn from(district: district::Model) -> Self {
        Self {
            id: district.id,
            name: district.name,
        }
    }
}

/// Upazila response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpazilaResponse {
    pub id: i32,
    pub name: String,
    pub district_id: i32,
}

impl From<upazila::Model> for UpazilaResponse {
    fn from(upazila: upazila::Model) -> Self {
        Self {
            id: upazila.id,
            name: upazila.name,
            district_id: upazila.district_id,
        }
    }
}

/// List all districts, sorted by name. Public.
async fn list_districts(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<DistrictResponse>>> {
    let districts = state.directory_service.districts().await?;
    Ok(ApiResponse::ok(
        districts.into_iter().map(DistrictResponse::from).collect(),
    ))
}

/// List upazilas query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpazilasQuery {
    pub district_id: Option<i32>,
}

/// List upazilas, optionally scoped to one district. Public.
async fn list_upazilas(
    State(state): State<AppState>,
    Query(query): Query<ListUpazilasQuery>,
) -> AppResult<ApiResponse<Vec<UpazilaResponse>>> {
    let upazilas = state.directory_service.upazilas(query.district_id).await?;
    Ok(ApiResponse::ok(
        upazilas.into_iter().map(UpazilaResponse::from).collect(),
    ))
}
