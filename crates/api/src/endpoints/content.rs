//! Blog content endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use redwave_common::AppResult;
use redwave_core::{authorize, CreateContentInput, Operation};
use redwave_db::entities::{content, content::ContentStatus};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthIdentity, middleware::AppState, response::ApiResponse};

/// Create content router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_published).post(create_blog))
        .route("/blogs/all", get(list_all))
        .route("/blogs/{id}/status", patch(set_status))
        .route("/blogs/{id}", delete(delete_blog))
}

/// Blog response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub body: String,
    pub status: ContentStatus,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<content::Model> for BlogResponse {
    fn from(post: content::Model) -> Self {
        Self {
            id: post.id,
            title: post.title,
            thumbnail_url: post.thumbnail_url,
            body: post.body,
            status: post.status,
            author_email: post.author_email,
            created_at: post.created_at.with_timezone(&Utc),
            updated_at: post.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Create blog request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub body: String,
}

/// Create a blog draft. Admin and volunteer only.
async fn create_blog(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Json(req): Json<CreateBlogRequest>,
) -> AppResult<ApiResponse<BlogResponse>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::CreateContent)?;

    let post = state
        .content_service
        .create(
            &identity.email,
            CreateContentInput {
                title: req.title,
                thumbnail_url: req.thumbnail_url,
                body: req.body,
            },
        )
        .await?;

    Ok(ApiResponse::ok(BlogResponse::from(post)))
}

/// Published posts. Public.
async fn list_published(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<BlogResponse>>> {
    let posts = state.content_service.list_published().await?;
    Ok(ApiResponse::ok(
        posts.into_iter().map(BlogResponse::from).collect(),
    ))
}

/// List all query.
#[derive(Debug, Deserialize)]
pub struct ListAllQuery {
    pub status: Option<ContentStatus>,
}

/// All posts regardless of status. Admin and volunteer only.
async fn list_all(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListAllQuery>,
) -> AppResult<ApiResponse<Vec<BlogResponse>>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::ViewAllContent)?;

    let posts = state.content_service.list_all(query.status).await?;
    Ok(ApiResponse::ok(
        posts.into_iter().map(BlogResponse::from).collect(),
    ))
}

/// Status change body.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: ContentStatus,
}

/// Publish or unpublish a post. Admin only.
async fn set_status(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<ApiResponse<BlogResponse>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::ModerateContent)?;

    info!(content_id = %id, by = %identity.email, ?req.status, "Changing blog status");
    let post = state.content_service.set_status(&id, req.status).await?;
    Ok(ApiResponse::ok(BlogResponse::from(post)))
}

/// Delete a post. Admin only.
async fn delete_blog(
    AuthIdentity(identity): AuthIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let role = state.role_of(&identity.email).await?;
    authorize(role, Operation::ModerateContent)?;

    state.content_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_response_serialization() {
        let response = BlogResponse {
            id: "c1".to_string(),
            title: "Why donate".to_string(),
            thumbnail_url: None,
            body: "Body".to_string(),
            status: ContentStatus::Published,
            author_email: "author@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"published\""));
        assert!(json.contains("\"authorEmail\":\"author@example.com\""));
    }
}
