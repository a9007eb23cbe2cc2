//! Blog content service.

use redwave_common::{AppError, AppResult, IdGenerator};
use redwave_db::{
    entities::{content, content::ContentStatus},
    repositories::ContentRepository,
};
use sea_orm::Set;
use tracing::info;

/// Input for creating a blog post.
#[derive(Debug, Clone)]
pub struct CreateContentInput {
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub body: String,
}

/// Blog posts: drafts, publication and removal.
#[derive(Clone)]
pub struct ContentService {
    content_repo: ContentRepository,
    id_gen: IdGenerator,
}

impl ContentService {
    /// Create a new content service.
    #[must_use]
    pub const fn new(content_repo: ContentRepository) -> Self {
        Self {
            content_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a draft authored by `author_email`. Posts always start as
    /// drafts and become visible only once published.
    pub async fn create(
        &self,
        author_email: &str,
        input: CreateContentInput,
    ) -> AppResult<content::Model> {
        if input.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }

        let model = content::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            thumbnail_url: Set(input.thumbnail_url),
            body: Set(input.body),
            status: Set(ContentStatus::Draft),
            author_email: Set(author_email.to_lowercase()),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let saved = self.content_repo.insert(model).await?;
        info!(content_id = %saved.id, author = %author_email, "Created blog draft");
        Ok(saved)
    }

    /// Published posts only. Public surface.
    pub async fn list_published(&self) -> AppResult<Vec<content::Model>> {
        self.content_repo.list(Some(ContentStatus::Published)).await
    }

    /// Every post regardless of status. Staff surface.
    pub async fn list_all(&self, status: Option<ContentStatus>) -> AppResult<Vec<content::Model>> {
        self.content_repo.list(status).await
    }

    /// Publish or unpublish a post.
    pub async fn set_status(&self, id: &str, status: ContentStatus) -> AppResult<content::Model> {
        let matched = self.content_repo.set_status(id, status).await?;
        if matched == 0 {
            return Err(AppError::NotFound(format!("content {id}")));
        }

        info!(content_id = %id, ?status, "Updated blog status");
        self.content_repo.get_by_id(id).await
    }

    /// Permanently delete a post.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.content_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::NotFound(format!("content {id}")));
        }

        info!(content_id = %id, "Deleted blog post");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_post(id: &str, status: ContentStatus) -> content::Model {
        content::Model {
            id: id.to_string(),
            title: "Why donate".to_string(),
            thumbnail_url: None,
            body: "Body".to_string(),
            status,
            author_email: "author@example.com".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> ContentService {
        ContentService::new(ContentRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_create_starts_as_draft() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[test_post("c1", ContentStatus::Draft)]])
            .into_connection();

        let post = service(db)
            .create(
                "Author@Example.com",
                CreateContentInput {
                    title: "Why donate".to_string(),
                    thumbnail_url: None,
                    body: "Body".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(post.status, ContentStatus::Draft);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .create(
                "author@example.com",
                CreateContentInput {
                    title: " ".to_string(),
                    thumbnail_url: None,
                    body: "Body".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_status_unknown_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = service(db).set_status("missing", ContentStatus::Published).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = service(db).delete("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
