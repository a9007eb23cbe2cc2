//! Blog content repository.

use std::sync::Arc;

use crate::entities::{content, content::ContentStatus, Content};
use redwave_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Content repository for database operations.
#[derive(Clone)]
pub struct ContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ContentRepository {
    /// Create a new content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<content::Model>> {
        Content::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Find a post by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<content::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("content {id}")))
    }

    /// Insert a new post.
    pub async fn insert(&self, model: content::ActiveModel) -> AppResult<content::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// List posts, optionally filtered by publication status, newest first.
    pub async fn list(&self, status: Option<ContentStatus>) -> AppResult<Vec<content::Model>> {
        let mut query = Content::find();

        if let Some(status) = status {
            query = query.filter(content::Column::Status.eq(status));
        }

        query
            .order_by_desc(content::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Set publication status. Returns the number of rows matched.
    pub async fn set_status(&self, id: &str, status: ContentStatus) -> AppResult<u64> {
        let result = Content::update_many()
            .set(content::ActiveModel {
                status: Set(status),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .filter(content::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Permanently delete a post. Returns the number of rows removed.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        let result = Content::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_post(id: &str, status: ContentStatus) -> content::Model {
        content::Model {
            id: id.to_string(),
            title: "Why donate".to_string(),
            thumbnail_url: None,
            body: "Blood donation saves lives.".to_string(),
            status,
            author_email: "volunteer@example.com".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_published_only() {
        let published = create_test_post("c1", ContentStatus::Published);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[published]])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let result = repo.list(Some(ContentStatus::Published)).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].status, ContentStatus::Published);
    }

    #[tokio::test]
    async fn test_set_status_matches_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ContentRepository::new(db);
        let matched = repo.set_status("c1", ContentStatus::Published).await.unwrap();

        assert_eq!(matched, 1);
    }
}
