//! Fund repository.

use std::sync::Arc;

use crate::entities::{fund, Fund};
use redwave_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect,
};

/// Fund repository for database operations. Append-only.
#[derive(Clone)]
pub struct FundRepository {
    db: Arc<DatabaseConnection>,
}

impl FundRepository {
    /// Create a new fund repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a contribution.
    pub async fn insert(&self, model: fund::ActiveModel) -> AppResult<fund::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// List contributions, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<fund::Model>> {
        Fund::find()
            .order_by_desc(fund::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Exact sum of all contribution amounts at query time.
    pub async fn sum_amount_minor(&self) -> AppResult<i64> {
        use sea_orm::sea_query::{Alias, ExprTrait};

        // Postgres widens SUM(bigint) to numeric; cast back for decoding.
        let total: Option<i64> = Fund::find()
            .select_only()
            .column_as(
                fund::Column::AmountMinor.sum().cast_as(Alias::new("BIGINT")),
                "total",
            )
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?
            .flatten();

        Ok(total.unwrap_or(0))
    }

    /// Total number of contributions.
    pub async fn count_all(&self) -> AppResult<u64> {
        Fund::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sum_amount_minor() {
        let mut row = BTreeMap::new();
        row.insert("total", sea_orm::Value::BigInt(Some(12_500)));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = FundRepository::new(db);
        let total = repo.sum_amount_minor().await.unwrap();

        assert_eq!(total, 12_500);
    }

    #[tokio::test]
    async fn test_sum_amount_minor_empty_table_is_zero() {
        let mut row = BTreeMap::new();
        row.insert("total", sea_orm::Value::BigInt(None));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = FundRepository::new(db);
        let total = repo.sum_amount_minor().await.unwrap();

        assert_eq!(total, 0);
    }
}
