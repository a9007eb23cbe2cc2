//! Geographic reference data repository.

use std::sync::Arc;

use crate::entities::{district, upazila, District, Upazila};
use redwave_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Repository for the static district/upazila directories.
#[derive(Clone)]
pub struct GeoRepository {
    db: Arc<DatabaseConnection>,
}

impl GeoRepository {
    /// Create a new geo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All districts, sorted by name ascending.
    pub async fn districts(&self) -> AppResult<Vec<district::Model>> {
        District::find()
            .order_by_asc(district::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// All upazilas, sorted by name ascending, optionally scoped to a
    /// district.
    pub async fn upazilas(&self, district_id: Option<i32>) -> AppResult<Vec<upazila::Model>> {
        let mut query = Upazila::find();

        if let Some(district_id) = district_id {
            query = query.filter(upazila::Column::DistrictId.eq(district_id));
        }

        query
            .order_by_asc(upazila::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_districts_sorted() {
        let rows = vec![
            district::Model {
                id: 1,
                name: "Bagerhat".to_string(),
            },
            district::Model {
                id: 2,
                name: "Dhaka".to_string(),
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([rows])
                .into_connection(),
        );

        let repo = GeoRepository::new(db);
        let result = repo.districts().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Bagerhat");
    }
}
