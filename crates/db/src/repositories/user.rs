//! User repository.

use std::sync::Arc;

use crate::entities::{
    user,
    user::{UserRole, UserStatus},
    User,
};
use redwave_common::{AppError, AppResult};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

/// Donor directory search criteria. All fields optional; set fields are
/// AND-combined with exact equality.
#[derive(Debug, Clone, Default)]
pub struct DonorSearchCriteria {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub upazila: Option<String>,
}

impl DonorSearchCriteria {
    /// Whether every criterion is unset.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.blood_group.is_none() && self.district.is_none() && self.upazila.is_none()
    }
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by email (the account key).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Find a user by email, returning an error if not found.
    pub async fn get_by_email(&self, email: &str) -> AppResult<user::Model> {
        self.find_by_email(email)
            .await?
            .ok_or_else(|| AppError::UserNotFound(email.to_string()))
    }

    /// Upsert a profile keyed by email.
    ///
    /// Role and status are only written on first insert; the conflict arm
    /// updates profile fields alone, so an admin-assigned role survives a
    /// profile save.
    pub async fn upsert_profile(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        let email = match &model.email {
            sea_orm::ActiveValue::Set(email) => email.clone(),
            _ => return Err(AppError::Internal("upsert without email".to_string())),
        };

        User::insert(model)
            .on_conflict(
                OnConflict::column(user::Column::Email)
                    .update_columns([
                        user::Column::Name,
                        user::Column::AvatarUrl,
                        user::Column::BloodGroup,
                        user::Column::District,
                        user::Column::Upazila,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        self.get_by_email(&email).await
    }

    /// List users, optionally filtered by account status.
    pub async fn list(&self, status: Option<UserStatus>) -> AppResult<Vec<user::Model>> {
        let mut query = User::find();

        if let Some(status) = status {
            query = query.filter(user::Column::Status.eq(status));
        }

        query
            .order_by_desc(user::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Set role and/or status by user id. Returns the number of rows matched.
    pub async fn set_role_status(
        &self,
        id: &str,
        role: Option<UserRole>,
        status: Option<UserStatus>,
    ) -> AppResult<u64> {
        let mut model = user::ActiveModel {
            updated_at: Set(Some(chrono::Utc::now().into())),
            ..Default::default()
        };
        if let Some(role) = role {
            model.role = Set(role);
        }
        if let Some(status) = status {
            model.status = Set(status);
        }

        let result = User::update_many()
            .set(model)
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Search active donors by the given criteria.
    ///
    /// All criteria empty returns the full donor population; this is
    /// documented behavior, callers needing a bounded result must supply at
    /// least one filter.
    pub async fn search_donors(
        &self,
        criteria: &DonorSearchCriteria,
    ) -> AppResult<Vec<user::Model>> {
        let mut query = User::find()
            .filter(user::Column::Role.eq(UserRole::Donor))
            .filter(user::Column::Status.eq(UserStatus::Active));

        if let Some(blood_group) = &criteria.blood_group {
            query = query.filter(user::Column::BloodGroup.eq(blood_group));
        }
        if let Some(district) = &criteria.district {
            query = query.filter(user::Column::District.eq(district));
        }
        if let Some(upazila) = &criteria.upazila {
            query = query.filter(user::Column::Upazila.eq(upazila));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Total user count for dashboards.
    pub async fn count_all(&self) -> AppResult<u64> {
        User::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, email: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            name: "Test User".to_string(),
            avatar_url: None,
            blood_group: "B+".to_string(),
            district: "Dhaka".to_string(),
            upazila: "Savar".to_string(),
            role,
            status: UserStatus::Active,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_email_found() {
        let donor = create_test_user("u1", "donor@example.com", UserRole::Donor);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[donor.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_email("Donor@Example.com").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().email, "donor@example.com");
    }

    #[tokio::test]
    async fn test_get_by_email_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_email("nobody@example.com").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_search_donors_exact_match() {
        let donor = create_test_user("u1", "donor@example.com", UserRole::Donor);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[donor]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let criteria = DonorSearchCriteria {
            blood_group: Some("B+".to_string()),
            district: None,
            upazila: None,
        };
        let result = repo.search_donors(&criteria).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].blood_group, "B+");
    }

    #[tokio::test]
    async fn test_set_role_status_matches_rows() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let matched = repo
            .set_role_status("u1", Some(UserRole::Volunteer), None)
            .await
            .unwrap();

        assert_eq!(matched, 1);
    }

    #[test]
    fn test_criteria_is_empty() {
        assert!(DonorSearchCriteria::default().is_empty());
        assert!(!DonorSearchCriteria {
            district: Some("Dhaka".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
