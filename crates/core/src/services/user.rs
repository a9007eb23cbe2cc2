//! User service.

use redwave_common::{AppError, AppResult, IdGenerator};
use redwave_db::{
    entities::{
        user,
        user::{UserRole, UserStatus},
    },
    repositories::UserRepository,
};
use sea_orm::Set;
use tracing::info;

/// Input for the profile upsert on sign-in.
///
/// Role and status are deliberately absent; they are admin-only mutations.
#[derive(Debug, Clone)]
pub struct UpsertProfileInput {
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub blood_group: String,
    pub district: String,
    pub upazila: String,
}

/// User service.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Fetch a profile by email.
    pub async fn get_by_email(&self, email: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_email(email).await
    }

    /// Resolve the role for an identity.
    ///
    /// Looked up fresh on every gated operation so role changes apply on the
    /// next call. An identity with no user record yet (sign-up racing the
    /// first profile write) resolves to the default unprivileged role.
    pub async fn resolve_role(&self, email: &str) -> AppResult<UserRole> {
        Ok(self
            .user_repo
            .find_by_email(email)
            .await?
            .map_or(UserRole::default(), |u| u.role))
    }

    /// Upsert a profile keyed by email (first sign-in creates the record).
    pub async fn upsert_profile(&self, input: UpsertProfileInput) -> AppResult<user::Model> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("invalid email".to_string()));
        }

        let now = chrono::Utc::now();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email.clone()),
            name: Set(input.name),
            avatar_url: Set(input.avatar_url),
            blood_group: Set(input.blood_group),
            district: Set(input.district),
            upazila: Set(input.upazila),
            role: Set(UserRole::default()),
            status: Set(UserStatus::default()),
            created_at: Set(now.into()),
            updated_at: Set(Some(now.into())),
        };

        let saved = self.user_repo.upsert_profile(model).await?;
        info!(email = %email, "Upserted user profile");
        Ok(saved)
    }

    /// List users, optionally filtered by status. Admin surface.
    pub async fn list(&self, status: Option<UserStatus>) -> AppResult<Vec<user::Model>> {
        self.user_repo.list(status).await
    }

    /// Set role and/or status for a user by id. Admin surface.
    pub async fn set_role_status(
        &self,
        id: &str,
        role: Option<UserRole>,
        status: Option<UserStatus>,
    ) -> AppResult<()> {
        if role.is_none() && status.is_none() {
            return Err(AppError::BadRequest(
                "nothing to update: provide role and/or status".to_string(),
            ));
        }

        let matched = self.user_repo.set_role_status(id, role, status).await?;
        if matched == 0 {
            return Err(AppError::UserNotFound(id.to_string()));
        }

        info!(user_id = %id, ?role, ?status, "Updated user role/status");
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

    fn test_user(email: &str, role: UserRole) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            email: email.to_string(),
            name: "Test".to_string(),
            avatar_url: None,
            blood_group: "O+".to_string(),
            district: "Dhaka".to_string(),
            upazila: "Savar".to_string(),
            role,
            status: UserStatus::Active,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_role_known_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("admin@example.com", UserRole::Admin)]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let role = service.resolve_role("admin@example.com").await.unwrap();

        assert_eq!(role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_resolve_role_missing_user_defaults_to_donor() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let role = service.resolve_role("new@example.com").await.unwrap();

        assert_eq!(role, UserRole::Donor);
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_email() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = UserService::new(UserRepository::new(db));

        let result = service
            .upsert_profile(UpsertProfileInput {
                email: "not-an-email".to_string(),
                name: "X".to_string(),
                avatar_url: None,
                blood_group: "A+".to_string(),
                district: "Dhaka".to_string(),
                upazila: "Savar".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_role_status_requires_some_change() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = UserService::new(UserRepository::new(db));

        let result = service.set_role_status("u1", None, None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_set_role_status_unknown_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .set_role_status("missing", Some(UserRole::Volunteer), None)
            .await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }
}
