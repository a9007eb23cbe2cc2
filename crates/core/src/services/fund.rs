//! Fund contribution service.

use redwave_common::{AppError, AppResult, IdGenerator};
use redwave_db::{entities::fund, repositories::FundRepository};
use sea_orm::Set;
use std::sync::Arc;
use tracing::info;

use crate::services::payment::PaymentGateway;

const DEFAULT_PAGE_SIZE: u64 = 50;
const MAX_PAGE_SIZE: u64 = 200;

/// Input for recording a completed contribution.
#[derive(Debug, Clone)]
pub struct RecordFundInput {
    pub contributor_name: String,
    pub contributor_email: String,
    pub amount_minor: i64,
    pub currency: String,
}

/// Fund contributions: payment intents plus the ledger of completed gifts.
#[derive(Clone)]
pub struct FundService {
    fund_repo: FundRepository,
    gateway: Arc<dyn PaymentGateway>,
    id_gen: IdGenerator,
}

impl FundService {
    /// Create a new fund service.
    #[must_use]
    pub fn new(fund_repo: FundRepository, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            fund_repo,
            gateway,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a payment intent for `amount_minor` in the smallest currency
    /// unit and return the client secret.
    pub async fn create_intent(&self, amount_minor: i64, currency: &str) -> AppResult<String> {
        if amount_minor <= 0 {
            return Err(AppError::Validation(
                "amount must be a positive number of minor units".to_string(),
            ));
        }
        let currency = currency.trim();
        if currency.is_empty() {
            return Err(AppError::Validation("currency is required".to_string()));
        }

        self.gateway.create_intent(amount_minor, currency).await
    }

    /// Record a completed contribution in the ledger.
    pub async fn record(&self, input: RecordFundInput) -> AppResult<fund::Model> {
        if input.amount_minor <= 0 {
            return Err(AppError::Validation(
                "amount must be a positive number of minor units".to_string(),
            ));
        }
        let email = input.contributor_email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(AppError::Validation("invalid contributor email".to_string()));
        }

        let model = fund::ActiveModel {
            id: Set(self.id_gen.generate()),
            contributor_name: Set(input.contributor_name),
            contributor_email: Set(email.clone()),
            amount_minor: Set(input.amount_minor),
            currency: Set(input.currency.to_lowercase()),
            created_at: Set(chrono::Utc::now().into()),
        };

        let saved = self.fund_repo.insert(model).await?;
        info!(contributor = %email, amount_minor = saved.amount_minor, "Recorded fund contribution");
        Ok(saved)
    }

    /// List contributions, newest first.
    pub async fn list(&self, limit: Option<u64>, offset: Option<u64>) -> AppResult<Vec<fund::Model>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        self.fund_repo.list(limit, offset.unwrap_or(0)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::payment::NoOpPaymentGateway;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service(db: sea_orm::DatabaseConnection) -> FundService {
        FundService::new(
            FundRepository::new(Arc::new(db)),
            Arc::new(NoOpPaymentGateway),
        )
    }

    #[tokio::test]
    async fn test_create_intent_rejects_non_positive_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db).create_intent(0, "usd").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_intent_returns_client_secret() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let secret = service(db).create_intent(2500, "usd").await.unwrap();
        assert!(!secret.is_empty());
    }

    #[tokio::test]
    async fn test_record_rejects_negative_amount() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .record(RecordFundInput {
                contributor_name: "Giver".to_string(),
                contributor_email: "giver@example.com".to_string(),
                amount_minor: -100,
                currency: "usd".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_record_rejects_bad_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db)
            .record(RecordFundInput {
                contributor_name: "Giver".to_string(),
                contributor_email: "not-an-email".to_string(),
                amount_minor: 100,
                currency: "usd".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
