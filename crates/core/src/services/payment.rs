//! Payment gateway integration.
//!
//! The donation page collects money through a hosted payment provider: the
//! server creates a payment intent and hands the client secret back to the
//! browser, which completes the charge directly with the provider.

use async_trait::async_trait;
use redwave_common::{config::PaymentConfig, AppError, AppResult};
use serde::Deserialize;
use tracing::warn;

/// Creates payment intents with an external provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an intent for `amount_minor` (smallest currency unit) and
    /// return the client secret the browser needs to confirm the charge.
    async fn create_intent(&self, amount_minor: i64, currency: &str) -> AppResult<String>;
}

#[derive(Debug, Deserialize)]
struct IntentResponse {
    client_secret: String,
}

/// Gateway talking to the provider's REST API.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    endpoint: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    /// Build a gateway from the payment configuration. Returns `None` when
    /// no provider is configured.
    #[must_use]
    pub fn from_config(config: &PaymentConfig) -> Option<Self> {
        let endpoint = config.endpoint.as_deref()?;
        let secret_key = config.secret_key.as_deref()?;

        Some(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_intent(&self, amount_minor: i64, currency: &str) -> AppResult<String> {
        let url = format!("{}/v1/payment_intents", self.endpoint);
        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_lowercase()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("payment provider: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(%status, "Payment intent creation rejected by provider");
            return Err(AppError::ExternalService(format!(
                "payment provider returned {status}"
            )));
        }

        let intent: IntentResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("payment provider: {e}")))?;

        Ok(intent.client_secret)
    }
}

/// Gateway that mints fake client secrets. For tests and local development
/// without provider credentials.
#[derive(Debug, Default)]
pub struct NoOpPaymentGateway;

#[async_trait]
impl PaymentGateway for NoOpPaymentGateway {
    async fn create_intent(&self, amount_minor: i64, currency: &str) -> AppResult<String> {
        Ok(format!("pi_test_{currency}_{amount_minor}_secret"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_gateway_returns_secret() {
        let gateway = NoOpPaymentGateway;
        let secret = gateway.create_intent(5000, "usd").await.unwrap();
        assert!(secret.starts_with("pi_test_usd_5000"));
    }
}
