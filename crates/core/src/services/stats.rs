//! Aggregate statistics service.

use redwave_common::AppResult;
use redwave_db::{
    entities::donation_request::DonationStatus,
    repositories::{DonationRequestRepository, FundRepository, UserRepository},
};
use serde::Serialize;

/// Dashboard totals.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Totals {
    pub user_count: u64,
    pub request_count: u64,
    pub fund_total_minor: i64,
}

/// Aggregate statistics over users, requests and funds.
#[derive(Clone)]
pub struct StatsService {
    user_repo: UserRepository,
    request_repo: DonationRequestRepository,
    fund_repo: FundRepository,
}

impl StatsService {
    /// Create a new statistics service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        request_repo: DonationRequestRepository,
        fund_repo: FundRepository,
    ) -> Self {
        Self {
            user_repo,
            request_repo,
            fund_repo,
        }
    }

    /// Totals for the dashboard. Three independent aggregates; each count
    /// reflects its own read, the trio is not a snapshot.
    pub async fn totals(&self) -> AppResult<Totals> {
        let user_count = self.user_repo.count_all().await?;
        let request_count = self.request_repo.count_all().await?;
        let fund_total_minor = self.fund_repo.sum_amount_minor().await?;

        Ok(Totals {
            user_count,
            request_count,
            fund_total_minor,
        })
    }

    /// Per-requester request count, optionally narrowed to one status.
    pub async fn count_for_requester(
        &self,
        email: &str,
        status: Option<DonationStatus>,
    ) -> AppResult<u64> {
        self.request_repo.count_for_requester(email, status).await
    }
}
