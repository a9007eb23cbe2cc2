//! Donation request repository.
//!
//! Every state transition is applied as a single conditional UPDATE keyed on
//! the current status, so concurrent callers race on the database row and at
//! most one of them wins.

use std::sync::Arc;

use crate::entities::{donation_request, donation_request::DonationStatus, DonationRequest};
use chrono::{DateTime, Utc};
use redwave_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Optional filters for list queries.
#[derive(Debug, Clone, Default)]
pub struct DonationRequestFilter {
    /// Restrict to one lifecycle status.
    pub status: Option<DonationStatus>,
    /// Restrict to one owner.
    pub requester_email: Option<String>,
}

/// Pagination window. `None` fields mean "no bound".
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Allowlisted fields for the owner edit while a request is still pending.
///
/// `requester_email` and `donation_status` are deliberately absent: they are
/// only writable through create and the transition methods.
#[derive(Debug, Clone)]
pub struct EditPatch {
    pub requester_name: String,
    pub recipient_name: String,
    pub recipient_district: String,
    pub recipient_upazila: String,
    pub hospital_name: String,
    pub full_address: String,
    pub blood_group: String,
    pub donation_date: DateTime<Utc>,
    pub donation_time: String,
    pub request_message: String,
}

/// Donation request repository for database operations.
#[derive(Clone)]
pub struct DonationRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl DonationRequestRepository {
    /// Create a new donation request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<donation_request::Model>> {
        DonationRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Find a request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<donation_request::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::RequestNotFound(id.to_string()))
    }

    /// Insert a new request.
    pub async fn insert(
        &self,
        model: donation_request::ActiveModel,
    ) -> AppResult<donation_request::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// List requests with optional filters and pagination.
    ///
    /// Ordering is `created_at DESC, id DESC` so adjacent pages never
    /// duplicate or skip rows under a static dataset.
    pub async fn list(
        &self,
        filter: &DonationRequestFilter,
        page: Page,
    ) -> AppResult<Vec<donation_request::Model>> {
        let mut query = DonationRequest::find();

        if let Some(status) = filter.status {
            query = query.filter(donation_request::Column::DonationStatus.eq(status));
        }
        if let Some(email) = &filter.requester_email {
            query = query.filter(donation_request::Column::RequesterEmail.eq(email));
        }

        query = query
            .order_by_desc(donation_request::Column::CreatedAt)
            .order_by_desc(donation_request::Column::Id);

        if let Some(offset) = page.offset {
            query = query.offset(offset);
        }
        if let Some(limit) = page.limit {
            query = query.limit(limit);
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Requests whose donation date falls at or after `cutoff`, ascending by
    /// date, capped at `cap` rows. Backs the public "urgent needs" view.
    pub async fn recent_within(
        &self,
        cutoff: DateTime<Utc>,
        cap: u64,
    ) -> AppResult<Vec<donation_request::Model>> {
        DonationRequest::find()
            .filter(donation_request::Column::DonationDate.gte(cutoff))
            .order_by_asc(donation_request::Column::DonationDate)
            .limit(cap)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Claim a pending request for a donor.
    ///
    /// Single conditional UPDATE filtered on `donation_status = 'pending'`.
    /// Returns the number of rows that matched: 0 means the request was
    /// missing or no longer pending (including a lost claim race).
    pub async fn claim_pending(
        &self,
        id: &str,
        donor_name: &str,
        donor_email: &str,
    ) -> AppResult<u64> {
        let result = DonationRequest::update_many()
            .set(donation_request::ActiveModel {
                donation_status: Set(DonationStatus::InProgress),
                donor_name: Set(Some(donor_name.to_string())),
                donor_email: Set(Some(donor_email.to_string())),
                updated_at: Set(Some(Utc::now().into())),
                ..Default::default()
            })
            .filter(donation_request::Column::Id.eq(id))
            .filter(donation_request::Column::DonationStatus.eq(DonationStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Status-only transition: move the request to `to` if its current status
    /// is one of `from`. Returns the number of rows that matched.
    pub async fn transition_status(
        &self,
        id: &str,
        from: &[DonationStatus],
        to: DonationStatus,
    ) -> AppResult<u64> {
        let result = DonationRequest::update_many()
            .set(donation_request::ActiveModel {
                donation_status: Set(to),
                updated_at: Set(Some(Utc::now().into())),
                ..Default::default()
            })
            .filter(donation_request::Column::Id.eq(id))
            .filter(donation_request::Column::DonationStatus.is_in(from.to_vec()))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Replace the owner-editable fields while the request is still pending.
    /// Returns the number of rows that matched.
    pub async fn edit_pending(&self, id: &str, patch: EditPatch) -> AppResult<u64> {
        let result = DonationRequest::update_many()
            .set(donation_request::ActiveModel {
                requester_name: Set(patch.requester_name),
                recipient_name: Set(patch.recipient_name),
                recipient_district: Set(patch.recipient_district),
                recipient_upazila: Set(patch.recipient_upazila),
                hospital_name: Set(patch.hospital_name),
                full_address: Set(patch.full_address),
                blood_group: Set(patch.blood_group),
                donation_date: Set(patch.donation_date.into()),
                donation_time: Set(patch.donation_time),
                request_message: Set(patch.request_message),
                updated_at: Set(Some(Utc::now().into())),
                ..Default::default()
            })
            .filter(donation_request::Column::Id.eq(id))
            .filter(donation_request::Column::DonationStatus.eq(DonationStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Permanently delete a request. Returns the number of rows removed.
    pub async fn delete_by_id(&self, id: &str) -> AppResult<u64> {
        let result = DonationRequest::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))?;

        Ok(result.rows_affected)
    }

    /// Exact count for one requester, optionally status-filtered.
    pub async fn count_for_requester(
        &self,
        email: &str,
        status: Option<DonationStatus>,
    ) -> AppResult<u64> {
        let mut query =
            DonationRequest::find().filter(donation_request::Column::RequesterEmail.eq(email));

        if let Some(status) = status {
            query = query.filter(donation_request::Column::DonationStatus.eq(status));
        }

        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }

    /// Total request count for dashboards. Does not need to be a
    /// transactionally consistent snapshot.
    pub async fn count_all(&self) -> AppResult<u64> {
        DonationRequest::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Unavailable(e.to_string()))
    }
}
