//! Donation request lifecycle service.
//!
//! Owns the request state machine. Transitions are executed as conditional
//! writes in the repository; this service decides who may attempt them and
//! turns "zero rows matched" into the right error.

use chrono::{DateTime, Duration, Utc};
use redwave_common::{AppError, AppResult, IdGenerator};
use redwave_db::{
    entities::{donation_request, donation_request::DonationStatus},
    repositories::{DonationRequestFilter, DonationRequestRepository, EditPatch, Page},
};
use redwave_db::entities::user::UserRole;
use sea_orm::Set;
use tracing::info;

use crate::services::policy::{authorize, Operation};

/// Rolling window for the public "urgent needs" view.
const RECENT_WINDOW_HOURS: i64 = 24;
/// Cap for the public "urgent needs" view.
const RECENT_CAP: u64 = 6;

/// Input for creating a donation request.
#[derive(Debug, Clone)]
pub struct CreateRequestInput {
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

/// Input for the owner edit while a request is still pending.
pub type EditRequestInput = CreateRequestInput;

/// List query: optional filters plus pagination.
#[derive(Debug, Clone, Default)]
pub struct ListRequestsQuery {
    pub status: Option<DonationStatus>,
    pub requester_email: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Donation request lifecycle service.
#[derive(Clone)]
pub struct DonationRequestService {
    request_repo: DonationRequestRepository,
    id_gen: IdGenerator,
}

impl DonationRequestService {
    /// Create a new donation request service.
    #[must_use]
    pub const fn new(request_repo: DonationRequestRepository) -> Self {
        Self {
            request_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a request owned by `requester_email`.
    ///
    /// Status is forced to `pending` and donor fields stay empty regardless
    /// of what the caller sent.
    pub async fn create(
        &self,
        requester_email: &str,
        input: CreateRequestInput,
    ) -> AppResult<donation_request::Model> {
        validate_request_fields(&input)?;

        let id = self.id_gen.generate();
        let model = donation_request::ActiveModel {
            id: Set(id.clone()),
            requester_email: Set(requester_email.to_lowercase()),
            requester_name: Set(input.requester_name),
            recipient_name: Set(input.recipient_name),
            recipient_district: Set(input.recipient_district),
            recipient_upazila: Set(input.recipient_upazila),
            hospital_name: Set(input.hospital_name),
            full_address: Set(input.full_address),
            blood_group: Set(input.blood_group),
            donation_date: Set(input.donation_date.into()),
            donation_time: Set(input.donation_time),
            request_message: Set(input.request_message),
            donation_status: Set(DonationStatus::Pending),
            donor_name: Set(None),
            donor_email: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.request_repo.insert(model).await?;
        info!(request_id = %id, requester = %requester_email, "Created donation request");
        Ok(created)
    }

    /// Fetch one request.
    pub async fn get(&self, id: &str) -> AppResult<donation_request::Model> {
        self.request_repo.get_by_id(id).await
    }

    /// List requests with optional filters and pagination.
    pub async fn list(&self, query: &ListRequestsQuery) -> AppResult<Vec<donation_request::Model>> {
        let filter = DonationRequestFilter {
            status: query.status,
            requester_email: query.requester_email.clone(),
        };
        let page = Page {
            limit: query.limit,
            offset: query.offset,
        };
        self.request_repo.list(&filter, page).await
    }

    /// Public "urgent needs" view: requests whose donation date falls inside
    /// the last 24 hours, ascending by date, at most 6.
    pub async fn recent(&self) -> AppResult<Vec<donation_request::Model>> {
        let cutoff = Utc::now() - Duration::hours(RECENT_WINDOW_HOURS);
        self.request_repo.recent_within(cutoff, RECENT_CAP).await
    }

    /// Public view of every pending request.
    pub async fn pending(&self) -> AppResult<Vec<donation_request::Model>> {
        let filter = DonationRequestFilter {
            status: Some(DonationStatus::Pending),
            requester_email: None,
        };
        self.request_repo.list(&filter, Page::default()).await
    }

    /// Claim a pending request (pending → inprogress), recording the donor.
    ///
    /// Applied as one conditional write; when two donors race, exactly one
    /// wins and the loser observes `InvalidTransition`.
    pub async fn claim(
        &self,
        id: &str,
        donor_name: &str,
        donor_email: &str,
    ) -> AppResult<donation_request::Model> {
        let donor_name = donor_name.trim();
        let donor_email = donor_email.trim().to_lowercase();
        if donor_name.is_empty() || !donor_email.contains('@') {
            return Err(AppError::Validation(
                "donor name and email are required to claim".to_string(),
            ));
        }

        let matched = self
            .request_repo
            .claim_pending(id, donor_name, &donor_email)
            .await?;

        if matched == 0 {
            // Either the id is unknown or the request left pending, possibly
            // a moment ago to a competing donor.
            let current = self.request_repo.get_by_id(id).await?;
            return Err(AppError::InvalidTransition(format!(
                "request {id} is {:?}, only pending requests can be claimed",
                current.donation_status
            )));
        }

        info!(request_id = %id, donor = %donor_email, "Donation request claimed");
        self.request_repo.get_by_id(id).await
    }

    /// Mark an in-progress request done (inprogress → done).
    ///
    /// Allowed for the owner, the matched donor, or a role that may moderate
    /// requests.
    pub async fn complete(
        &self,
        id: &str,
        caller_email: &str,
        caller_role: UserRole,
    ) -> AppResult<donation_request::Model> {
        let current = self.request_repo.get_by_id(id).await?;

        let is_owner = current.requester_email == caller_email;
        let is_matched_donor = current.donor_email.as_deref() == Some(caller_email);
        if !is_owner && !is_matched_donor {
            authorize(caller_role, Operation::ModerateRequest)?;
        }

        self.transition(id, &[DonationStatus::InProgress], DonationStatus::Done)
            .await
    }

    /// Cancel a request (pending or inprogress → canceled).
    ///
    /// Allowed for the owner or a role that may moderate requests.
    pub async fn cancel(
        &self,
        id: &str,
        caller_email: &str,
        caller_role: UserRole,
    ) -> AppResult<donation_request::Model> {
        let current = self.request_repo.get_by_id(id).await?;

        if current.requester_email != caller_email {
            authorize(caller_role, Operation::ModerateRequest)?;
        }

        self.transition(
            id,
            &[DonationStatus::Pending, DonationStatus::InProgress],
            DonationStatus::Canceled,
        )
        .await
    }

    /// Replace the owner-editable fields while the request is still pending.
    ///
    /// Once a donor is matched the record is frozen against edits so the
    /// donor's fields cannot be overwritten; per the access rules that
    /// surfaces as `Forbidden`, not a transition error.
    pub async fn edit(
        &self,
        id: &str,
        caller_email: &str,
        input: EditRequestInput,
    ) -> AppResult<donation_request::Model> {
        validate_request_fields(&input)?;

        let current = self.request_repo.get_by_id(id).await?;
        if current.requester_email != caller_email {
            return Err(AppError::Forbidden(
                "only the requester may edit a donation request".to_string(),
            ));
        }

        let patch = EditPatch {
            requester_name: input.requester_name,
            recipient_name: input.recipient_name,
            recipient_district: input.recipient_district,
            recipient_upazila: input.recipient_upazila,
            hospital_name: input.hospital_name,
            full_address: input.full_address,
            blood_group: input.blood_group,
            donation_date: input.donation_date,
            donation_time: input.donation_time,
            request_message: input.request_message,
        };

        let matched = self.request_repo.edit_pending(id, patch).await?;
        if matched == 0 {
            return Err(AppError::Forbidden(
                "request is no longer editable once a donor is matched".to_string(),
            ));
        }

        self.request_repo.get_by_id(id).await
    }

    /// Permanently delete a request, any state. Owner or privileged role.
    pub async fn delete(
        &self,
        id: &str,
        caller_email: &str,
        caller_role: UserRole,
    ) -> AppResult<()> {
        let current = self.request_repo.get_by_id(id).await?;

        if current.requester_email != caller_email {
            authorize(caller_role, Operation::DeleteAnyRequest)?;
        }

        let removed = self.request_repo.delete_by_id(id).await?;
        if removed == 0 {
            return Err(AppError::RequestNotFound(id.to_string()));
        }

        info!(request_id = %id, by = %caller_email, "Deleted donation request");
        Ok(())
    }

    async fn transition(
        &self,
        id: &str,
        from: &[DonationStatus],
        to: DonationStatus,
    ) -> AppResult<donation_request::Model> {
        let matched = self.request_repo.transition_status(id, from, to).await?;

        if matched == 0 {
            let current = self.request_repo.get_by_id(id).await?;
            return Err(AppError::InvalidTransition(format!(
                "request {id} is {:?}, cannot move to {to:?}",
                current.donation_status
            )));
        }

        info!(request_id = %id, to = ?to, "Donation request transitioned");
        self.request_repo.get_by_id(id).await
    }
}

fn validate_request_fields(input: &CreateRequestInput) -> AppResult<()> {
    if input.recipient_name.trim().is_empty() {
        return Err(AppError::Validation("recipient name is required".to_string()));
    }
    if input.blood_group.trim().is_empty() {
        return Err(AppError::Validation("blood group is required".to_string()));
    }
    if input.recipient_district.trim().is_empty() || input.recipient_upazila.trim().is_empty() {
        return Err(AppError::Validation(
            "recipient district and upazila are required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_request(
        id: &str,
        status: DonationStatus,
        donor: Option<(&str, &str)>,
    ) -> donation_request::Model {
        donation_request::Model {
            id: id.to_string(),
            requester_email: "requester@example.com".to_string(),
            requester_name: "Requester".to_string(),
            recipient_name: "Recipient".to_string(),
            recipient_district: "Dhaka".to_string(),
            recipient_upazila: "Dhanmondi".to_string(),
            hospital_name: "City Hospital".to_string(),
            full_address: "12 Road".to_string(),
            blood_group: "A+".to_string(),
            donation_date: Utc::now().into(),
            donation_time: "10:00".to_string(),
            request_message: "Urgent".to_string(),
            donation_status: status,
            donor_name: donor.map(|(n, _)| n.to_string()),
            donor_email: donor.map(|(_, e)| e.to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_input() -> CreateRequestInput {
        CreateRequestInput {
            requester_name: "Requester".to_string(),
            recipient_name: "Recipient".to_string(),
            recipient_district: "Dhaka".to_string(),
            recipient_upazila: "Dhanmondi".to_string(),
            hospital_name: "City Hospital".to_string(),
            full_address: "12 Road".to_string(),
            blood_group: "A+".to_string(),
            donation_date: Utc::now(),
            donation_time: "10:00".to_string(),
            request_message: "Urgent".to_string(),
        }
    }

    fn service(db: sea_orm::DatabaseConnection) -> DonationRequestService {
        DonationRequestService::new(DonationRequestRepository::new(Arc::new(db)))
    }

    #[tokio::test]
    async fn test_create_forces_pending_and_owner() {
        let created = test_request("req1", DonationStatus::Pending, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[created]])
            .into_connection();

        let result = service(db)
            .create("Requester@Example.com", create_input())
            .await
            .unwrap();

        assert_eq!(result.donation_status, DonationStatus::Pending);
        assert!(result.donor_name.is_none());
        assert!(result.donor_email.is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_missing_recipient() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let mut input = create_input();
        input.recipient_name = "  ".to_string();

        let result = service(db).create("requester@example.com", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_claim_success_sets_donor_fields() {
        let claimed = test_request(
            "req1",
            DonationStatus::InProgress,
            Some(("Donor", "donor@example.com")),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[claimed]])
            .into_connection();

        let result = service(db)
            .claim("req1", "Donor", "donor@example.com")
            .await
            .unwrap();

        assert_eq!(result.donation_status, DonationStatus::InProgress);
        assert_eq!(result.donor_email.as_deref(), Some("donor@example.com"));
        assert_eq!(result.donor_name.as_deref(), Some("Donor"));
    }

    #[tokio::test]
    async fn test_claim_lost_race_is_invalid_transition() {
        // Conditional write matches nothing; the row exists but is already
        // inprogress under the winning donor.
        let winner = test_request(
            "req1",
            DonationStatus::InProgress,
            Some(("Winner", "winner@example.com")),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[winner]])
            .into_connection();

        let result = service(db).claim("req1", "Loser", "loser@example.com").await;

        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_claim_unknown_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([Vec::<donation_request::Model>::new()])
            .into_connection();

        let result = service(db)
            .claim("missing", "Donor", "donor@example.com")
            .await;

        assert!(matches!(result, Err(AppError::RequestNotFound(_))));
    }

    #[tokio::test]
    async fn test_claim_requires_donor_fields() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let result = service(db).claim("req1", "", "donor@example.com").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_complete_by_owner() {
        let inprogress = test_request(
            "req1",
            DonationStatus::InProgress,
            Some(("Donor", "donor@example.com")),
        );
        let done = test_request("req1", DonationStatus::Done, Some(("Donor", "donor@example.com")));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[inprogress]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[done]])
            .into_connection();

        let result = service(db)
            .complete("req1", "requester@example.com", UserRole::Donor)
            .await
            .unwrap();

        assert_eq!(result.donation_status, DonationStatus::Done);
    }

    #[tokio::test]
    async fn test_cancel_from_terminal_is_invalid_transition() {
        let done = test_request("req1", DonationStatus::Done, Some(("D", "d@example.com")));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[done.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .append_query_results([[done]])
            .into_connection();

        let result = service(db)
            .cancel("req1", "requester@example.com", UserRole::Donor)
            .await;

        assert!(matches!(result, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_cancel_by_stranger_without_role_is_forbidden() {
        let pending = test_request("req1", DonationStatus::Pending, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .into_connection();

        let result = service(db)
            .cancel("req1", "stranger@example.com", UserRole::Donor)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_cancel_by_volunteer_is_allowed() {
        let pending = test_request("req1", DonationStatus::Pending, None);
        let canceled = test_request("req1", DonationStatus::Canceled, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[canceled]])
            .into_connection();

        let result = service(db)
            .cancel("req1", "volunteer@example.com", UserRole::Volunteer)
            .await
            .unwrap();

        assert_eq!(result.donation_status, DonationStatus::Canceled);
    }

    #[tokio::test]
    async fn test_edit_by_non_owner_is_forbidden() {
        let pending = test_request("req1", DonationStatus::Pending, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .into_connection();

        let result = service(db)
            .edit("req1", "stranger@example.com", create_input())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_edit_after_claim_is_forbidden() {
        let inprogress = test_request(
            "req1",
            DonationStatus::InProgress,
            Some(("Donor", "donor@example.com")),
        );
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[inprogress]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let result = service(db)
            .edit("req1", "requester@example.com", create_input())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_lifecycle_chain_done_is_final() {
        let inprogress = test_request(
            "req1",
            DonationStatus::InProgress,
            Some(("Donor", "donor@example.com")),
        );
        let done = test_request("req1", DonationStatus::Done, Some(("Donor", "donor@example.com")));

        // exec queue: claim wins, complete wins, cancel matches nothing
        // query queue: fetch after claim, current + fetch for complete,
        // current + error fetch for cancel
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .append_query_results([
                [inprogress.clone()],
                [inprogress],
                [done.clone()],
                [done.clone()],
                [done],
            ])
            .into_connection();

        let svc = service(db);

        let claimed = svc
            .claim("req1", "Donor", "donor@example.com")
            .await
            .unwrap();
        assert_eq!(claimed.donation_status, DonationStatus::InProgress);

        let completed = svc
            .complete("req1", "requester@example.com", UserRole::Donor)
            .await
            .unwrap();
        assert_eq!(completed.donation_status, DonationStatus::Done);

        let canceled = svc
            .cancel("req1", "requester@example.com", UserRole::Donor)
            .await;
        assert!(matches!(canceled, Err(AppError::InvalidTransition(_))));
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let pending = test_request("req1", DonationStatus::Pending, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = service(db)
            .delete("req1", "requester@example.com", UserRole::Donor)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_by_stranger_without_role_is_forbidden() {
        let pending = test_request("req1", DonationStatus::Pending, None);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .into_connection();

        let result = service(db)
            .delete("req1", "stranger@example.com", UserRole::Donor)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
