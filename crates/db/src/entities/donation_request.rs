//! Donation request entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a donation request.
///
/// `Done` and `Canceled` are terminal; no transition leaves them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DonationStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "inprogress")]
    InProgress,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

impl DonationStatus {
    /// Whether no further transition is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Canceled)
    }
}

/// Donation request model.
///
/// Invariant: `donor_name` and `donor_email` are NULL while `pending` and
/// set once the request reaches `inprogress` or later.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "donation_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owner of the request. Immutable after creation.
    pub requester_email: String,

    /// Display name of the owner at creation time.
    pub requester_name: String,

    /// Person in need of blood.
    pub recipient_name: String,

    /// Recipient district.
    pub recipient_district: String,

    /// Recipient upazila.
    pub recipient_upazila: String,

    pub hospital_name: String,

    pub full_address: String,

    /// Required blood group.
    pub blood_group: String,

    /// When the donation is needed.
    pub donation_date: DateTimeWithTimeZone,

    /// Preferred time of day, free text.
    pub donation_time: String,

    #[sea_orm(column_type = "Text")]
    pub request_message: String,

    pub donation_status: DonationStatus,

    /// Matched donor display name, set by claim.
    #[sea_orm(nullable)]
    pub donor_name: Option<String>,

    /// Matched donor email, set by claim.
    #[sea_orm(nullable)]
    pub donor_email: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(DonationStatus::Done.is_terminal());
        assert!(DonationStatus::Canceled.is_terminal());
        assert!(!DonationStatus::Pending.is_terminal());
        assert!(!DonationStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&DonationStatus::InProgress).unwrap_or_default();
        assert_eq!(json, "\"inprogress\"");
    }
}
