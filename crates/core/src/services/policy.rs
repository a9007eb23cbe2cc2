//! Role policy.
//!
//! A single pure decision function consulted once per gated entry point.
//! Roles form no hierarchy beyond this explicit table, and the policy never
//! special-cases identities; ownership checks happen in the owning service.

use redwave_common::{AppError, AppResult};
use redwave_db::entities::user::UserRole;

/// Gated operations across the API surface.
///
/// Self-scoped operations (own profile, own requests, public reads) are not
/// listed: they are allowed for every authenticated caller and guarded by
/// ownership checks instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// List every user account.
    ListUsers,
    /// Change another account's role or status.
    MutateUserRoleStatus,
    /// List all donation requests regardless of owner.
    ListAllRequests,
    /// Cancel or complete a request one does not own.
    ModerateRequest,
    /// Delete a request one does not own.
    DeleteAnyRequest,
    /// View aggregate dashboard statistics.
    ViewStatistics,
    /// List all fund contributions.
    ListFunds,
    /// Create a blog draft.
    CreateContent,
    /// List unpublished blog content.
    ViewAllContent,
    /// Publish, unpublish or delete blog content.
    ModerateContent,
}

/// Decide whether `role` may perform `op`.
///
/// Returns `Forbidden` on deny; never a silent filter.
pub fn authorize(role: UserRole, op: Operation) -> AppResult<()> {
    if is_allowed(role, op) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role {role:?} may not perform {op:?}"
        )))
    }
}

const fn is_allowed(role: UserRole, op: Operation) -> bool {
    match role {
        UserRole::Admin => true,
        UserRole::Volunteer => matches!(
            op,
            Operation::ListAllRequests
                | Operation::ModerateRequest
                | Operation::ViewStatistics
                | Operation::ListFunds
                | Operation::CreateContent
                | Operation::ViewAllContent
        ),
        UserRole::Donor => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_allowed_everything() {
        for op in [
            Operation::ListUsers,
            Operation::MutateUserRoleStatus,
            Operation::ListAllRequests,
            Operation::ModerateRequest,
            Operation::DeleteAnyRequest,
            Operation::ViewStatistics,
            Operation::ListFunds,
            Operation::CreateContent,
            Operation::ViewAllContent,
            Operation::ModerateContent,
        ] {
            assert!(authorize(UserRole::Admin, op).is_ok(), "{op:?}");
        }
    }

    #[test]
    fn test_volunteer_subset() {
        assert!(authorize(UserRole::Volunteer, Operation::ListAllRequests).is_ok());
        assert!(authorize(UserRole::Volunteer, Operation::ViewStatistics).is_ok());
        assert!(authorize(UserRole::Volunteer, Operation::ViewAllContent).is_ok());

        // Volunteers never touch user role/status.
        assert!(matches!(
            authorize(UserRole::Volunteer, Operation::MutateUserRoleStatus),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(UserRole::Volunteer, Operation::ModerateContent),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_donor_denied_all_privileged_operations() {
        assert!(matches!(
            authorize(UserRole::Donor, Operation::ViewStatistics),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(UserRole::Donor, Operation::ListAllRequests),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            authorize(UserRole::Donor, Operation::ListUsers),
            Err(AppError::Forbidden(_))
        ));
    }
}
