//! Donor directory service.

use redwave_common::AppResult;
use redwave_db::{
    entities::{district, upazila, user},
    repositories::{DonorSearchCriteria, GeoRepository, UserRepository},
};
use tracing::debug;

/// Donor directory: search over donor profiles plus the static district and
/// upazila reference lists.
#[derive(Clone)]
pub struct DirectoryService {
    user_repo: UserRepository,
    geo_repo: GeoRepository,
}

impl DirectoryService {
    /// Create a new directory service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, geo_repo: GeoRepository) -> Self {
        Self {
            user_repo,
            geo_repo,
        }
    }

    /// Search active donors.
    ///
    /// All criteria empty returns the full donor population (documented, not
    /// an error). Set fields are exact-equality, AND-combined; the result is
    /// never a partial-OR match.
    pub async fn search(&self, criteria: &DonorSearchCriteria) -> AppResult<Vec<user::Model>> {
        if criteria.is_empty() {
            debug!("Donor search with no criteria, returning full population");
        }
        self.user_repo.search_donors(criteria).await
    }

    /// Districts, sorted by name ascending.
    pub async fn districts(&self) -> AppResult<Vec<district::Model>> {
        self.geo_repo.districts().await
    }

    /// Upazilas, sorted by name ascending, optionally scoped to a district.
    pub async fn upazilas(&self, district_id: Option<i32>) -> AppResult<Vec<upazila::Model>> {
        self.geo_repo.upazilas(district_id).await
    }
}
