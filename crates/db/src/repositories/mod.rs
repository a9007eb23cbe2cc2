//! Database repositories.

mod content;
mod donation_request;
mod fund;
mod geo;
mod user;

pub use content::ContentRepository;
pub use donation_request::{DonationRequestFilter, DonationRequestRepository, EditPatch, Page};
pub use fund::FundRepository;
pub use geo::GeoRepository;
pub use user::{DonorSearchCriteria, UserRepository};
