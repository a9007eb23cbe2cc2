//! Database entities.

pub mod content;
pub mod district;
pub mod donation_request;
pub mod fund;
pub mod upazila;
pub mod user;

pub use content::Entity as Content;
pub use district::Entity as District;
pub use donation_request::Entity as DonationRequest;
pub use fund::Entity as Fund;
pub use upazila::Entity as Upazila;
pub use user::Entity as User;
