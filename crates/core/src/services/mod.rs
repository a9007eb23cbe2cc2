//! Business logic services.

#![allow(missing_docs)]

pub mod content;
pub mod directory;
pub mod donation_request;
pub mod fund;
pub mod payment;
pub mod policy;
pub mod stats;
pub mod user;

pub use content::{ContentService, CreateContentInput};
pub use directory::DirectoryService;
pub use donation_request::{
    CreateRequestInput, DonationRequestService, EditRequestInput, ListRequestsQuery,
};
pub use fund::{FundService, RecordFundInput};
pub use payment::{HttpPaymentGateway, NoOpPaymentGateway, PaymentGateway};
pub use policy::{authorize, Operation};
pub use stats::{StatsService, Totals};
pub use user::{UpsertProfileInput, UserService};
