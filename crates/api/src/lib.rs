//! HTTP API layer for redwave.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: auth, users, donor directory, donation requests,
//!   statistics, funds and blog content
//! - **Extractors**: caller identity from the auth middleware
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
