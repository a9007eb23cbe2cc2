//! API endpoints.

mod auth;
mod content;
mod donation_requests;
mod funds;
mod geo;
mod stats;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
///
/// The route table is flat; the client the original site shipped addresses
/// every operation by its full path.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(geo::router())
        .merge(donation_requests::router())
        .merge(stats::router())
        .merge(funds::router())
        .merge(content::router())
}
