//! Route definitions for site-visit bookings.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::booking;
use crate::state::AppState;

/// Routes mounted at `/api/v1/bookings`.
///
/// ```text
/// GET  /                     -> list
/// GET  /{reference}          -> get_by_reference
/// POST /{reference}/cancel   -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(booking::list))
        .route("/{reference}", get(booking::get_by_reference))
        .route("/{reference}/cancel", post(booking::cancel))
}

/// Unversioned route for clients of the original booking endpoint.
///
/// ```text
/// POST /api/bookings -> create_legacy
/// ```
pub fn legacy_router() -> Router<AppState> {
    Router::new().route("/api/bookings", post(booking::create_legacy))
}
