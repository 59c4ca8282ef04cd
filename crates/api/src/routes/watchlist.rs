//! Route definitions for the `/watchlist` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::watchlist;
use crate::state::AppState;

/// Routes mounted at `/watchlist`.
///
/// ```text
/// GET  /                     -> list
/// GET  /{project_id}         -> status
/// POST /{project_id}/toggle  -> toggle
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(watchlist::list))
        .route("/{project_id}", get(watchlist::status))
        .route("/{project_id}/toggle", post(watchlist::toggle))
}
