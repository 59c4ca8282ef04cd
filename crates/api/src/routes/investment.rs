//! Route definitions for the `/investments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::investment;
use crate::state::AppState;

/// Routes mounted at `/investments`.
///
/// ```text
/// GET  /          -> list
/// POST /          -> purchase
/// GET  /summary   -> summary
/// GET  /{id}      -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(investment::list).post(investment::purchase))
        .route("/summary", get(investment::summary))
        .route("/{id}", get(investment::get_by_id))
}
