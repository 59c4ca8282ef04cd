//! Handlers for the `/watchlist` resource.

use axum::extract::{Path, State};
use axum::Json;
use centace_core::types::DbId;
use centace_db::models::project::Project;
use centace_db::repositories::WatchlistRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Membership after a toggle.
#[derive(Debug, Serialize)]
pub struct WatchState {
    pub project_id: DbId,
    pub watching: bool,
}

/// GET /api/v1/watchlist
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = WatchlistRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/watchlist/{project_id}
pub async fn status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WatchState>>> {
    let watching = WatchlistRepo::contains(&state.pool, auth.user_id, project_id).await?;
    Ok(Json(DataResponse {
        data: WatchState {
            project_id,
            watching,
        },
    }))
}

/// POST /api/v1/watchlist/{project_id}/toggle
///
/// Adds the project if absent, removes it if present.
pub async fn toggle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WatchState>>> {
    let watching = WatchlistRepo::toggle(&state.pool, auth.user_id, project_id).await?;
    tracing::debug!(user_id = auth.user_id, project_id, watching, "Watchlist toggled");
    Ok(Json(DataResponse {
        data: WatchState {
            project_id,
            watching,
        },
    }))
}
