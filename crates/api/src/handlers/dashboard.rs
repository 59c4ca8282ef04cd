use axum::extract::State;
use axum::Json;
use centace_db::models::dashboard::DashboardSummary;
use centace_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
///
/// Headline figures for the investor dashboard. A new account sees zeros.
pub async fn summary(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let summary = DashboardRepo::summary(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: summary }))
}
