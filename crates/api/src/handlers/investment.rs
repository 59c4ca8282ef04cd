//! Handlers for the `/investments` resource (share purchases and portfolio).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use centace_core::error::CoreError;
use centace_core::types::DbId;
use centace_db::models::investment::{
    Investment, InvestmentWithProject, PortfolioSummary, PurchaseInput, PurchaseOutcome,
};
use centace_db::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use centace_db::repositories::InvestmentRepo;
use centace_events::PlatformEvent;

use super::publish_notification;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/investments
///
/// Buy shares with the caller's wallet balance. Returns 201 Created for a new
/// purchase, or 200 OK with the original investment when the idempotency key
/// was already used.
pub async fn purchase(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<PurchaseInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Investment>>)> {
    let Json(input) = body?;
    match InvestmentRepo::purchase(&state.pool, auth.user_id, &input).await? {
        PurchaseOutcome::Created(purchase) => {
            publish_notification(
                &state,
                PlatformEvent::notification_inserted,
                &purchase.notification,
            );
            Ok((
                StatusCode::CREATED,
                Json(DataResponse {
                    data: purchase.investment,
                }),
            ))
        }
        PurchaseOutcome::Replayed(investment) => {
            Ok((StatusCode::OK, Json(DataResponse { data: investment })))
        }
    }
}

/// GET /api/v1/investments
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<InvestmentWithProject>>>> {
    let investments = InvestmentRepo::list_for_user(
        &state.pool,
        auth.user_id,
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: investments }))
}

/// GET /api/v1/investments/summary
pub async fn summary(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PortfolioSummary>>> {
    let summary = InvestmentRepo::portfolio_summary(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/investments/{id}
///
/// Another user's investment is reported as not found.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InvestmentWithProject>>> {
    let investment = InvestmentRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Investment",
            id,
        }))?;
    Ok(Json(DataResponse { data: investment }))
}
