//! Handlers for site-visit bookings.
//!
//! Bookings are created through the unversioned `POST /api/bookings`
//! endpoint, which keeps the camelCase body and `{ error, details }` failure
//! shape existing clients depend on. Reads and cancellation live under
//! `/api/v1/bookings`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use centace_core::booking::{is_booking_reference, validate_visit, VisitDetails};
use centace_core::error::CoreError;
use centace_core::project::validate_text;
use centace_core::types::DbId;
use centace_db::models::booking::{Booking, CreateBooking};
use centace_db::repositories::BookingRepo;
use centace_db::DbError;
use centace_events::PlatformEvent;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::publish_notification;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_PROJECT_NAME_LEN: usize = 200;
const MAX_LOCATION_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Legacy request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /api/bookings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBookingRequest {
    pub user_id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub location: String,
    /// `YYYY-MM-DD`.
    pub visit_date: NaiveDate,
    /// `HH:MM`, 24-hour.
    pub visit_time: String,
    pub visitors: i32,
    pub transportation: String,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LegacyBookingResponse {
    pub booking: Booking,
}

/// Failure body for the legacy endpoint: `{ "error": ..., "details": ... }`.
///
/// Status codes follow [`AppError::parts`], so only the body shape differs
/// from the versioned API.
#[derive(Debug)]
pub struct LegacyBookingError(AppError);

impl From<AppError> for LegacyBookingError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<CoreError> for LegacyBookingError {
    fn from(err: CoreError) -> Self {
        Self(AppError::Core(err))
    }
}

impl From<DbError> for LegacyBookingError {
    fn from(err: DbError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for LegacyBookingError {
    fn into_response(self) -> Response {
        let (status, _code, details) = self.0.parts();
        let body = json!({
            "error": "Failed to create booking",
            "details": details,
        });
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/bookings
///
/// Book a site visit. The booking reference is always issued here; clients
/// must not invent their own.
pub async fn create_legacy(
    auth: Result<AuthUser, AppError>,
    State(state): State<AppState>,
    body: Result<Json<LegacyBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LegacyBookingResponse>), LegacyBookingError> {
    let auth = auth?;
    let Json(input) = body.map_err(AppError::from)?;

    if input.user_id != auth.user_id && !auth.is_admin() {
        return Err(CoreError::Forbidden("Cannot book a visit for another user".into()).into());
    }
    validate_text("projectName", &input.project_name, MAX_PROJECT_NAME_LEN)?;
    validate_text("location", &input.location, MAX_LOCATION_LEN)?;

    let special_requests = input
        .special_requests
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let visit_time = validate_visit(
        &VisitDetails {
            visit_date: input.visit_date,
            visit_time: input.visit_time.trim(),
            visitors: input.visitors,
            transportation: &input.transportation,
            special_requests,
        },
        Utc::now().date_naive(),
    )?;

    let outcome = BookingRepo::create(
        &state.pool,
        &CreateBooking {
            user_id: input.user_id,
            project_id: input.project_id,
            project_name: input.project_name.trim().to_string(),
            location: input.location.trim().to_string(),
            visit_date: input.visit_date,
            visit_time,
            visitors: input.visitors,
            transportation: input.transportation,
            special_requests: special_requests.map(str::to_string),
        },
    )
    .await?;

    publish_notification(
        &state,
        PlatformEvent::notification_inserted,
        &outcome.notification,
    );
    Ok((
        StatusCode::CREATED,
        Json(LegacyBookingResponse {
            booking: outcome.booking,
        }),
    ))
}

/// GET /api/v1/bookings
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let bookings =
        BookingRepo::list_for_user(&state.pool, auth.user_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: bookings }))
}

/// GET /api/v1/bookings/{reference}
pub async fn get_by_reference(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<DataResponse<Booking>>> {
    check_reference(&reference)?;
    let booking = BookingRepo::find_by_reference(&state.pool, &reference, auth.user_id)
        .await?
        .ok_or_else(|| booking_not_found(&reference))?;
    Ok(Json(DataResponse { data: booking }))
}

/// POST /api/v1/bookings/{reference}/cancel
///
/// Cancelling twice is a 409.
pub async fn cancel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<Json<DataResponse<Booking>>> {
    check_reference(&reference)?;
    let booking = BookingRepo::cancel(&state.pool, &reference, auth.user_id)
        .await?
        .ok_or_else(|| booking_not_found(&reference))?;
    Ok(Json(DataResponse { data: booking }))
}

fn check_reference(reference: &str) -> Result<(), AppError> {
    if is_booking_reference(reference) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "'{reference}' is not a booking reference"
        )))
    }
}

fn booking_not_found(reference: &str) -> AppError {
    AppError::NotFound(format!("Booking {reference} not found"))
}
