//! Repository for the `bookings` table.

use centace_core::booking::{
    generate_booking_reference, BOOKING_STATUS_CANCELLED, BOOKING_STATUS_CONFIRMED,
    MAX_REFERENCE_ATTEMPTS,
};
use centace_core::error::CoreError;
use centace_core::notification::{booking_message, NOTIFY_BOOKING};
use centace_core::types::DbId;
use chrono::Utc;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::booking::{Booking, BookingOutcome, CreateBooking};
use crate::models::notification::CreateNotification;
use crate::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use crate::repositories::{NotificationRepo, ProjectRepo};

const COLUMNS: &str = "id, booking_reference, user_id, project_id, project_name, location, \
                       visit_date, visit_time, visitors, transportation, special_requests, \
                       status, created_at";

/// Site-visit bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Confirm a booking under a freshly issued reference and notify the user.
    ///
    /// A reference collision is retried with a new code up to
    /// [`MAX_REFERENCE_ATTEMPTS`] times before giving up with a conflict.
    /// A draft project is reported as not found.
    pub async fn create(pool: &PgPool, input: &CreateBooking) -> Result<BookingOutcome, DbError> {
        let mut tx = pool.begin().await?;

        let bookable = ProjectRepo::find_by_id(&mut *tx, input.project_id)
            .await?
            .is_some_and(|project| !project.is_draft());
        if !bookable {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO bookings
                (booking_reference, user_id, project_id, project_name, location,
                 visit_date, visit_time, visitors, transportation, special_requests, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT ON CONSTRAINT uq_bookings_reference DO NOTHING
             RETURNING {COLUMNS}"
        );

        let mut booking = None;
        for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
            let reference = generate_booking_reference(Utc::now().date_naive());
            booking = sqlx::query_as::<_, Booking>(&query)
                .bind(&reference)
                .bind(input.user_id)
                .bind(input.project_id)
                .bind(&input.project_name)
                .bind(&input.location)
                .bind(input.visit_date)
                .bind(input.visit_time)
                .bind(input.visitors)
                .bind(&input.transportation)
                .bind(&input.special_requests)
                .bind(BOOKING_STATUS_CONFIRMED)
                .fetch_optional(&mut *tx)
                .await?;
            if booking.is_some() {
                break;
            }
            tracing::warn!(attempt, %reference, "Booking reference collision, retrying");
        }
        let booking = booking.ok_or_else(|| {
            CoreError::Conflict("Could not allocate a booking reference; please retry".to_string())
        })?;

        let notification = NotificationRepo::create(
            &mut *tx,
            &CreateNotification {
                user_id: booking.user_id,
                notification_type: NOTIFY_BOOKING,
                message: booking_message(
                    &booking.project_name,
                    booking.visit_date,
                    &booking.booking_reference,
                ),
                related_id: Some(booking.id),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id = booking.user_id,
            project_id = booking.project_id,
            reference = %booking.booking_reference,
            "Booking confirmed"
        );
        Ok(BookingOutcome {
            booking,
            notification,
        })
    }

    /// The user's bookings, soonest visit first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE user_id = $1
             ORDER BY visit_date ASC, visit_time ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(user_id)
            .bind(clamp_limit(limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Find one of the user's bookings by its reference.
    pub async fn find_by_reference(
        pool: &PgPool,
        reference: &str,
        user_id: DbId,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM bookings WHERE booking_reference = $1 AND user_id = $2");
        sqlx::query_as::<_, Booking>(&query)
            .bind(reference)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Cancel a confirmed booking.
    ///
    /// Returns `Ok(None)` if the user has no booking with that reference and
    /// a conflict if it is already cancelled.
    pub async fn cancel(
        pool: &PgPool,
        reference: &str,
        user_id: DbId,
    ) -> Result<Option<Booking>, DbError> {
        let query = format!(
            "UPDATE bookings SET status = $3
             WHERE booking_reference = $1 AND user_id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        let cancelled = sqlx::query_as::<_, Booking>(&query)
            .bind(reference)
            .bind(user_id)
            .bind(BOOKING_STATUS_CANCELLED)
            .bind(BOOKING_STATUS_CONFIRMED)
            .fetch_optional(pool)
            .await?;

        match cancelled {
            Some(booking) => {
                tracing::info!(user_id, %reference, "Booking cancelled");
                Ok(Some(booking))
            }
            None => match Self::find_by_reference(pool, reference, user_id).await? {
                Some(_) => Err(CoreError::Conflict(format!(
                    "Booking {reference} is already cancelled"
                ))
                .into()),
                None => Ok(None),
            },
        }
    }
}
