//! Site-visit booking model.

use centace_core::types::{DbId, Timestamp};
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::notification::Notification;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub booking_reference: String,
    pub user_id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub location: String,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub visitors: i32,
    pub transportation: String,
    pub special_requests: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for creating a booking. The reference is generated by the repository.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub user_id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub location: String,
    pub visit_date: NaiveDate,
    pub visit_time: NaiveTime,
    pub visitors: i32,
    pub transportation: String,
    pub special_requests: Option<String>,
}

/// Rows written when a booking is confirmed.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub notification: Notification,
}
