//! Site-visit booking rules and reference generation.
//!
//! Booking references are issued by the server only. A reference has the
//! form `BK-YYYYMMDD-XXXXXX` where the date is the day the booking was made.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::CoreError;
use crate::ledger::random_code;

/// Maximum visitors in a single booking.
pub const MAX_VISITORS: i32 = 10;

/// How far ahead a visit may be scheduled.
pub const MAX_ADVANCE_DAYS: i64 = 90;

/// Earliest visit start time (inclusive).
pub const VISIT_OPENS: (u32, u32) = (8, 0);

/// Latest visit start time (inclusive).
pub const VISIT_CLOSES: (u32, u32) = (17, 0);

/// Maximum length of the special-requests note.
pub const MAX_SPECIAL_REQUESTS_LEN: usize = 1_000;

/// Number of attempts to find an unused booking reference.
pub const MAX_REFERENCE_ATTEMPTS: usize = 5;

/// Length of the random suffix on booking references.
pub const BOOKING_CODE_LEN: usize = 6;

pub const TRANSPORT_SELF: &str = "self";
pub const TRANSPORT_PICKUP: &str = "pickup";
pub const TRANSPORT_SHUTTLE: &str = "shuttle";

/// All valid transportation options.
pub const VALID_TRANSPORTATION: &[&str] = &[TRANSPORT_SELF, TRANSPORT_PICKUP, TRANSPORT_SHUTTLE];

pub const BOOKING_STATUS_CONFIRMED: &str = "confirmed";
pub const BOOKING_STATUS_CANCELLED: &str = "cancelled";

static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^BK-\d{8}-[A-Z0-9]{6}$").expect("valid regex"));

/// The caller-controlled fields of a visit booking.
#[derive(Debug, Clone)]
pub struct VisitDetails<'a> {
    pub visit_date: NaiveDate,
    pub visit_time: &'a str,
    pub visitors: i32,
    pub transportation: &'a str,
    pub special_requests: Option<&'a str>,
}

/// Validate a visit request relative to `today`, returning the parsed start time.
pub fn validate_visit(details: &VisitDetails<'_>, today: NaiveDate) -> Result<NaiveTime, CoreError> {
    if details.visitors < 1 || details.visitors > MAX_VISITORS {
        return Err(CoreError::Validation(format!(
            "visitors must be between 1 and {MAX_VISITORS}"
        )));
    }

    if details.visit_date < today {
        return Err(CoreError::Validation(
            "visitDate must not be in the past".to_string(),
        ));
    }
    if details.visit_date > today + Duration::days(MAX_ADVANCE_DAYS) {
        return Err(CoreError::Validation(format!(
            "visitDate must be within {MAX_ADVANCE_DAYS} days"
        )));
    }

    let time = NaiveTime::parse_from_str(details.visit_time, "%H:%M").map_err(|_| {
        CoreError::Validation(format!(
            "visitTime '{}' must be formatted as HH:MM",
            details.visit_time
        ))
    })?;
    let opens = NaiveTime::from_hms_opt(VISIT_OPENS.0, VISIT_OPENS.1, 0)
        .ok_or_else(|| CoreError::Internal("invalid opening time".to_string()))?;
    let closes = NaiveTime::from_hms_opt(VISIT_CLOSES.0, VISIT_CLOSES.1, 0)
        .ok_or_else(|| CoreError::Internal("invalid closing time".to_string()))?;
    if time < opens || time > closes {
        return Err(CoreError::Validation(format!(
            "visitTime must be between {} and {}",
            opens.format("%H:%M"),
            closes.format("%H:%M")
        )));
    }

    if !VALID_TRANSPORTATION.contains(&details.transportation) {
        return Err(CoreError::Validation(format!(
            "Unknown transportation: '{}'. Valid options: {}",
            details.transportation,
            VALID_TRANSPORTATION.join(", ")
        )));
    }

    if let Some(notes) = details.special_requests {
        if notes.chars().count() > MAX_SPECIAL_REQUESTS_LEN {
            return Err(CoreError::Validation(format!(
                "specialRequests must be at most {MAX_SPECIAL_REQUESTS_LEN} characters"
            )));
        }
    }

    Ok(time)
}

/// Generate a booking reference for a booking made on `date`.
pub fn generate_booking_reference(date: NaiveDate) -> String {
    format!("BK-{}-{}", date.format("%Y%m%d"), random_code(BOOKING_CODE_LEN))
}

/// Whether `s` is shaped like a server-issued booking reference.
pub fn is_booking_reference(s: &str) -> bool {
    REFERENCE_RE.is_match(s)
}
