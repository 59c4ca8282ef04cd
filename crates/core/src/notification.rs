//! Notification types, feed event names, and message templates.

use crate::error::CoreError;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Notification types
// ---------------------------------------------------------------------------

pub const NOTIFY_INVESTMENT: &str = "investment";
pub const NOTIFY_DEPOSIT: &str = "deposit";
pub const NOTIFY_WITHDRAWAL: &str = "withdrawal";
pub const NOTIFY_BOOKING: &str = "booking";
pub const NOTIFY_RETURN: &str = "return";
pub const NOTIFY_SYSTEM: &str = "system";

/// All valid notification types.
pub const VALID_NOTIFICATION_TYPES: &[&str] = &[
    NOTIFY_INVESTMENT,
    NOTIFY_DEPOSIT,
    NOTIFY_WITHDRAWAL,
    NOTIFY_BOOKING,
    NOTIFY_RETURN,
    NOTIFY_SYSTEM,
];

/// Validate a notification type name.
pub fn validate_notification_type(s: &str) -> Result<(), CoreError> {
    if VALID_NOTIFICATION_TYPES.contains(&s) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown notification type: '{s}'. Valid types: {}",
            VALID_NOTIFICATION_TYPES.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Change-feed events
// ---------------------------------------------------------------------------

/// Published after a notification row is inserted.
pub const EVENT_NOTIFICATION_INSERTED: &str = "notification.inserted";
/// Published after a notification row is marked read.
pub const EVENT_NOTIFICATION_UPDATED: &str = "notification.updated";
/// Published after a notification row is deleted.
pub const EVENT_NOTIFICATION_DELETED: &str = "notification.deleted";

/// Map a notification event name to the change kind pushed to clients
/// (`INSERT`, `UPDATE`, `DELETE`). Returns `None` for unrelated events.
pub fn change_kind(event_type: &str) -> Option<&'static str> {
    match event_type {
        EVENT_NOTIFICATION_INSERTED => Some("INSERT"),
        EVENT_NOTIFICATION_UPDATED => Some("UPDATE"),
        EVENT_NOTIFICATION_DELETED => Some("DELETE"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Message templates
// ---------------------------------------------------------------------------

pub fn investment_message(project_name: &str, shares: i32, total: Money) -> String {
    let noun = if shares == 1 { "share" } else { "shares" };
    format!("You invested {total} in {project_name} ({shares} {noun}).")
}

pub fn deposit_message(amount: Money, reference: &str) -> String {
    format!("Your deposit of {amount} was received (ref {reference}).")
}

pub fn withdrawal_message(amount: Money, reference: &str) -> String {
    format!("Your withdrawal of {amount} is being processed (ref {reference}).")
}

pub fn booking_message(project_name: &str, visit_date: chrono::NaiveDate, reference: &str) -> String {
    format!(
        "Your visit to {project_name} on {} is confirmed (ref {reference}).",
        visit_date.format("%Y-%m-%d")
    )
}
