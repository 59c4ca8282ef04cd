//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod booking;
pub mod dashboard;
pub mod investment;
pub mod notification;
pub mod project;
pub mod wallet;
pub mod watchlist;

use centace_core::types::DbId;
use centace_db::models::notification::Notification;
use centace_events::PlatformEvent;

use crate::state::AppState;

/// Publish a notification row change so live feeds can pick it up.
///
/// Called after the owning transaction has committed.
pub(crate) fn publish_notification(
    state: &AppState,
    build: fn(DbId, DbId, serde_json::Value) -> PlatformEvent,
    notification: &Notification,
) {
    match serde_json::to_value(notification) {
        Ok(row) => state
            .event_bus
            .publish(build(notification.id, notification.user_id, row)),
        Err(e) => tracing::error!(
            notification_id = notification.id,
            error = %e,
            "Failed to serialize notification for publishing"
        ),
    }
}
