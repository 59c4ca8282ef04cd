//! Event bus to WebSocket bridge for notification row changes.
//!
//! Each frame has the shape
//!
//! ```text
//! { "event": "INSERT" | "UPDATE" | "DELETE", "notification": { ...row... } }
//! ```
//!
//! and goes only to connections owned by the row's user. Clients apply the
//! change to their local list: INSERT prepends, UPDATE replaces by id,
//! DELETE removes by id.

use std::sync::Arc;

use centace_events::PlatformEvent;
use serde_json::json;
use tokio::sync::broadcast;

use crate::ws::WsManager;

pub struct NotificationFeed {
    ws_manager: Arc<WsManager>,
}

impl NotificationFeed {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Forward events until the bus is closed.
    ///
    /// A lagging receiver skips the missed events and keeps going; clients
    /// resynchronise through `GET /notifications`.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.deliver(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification feed lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification feed shutting down");
                    break;
                }
            }
        }
    }

    /// Push one event to its recipient. Events that are not notification
    /// changes, or carry no recipient, are ignored.
    async fn deliver(&self, event: &PlatformEvent) {
        let Some(kind) = event.notification_change_kind() else {
            return;
        };
        let Some(user_id) = event.recipient_user_id else {
            tracing::debug!(event_type = %event.event_type, "Notification event without recipient");
            return;
        };

        let frame = json!({
            "event": kind,
            "notification": event.payload,
        });
        let sent = self.ws_manager.send_json_to_user(user_id, &frame).await;
        tracing::trace!(user_id, kind, sent, "Notification change delivered");
    }
}
