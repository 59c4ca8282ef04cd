//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` across the application.
//! Handlers publish after their database transaction commits; the
//! notification feed subscribes and forwards row changes to WebSocket
//! clients.

use centace_core::notification::{
    change_kind, EVENT_NOTIFICATION_DELETED, EVENT_NOTIFICATION_INSERTED,
    EVENT_NOTIFICATION_UPDATED,
};
use centace_core::types::DbId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
///
/// Constructed via [`PlatformEvent::new`] and enriched with the builder
/// methods [`with_source`](PlatformEvent::with_source),
/// [`with_actor`](PlatformEvent::with_actor),
/// [`with_recipient`](PlatformEvent::with_recipient), and
/// [`with_payload`](PlatformEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"notification.inserted"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"notification"`, `"investment"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// User that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// User whose live feed should receive the event.
    pub recipient_user_id: Option<DbId>,

    /// Event-specific JSON, usually the affected row.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            recipient_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_recipient(mut self, user_id: DbId) -> Self {
        self.recipient_user_id = Some(user_id);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// `notification.inserted` for a freshly written notification row.
    pub fn notification_inserted(
        notification_id: DbId,
        user_id: DbId,
        row: serde_json::Value,
    ) -> Self {
        Self::notification_change(EVENT_NOTIFICATION_INSERTED, notification_id, user_id, row)
    }

    /// `notification.updated` for a row that was marked read.
    pub fn notification_updated(
        notification_id: DbId,
        user_id: DbId,
        row: serde_json::Value,
    ) -> Self {
        Self::notification_change(EVENT_NOTIFICATION_UPDATED, notification_id, user_id, row)
    }

    /// `notification.deleted` carrying the row as it was before deletion.
    pub fn notification_deleted(
        notification_id: DbId,
        user_id: DbId,
        row: serde_json::Value,
    ) -> Self {
        Self::notification_change(EVENT_NOTIFICATION_DELETED, notification_id, user_id, row)
    }

    fn notification_change(
        event_type: &str,
        notification_id: DbId,
        user_id: DbId,
        row: serde_json::Value,
    ) -> Self {
        Self::new(event_type)
            .with_source("notification", notification_id)
            .with_actor(user_id)
            .with_recipient(user_id)
            .with_payload(row)
    }

    /// The `INSERT`/`UPDATE`/`DELETE` kind if this is a notification row change.
    pub fn notification_change_kind(&self) -> Option<&'static str> {
        change_kind(&self.event_type)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use centace_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("project.created"));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest unconsumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: PlatformEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Event published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
