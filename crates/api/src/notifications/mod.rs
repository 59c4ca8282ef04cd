//! Live notification delivery.
//!
//! [`NotificationFeed`] subscribes to the event bus and forwards every
//! notification row change to the owning user's WebSocket connections.

pub mod feed;

pub use feed::NotificationFeed;
