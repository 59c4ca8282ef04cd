//! Centace in-process event bus.
//!
//! - [`EventBus`]: publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope. Notification row changes
//!   travel as `notification.inserted`, `notification.updated`, and
//!   `notification.deleted` events carrying the row as payload.

pub mod bus;

pub use bus::{EventBus, PlatformEvent};
