//! WebSocket transport for the live notification feed.
//!
//! Connections are authenticated at upgrade time and tracked per user by
//! [`WsManager`]; the feed in [`crate::notifications`] pushes frames through it.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
