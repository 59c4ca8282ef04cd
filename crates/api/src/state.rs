use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: centace_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Live WebSocket connections (notification feed clients).
    pub ws_manager: Arc<WsManager>,
    /// Handlers publish committed changes here.
    pub event_bus: Arc<centace_events::EventBus>,
}
