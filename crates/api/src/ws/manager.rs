use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::{Message, Utf8Bytes};
use centace_core::types::DbId;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// One authenticated WebSocket connection.
pub struct WsConnection {
    /// Owner of the connection; only this user's notifications are sent to it.
    pub user_id: DbId,
    pub sender: WsSender,
}

/// Tracks every open WebSocket connection, keyed by connection id.
///
/// Wrapped in `Arc` and shared through [`AppState`](crate::state::AppState).
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a connection for `user_id`.
    ///
    /// Returns the receiver half of the outbound channel; the caller forwards
    /// it to the socket sink.
    pub async fn add(&self, conn_id: String, user_id: DbId) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection { user_id, sender: tx };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Send a message to every connection owned by `user_id`.
    ///
    /// Returns how many connections accepted it. A closed channel is skipped;
    /// its receive loop removes it on exit.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|conn| conn.user_id == user_id)
            .filter(|conn| conn.sender.send(message.clone()).is_ok())
            .count()
    }

    /// Serialize `payload` once and send it as a text frame to `user_id`.
    pub async fn send_json_to_user(&self, user_id: DbId, payload: &serde_json::Value) -> usize {
        let text = Utf8Bytes::from(payload.to_string());
        self.send_to_user(user_id, Message::Text(text)).await
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connection.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_to_user_reaches_only_their_connections() {
        let manager = WsManager::new();
        let mut alice_a = manager.add("a".into(), 1).await;
        let mut alice_b = manager.add("b".into(), 1).await;
        let mut bob = manager.add("c".into(), 2).await;

        let sent = manager
            .send_json_to_user(1, &serde_json::json!({ "event": "INSERT" }))
            .await;

        assert_eq!(sent, 2);
        assert!(matches!(alice_a.try_recv(), Ok(Message::Text(_))));
        assert!(matches!(alice_b.try_recv(), Ok(Message::Text(_))));
        assert!(bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_receiver_is_not_counted() {
        let manager = WsManager::new();
        let rx = manager.add("gone".into(), 7).await;
        drop(rx);

        assert_eq!(manager.send_to_user(7, Message::Ping(Bytes::new())).await, 0);
        assert_eq!(manager.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_shutdown_all_sends_close_and_clears() {
        let manager = WsManager::new();
        let mut rx = manager.add("x".into(), 3).await;

        manager.shutdown_all().await;

        assert!(matches!(rx.try_recv(), Ok(Message::Close(None))));
        assert_eq!(manager.connection_count().await, 0);
    }
}
