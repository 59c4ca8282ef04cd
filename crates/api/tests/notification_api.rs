//! HTTP-level tests for `/notifications`, including the events each
//! mutation publishes for the live feed.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use centace_core::notification::{
    EVENT_NOTIFICATION_DELETED, EVENT_NOTIFICATION_INSERTED, EVENT_NOTIFICATION_UPDATED,
};
use centace_events::EventBus;
use common::{body_json, delete_auth, get_auth, post_auth, post_json_auth};
use sqlx::PgPool;

async fn deposit(app: Router, token: &str) {
    let body = serde_json::json!({ "amount": "100.00", "payment_method": "card" });
    let response = post_json_auth(app, "/api/v1/wallet/deposits", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_read_and_delete_lifecycle(pool: PgPool) {
    let (_, token) = common::investor(&pool, "reader").await;
    let app = common::build_test_app(pool);
    deposit(app.clone(), &token).await;
    deposit(app.clone(), &token).await;

    let json = body_json(get_auth(app.clone(), "/api/v1/notifications/unread-count", &token).await).await;
    assert_eq!(json["data"]["count"], 2);

    let json = body_json(get_auth(app.clone(), "/api/v1/notifications", &token).await).await;
    let first_id = json["data"][0]["id"].as_i64().unwrap();
    assert_eq!(json["data"][0]["type"], "deposit");

    let response = post_auth(app.clone(), &format!("/api/v1/notifications/{first_id}/read"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_read"], true);

    let json = body_json(
        get_auth(app.clone(), "/api/v1/notifications?unread_only=true", &token).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let json = body_json(post_auth(app.clone(), "/api/v1/notifications/read-all", &token).await).await;
    assert_eq!(json["data"]["marked_read"], 1);

    let uri = format!("/api/v1/notifications/{first_id}");
    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_other_users_notifications_are_404(pool: PgPool) {
    let (_, owner) = common::investor(&pool, "owner").await;
    let (_, stranger) = common::investor(&pool, "stranger").await;
    let app = common::build_test_app(pool);
    deposit(app.clone(), &owner).await;

    let json = body_json(get_auth(app.clone(), "/api/v1/notifications", &owner).await).await;
    let id = json["data"][0]["id"].as_i64().unwrap();

    let response = post_auth(app.clone(), &format!("/api/v1/notifications/{id}/read"), &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete_auth(app, &format!("/api/v1/notifications/{id}"), &stranger).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mutations_publish_change_events(pool: PgPool) {
    let (user_id, token) = common::investor(&pool, "watcher").await;
    let bus = Arc::new(EventBus::new(16));
    let mut events = bus.subscribe();
    let app = common::build_test_app_with_bus(pool, Arc::clone(&bus));

    deposit(app.clone(), &token).await;
    let inserted = events.recv().await.unwrap();
    assert_eq!(inserted.event_type, EVENT_NOTIFICATION_INSERTED);
    assert_eq!(inserted.recipient_user_id, Some(user_id));
    let id = inserted.payload["id"].as_i64().unwrap();

    post_auth(app.clone(), &format!("/api/v1/notifications/{id}/read"), &token).await;
    let updated = events.recv().await.unwrap();
    assert_eq!(updated.event_type, EVENT_NOTIFICATION_UPDATED);
    assert_eq!(updated.payload["is_read"], true);

    delete_auth(app, &format!("/api/v1/notifications/{id}"), &token).await;
    let deleted = events.recv().await.unwrap();
    assert_eq!(deleted.event_type, EVENT_NOTIFICATION_DELETED);
    assert_eq!(deleted.payload["id"], id);
}
