//! HTTP-level tests for `/watchlist` and the dashboard figures built on it.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth};
use rust_decimal::Decimal;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_twice_restores_membership(pool: PgPool) {
    let (_, token) = common::investor(&pool, "browser").await;
    let project = common::create_project(&pool, "Maize Co-op", Decimal::new(1000, 2), 100).await;
    let app = common::build_test_app(pool);
    let toggle = format!("/api/v1/watchlist/{}/toggle", project.id);

    let json = body_json(post_auth(app.clone(), &toggle, &token).await).await;
    assert_eq!(json["data"]["project_id"], project.id);
    assert_eq!(json["data"]["watching"], true);

    let json = body_json(get_auth(app.clone(), "/api/v1/watchlist", &token).await).await;
    assert_eq!(json["data"][0]["id"], project.id);

    let json = body_json(post_auth(app.clone(), &toggle, &token).await).await;
    assert_eq!(json["data"]["watching"], false);

    let json = body_json(get_auth(app.clone(), "/api/v1/watchlist", &token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let json = body_json(
        get_auth(app, &format!("/api/v1/watchlist/{}", project.id), &token).await,
    )
    .await;
    assert_eq!(json["data"]["watching"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_unknown_project_is_404(pool: PgPool) {
    let (_, token) = common::investor(&pool, "browser").await;
    let app = common::build_test_app(pool);

    let response = post_auth(app, "/api/v1/watchlist/555555/toggle", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_summary_counts_watchlist(pool: PgPool) {
    let (_, token) = common::investor(&pool, "dash").await;
    let project = common::create_project(&pool, "Maize Co-op", Decimal::new(1000, 2), 100).await;
    let app = common::build_test_app(pool);

    let json = body_json(get_auth(app.clone(), "/api/v1/dashboard/summary", &token).await).await;
    assert_eq!(json["data"]["watchlist_count"], 0);
    assert_eq!(json["data"]["active_investments"], 0);

    post_auth(app.clone(), &format!("/api/v1/watchlist/{}/toggle", project.id), &token).await;

    let json = body_json(get_auth(app, "/api/v1/dashboard/summary", &token).await).await;
    assert_eq!(json["data"]["watchlist_count"], 1);
}
