//! Integration tests for bookings, the watchlist, and the dashboard summary.

use assert_matches::assert_matches;
use centace_core::booking::{is_booking_reference, BOOKING_STATUS_CANCELLED};
use centace_core::error::CoreError;
use centace_core::types::{DbId, Money};
use centace_db::models::booking::CreateBooking;
use centace_db::models::project::{CreateProject, UpdateProject};
use centace_db::models::user::CreateUser;
use centace_db::repositories::{
    BookingRepo, DashboardRepo, NotificationRepo, ProjectRepo, UserRepo, WatchlistRepo,
};
use centace_db::DbError;
use chrono::{Duration, NaiveTime, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role: "investor".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_project(pool: &PgPool, name: &str) -> DbId {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: name.to_string(),
            description: None,
            category: "real_estate".to_string(),
            price_per_share: "25.00".parse::<Money>().unwrap(),
            total_shares: 1000,
            available_shares: None,
            status: Some("active".to_string()),
            tier: Some("gold".to_string()),
            location: "Accra".to_string(),
            expected_return_pct: None,
            duration_months: Some(24),
            funding_deadline: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn visit(user_id: DbId, project_id: DbId) -> CreateBooking {
    CreateBooking {
        user_id,
        project_id,
        project_name: "East Legon Villas".to_string(),
        location: "Accra".to_string(),
        visit_date: Utc::now().date_naive() + Duration::days(7),
        visit_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        visitors: 3,
        transportation: "pickup".to_string(),
        special_requests: Some("Wheelchair access".to_string()),
    }
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_gets_server_reference_and_notification(pool: PgPool) {
    let user = new_user(&pool, "ama").await;
    let project = new_project(&pool, "East Legon Villas").await;

    let outcome = BookingRepo::create(&pool, &visit(user, project)).await.unwrap();

    assert!(is_booking_reference(&outcome.booking.booking_reference));
    assert_eq!(outcome.booking.status, "confirmed");
    assert_eq!(outcome.notification.notification_type, "booking");
    assert_eq!(outcome.notification.related_id, Some(outcome.booking.id));
    assert!(outcome
        .notification
        .message
        .contains(&outcome.booking.booking_reference));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn booking_for_missing_project_writes_nothing(pool: PgPool) {
    let user = new_user(&pool, "kofi").await;

    let err = BookingRepo::create(&pool, &visit(user, 424_242)).await.unwrap_err();

    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Project", .. }));
    assert!(BookingRepo::list_for_user(&pool, user, None, None)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn draft_project_cannot_be_booked_or_newly_watched(pool: PgPool) {
    let user = new_user(&pool, "adjoa").await;
    let project = new_project(&pool, "East Legon Villas").await;
    assert!(WatchlistRepo::toggle(&pool, user, project).await.unwrap());

    let to_draft = UpdateProject {
        status: Some("draft".to_string()),
        ..Default::default()
    };
    ProjectRepo::update(&pool, project, &to_draft).await.unwrap().unwrap();

    let err = BookingRepo::create(&pool, &visit(user, project)).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Project", .. }));

    // An existing entry can still be removed, but not re-added.
    assert!(!WatchlistRepo::toggle(&pool, user, project).await.unwrap());
    let err = WatchlistRepo::toggle(&pool, user, project).await.unwrap_err();
    assert_matches!(err, DbError::Core(CoreError::NotFound { entity: "Project", .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bookings_are_scoped_to_their_owner(pool: PgPool) {
    let owner = new_user(&pool, "esi").await;
    let other = new_user(&pool, "yaw").await;
    let project = new_project(&pool, "East Legon Villas").await;
    let booking = BookingRepo::create(&pool, &visit(owner, project))
        .await
        .unwrap()
        .booking;

    let found = BookingRepo::find_by_reference(&pool, &booking.booking_reference, owner)
        .await
        .unwrap();
    assert_eq!(found.map(|b| b.id), Some(booking.id));

    let hidden = BookingRepo::find_by_reference(&pool, &booking.booking_reference, other)
        .await
        .unwrap();
    assert!(hidden.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_is_single_shot(pool: PgPool) {
    let user = new_user(&pool, "abena").await;
    let project = new_project(&pool, "East Legon Villas").await;
    let reference = BookingRepo::create(&pool, &visit(user, project))
        .await
        .unwrap()
        .booking
        .booking_reference;

    let cancelled = BookingRepo::cancel(&pool, &reference, user).await.unwrap();
    assert_eq!(cancelled.unwrap().status, BOOKING_STATUS_CANCELLED);

    assert_matches!(
        BookingRepo::cancel(&pool, &reference, user).await,
        Err(DbError::Core(CoreError::Conflict(_)))
    );
    assert_matches!(
        BookingRepo::cancel(&pool, "BK-20260101-NOPE00", user).await,
        Ok(None)
    );
}

// ---------------------------------------------------------------------------
// Watchlist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggling_twice_restores_membership(pool: PgPool) {
    let user = new_user(&pool, "kwame").await;
    let project = new_project(&pool, "Solar Farm").await;

    assert!(!WatchlistRepo::contains(&pool, user, project).await.unwrap());
    assert!(WatchlistRepo::toggle(&pool, user, project).await.unwrap());
    assert!(WatchlistRepo::contains(&pool, user, project).await.unwrap());
    assert!(!WatchlistRepo::toggle(&pool, user, project).await.unwrap());
    assert!(!WatchlistRepo::contains(&pool, user, project).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_toggles_cancel_out(pool: PgPool) {
    let user = new_user(&pool, "kofi").await;

    for round in 0..10 {
        let project = new_project(&pool, &format!("Wind Farm {round}")).await;

        let first = tokio::spawn({
            let pool = pool.clone();
            async move { WatchlistRepo::toggle(&pool, user, project).await }
        });
        let second = tokio::spawn({
            let pool = pool.clone();
            async move { WatchlistRepo::toggle(&pool, user, project).await }
        });
        let (first, second) = (first.await.unwrap().unwrap(), second.await.unwrap().unwrap());

        assert_ne!(first, second, "round {round}: both toggles saw the same state");
        assert!(
            !WatchlistRepo::contains(&pool, user, project).await.unwrap(),
            "round {round}: project left watched"
        );
    }
    assert_eq!(WatchlistRepo::count_for_user(&pool, user).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn watchlist_lists_watched_projects(pool: PgPool) {
    let user = new_user(&pool, "efua").await;
    let first = new_project(&pool, "Solar Farm").await;
    let second = new_project(&pool, "Cocoa Farm").await;
    WatchlistRepo::toggle(&pool, user, first).await.unwrap();
    WatchlistRepo::toggle(&pool, user, second).await.unwrap();

    let ids: Vec<DbId> = WatchlistRepo::list_for_user(&pool, user)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first) && ids.contains(&second));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggling_unknown_project_is_not_found(pool: PgPool) {
    let user = new_user(&pool, "akosua").await;

    assert_matches!(
        WatchlistRepo::toggle(&pool, user, 777).await,
        Err(DbError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_for_new_user_is_all_zero(pool: PgPool) {
    let user = new_user(&pool, "adwoa").await;

    let summary = DashboardRepo::summary(&pool, user).await.unwrap();

    assert!(summary.total_invested.is_zero());
    assert!(summary.total_returns.is_zero());
    assert!(summary.wallet_balance.is_zero());
    assert_eq!(summary.active_investments, 0);
    assert_eq!(summary.projects_backed, 0);
    assert_eq!(summary.watchlist_count, 0);
    assert_eq!(summary.unread_notifications, 0);
}
