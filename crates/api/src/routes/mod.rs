pub mod auth;
pub mod booking;
pub mod dashboard;
pub mod health;
pub mod investment;
pub mod notification;
pub mod project;
pub mod wallet;
pub mod watchlist;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=                                       WebSocket notification feed
///
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout
/// /auth/me                                         current user
///
/// /projects                                        list (public), create (admin)
/// /projects/{id}                                   get (public), update, delete (admin)
/// /projects/{id}/quote?shares=N                    price a purchase (public)
///
/// /investments                                     list, purchase
/// /investments/summary                             portfolio totals
/// /investments/{id}                                get
///
/// /wallet/balance                                  derived balance
/// /wallet/transactions                             statement
/// /wallet/deposits                                 deposit (POST)
/// /wallet/withdrawals                              request withdrawal (POST)
///
/// /notifications                                   list
/// /notifications/unread-count                      unread count
/// /notifications/read-all                          mark all read (POST)
/// /notifications/{id}                              delete
/// /notifications/{id}/read                         mark read (POST)
///
/// /watchlist                                       list
/// /watchlist/{project_id}                          membership
/// /watchlist/{project_id}/toggle                   toggle (POST)
///
/// /dashboard/summary                               headline figures
///
/// /bookings                                        list
/// /bookings/{reference}                            get
/// /bookings/{reference}/cancel                     cancel (POST)
/// ```
///
/// Booking creation is mounted separately at `/api/bookings`; see
/// [`booking::legacy_router`].
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/investments", investment::router())
        .nest("/wallet", wallet::router())
        .nest("/notifications", notification::router())
        .nest("/watchlist", watchlist::router())
        .nest("/dashboard", dashboard::router())
        .nest("/bookings", booking::router())
}
