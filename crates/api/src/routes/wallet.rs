//! Route definitions for the `/wallet` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wallet;
use crate::state::AppState;

/// Routes mounted at `/wallet`.
///
/// ```text
/// GET  /balance       -> balance
/// GET  /transactions  -> transactions
/// POST /deposits      -> deposit
/// POST /withdrawals   -> withdraw
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/balance", get(wallet::balance))
        .route("/transactions", get(wallet::transactions))
        .route("/deposits", post(wallet::deposit))
        .route("/withdrawals", post(wallet::withdraw))
}
