//! Read-only aggregates for the investor dashboard.

use centace_core::ledger::{TX_STATUS_COMPLETED, TX_TYPE_RETURN};
use centace_core::types::{DbId, Money};
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::dashboard::DashboardSummary;
use crate::repositories::{InvestmentRepo, NotificationRepo, TransactionRepo, WatchlistRepo};

pub struct DashboardRepo;

impl DashboardRepo {
    /// Collect the dashboard figures for a user. A user with no activity
    /// gets zeros everywhere.
    pub async fn summary(pool: &PgPool, user_id: DbId) -> Result<DashboardSummary, DbError> {
        let portfolio = InvestmentRepo::portfolio_summary(pool, user_id).await?;

        let total_returns: Money = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions
             WHERE user_id = $1 AND type = $2 AND status = $3",
        )
        .bind(user_id)
        .bind(TX_TYPE_RETURN)
        .bind(TX_STATUS_COMPLETED)
        .fetch_one(pool)
        .await?;

        let wallet_balance = TransactionRepo::balance(pool, user_id).await?;
        let watchlist_count = WatchlistRepo::count_for_user(pool, user_id).await?;
        let unread_notifications = NotificationRepo::unread_count(pool, user_id).await?;

        Ok(DashboardSummary {
            total_invested: portfolio.total_invested,
            active_investments: portfolio.active_investments,
            projects_backed: portfolio.projects_backed,
            total_returns,
            wallet_balance,
            watchlist_count,
            unread_notifications,
        })
    }
}
