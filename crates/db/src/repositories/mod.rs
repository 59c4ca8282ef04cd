//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Plain
//! reads take `&PgPool`; writes that participate in a larger transaction
//! take any [`sqlx::PgExecutor`] so they can run on a pool or on
//! `&mut *tx`.

pub mod booking_repo;
pub mod dashboard_repo;
pub mod investment_repo;
pub mod notification_repo;
pub mod project_repo;
pub mod refresh_token_repo;
pub mod transaction_repo;
pub mod user_repo;
pub mod watchlist_repo;

pub use booking_repo::BookingRepo;
pub use dashboard_repo::DashboardRepo;
pub use investment_repo::InvestmentRepo;
pub use notification_repo::NotificationRepo;
pub use project_repo::ProjectRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
pub use watchlist_repo::WatchlistRepo;

use centace_core::types::DbId;
use sqlx::PgConnection;

/// Serialise wallet-affecting writes for one user until the surrounding
/// transaction ends.
pub(crate) async fn lock_wallet(conn: &mut PgConnection, user_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}
