use centace_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules
/// inside a transaction (purchases, withdrawals, bookings).
///
/// Plain CRUD repositories return [`sqlx::Error`] directly.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain rule rejected the operation; the transaction was rolled back.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}
