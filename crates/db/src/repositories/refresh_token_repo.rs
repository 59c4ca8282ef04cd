//! Repository for `refresh_sessions`, the server side of refresh tokens.
//!
//! Rows are keyed by the token's digest. A token is live while it is neither
//! expired nor revoked, and redeeming it revokes it in the same statement.

use centace_core::types::{DbId, Timestamp};
use sqlx::PgPool;

pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Record a newly issued refresh token.
    pub async fn store(
        pool: &PgPool,
        user_id: DbId,
        token_digest: &str,
        expires_at: Timestamp,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO refresh_sessions (user_id, token_digest, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(user_id)
        .bind(token_digest)
        .bind(expires_at)
        .fetch_one(pool)
        .await
    }

    /// Spend a live refresh token and return its owner.
    ///
    /// The revoke is conditional on the row still being live, so when the
    /// same token is presented concurrently exactly one caller gets
    /// `Some(user_id)`. Unknown, expired, and already spent tokens give `None`.
    pub async fn redeem(pool: &PgPool, token_digest: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE refresh_sessions SET revoked_at = NOW()
             WHERE token_digest = $1
               AND revoked_at IS NULL
               AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token_digest)
        .fetch_optional(pool)
        .await
    }

    /// Revoke every live token of `user_id`. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete rows that can never be redeemed again.
    pub async fn purge_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM refresh_sessions WHERE expires_at <= NOW() OR revoked_at IS NOT NULL",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
