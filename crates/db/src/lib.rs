//! Centace persistence layer.
//!
//! PostgreSQL access through sqlx: pool bootstrap, migrations, row models,
//! and repositories. Multi-step writes (purchases, funding, bookings) run
//! inside a single database transaction so a failure at any step leaves no
//! partial state behind.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod pagination;
pub mod repositories;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
