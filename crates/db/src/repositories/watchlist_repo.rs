//! Repository for the `watchlist_entries` table.

use centace_core::error::CoreError;
use centace_core::types::DbId;
use centace_core::watchlist::MAX_WATCHLIST_SIZE;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::project::Project;
use crate::repositories::ProjectRepo;

pub struct WatchlistRepo;

impl WatchlistRepo {
    /// Flip whether `user_id` watches `project_id`, returning the new state.
    ///
    /// Toggles for one user are serialised on their `users` row, so two
    /// concurrent toggles always cancel out and the size cap holds.
    pub async fn toggle(pool: &PgPool, user_id: DbId, project_id: DbId) -> Result<bool, DbError> {
        let mut tx = pool.begin().await?;

        let user_exists =
            sqlx::query_scalar::<_, DbId>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .is_some();
        if !user_exists {
            return Err(CoreError::NotFound {
                entity: "User",
                id: user_id,
            }
            .into());
        }

        let project_not_found = CoreError::NotFound {
            entity: "Project",
            id: project_id,
        };
        let Some(project) = ProjectRepo::find_by_id(&mut *tx, project_id).await? else {
            return Err(project_not_found.into());
        };

        let removed =
            sqlx::query("DELETE FROM watchlist_entries WHERE user_id = $1 AND project_id = $2")
                .bind(user_id)
                .bind(project_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
                > 0;

        if removed {
            tx.commit().await?;
            tracing::debug!(user_id, project_id, "Project unwatched");
            return Ok(false);
        }

        // A project moved back to draft can still be unwatched, but not watched.
        if project.is_draft() {
            return Err(project_not_found.into());
        }

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM watchlist_entries WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
        if count >= MAX_WATCHLIST_SIZE {
            return Err(CoreError::Conflict(format!(
                "Watchlist is full ({MAX_WATCHLIST_SIZE} projects)"
            ))
            .into());
        }

        sqlx::query(
            "INSERT INTO watchlist_entries (user_id, project_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(project_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::debug!(user_id, project_id, "Project watched");
        Ok(true)
    }

    /// Projects the user watches, most recently added first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let columns = super::project_repo::COLUMNS
            .split(", ")
            .map(|c| format!("p.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {columns} FROM watchlist_entries w
             JOIN projects p ON p.id = w.project_id
             WHERE w.user_id = $1
             ORDER BY w.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn contains(pool: &PgPool, user_id: DbId, project_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM watchlist_entries WHERE user_id = $1 AND project_id = $2)",
        )
        .bind(user_id)
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM watchlist_entries WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
