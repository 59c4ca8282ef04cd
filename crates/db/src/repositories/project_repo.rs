//! Repository for the `projects` table.

use centace_core::project::{STATUS_ACTIVE, STATUS_DRAFT, STATUS_FUNDED, TIER_SILVER};
use centace_core::types::{DbId, Money};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use crate::pagination::{clamp_limit, clamp_offset, escape_like, DEFAULT_LIMIT, MAX_LIMIT};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, name, description, category, price_per_share, total_shares, \
     available_shares, status, tier, location, expected_return_pct, duration_months, \
     funding_deadline, created_at, updated_at";

/// Provides CRUD operations for projects plus the guarded share reservation
/// used by the purchase flow.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// `available_shares` defaults to `total_shares`, `status` to `draft`,
    /// and `tier` to `silver`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, description, category, price_per_share, total_shares, available_shares,
                 status, tier, location, expected_return_pct, duration_months, funding_deadline)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, $5), COALESCE($7, '{STATUS_DRAFT}'),
                     COALESCE($8, '{TIER_SILVER}'), $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price_per_share)
            .bind(input.total_shares)
            .bind(input.available_shares)
            .bind(&input.status)
            .bind(&input.tier)
            .bind(&input.location)
            .bind(input.expected_return_pct)
            .bind(input.duration_months)
            .bind(input.funding_deadline)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List projects newest first.
    ///
    /// Drafts are excluded unless the filter asks for `status = draft`.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT);
        let offset = clamp_offset(filter.offset);
        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));

        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::text IS NULL OR category = $1)
               AND (($2::text IS NULL AND status <> '{STATUS_DRAFT}') OR status = $2)
               AND ($3::text IS NULL OR tier = $3)
               AND ($4::text IS NULL OR name ILIKE $4 ESCAPE '\\' OR location ILIKE $4 ESCAPE '\\')
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&filter.category)
            .bind(&filter.status)
            .bind(&filter.tier)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists. Share-count
    /// consistency is enforced by `ck_projects_available_range`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                price_per_share = COALESCE($5, price_per_share),
                total_shares = COALESCE($6, total_shares),
                available_shares = COALESCE($7, available_shares),
                status = COALESCE($8, status),
                tier = COALESCE($9, tier),
                location = COALESCE($10, location),
                expected_return_pct = COALESCE($11, expected_return_pct),
                duration_months = COALESCE($12, duration_months),
                funding_deadline = COALESCE($13, funding_deadline)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.price_per_share)
            .bind(input.total_shares)
            .bind(input.available_shares)
            .bind(&input.status)
            .bind(&input.tier)
            .bind(&input.location)
            .bind(input.expected_return_pct)
            .bind(input.duration_months)
            .bind(input.funding_deadline)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation if the project has investments.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically take `shares` out of an active project's availability.
    ///
    /// The decrement only happens if the project is still active, still has
    /// at least `shares` available, and is still priced at `expected_price`.
    /// Returns `None` when any of those no longer hold. A project whose
    /// availability reaches zero moves to `funded`.
    ///
    /// Must run inside the purchase transaction; the updated row stays
    /// locked until it commits.
    pub async fn reserve_shares(
        conn: &mut PgConnection,
        id: DbId,
        shares: i32,
        expected_price: Money,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                available_shares = available_shares - $2,
                status = CASE WHEN available_shares - $2 = 0 THEN '{STATUS_FUNDED}' ELSE status END
             WHERE id = $1
               AND status = '{STATUS_ACTIVE}'
               AND available_shares >= $2
               AND price_per_share = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(shares)
            .bind(expected_price)
            .fetch_optional(conn)
            .await
    }
}
