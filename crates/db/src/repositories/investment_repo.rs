//! Repository for the `investments` table and the share purchase flow.

use centace_core::error::CoreError;
use centace_core::ledger::{
    generate_reference, REF_PREFIX_INVESTMENT, TX_STATUS_COMPLETED, TX_TYPE_INVESTMENT,
};
use centace_core::notification::{investment_message, NOTIFY_INVESTMENT};
use centace_core::pricing::{quote, validate_quantity};
use centace_core::project::ProjectStatus;
use centace_core::types::DbId;
use chrono::Utc;
use sqlx::{PgExecutor, PgPool};

use crate::error::DbError;
use crate::models::investment::{
    CompletedPurchase, Investment, InvestmentWithProject, PortfolioSummary, PurchaseInput,
    PurchaseOutcome,
};
use crate::models::notification::CreateNotification;
use crate::models::transaction::CreateTransaction;
use crate::repositories::{lock_wallet, NotificationRepo, ProjectRepo, TransactionRepo};

const COLUMNS: &str = "id, user_id, project_id, shares, price_per_share, amount, fees, total, \
                       status, idempotency_key, created_at";

/// Status of a newly purchased investment.
const INVESTMENT_STATUS_ACTIVE: &str = "active";

/// Maximum length of a client idempotency key.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 128;

/// Investments and the share purchase transaction.
pub struct InvestmentRepo;

impl InvestmentRepo {
    /// Buy shares of a project for `user_id`.
    ///
    /// All writes happen in one database transaction, serialised per user
    /// by the wallet lock:
    ///
    /// 1. Replay: an existing investment with the same idempotency key is
    ///    returned as-is.
    /// 2. The project must exist, be active, and have enough shares.
    /// 3. The wallet balance must cover the quoted final total.
    /// 4. Shares are reserved with a conditional decrement, so two buyers
    ///    can never both take the last shares.
    /// 5. The investment, its ledger entry, and a notification are inserted.
    ///
    /// Any failure rolls back every step, including the share reservation.
    pub async fn purchase(
        pool: &PgPool,
        user_id: DbId,
        input: &PurchaseInput,
    ) -> Result<PurchaseOutcome, DbError> {
        if let Some(key) = &input.idempotency_key {
            if key.trim().is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
                return Err(CoreError::Validation(format!(
                    "idempotency_key must be 1 to {MAX_IDEMPOTENCY_KEY_LEN} characters"
                ))
                .into());
            }
        }

        let mut tx = pool.begin().await?;
        lock_wallet(&mut *tx, user_id).await?;

        if let Some(key) = &input.idempotency_key {
            if let Some(existing) = Self::find_by_idempotency_key(&mut *tx, user_id, key).await? {
                tx.commit().await?;
                tracing::info!(
                    user_id,
                    investment_id = existing.id,
                    "Purchase replayed from idempotency key"
                );
                return Ok(PurchaseOutcome::Replayed(existing));
            }
        }

        let project = ProjectRepo::find_by_id(&mut *tx, input.project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: input.project_id,
            })?;

        if !ProjectStatus::from_str(&project.status)?.accepts_investment() {
            return Err(CoreError::Conflict(format!(
                "Project '{}' is not open for investment (status: {})",
                project.name, project.status
            ))
            .into());
        }

        validate_quantity(input.shares, project.available_shares)?;
        let quote = quote(project.price_per_share, input.shares, project.available_shares);

        let available_funds = TransactionRepo::balance(&mut *tx, user_id).await?;
        if available_funds < quote.final_total {
            return Err(CoreError::InsufficientFunds {
                required: quote.final_total,
                available: available_funds,
            }
            .into());
        }

        let Some(project) =
            ProjectRepo::reserve_shares(&mut *tx, project.id, input.shares, project.price_per_share)
                .await?
        else {
            // Lost a race with another buyer or an admin edit since the read above.
            let current = ProjectRepo::find_by_id(&mut *tx, input.project_id).await?;
            return Err(match current {
                Some(p) if p.available_shares < input.shares => CoreError::InsufficientShares {
                    requested: input.shares,
                    available: p.available_shares,
                },
                _ => CoreError::Conflict(
                    "Project changed while purchasing; please review and retry".to_string(),
                ),
            }
            .into());
        };

        let query = format!(
            "INSERT INTO investments
                (user_id, project_id, shares, price_per_share, amount, fees, total, status, idempotency_key)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let investment = sqlx::query_as::<_, Investment>(&query)
            .bind(user_id)
            .bind(project.id)
            .bind(input.shares)
            .bind(quote.price_per_share)
            .bind(quote.total_cost)
            .bind(quote.service_fee)
            .bind(quote.final_total)
            .bind(INVESTMENT_STATUS_ACTIVE)
            .bind(&input.idempotency_key)
            .fetch_one(&mut *tx)
            .await?;

        let transaction = TransactionRepo::create(
            &mut *tx,
            &CreateTransaction {
                user_id,
                tx_type: TX_TYPE_INVESTMENT,
                amount: quote.final_total,
                status: TX_STATUS_COMPLETED,
                payment_method: None,
                reference: generate_reference(REF_PREFIX_INVESTMENT, Utc::now().date_naive()),
                related_investment_id: Some(investment.id),
            },
        )
        .await?;

        let notification = NotificationRepo::create(
            &mut *tx,
            &CreateNotification {
                user_id,
                notification_type: NOTIFY_INVESTMENT,
                message: investment_message(&project.name, input.shares, quote.final_total),
                related_id: Some(investment.id),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id,
            project_id = project.id,
            investment_id = investment.id,
            shares = input.shares,
            total = %quote.final_total,
            remaining = project.available_shares,
            "Investment created"
        );

        Ok(PurchaseOutcome::Created(Box::new(CompletedPurchase {
            investment,
            transaction,
            notification,
            project,
            quote,
        })))
    }

    async fn find_by_idempotency_key<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        key: &str,
    ) -> Result<Option<Investment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM investments WHERE user_id = $1 AND idempotency_key = $2"
        );
        sqlx::query_as::<_, Investment>(&query)
            .bind(user_id)
            .bind(key)
            .fetch_optional(executor)
            .await
    }

    /// Find one of the user's investments.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<InvestmentWithProject>, sqlx::Error> {
        sqlx::query_as::<_, InvestmentWithProject>(&format!(
            "{PORTFOLIO_SELECT} WHERE i.id = $1 AND i.user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// The user's portfolio, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InvestmentWithProject>, sqlx::Error> {
        sqlx::query_as::<_, InvestmentWithProject>(&format!(
            "{PORTFOLIO_SELECT} WHERE i.user_id = $1
             ORDER BY i.created_at DESC, i.id DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Totals over the user's investments that have not been cancelled.
    pub async fn portfolio_summary(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<PortfolioSummary, sqlx::Error> {
        sqlx::query_as::<_, PortfolioSummary>(
            "SELECT COALESCE(SUM(total), 0) AS total_invested,
                    COUNT(*) FILTER (WHERE status = 'active') AS active_investments,
                    COUNT(DISTINCT project_id) AS projects_backed
             FROM investments
             WHERE user_id = $1 AND status <> 'cancelled'",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}

const PORTFOLIO_SELECT: &str = "SELECT i.id, i.project_id, p.name AS project_name, \
     p.category AS project_category, p.tier AS project_tier, i.shares, i.price_per_share, \
     i.amount, i.fees, i.total, i.status, i.created_at \
     FROM investments i JOIN projects p ON p.id = i.project_id";
