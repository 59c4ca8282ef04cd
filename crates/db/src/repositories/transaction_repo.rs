//! Repository for the `transactions` table (the wallet ledger).

use centace_core::error::CoreError;
use centace_core::ledger::{
    compute_balance, generate_reference, REF_PREFIX_DEPOSIT, REF_PREFIX_WITHDRAWAL,
    TX_STATUS_COMPLETED, TX_STATUS_PENDING, TX_TYPE_DEPOSIT, TX_TYPE_WITHDRAWAL,
};
use centace_core::notification::{
    deposit_message, withdrawal_message, NOTIFY_DEPOSIT, NOTIFY_WITHDRAWAL,
};
use centace_core::types::{DbId, Money};
use chrono::Utc;
use sqlx::{PgExecutor, PgPool};

use crate::error::DbError;
use crate::models::notification::CreateNotification;
use crate::models::transaction::{
    CreateTransaction, FundingOutcome, Transaction, TransactionFilter,
};
use crate::pagination::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use crate::repositories::{lock_wallet, NotificationRepo};

const COLUMNS: &str = "id, user_id, type, amount, status, payment_method, reference, \
                       related_investment_id, created_at";

/// Ledger entries, balance derivation, and the deposit/withdrawal flows.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Insert a ledger entry, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateTransaction,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions
                (user_id, type, amount, status, payment_method, reference, related_investment_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.user_id)
            .bind(input.tx_type)
            .bind(input.amount)
            .bind(input.status)
            .bind(&input.payment_method)
            .bind(&input.reference)
            .bind(input.related_investment_id)
            .fetch_one(executor)
            .await
    }

    /// Derive the wallet balance for a user from their ledger.
    pub async fn balance<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Money, DbError> {
        let rows: Vec<(String, String, Money)> = sqlx::query_as(
            "SELECT type, status, COALESCE(SUM(amount), 0)
             FROM transactions WHERE user_id = $1
             GROUP BY type, status",
        )
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        let balance = compute_balance(
            rows.iter()
                .map(|(tx_type, status, amount)| (tx_type.as_str(), status.as_str(), *amount)),
        )?;
        Ok(balance)
    }

    /// The user's statement, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE user_id = $1
               AND ($2::text IS NULL OR type = $2)
               AND ($3::text IS NULL OR status = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(user_id)
            .bind(&filter.tx_type)
            .bind(&filter.status)
            .bind(clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    /// Record a completed deposit and its notification in one transaction.
    ///
    /// A caller-supplied `reference` is unique across the ledger, so
    /// resubmitting the same payment reference fails with a unique violation
    /// instead of crediting twice.
    pub async fn deposit(
        pool: &PgPool,
        user_id: DbId,
        amount: Money,
        payment_method: &str,
        reference: Option<&str>,
    ) -> Result<FundingOutcome, DbError> {
        let reference = reference
            .map(str::to_string)
            .unwrap_or_else(|| generate_reference(REF_PREFIX_DEPOSIT, Utc::now().date_naive()));

        let mut tx = pool.begin().await?;

        let transaction = Self::create(
            &mut *tx,
            &CreateTransaction {
                user_id,
                tx_type: TX_TYPE_DEPOSIT,
                amount,
                status: TX_STATUS_COMPLETED,
                payment_method: Some(payment_method.to_string()),
                reference,
                related_investment_id: None,
            },
        )
        .await?;

        let notification = NotificationRepo::create(
            &mut *tx,
            &CreateNotification {
                user_id,
                notification_type: NOTIFY_DEPOSIT,
                message: deposit_message(amount, &transaction.reference),
                related_id: Some(transaction.id),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(user_id, transaction_id = transaction.id, %amount, "Deposit recorded");
        Ok(FundingOutcome {
            transaction,
            notification,
        })
    }

    /// Record a pending withdrawal if the balance covers it.
    ///
    /// Runs under the per-user wallet lock so concurrent withdrawals and
    /// purchases cannot both spend the same funds.
    pub async fn withdraw(
        pool: &PgPool,
        user_id: DbId,
        amount: Money,
        payment_method: &str,
    ) -> Result<FundingOutcome, DbError> {
        let mut tx = pool.begin().await?;
        lock_wallet(&mut *tx, user_id).await?;

        let available = Self::balance(&mut *tx, user_id).await?;
        if available < amount {
            return Err(CoreError::InsufficientFunds {
                required: amount,
                available,
            }
            .into());
        }

        let transaction = Self::create(
            &mut *tx,
            &CreateTransaction {
                user_id,
                tx_type: TX_TYPE_WITHDRAWAL,
                amount,
                status: TX_STATUS_PENDING,
                payment_method: Some(payment_method.to_string()),
                reference: generate_reference(REF_PREFIX_WITHDRAWAL, Utc::now().date_naive()),
                related_investment_id: None,
            },
        )
        .await?;

        let notification = NotificationRepo::create(
            &mut *tx,
            &CreateNotification {
                user_id,
                notification_type: NOTIFY_WITHDRAWAL,
                message: withdrawal_message(amount, &transaction.reference),
                related_id: Some(transaction.id),
            },
        )
        .await?;

        tx.commit().await?;

        tracing::info!(user_id, transaction_id = transaction.id, %amount, "Withdrawal requested");
        Ok(FundingOutcome {
            transaction,
            notification,
        })
    }
}
