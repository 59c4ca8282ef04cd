//! Wallet ledger entry model.

use centace_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::notification::Notification;

/// A row from the `transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transaction {
    pub id: DbId,
    pub user_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub tx_type: String,
    pub amount: Money,
    pub status: String,
    pub payment_method: Option<String>,
    pub reference: String,
    pub related_investment_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for inserting a ledger entry.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub user_id: DbId,
    pub tx_type: &'static str,
    pub amount: Money,
    pub status: &'static str,
    pub payment_method: Option<String>,
    pub reference: String,
    pub related_investment_id: Option<DbId>,
}

/// Statement filters (`?type=&status=&limit=&offset=`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Current wallet balance for a user.
#[derive(Debug, Clone, Serialize)]
pub struct WalletBalance {
    pub user_id: DbId,
    pub balance: Money,
}

/// Rows written by a deposit or withdrawal.
#[derive(Debug, Clone)]
pub struct FundingOutcome {
    pub transaction: Transaction,
    pub notification: Notification,
}
