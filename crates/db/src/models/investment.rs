//! Investment entity model and purchase DTOs.

use centace_core::pricing::Quote;
use centace_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::notification::Notification;
use crate::models::project::Project;
use crate::models::transaction::Transaction;

/// A row from the `investments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Investment {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub shares: i32,
    pub price_per_share: Money,
    pub amount: Money,
    pub fees: Money,
    pub total: Money,
    pub status: String,
    pub idempotency_key: Option<String>,
    pub created_at: Timestamp,
}

/// An investment joined with the project fields shown on the portfolio page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InvestmentWithProject {
    pub id: DbId,
    pub project_id: DbId,
    pub project_name: String,
    pub project_category: String,
    pub project_tier: String,
    pub shares: i32,
    pub price_per_share: Money,
    pub amount: Money,
    pub fees: Money,
    pub total: Money,
    pub status: String,
    pub created_at: Timestamp,
}

/// Request to buy shares of a project.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseInput {
    pub project_id: DbId,
    pub shares: i32,
    /// Client-chosen key; resubmitting the same key returns the original
    /// investment instead of buying again.
    pub idempotency_key: Option<String>,
}

/// Result of [`InvestmentRepo::purchase`](crate::repositories::InvestmentRepo::purchase).
#[derive(Debug, Clone)]
pub enum PurchaseOutcome {
    /// A new purchase was committed.
    Created(Box<CompletedPurchase>),
    /// The idempotency key matched an earlier purchase; nothing was written.
    Replayed(Investment),
}

/// Everything written by a successful purchase.
#[derive(Debug, Clone)]
pub struct CompletedPurchase {
    pub investment: Investment,
    pub transaction: Transaction,
    pub notification: Notification,
    /// The project row after its shares were reserved.
    pub project: Project,
    pub quote: Quote,
}

impl PurchaseOutcome {
    /// The investment row, whether new or replayed.
    pub fn investment(&self) -> &Investment {
        match self {
            Self::Created(purchase) => &purchase.investment,
            Self::Replayed(investment) => investment,
        }
    }
}

/// Aggregate of a user's non-cancelled investments.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct PortfolioSummary {
    pub total_invested: Money,
    pub active_investments: i64,
    pub projects_backed: i64,
}
