//! Aggregates shown on the investor dashboard.

use centace_core::types::Money;
use serde::Serialize;

/// Per-user portfolio figures. Every figure is zero when the user has no
/// matching rows.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_invested: Money,
    pub active_investments: i64,
    pub projects_backed: i64,
    pub total_returns: Money,
    pub wallet_balance: Money,
    pub watchlist_count: i64,
    pub unread_notifications: i64,
}
