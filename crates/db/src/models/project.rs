//! Project entity model and DTOs.

use centace_core::project::STATUS_DRAFT;
use centace_core::types::{DbId, Money, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_per_share: Money,
    pub total_shares: i32,
    pub available_shares: i32,
    pub status: String,
    pub tier: String,
    pub location: String,
    pub expected_return_pct: Option<Money>,
    pub duration_months: Option<i32>,
    pub funding_deadline: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Drafts are visible to admins only.
    pub fn is_draft(&self) -> bool {
        self.status == STATUS_DRAFT
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price_per_share: Money,
    pub total_shares: i32,
    /// Defaults to `total_shares` if omitted.
    pub available_shares: Option<i32>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    /// Defaults to `silver` if omitted.
    pub tier: Option<String>,
    pub location: String,
    pub expected_return_pct: Option<Money>,
    pub duration_months: Option<i32>,
    pub funding_deadline: Option<NaiveDate>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_per_share: Option<Money>,
    pub total_shares: Option<i32>,
    pub available_shares: Option<i32>,
    pub status: Option<String>,
    pub tier: Option<String>,
    pub location: Option<String>,
    pub expected_return_pct: Option<Money>,
    pub duration_months: Option<i32>,
    pub funding_deadline: Option<NaiveDate>,
}

/// Filters for listing projects. `None` fields are not filtered on.
///
/// Drafts are hidden unless `status` explicitly asks for them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub status: Option<String>,
    pub tier: Option<String>,
    /// Case-insensitive match against name and location.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
