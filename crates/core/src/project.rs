//! Project vocabularies (category, status, tier) and share-count rules.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category constants
// ---------------------------------------------------------------------------

pub const CATEGORY_AGRICULTURE: &str = "agriculture";
pub const CATEGORY_REAL_ESTATE: &str = "real_estate";
pub const CATEGORY_TECHNOLOGY: &str = "technology";
pub const CATEGORY_ENERGY: &str = "energy";
pub const CATEGORY_HEALTHCARE: &str = "healthcare";
pub const CATEGORY_OTHER: &str = "other";

/// All valid project categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_AGRICULTURE,
    CATEGORY_REAL_ESTATE,
    CATEGORY_TECHNOLOGY,
    CATEGORY_ENERGY,
    CATEGORY_HEALTHCARE,
    CATEGORY_OTHER,
];

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Not yet visible to investors.
pub const STATUS_DRAFT: &str = "draft";
/// Listed and accepting investment.
pub const STATUS_ACTIVE: &str = "active";
/// Fully subscribed.
pub const STATUS_FUNDED: &str = "funded";
/// Closed by an administrator.
pub const STATUS_CLOSED: &str = "closed";

/// All valid project statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_ACTIVE, STATUS_FUNDED, STATUS_CLOSED];

// ---------------------------------------------------------------------------
// Tier constants
// ---------------------------------------------------------------------------

pub const TIER_SILVER: &str = "silver";
pub const TIER_GOLD: &str = "gold";
pub const TIER_DIAMOND: &str = "diamond";

/// All valid ownership tiers.
pub const VALID_TIERS: &[&str] = &[TIER_SILVER, TIER_GOLD, TIER_DIAMOND];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Sector a project belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectCategory {
    Agriculture,
    RealEstate,
    Technology,
    Energy,
    Healthcare,
    Other,
}

impl ProjectCategory {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agriculture => CATEGORY_AGRICULTURE,
            Self::RealEstate => CATEGORY_REAL_ESTATE,
            Self::Technology => CATEGORY_TECHNOLOGY,
            Self::Energy => CATEGORY_ENERGY,
            Self::Healthcare => CATEGORY_HEALTHCARE,
            Self::Other => CATEGORY_OTHER,
        }
    }

    /// Parse from a string, returning an error for unknown categories.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            CATEGORY_AGRICULTURE => Ok(Self::Agriculture),
            CATEGORY_REAL_ESTATE => Ok(Self::RealEstate),
            CATEGORY_TECHNOLOGY => Ok(Self::Technology),
            CATEGORY_ENERGY => Ok(Self::Energy),
            CATEGORY_HEALTHCARE => Ok(Self::Healthcare),
            CATEGORY_OTHER => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "Unknown project category: '{other}'. Valid categories: {}",
                VALID_CATEGORIES.join(", ")
            ))),
        }
    }
}

/// Lifecycle status of a project listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    Draft,
    Active,
    Funded,
    Closed,
}

impl ProjectStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Active => STATUS_ACTIVE,
            Self::Funded => STATUS_FUNDED,
            Self::Closed => STATUS_CLOSED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_FUNDED => Ok(Self::Funded),
            STATUS_CLOSED => Ok(Self::Closed),
            other => Err(CoreError::Validation(format!(
                "Unknown project status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Only active projects accept new investment.
    pub fn accepts_investment(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Ownership tier granted to a project's investors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Silver,
    Gold,
    Diamond,
}

impl Tier {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Silver => TIER_SILVER,
            Self::Gold => TIER_GOLD,
            Self::Diamond => TIER_DIAMOND,
        }
    }

    /// Parse from a string, returning an error for unknown tiers.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            TIER_SILVER => Ok(Self::Silver),
            TIER_GOLD => Ok(Self::Gold),
            TIER_DIAMOND => Ok(Self::Diamond),
            other => Err(CoreError::Validation(format!(
                "Unknown tier: '{other}'. Valid tiers: {}",
                VALID_TIERS.join(", ")
            ))),
        }
    }

    /// Ownership rights an investor receives at this tier.
    pub fn ownership_rights(&self) -> &'static str {
        match self {
            Self::Silver => "Profit share on realised returns",
            Self::Gold => "Profit share plus quarterly reporting and site visits",
            Self::Diamond => "Profit share, reporting, site visits, and voting on major decisions",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a project's share counts: `total > 0` and `0 <= available <= total`.
pub fn validate_share_counts(total_shares: i32, available_shares: i32) -> Result<(), CoreError> {
    if total_shares <= 0 {
        return Err(CoreError::Validation(
            "total_shares must be greater than 0".to_string(),
        ));
    }
    if available_shares < 0 {
        return Err(CoreError::Validation(
            "available_shares must not be negative".to_string(),
        ));
    }
    if available_shares > total_shares {
        return Err(CoreError::Validation(format!(
            "available_shares ({available_shares}) must not exceed total_shares ({total_shares})"
        )));
    }
    Ok(())
}

/// Validate a free-text project field against a maximum length.
pub fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}
