//! Share purchase pricing.
//!
//! A purchase of `quantity` shares costs `price_per_share * quantity`, plus a
//! flat service fee of 5% of that cost. The same [`quote`] is used by the
//! quote endpoint and by the purchase transaction, so the figures a client
//! sees are the figures that get charged.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Money;

/// Service fee charged on top of the share cost (5%).
pub const SERVICE_FEE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Number of decimal places money is rounded to.
pub const MONEY_DP: u32 = 2;

/// Upper bound on shares in a single purchase.
pub const MAX_SHARES_PER_PURCHASE: i32 = 100_000;

/// Price breakdown for buying `quantity` shares of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub quantity: i32,
    pub price_per_share: Money,
    pub total_cost: Money,
    pub service_fee: Money,
    pub final_total: Money,
    pub available_shares: i32,
    /// Whether one more share could be added without exceeding availability.
    pub can_increment: bool,
    /// Whether a purchase of exactly `quantity` shares may be submitted.
    pub can_submit: bool,
}

/// Round a money value to cents using banker's rounding.
pub fn round_money(value: Decimal) -> Money {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Service fee for a given share cost.
pub fn service_fee(total_cost: Money) -> Money {
    round_money(total_cost * SERVICE_FEE_RATE)
}

/// Build a [`Quote`] for `quantity` shares at `price_per_share`.
///
/// Negative quantities are priced as zero and can never be submitted.
pub fn quote(price_per_share: Money, quantity: i32, available_shares: i32) -> Quote {
    let priced_quantity = quantity.max(0);
    let total_cost = round_money(price_per_share * Decimal::from(priced_quantity));
    let service_fee = service_fee(total_cost);

    Quote {
        quantity,
        price_per_share,
        total_cost,
        service_fee,
        final_total: total_cost + service_fee,
        available_shares,
        can_increment: quantity < available_shares,
        can_submit: quantity >= 1 && quantity <= available_shares,
    }
}

/// Validate a requested share quantity against what the project has left.
pub fn validate_quantity(quantity: i32, available_shares: i32) -> Result<(), CoreError> {
    if quantity <= 0 {
        return Err(CoreError::Validation(
            "Share quantity must be at least 1".to_string(),
        ));
    }
    if quantity > MAX_SHARES_PER_PURCHASE {
        return Err(CoreError::Validation(format!(
            "Share quantity must not exceed {MAX_SHARES_PER_PURCHASE}"
        )));
    }
    if quantity > available_shares {
        return Err(CoreError::InsufficientShares {
            requested: quantity,
            available: available_shares,
        });
    }
    Ok(())
}
