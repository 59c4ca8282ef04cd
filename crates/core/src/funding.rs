//! Deposit and withdrawal input rules.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::pricing::MONEY_DP;
use crate::types::Money;

pub const METHOD_BANK_TRANSFER: &str = "bank_transfer";
pub const METHOD_CARD: &str = "card";
pub const METHOD_MOBILE_MONEY: &str = "mobile_money";
pub const METHOD_CRYPTO: &str = "crypto";

/// All accepted payment methods.
pub const VALID_PAYMENT_METHODS: &[&str] = &[
    METHOD_BANK_TRANSFER,
    METHOD_CARD,
    METHOD_MOBILE_MONEY,
    METHOD_CRYPTO,
];

/// Maximum length of a caller-supplied payment reference.
pub const MAX_REFERENCE_LEN: usize = 64;

/// Which side of the wallet a funding request touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingKind {
    Deposit,
    Withdrawal,
}

impl FundingKind {
    fn label(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
        }
    }
}

/// Inclusive bounds on a single deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingLimits {
    pub min_deposit: Money,
    pub max_deposit: Money,
    pub min_withdrawal: Money,
    pub max_withdrawal: Money,
}

impl Default for FundingLimits {
    fn default() -> Self {
        Self {
            min_deposit: Decimal::from(10),
            max_deposit: Decimal::from(1_000_000),
            min_withdrawal: Decimal::from(10),
            max_withdrawal: Decimal::from(1_000_000),
        }
    }
}

impl FundingLimits {
    fn bounds(&self, kind: FundingKind) -> (Money, Money) {
        match kind {
            FundingKind::Deposit => (self.min_deposit, self.max_deposit),
            FundingKind::Withdrawal => (self.min_withdrawal, self.max_withdrawal),
        }
    }
}

/// Validate a funding amount, returning it once accepted.
///
/// A missing amount is rejected before anything else, so an empty form
/// submission never reaches the ledger.
pub fn validate_amount(
    amount: Option<Money>,
    kind: FundingKind,
    limits: &FundingLimits,
) -> Result<Money, CoreError> {
    let amount =
        amount.ok_or_else(|| CoreError::Validation("Amount is required".to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "Amount must be greater than 0".to_string(),
        ));
    }
    if amount.normalize().scale() > MONEY_DP {
        return Err(CoreError::Validation(format!(
            "Amount must have at most {MONEY_DP} decimal places"
        )));
    }

    let (min, max) = limits.bounds(kind);
    if amount < min || amount > max {
        return Err(CoreError::Validation(format!(
            "{} amount must be between {min} and {max}",
            kind.label()
        )));
    }
    Ok(amount)
}

/// Validate a payment method name.
pub fn validate_payment_method(method: &str) -> Result<(), CoreError> {
    if VALID_PAYMENT_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown payment method: '{method}'. Valid methods: {}",
            VALID_PAYMENT_METHODS.join(", ")
        )))
    }
}

/// Validate an optional caller-supplied payment reference.
pub fn validate_reference(reference: Option<&str>) -> Result<(), CoreError> {
    match reference {
        Some(r) if r.trim().is_empty() => Err(CoreError::Validation(
            "Reference must not be blank".to_string(),
        )),
        Some(r) if r.len() > MAX_REFERENCE_LEN => Err(CoreError::Validation(format!(
            "Reference must be at most {MAX_REFERENCE_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn money(s: &str) -> Money {
        s.parse().expect("valid decimal literal")
    }

    #[test]
    fn missing_amount_is_rejected() {
        let err = validate_amount(None, FundingKind::Deposit, &FundingLimits::default());
        assert_matches!(err, Err(CoreError::Validation(msg)) if msg == "Amount is required");
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let limits = FundingLimits::default();
        assert!(validate_amount(Some(Decimal::ZERO), FundingKind::Deposit, &limits).is_err());
        assert!(validate_amount(Some(money("-5")), FundingKind::Withdrawal, &limits).is_err());
    }

    #[test]
    fn sub_cent_amount_is_rejected() {
        let limits = FundingLimits::default();
        assert!(validate_amount(Some(money("10.005")), FundingKind::Deposit, &limits).is_err());
        // Trailing zeros are not extra precision.
        assert!(validate_amount(Some(money("10.5000")), FundingKind::Deposit, &limits).is_ok());
    }

    #[test]
    fn amount_outside_limits_is_rejected() {
        let limits = FundingLimits::default();
        assert!(validate_amount(Some(money("9.99")), FundingKind::Deposit, &limits).is_err());
        assert!(
            validate_amount(Some(money("1000000.01")), FundingKind::Deposit, &limits).is_err()
        );
        assert_eq!(
            validate_amount(Some(money("250.00")), FundingKind::Withdrawal, &limits).unwrap(),
            money("250.00")
        );
    }

    #[test]
    fn payment_methods_are_whitelisted() {
        assert!(validate_payment_method("card").is_ok());
        assert!(validate_payment_method("cheque").is_err());
    }

    #[test]
    fn reference_must_be_non_blank_and_short() {
        assert!(validate_reference(None).is_ok());
        assert!(validate_reference(Some("BANK-123")).is_ok());
        assert!(validate_reference(Some("  ")).is_err());
        assert!(validate_reference(Some(&"x".repeat(65))).is_err());
    }
}
