//! Wallet ledger vocabularies, balance rules, and reference generation.
//!
//! A user's wallet balance is never stored; it is derived from their
//! transaction rows:
//!
//! ```text
//! balance = completed deposits + completed returns
//!         - non-failed withdrawals - non-failed investments
//! ```
//!
//! Pending withdrawals therefore reserve funds until they fail or complete.

use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Transaction type constants
// ---------------------------------------------------------------------------

pub const TX_TYPE_DEPOSIT: &str = "deposit";
pub const TX_TYPE_WITHDRAWAL: &str = "withdrawal";
pub const TX_TYPE_INVESTMENT: &str = "investment";
pub const TX_TYPE_RETURN: &str = "return";

/// All valid transaction types.
pub const VALID_TX_TYPES: &[&str] = &[
    TX_TYPE_DEPOSIT,
    TX_TYPE_WITHDRAWAL,
    TX_TYPE_INVESTMENT,
    TX_TYPE_RETURN,
];

// ---------------------------------------------------------------------------
// Transaction status constants
// ---------------------------------------------------------------------------

pub const TX_STATUS_PENDING: &str = "pending";
pub const TX_STATUS_COMPLETED: &str = "completed";
pub const TX_STATUS_FAILED: &str = "failed";

/// All valid transaction statuses.
pub const VALID_TX_STATUSES: &[&str] = &[TX_STATUS_PENDING, TX_STATUS_COMPLETED, TX_STATUS_FAILED];

/// Prefix for deposit references.
pub const REF_PREFIX_DEPOSIT: &str = "DEP";
/// Prefix for withdrawal references.
pub const REF_PREFIX_WITHDRAWAL: &str = "WDR";
/// Prefix for investment references.
pub const REF_PREFIX_INVESTMENT: &str = "INV";

/// Length of the random suffix on ledger references.
pub const REFERENCE_SUFFIX_LEN: usize = 8;

/// Characters used in generated reference codes.
const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Investment,
    Return,
}

impl TransactionType {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => TX_TYPE_DEPOSIT,
            Self::Withdrawal => TX_TYPE_WITHDRAWAL,
            Self::Investment => TX_TYPE_INVESTMENT,
            Self::Return => TX_TYPE_RETURN,
        }
    }

    /// Parse from a string, returning an error for unknown types.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            TX_TYPE_DEPOSIT => Ok(Self::Deposit),
            TX_TYPE_WITHDRAWAL => Ok(Self::Withdrawal),
            TX_TYPE_INVESTMENT => Ok(Self::Investment),
            TX_TYPE_RETURN => Ok(Self::Return),
            other => Err(CoreError::Validation(format!(
                "Unknown transaction type: '{other}'. Valid types: {}",
                VALID_TX_TYPES.join(", ")
            ))),
        }
    }

    /// Whether entries of this type add to the wallet.
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Deposit | Self::Return)
    }
}

/// Settlement status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => TX_STATUS_PENDING,
            Self::Completed => TX_STATUS_COMPLETED,
            Self::Failed => TX_STATUS_FAILED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            TX_STATUS_PENDING => Ok(Self::Pending),
            TX_STATUS_COMPLETED => Ok(Self::Completed),
            TX_STATUS_FAILED => Ok(Self::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown transaction status: '{other}'. Valid statuses: {}",
                VALID_TX_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

/// Signed effect of a ledger entry on the wallet balance.
///
/// Credits count only once completed; debits count unless they failed.
pub fn balance_effect(tx_type: TransactionType, status: TransactionStatus, amount: Money) -> Money {
    match (tx_type.is_credit(), status) {
        (true, TransactionStatus::Completed) => amount,
        (true, _) => Decimal::ZERO,
        (false, TransactionStatus::Failed) => Decimal::ZERO,
        (false, _) => -amount,
    }
}

/// Fold `(type, status, amount)` aggregates into a wallet balance.
pub fn compute_balance<'a, I>(entries: I) -> Result<Money, CoreError>
where
    I: IntoIterator<Item = (&'a str, &'a str, Money)>,
{
    entries
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (tx_type, status, amount)| {
            let tx_type = TransactionType::from_str(tx_type)?;
            let status = TransactionStatus::from_str(status)?;
            Ok(acc + balance_effect(tx_type, status, amount))
        })
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Generate `len` random uppercase alphanumeric characters.
pub fn random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Generate a ledger reference of the form `PREFIX-YYYYMMDD-XXXXXXXX`.
pub fn generate_reference(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{prefix}-{}-{}",
        date.format("%Y%m%d"),
        random_code(REFERENCE_SUFFIX_LEN)
    )
}
