//! Handlers for the `/wallet` resource: balance, statement, and funding.
//!
//! The balance is never stored. It is derived from the ledger on every read,
//! and every funding request writes a ledger entry plus a notification in one
//! database transaction.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use centace_core::funding::{
    validate_amount, validate_payment_method, validate_reference, FundingKind,
};
use centace_core::ledger::{TransactionStatus, TransactionType};
use centace_core::types::Money;
use centace_db::models::transaction::{Transaction, TransactionFilter, WalletBalance};
use centace_db::repositories::TransactionRepo;
use centace_events::PlatformEvent;
use serde::Deserialize;

use super::publish_notification;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for `POST /wallet/deposits`.
///
/// `amount` is optional at the type level so a missing amount is reported
/// as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Option<Money>,
    pub payment_method: String,
    /// External payment reference; generated when absent.
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: Option<Money>,
    pub payment_method: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/wallet/balance
pub async fn balance(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<WalletBalance>>> {
    let balance = TransactionRepo::balance(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: WalletBalance {
            user_id: auth.user_id,
            balance,
        },
    }))
}

/// GET /api/v1/wallet/transactions
pub async fn transactions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> AppResult<Json<DataResponse<Vec<Transaction>>>> {
    if let Some(tx_type) = &filter.tx_type {
        TransactionType::from_str(tx_type)?;
    }
    if let Some(status) = &filter.status {
        TransactionStatus::from_str(status)?;
    }
    let transactions = TransactionRepo::list_for_user(&state.pool, auth.user_id, &filter).await?;
    Ok(Json(DataResponse { data: transactions }))
}

/// POST /api/v1/wallet/deposits
pub async fn deposit(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<DepositRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Transaction>>)> {
    let Json(input) = body?;
    let amount = validate_amount(
        input.amount,
        FundingKind::Deposit,
        &state.config.funding_limits,
    )?;
    validate_payment_method(&input.payment_method)?;
    let reference = input.reference.as_deref().map(str::trim);
    validate_reference(reference)?;

    let outcome = TransactionRepo::deposit(
        &state.pool,
        auth.user_id,
        amount,
        &input.payment_method,
        reference,
    )
    .await?;

    publish_notification(
        &state,
        PlatformEvent::notification_inserted,
        &outcome.notification,
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: outcome.transaction,
        }),
    ))
}

/// POST /api/v1/wallet/withdrawals
///
/// Creates a pending withdrawal. Pending withdrawals already count against
/// the balance, so they cannot be spent twice.
pub async fn withdraw(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<WithdrawalRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<Transaction>>)> {
    let Json(input) = body?;
    let amount = validate_amount(
        input.amount,
        FundingKind::Withdrawal,
        &state.config.funding_limits,
    )?;
    validate_payment_method(&input.payment_method)?;

    let outcome =
        TransactionRepo::withdraw(&state.pool, auth.user_id, amount, &input.payment_method)
            .await?;

    publish_notification(
        &state,
        PlatformEvent::notification_inserted,
        &outcome.notification,
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: outcome.transaction,
        }),
    ))
}
