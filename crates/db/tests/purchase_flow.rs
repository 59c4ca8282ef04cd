//! Integration tests for the wallet and share purchase flows.
//!
//! Exercises the transactional repositories against a real database:
//! - Deposits credit the derived balance
//! - Withdrawals above the balance write nothing
//! - Purchases debit the wallet, reserve shares, and notify
//! - Insufficient funds roll back the share reservation
//! - Idempotent replays never buy twice
//! - Concurrent buyers never oversell a project
//! - Concurrent wallet debits never overdraw the balance

use assert_matches::assert_matches;
use centace_core::error::CoreError;
use centace_core::project::{STATUS_ACTIVE, STATUS_DRAFT, STATUS_FUNDED};
use centace_core::types::{DbId, Money};
use centace_db::models::investment::{PurchaseInput, PurchaseOutcome};
use centace_db::models::project::CreateProject;
use centace_db::models::user::CreateUser;
use centace_db::repositories::{
    InvestmentRepo, NotificationRepo, ProjectRepo, TransactionRepo, UserRepo,
};
use centace_db::DbError;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

async fn new_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role: "investor".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn new_project(pool: &PgPool, price: &str, shares: i32, status: &str) -> DbId {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Cocoa Farm".to_string(),
            description: None,
            category: "agriculture".to_string(),
            price_per_share: money(price),
            total_shares: shares,
            available_shares: None,
            status: Some(status.to_string()),
            tier: None,
            location: "Kumasi".to_string(),
            expected_return_pct: None,
            duration_months: None,
            funding_deadline: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn fund(pool: &PgPool, user_id: DbId, amount: &str) {
    TransactionRepo::deposit(pool, user_id, money(amount), "card", None)
        .await
        .unwrap();
}

async fn count_rows(pool: &PgPool, table: &str, user_id: DbId) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1"))
        .bind(user_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

fn buy(project_id: DbId, shares: i32, key: Option<&str>) -> PurchaseInput {
    PurchaseInput {
        project_id,
        shares,
        idempotency_key: key.map(str::to_string),
    }
}

// ---------------------------------------------------------------------------
// Funding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deposit_credits_balance_and_notifies(pool: PgPool) {
    let user = new_user(&pool, "ama").await;

    let outcome = TransactionRepo::deposit(&pool, user, money("150.00"), "bank_transfer", None)
        .await
        .unwrap();

    assert_eq!(outcome.transaction.status, "completed");
    assert!(outcome.transaction.reference.starts_with("DEP-"));
    assert_eq!(outcome.notification.notification_type, "deposit");
    assert_eq!(
        TransactionRepo::balance(&pool, user).await.unwrap(),
        money("150.00")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_deposit_reference_is_rejected(pool: PgPool) {
    let user = new_user(&pool, "kofi").await;
    TransactionRepo::deposit(&pool, user, money("50"), "card", Some("BANK-1"))
        .await
        .unwrap();

    let err = TransactionRepo::deposit(&pool, user, money("50"), "card", Some("BANK-1"))
        .await
        .unwrap_err();

    assert_matches!(err, DbError::Sqlx(sqlx::Error::Database(_)));
    assert_eq!(
        TransactionRepo::balance(&pool, user).await.unwrap(),
        money("50")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn withdrawal_over_balance_writes_nothing(pool: PgPool) {
    let user = new_user(&pool, "esi").await;
    fund(&pool, user, "100").await;

    let err = TransactionRepo::withdraw(&pool, user, money("100.01"), "bank_transfer")
        .await
        .unwrap_err();

    assert_matches!(err, DbError::Core(CoreError::InsufficientFunds { .. }));
    assert_eq!(count_rows(&pool, "transactions", user).await, 1);
    assert_eq!(count_rows(&pool, "notifications", user).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pending_withdrawal_reserves_funds(pool: PgPool) {
    let user = new_user(&pool, "yaw").await;
    fund(&pool, user, "100").await;

    let outcome = TransactionRepo::withdraw(&pool, user, money("60"), "mobile_money")
        .await
        .unwrap();

    assert_eq!(outcome.transaction.status, "pending");
    assert!(outcome.transaction.reference.starts_with("WDR-"));
    assert_eq!(TransactionRepo::balance(&pool, user).await.unwrap(), money("40"));

    let second = TransactionRepo::withdraw(&pool, user, money("60"), "mobile_money").await;
    assert_matches!(second, Err(DbError::Core(CoreError::InsufficientFunds { .. })));
}

// ---------------------------------------------------------------------------
// Purchases
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn purchase_debits_wallet_and_reserves_shares(pool: PgPool) {
    let user = new_user(&pool, "abena").await;
    let project = new_project(&pool, "10.00", 100, STATUS_ACTIVE).await;
    fund(&pool, user, "1000").await;

    let outcome = InvestmentRepo::purchase(&pool, user, &buy(project, 5, None))
        .await
        .unwrap();

    let PurchaseOutcome::Created(purchase) = outcome else {
        panic!("expected a new purchase");
    };
    assert_eq!(purchase.investment.amount, money("50.00"));
    assert_eq!(purchase.investment.fees, money("2.50"));
    assert_eq!(purchase.investment.total, money("52.50"));
    assert_eq!(purchase.transaction.tx_type, "investment");
    assert_eq!(purchase.transaction.related_investment_id, Some(purchase.investment.id));
    assert_eq!(purchase.notification.notification_type, "investment");
    assert_eq!(purchase.project.available_shares, 95);

    assert_eq!(
        TransactionRepo::balance(&pool, user).await.unwrap(),
        money("947.50")
    );
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn buying_the_last_shares_marks_project_funded(pool: PgPool) {
    let user = new_user(&pool, "kwame").await;
    let project = new_project(&pool, "1.00", 3, STATUS_ACTIVE).await;
    fund(&pool, user, "100").await;

    InvestmentRepo::purchase(&pool, user, &buy(project, 3, None))
        .await
        .unwrap();

    let row = ProjectRepo::find_by_id(&pool, project).await.unwrap().unwrap();
    assert_eq!(row.available_shares, 0);
    assert_eq!(row.status, STATUS_FUNDED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insufficient_funds_rolls_back_everything(pool: PgPool) {
    let user = new_user(&pool, "efua").await;
    let project = new_project(&pool, "10.00", 100, STATUS_ACTIVE).await;
    fund(&pool, user, "52.49").await;

    let err = InvestmentRepo::purchase(&pool, user, &buy(project, 5, None))
        .await
        .unwrap_err();

    assert_matches!(err, DbError::Core(CoreError::InsufficientFunds { .. }));
    let row = ProjectRepo::find_by_id(&pool, project).await.unwrap().unwrap();
    assert_eq!(row.available_shares, 100);
    assert_eq!(count_rows(&pool, "investments", user).await, 0);
    assert_eq!(count_rows(&pool, "transactions", user).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn purchase_rejects_inactive_and_missing_projects(pool: PgPool) {
    let user = new_user(&pool, "akosua").await;
    let draft = new_project(&pool, "10.00", 10, STATUS_DRAFT).await;
    fund(&pool, user, "1000").await;

    assert_matches!(
        InvestmentRepo::purchase(&pool, user, &buy(draft, 1, None)).await,
        Err(DbError::Core(CoreError::Conflict(_)))
    );
    assert_matches!(
        InvestmentRepo::purchase(&pool, user, &buy(999_999, 1, None)).await,
        Err(DbError::Core(CoreError::NotFound { entity: "Project", .. }))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn purchase_over_availability_is_rejected(pool: PgPool) {
    let user = new_user(&pool, "adwoa").await;
    let project = new_project(&pool, "1.00", 5, STATUS_ACTIVE).await;
    fund(&pool, user, "1000").await;

    let err = InvestmentRepo::purchase(&pool, user, &buy(project, 6, None))
        .await
        .unwrap_err();

    assert_matches!(
        err,
        DbError::Core(CoreError::InsufficientShares {
            requested: 6,
            available: 5
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn replayed_key_does_not_buy_twice(pool: PgPool) {
    let user = new_user(&pool, "nana").await;
    let project = new_project(&pool, "10.00", 100, STATUS_ACTIVE).await;
    fund(&pool, user, "1000").await;
    let input = buy(project, 4, Some("checkout-42"));

    let first = InvestmentRepo::purchase(&pool, user, &input).await.unwrap();
    let second = InvestmentRepo::purchase(&pool, user, &input).await.unwrap();

    assert_matches!(first, PurchaseOutcome::Created(_));
    assert_matches!(second, PurchaseOutcome::Replayed(_));
    assert_eq!(first.investment().id, second.investment().id);

    let row = ProjectRepo::find_by_id(&pool, project).await.unwrap().unwrap();
    assert_eq!(row.available_shares, 96);
    assert_eq!(count_rows(&pool, "investments", user).await, 1);
    assert_eq!(
        TransactionRepo::balance(&pool, user).await.unwrap(),
        money("958.00")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_purchases_never_oversell(pool: PgPool) {
    const INITIAL: i32 = 10;
    const PER_PURCHASE: i32 = 3;

    let project = new_project(&pool, "1.00", INITIAL, STATUS_ACTIVE).await;
    let mut buyers = Vec::new();
    for i in 0..8 {
        let user = new_user(&pool, &format!("buyer{i}")).await;
        fund(&pool, user, "100").await;
        buyers.push(user);
    }

    let tasks = buyers.into_iter().map(|user| {
        let pool = pool.clone();
        tokio::spawn(async move {
            InvestmentRepo::purchase(&pool, user, &buy(project, PER_PURCHASE, None)).await
        })
    });
    let results = futures::future::join_all(tasks).await;

    let succeeded = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(PurchaseOutcome::Created(_)))))
        .count() as i32;
    for result in &results {
        match result {
            Ok(Ok(_)) => {}
            Ok(Err(DbError::Core(CoreError::InsufficientShares { .. })))
            | Ok(Err(DbError::Core(CoreError::Conflict(_)))) => {}
            other => panic!("unexpected purchase result: {other:?}"),
        }
    }

    let row = ProjectRepo::find_by_id(&pool, project).await.unwrap().unwrap();
    assert!(row.available_shares >= 0);
    assert_eq!(succeeded, INITIAL / PER_PURCHASE);
    assert_eq!(row.available_shares, INITIAL - succeeded * PER_PURCHASE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_withdrawals_never_overdraw(pool: PgPool) {
    let user = new_user(&pool, "kojo").await;
    fund(&pool, user, "100").await;

    let tasks = (0..6).map(|_| {
        let pool = pool.clone();
        tokio::spawn(async move {
            TransactionRepo::withdraw(&pool, user, money("60"), "bank_transfer").await
        })
    });
    let results = futures::future::join_all(tasks).await;

    let succeeded = results.iter().filter(|r| matches!(r, Ok(Ok(_)))).count();
    for result in &results {
        match result {
            Ok(Ok(_)) | Ok(Err(DbError::Core(CoreError::InsufficientFunds { .. }))) => {}
            other => panic!("unexpected withdrawal result: {other:?}"),
        }
    }

    assert_eq!(succeeded, 1);
    assert_eq!(TransactionRepo::balance(&pool, user).await.unwrap(), money("40"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn withdrawal_racing_purchase_cannot_double_spend(pool: PgPool) {
    // 50 shares at 1.00 cost 52.50 with fees; both together need 112.50.
    let user = new_user(&pool, "adjoa").await;
    let project = new_project(&pool, "1.00", 100, STATUS_ACTIVE).await;
    fund(&pool, user, "100").await;

    let withdrawal = tokio::spawn({
        let pool = pool.clone();
        async move { TransactionRepo::withdraw(&pool, user, money("60"), "card").await }
    });
    let purchase = tokio::spawn({
        let pool = pool.clone();
        async move { InvestmentRepo::purchase(&pool, user, &buy(project, 50, None)).await }
    });
    let (withdrawal, purchase) = (withdrawal.await.unwrap(), purchase.await.unwrap());

    assert!(
        withdrawal.is_ok() ^ purchase.is_ok(),
        "exactly one must succeed: withdrawal={withdrawal:?} purchase={purchase:?}"
    );
    if let Err(err) = &withdrawal {
        assert_matches!(err, DbError::Core(CoreError::InsufficientFunds { .. }));
    }
    if let Err(err) = &purchase {
        assert_matches!(err, DbError::Core(CoreError::InsufficientFunds { .. }));
    }

    let balance = TransactionRepo::balance(&pool, user).await.unwrap();
    assert!(balance >= Money::ZERO);
    let remaining = ProjectRepo::find_by_id(&pool, project)
        .await
        .unwrap()
        .unwrap()
        .available_shares;
    if purchase.is_ok() {
        assert_eq!(balance, money("47.50"));
        assert_eq!(remaining, 50);
    } else {
        assert_eq!(balance, money("40"));
        assert_eq!(remaining, 100);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn portfolio_lists_purchases_with_project_details(pool: PgPool) {
    let user = new_user(&pool, "kojo").await;
    let project = new_project(&pool, "2.00", 50, STATUS_ACTIVE).await;
    fund(&pool, user, "500").await;
    InvestmentRepo::purchase(&pool, user, &buy(project, 2, None))
        .await
        .unwrap();
    InvestmentRepo::purchase(&pool, user, &buy(project, 3, None))
        .await
        .unwrap();

    let portfolio = InvestmentRepo::list_for_user(&pool, user, 50, 0).await.unwrap();
    assert_eq!(portfolio.len(), 2);
    assert_eq!(portfolio[0].shares, 3);
    assert_eq!(portfolio[0].project_name, "Cocoa Farm");

    let summary = InvestmentRepo::portfolio_summary(&pool, user).await.unwrap();
    assert_eq!(summary.active_investments, 2);
    assert_eq!(summary.projects_backed, 1);
    assert_eq!(summary.total_invested, money("10.50"));
}
