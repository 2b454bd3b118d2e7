//! Payment Mutation Service
//!
//! Each mutation runs in one transaction whose first statement writes the
//! owning sale row. SQLite allows a single writer, so from that point the
//! balance check, the payment write and the status re-evaluation see a
//! payment set no other request can change underneath them.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{InstallmentSale, PaymentInput, PaymentOutcome};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::db::repository::{payment, sale};
use crate::ledger::engine::{self, Transition};
use crate::ledger::money::to_f64;
use crate::utils::validation::validate_payload;

pub const PAYMENT_RECORDED: &str = "Payment recorded successfully";
pub const PAYMENT_UPDATED: &str = "Payment updated successfully";
pub const PAYMENT_DELETED: &str = "Payment deleted successfully";

fn sale_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::SaleNotFound).with_detail("id", id)
}

fn payment_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::PaymentNotFound).with_detail("id", id)
}

async fn begin(pool: &SqlitePool) -> AppResult<Transaction<'static, Sqlite>> {
    pool.begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))
}

async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))
}

/// Re-read the payment set, settle the status and build the response
async fn settle(
    conn: &mut SqliteConnection,
    row: InstallmentSale,
    transition: Transition,
    message: &str,
    written: Option<shared::models::InstallmentPayment>,
) -> AppResult<PaymentOutcome> {
    let payments = payment::find_by_sale(&mut *conn, row.id).await?;
    let remaining = engine::sale_remaining(&row, &payments);
    let status = engine::reconcile_status(row.status, remaining, transition);

    if status != row.status {
        sale::update_status(&mut *conn, row.id, status).await?;
        tracing::info!(
            sale_id = row.id,
            from = %row.status,
            to = %status,
            "Installment sale status changed"
        );
    }

    Ok(PaymentOutcome {
        message: message.to_string(),
        payment: written,
        status,
        ledger: engine::summarize(&row, &payments),
    })
}

/// Record a new payment against a sale
///
/// Rejected when the amount is not positive or exceeds the remaining
/// balance computed from the current payment set.
pub async fn add_payment(
    pool: &SqlitePool,
    sale_id: i64,
    input: &PaymentInput,
) -> AppResult<PaymentOutcome> {
    validate_payload(input)?;
    engine::validate_amount(input.amount)?;

    let mut tx = begin(pool).await?;

    if !sale::touch(&mut *tx, sale_id).await? {
        return Err(sale_not_found(sale_id));
    }
    let row = sale::find_by_id(&mut *tx, sale_id)
        .await?
        .ok_or_else(|| sale_not_found(sale_id))?;

    let payments = payment::find_by_sale(&mut *tx, sale_id).await?;
    let remaining = engine::sale_remaining(&row, &payments);
    let amount = match engine::check_payment(input.amount, remaining) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(sale_id, amount = input.amount, remaining = %remaining, "Payment rejected: {}", e);
            return Err(e.into());
        }
    };

    let created = payment::create(
        &mut *tx,
        sale_id,
        to_f64(amount),
        &shared::util::today(),
        input.notes.as_deref(),
    )
    .await?;

    let outcome = settle(&mut tx, row, Transition::Add, PAYMENT_RECORDED, Some(created)).await?;
    commit(tx).await?;

    tracing::info!(
        sale_id,
        amount = to_f64(amount),
        remaining_balance = outcome.ledger.remaining_balance,
        "Installment payment recorded"
    );
    Ok(outcome)
}

/// Change amount and note of an existing payment
///
/// The new amount is checked against the balance computed without the
/// payment being edited.
pub async fn update_payment(
    pool: &SqlitePool,
    payment_id: i64,
    input: &PaymentInput,
) -> AppResult<PaymentOutcome> {
    validate_payload(input)?;
    engine::validate_amount(input.amount)?;

    let mut tx = begin(pool).await?;

    if !sale::touch_by_payment(&mut *tx, payment_id).await? {
        return Err(payment_not_found(payment_id));
    }
    let existing = payment::find_by_id(&mut *tx, payment_id)
        .await?
        .ok_or_else(|| payment_not_found(payment_id))?;
    let sale_id = existing.installment_sale_id;
    let row = sale::find_by_id(&mut *tx, sale_id)
        .await?
        .ok_or_else(|| sale_not_found(sale_id))?;

    let payments = payment::find_by_sale(&mut *tx, sale_id).await?;
    let remaining = engine::remaining_excluding(&row, &payments, payment_id);
    let amount = match engine::check_payment(input.amount, remaining) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(payment_id, amount = input.amount, remaining = %remaining, "Payment update rejected: {}", e);
            return Err(e.into());
        }
    };

    let updated = payment::update(&mut *tx, payment_id, to_f64(amount), input.notes.as_deref())
        .await?
        .ok_or_else(|| payment_not_found(payment_id))?;

    let outcome = settle(&mut tx, row, Transition::Update, PAYMENT_UPDATED, Some(updated)).await?;
    commit(tx).await?;

    tracing::info!(
        sale_id,
        payment_id,
        old_amount = existing.amount,
        new_amount = to_f64(amount),
        "Installment payment updated"
    );
    Ok(outcome)
}

/// Remove a payment; may reopen a completed sale
pub async fn delete_payment(pool: &SqlitePool, payment_id: i64) -> AppResult<PaymentOutcome> {
    let mut tx = begin(pool).await?;

    if !sale::touch_by_payment(&mut *tx, payment_id).await? {
        return Err(payment_not_found(payment_id));
    }
    let existing = payment::find_by_id(&mut *tx, payment_id)
        .await?
        .ok_or_else(|| payment_not_found(payment_id))?;
    let sale_id = existing.installment_sale_id;
    let row = sale::find_by_id(&mut *tx, sale_id)
        .await?
        .ok_or_else(|| sale_not_found(sale_id))?;

    if !payment::delete(&mut *tx, payment_id).await? {
        return Err(payment_not_found(payment_id));
    }

    let outcome = settle(&mut tx, row, Transition::Delete, PAYMENT_DELETED, None).await?;
    commit(tx).await?;

    tracing::info!(
        sale_id,
        payment_id,
        amount = existing.amount,
        "Installment payment deleted"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{customer, product};
    use crate::ledger::SaleQuote;
    use shared::models::{CustomerInput, PricingMode, ProductCreate, SaleStatus};

    /// Sale with total 1000 and down payment 200
    async fn setup() -> (SqlitePool, i64) {
        let db = DbService::open_in_memory().await.unwrap();
        let pool = db.pool;
        let p = product::create(
            &pool,
            &ProductCreate {
                name: "LED TV".into(),
                price: 900.0,
            },
        )
        .await
        .unwrap();
        let c = customer::upsert(
            &pool,
            &CustomerInput {
                name: "Sana".into(),
                address: None,
                phone: "0311-0000000".into(),
                cnic: "35201-0000000-0".into(),
            },
            None,
        )
        .await
        .unwrap();
        let quote = SaleQuote {
            mode: PricingMode::FlatProfit,
            price: 900.0,
            profit: 100.0,
            interest_rate: None,
            total: 1000.0,
            down_payment: 200.0,
            monthly_installment: 80.0,
            duration: 10,
            status: SaleStatus::Active,
        };
        let s = sale::create(&pool, p.id, c.id, &quote).await.unwrap();
        (pool, s.id)
    }

    fn input(amount: f64) -> PaymentInput {
        PaymentInput {
            amount,
            notes: None,
        }
    }

    async fn status(pool: &SqlitePool, sale_id: i64) -> SaleStatus {
        sale::find_by_id(pool, sale_id).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn test_add_complete_then_delete_reopens() {
        let (pool, sale_id) = setup().await;

        let first = add_payment(&pool, sale_id, &input(300.0)).await.unwrap();
        assert_eq!(first.message, PAYMENT_RECORDED);
        assert_eq!(first.ledger.remaining_balance, 500.0);
        assert_eq!(first.status, SaleStatus::Active);

        let second = add_payment(&pool, sale_id, &input(500.0)).await.unwrap();
        assert_eq!(second.ledger.remaining_balance, 0.0);
        assert_eq!(second.ledger.payments_count, 2);
        assert_eq!(second.status, SaleStatus::Completed);
        assert_eq!(status(&pool, sale_id).await, SaleStatus::Completed);

        let second_id = second.payment.unwrap().id;
        let deleted = delete_payment(&pool, second_id).await.unwrap();
        assert_eq!(deleted.message, PAYMENT_DELETED);
        assert!(deleted.payment.is_none());
        assert_eq!(deleted.ledger.remaining_balance, 500.0);
        assert_eq!(deleted.status, SaleStatus::Active);
        assert_eq!(status(&pool, sale_id).await, SaleStatus::Active);
    }

    #[tokio::test]
    async fn test_overpayment_leaves_state_unchanged() {
        let (pool, sale_id) = setup().await;
        add_payment(&pool, sale_id, &input(300.0)).await.unwrap();

        let err = add_payment(&pool, sale_id, &input(600.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentExceedsBalance);
        assert_eq!(
            err.message,
            "Payment amount cannot exceed the remaining balance"
        );

        let payments = payment::find_by_sale(&pool, sale_id).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(status(&pool, sale_id).await, SaleStatus::Active);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let (pool, sale_id) = setup().await;
        let err = add_payment(&pool, sale_id, &input(0.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);
        let err = add_payment(&pool, sale_id, &input(-10.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);
        assert!(payment::find_by_sale(&pool, sale_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_to_missing_sale() {
        let (pool, _) = setup().await;
        let err = add_payment(&pool, 777, &input(10.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SaleNotFound);
    }

    #[tokio::test]
    async fn test_notes_are_stored_and_limited() {
        let (pool, sale_id) = setup().await;
        let outcome = add_payment(
            &pool,
            sale_id,
            &PaymentInput {
                amount: 50.0,
                notes: Some("March installment".into()),
            },
        )
        .await
        .unwrap();
        let p = outcome.payment.unwrap();
        assert_eq!(p.note.as_deref(), Some("March installment"));
        assert_eq!(p.paid_at, shared::util::today());

        let err = add_payment(
            &pool,
            sale_id,
            &PaymentInput {
                amount: 50.0,
                notes: Some("x".repeat(256)),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_update_excludes_edited_payment() {
        let (pool, sale_id) = setup().await;
        add_payment(&pool, sale_id, &input(300.0)).await.unwrap();
        let second = add_payment(&pool, sale_id, &input(200.0)).await.unwrap();
        let second_id = second.payment.unwrap().id;

        // others: 300, so up to 500 is allowed for this payment
        let updated = update_payment(&pool, second_id, &input(500.0)).await.unwrap();
        assert_eq!(updated.message, PAYMENT_UPDATED);
        assert_eq!(updated.payment.unwrap().amount, 500.0);
        assert_eq!(updated.ledger.remaining_balance, 0.0);
        assert_eq!(updated.status, SaleStatus::Completed);

        let err = update_payment(&pool, second_id, &input(500.01))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentExceedsBalance);
        let p = payment::find_by_id(&pool, second_id).await.unwrap().unwrap();
        assert_eq!(p.amount, 500.0);
    }

    #[tokio::test]
    async fn test_update_can_reopen_completed_sale() {
        let (pool, sale_id) = setup().await;
        let full = add_payment(&pool, sale_id, &input(800.0)).await.unwrap();
        assert_eq!(full.status, SaleStatus::Completed);

        let id = full.payment.unwrap().id;
        let reduced = update_payment(&pool, id, &input(700.0)).await.unwrap();
        assert_eq!(reduced.status, SaleStatus::Active);
        assert_eq!(reduced.ledger.remaining_balance, 100.0);
    }

    #[tokio::test]
    async fn test_missing_payment() {
        let (pool, _) = setup().await;
        let err = update_payment(&pool, 404, &input(1.0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
        let err = delete_payment(&pool, 404).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentNotFound);
    }

    #[tokio::test]
    async fn test_balance_identity_holds_after_mutations() {
        let (pool, sale_id) = setup().await;
        let a = add_payment(&pool, sale_id, &input(120.5)).await.unwrap();
        add_payment(&pool, sale_id, &input(99.99)).await.unwrap();
        update_payment(&pool, a.payment.unwrap().id, &input(10.01))
            .await
            .unwrap();
        let last = add_payment(&pool, sale_id, &input(0.01)).await.unwrap();

        let payments = payment::find_by_sale(&pool, sale_id).await.unwrap();
        let sum: f64 = payments.iter().map(|p| p.amount).sum();
        let expected = 1000.0 - 200.0 - sum;
        assert!((last.ledger.remaining_balance - expected).abs() < 1e-9);
        assert_eq!(last.ledger.remaining_balance, 689.99);
    }
}
