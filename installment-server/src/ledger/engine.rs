//! Ledger Engine
//!
//! Pure functions over a sale's agreed total, its down payment and its
//! current payment set:
//!
//! ```text
//! total_paid        = down_payment + Σ payments.amount
//! remaining_balance = total - total_paid
//! ```
//!
//! Nothing here touches the database. A negative remaining balance is a
//! legal result (it signals over-collection); the mutation checks below are
//! what keep it from happening.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{InstallmentPayment, InstallmentSale, LedgerSummary, SaleStatus};
use thiserror::Error;

use super::money::{sum_amounts, to_f64, to_money, try_money};

/// Payment rejected by the ledger rules
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("payment amount must be greater than zero, got {0}")]
    InvalidAmount(f64),

    #[error("payment amount {amount} exceeds the remaining balance {remaining}")]
    ExceedsBalance { amount: f64, remaining: f64 },
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidAmount(amount) => {
                AppError::with_message(ErrorCode::PaymentInvalidAmount, err.to_string())
                    .with_detail("amount", amount)
            }
            LedgerError::ExceedsBalance { amount, remaining } => {
                AppError::new(ErrorCode::PaymentExceedsBalance)
                    .with_detail("amount", amount)
                    .with_detail("remaining_balance", remaining)
            }
        }
    }
}

/// Which payment mutation just happened
///
/// Decides which status transitions are allowed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new payment can only close the sale
    Add,
    /// An edit can move the balance either way
    Update,
    /// A removal can only reopen the sale
    Delete,
}

/// `down_payment + Σ amounts`
pub fn total_paid<I>(down_payment: f64, amounts: I) -> Decimal
where
    I: IntoIterator<Item = f64>,
{
    to_money(down_payment) + sum_amounts(amounts)
}

/// `total - total_paid`
pub fn remaining_balance<I>(total: f64, down_payment: f64, amounts: I) -> Decimal
where
    I: IntoIterator<Item = f64>,
{
    to_money(total) - total_paid(down_payment, amounts)
}

/// Remaining balance of a sale given its payment rows
pub fn sale_remaining(sale: &InstallmentSale, payments: &[InstallmentPayment]) -> Decimal {
    remaining_balance(sale.total, sale.down_payment, payments.iter().map(|p| p.amount))
}

/// Remaining balance with one payment left out of the sum
///
/// Used when editing a payment: the new amount replaces the old one.
pub fn remaining_excluding(
    sale: &InstallmentSale,
    payments: &[InstallmentPayment],
    excluded_payment_id: i64,
) -> Decimal {
    remaining_balance(
        sale.total,
        sale.down_payment,
        payments
            .iter()
            .filter(|p| p.id != excluded_payment_id)
            .map(|p| p.amount),
    )
}

/// Derived ledger figures for a read view
pub fn summarize(sale: &InstallmentSale, payments: &[InstallmentPayment]) -> LedgerSummary {
    let paid = total_paid(sale.down_payment, payments.iter().map(|p| p.amount));
    LedgerSummary {
        total_paid: to_f64(paid),
        remaining_balance: to_f64(to_money(sale.total) - paid),
        payments_count: payments.len() as i64,
    }
}

/// A payment amount must be a representable number of at least one cent
pub fn validate_amount(amount: f64) -> Result<Decimal, LedgerError> {
    match try_money(amount) {
        Some(amount_dec) if amount_dec > Decimal::ZERO => Ok(amount_dec),
        _ => Err(LedgerError::InvalidAmount(amount)),
    }
}

/// Validate a payment amount against the balance it may consume
///
/// Returns the amount rounded to cents. The comparison is exact: paying
/// the remaining balance to the cent is allowed, one cent more is not.
pub fn check_payment(amount: f64, remaining: Decimal) -> Result<Decimal, LedgerError> {
    let amount_dec = validate_amount(amount)?;
    if amount_dec > remaining {
        return Err(LedgerError::ExceedsBalance {
            amount: to_f64(amount_dec),
            remaining: to_f64(remaining),
        });
    }
    Ok(amount_dec)
}

/// Status of a sale after a payment mutation, given the new remaining balance
pub fn reconcile_status(
    current: SaleStatus,
    remaining: Decimal,
    transition: Transition,
) -> SaleStatus {
    let settled = remaining <= Decimal::ZERO;
    match transition {
        Transition::Add if settled => SaleStatus::Completed,
        Transition::Delete if !settled && current == SaleStatus::Completed => SaleStatus::Active,
        Transition::Update if settled => SaleStatus::Completed,
        Transition::Update if current == SaleStatus::Completed => SaleStatus::Active,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PricingMode;

    fn sale(total: f64, down_payment: f64) -> InstallmentSale {
        InstallmentSale {
            id: 1,
            product_id: 1,
            customer_id: 1,
            salesman_id: None,
            pricing_mode: PricingMode::FlatProfit,
            price: total,
            profit: 0.0,
            interest_rate: None,
            total,
            down_payment,
            monthly_installment: 0.0,
            duration: 1,
            status: SaleStatus::Active,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn payment(id: i64, amount: f64) -> InstallmentPayment {
        InstallmentPayment {
            id,
            installment_sale_id: 1,
            amount,
            paid_at: "2024-01-01".into(),
            note: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_summary_without_payments() {
        let summary = summarize(&sale(1000.0, 200.0), &[]);
        assert_eq!(summary.total_paid, 200.0);
        assert_eq!(summary.remaining_balance, 800.0);
        assert_eq!(summary.payments_count, 0);
    }

    #[test]
    fn test_summary_with_payments() {
        let payments = [payment(1, 300.0), payment(2, 150.25)];
        let summary = summarize(&sale(1000.0, 200.0), &payments);
        assert_eq!(summary.total_paid, 650.25);
        assert_eq!(summary.remaining_balance, 349.75);
        assert_eq!(summary.payments_count, 2);
    }

    #[test]
    fn test_over_collection_is_negative_not_error() {
        let summary = summarize(&sale(100.0, 0.0), &[payment(1, 120.0)]);
        assert_eq!(summary.remaining_balance, -20.0);
    }

    #[test]
    fn test_cents_do_not_drift() {
        let payments: Vec<_> = (1..=3).map(|i| payment(i, 33.33)).collect();
        let remaining = sale_remaining(&sale(100.0, 0.01), &payments);
        assert_eq!(remaining, Decimal::ZERO);
    }

    #[test]
    fn test_remaining_excluding_edited_payment() {
        let payments = [payment(1, 300.0), payment(2, 500.0)];
        let s = sale(1000.0, 200.0);
        assert_eq!(to_f64(remaining_excluding(&s, &payments, 2)), 500.0);
        assert_eq!(to_f64(remaining_excluding(&s, &payments, 99)), 0.0);
    }

    #[test]
    fn test_check_payment_rejects_non_positive() {
        let remaining = Decimal::new(500, 0);
        assert_eq!(
            check_payment(0.0, remaining),
            Err(LedgerError::InvalidAmount(0.0))
        );
        assert!(matches!(
            check_payment(-5.0, remaining),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            check_payment(f64::NAN, remaining),
            Err(LedgerError::InvalidAmount(_))
        ));
        // rounds to 0.00
        assert!(matches!(
            check_payment(0.001, remaining),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_validate_amount_rejects_unrepresentable() {
        assert_eq!(validate_amount(1e29), Err(LedgerError::InvalidAmount(1e29)));
        assert_eq!(
            validate_amount(f64::MAX),
            Err(LedgerError::InvalidAmount(f64::MAX))
        );
        assert!(matches!(
            validate_amount(f64::INFINITY),
            Err(LedgerError::InvalidAmount(_))
        ));
        // too large is rejected, not treated as zero and not as an overpayment
        let err: AppError = check_payment(1e29, Decimal::new(500, 0)).unwrap_err().into();
        assert_eq!(err.code, ErrorCode::PaymentInvalidAmount);
    }

    #[test]
    fn test_check_payment_exact_balance_allowed() {
        let remaining = Decimal::new(500, 0);
        assert_eq!(check_payment(500.0, remaining), Ok(Decimal::new(500, 0)));
        assert_eq!(
            check_payment(500.01, remaining),
            Err(LedgerError::ExceedsBalance {
                amount: 500.01,
                remaining: 500.0
            })
        );
    }

    #[test]
    fn test_check_payment_overpayment_maps_to_422_code() {
        let err: AppError = check_payment(600.0, Decimal::new(500, 0))
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::PaymentExceedsBalance);
        assert_eq!(err.details.unwrap()["remaining_balance"], 500.0);
    }

    #[test]
    fn test_reconcile_add_only_completes() {
        use SaleStatus::*;
        assert_eq!(reconcile_status(Active, Decimal::ZERO, Transition::Add), Completed);
        assert_eq!(reconcile_status(Active, Decimal::ONE, Transition::Add), Active);
        assert_eq!(
            reconcile_status(Completed, Decimal::ONE, Transition::Add),
            Completed
        );
    }

    #[test]
    fn test_reconcile_delete_only_reopens() {
        use SaleStatus::*;
        assert_eq!(
            reconcile_status(Completed, Decimal::ONE, Transition::Delete),
            Active
        );
        assert_eq!(
            reconcile_status(Active, Decimal::ZERO, Transition::Delete),
            Active
        );
        assert_eq!(
            reconcile_status(Completed, Decimal::ZERO, Transition::Delete),
            Completed
        );
    }

    #[test]
    fn test_reconcile_update_moves_both_ways() {
        use SaleStatus::*;
        assert_eq!(
            reconcile_status(Active, Decimal::ZERO, Transition::Update),
            Completed
        );
        assert_eq!(
            reconcile_status(Completed, Decimal::ONE, Transition::Update),
            Active
        );
        assert_eq!(
            reconcile_status(Active, Decimal::ONE, Transition::Update),
            Active
        );
    }
}
