//! Pricing strategy
//!
//! One configurable formula per [`PricingStrategy`] variant. The server
//! always recomputes the total from price and markup; a total sent by the
//! client is only cross-checked.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{PricingMode, PricingStrategy, SaleStatus, SaleTerms};
use thiserror::Error;

use super::engine::{self, Transition};
use super::money::{MONEY_TOLERANCE, round_money, to_f64, try_decimal, try_money};

/// Sale terms rejected by the pricing rules
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} is too large")]
    OutOfRange { field: &'static str },

    #[error("down_payment {down_payment} must be between 0 and the total {total}")]
    DownPaymentOutOfRange { down_payment: f64, total: f64 },

    #[error("duration must be at least 1 month, got {0}")]
    InvalidDuration(i64),

    #[error("submitted total {submitted} does not match the computed total {computed}")]
    TotalMismatch { submitted: f64, computed: f64 },
}

impl PricingError {
    /// Name of the offending term
    pub fn field(&self) -> &'static str {
        match self {
            PricingError::NotFinite { field }
            | PricingError::Negative { field, .. }
            | PricingError::OutOfRange { field } => field,
            PricingError::DownPaymentOutOfRange { .. } => "down_payment",
            PricingError::InvalidDuration(_) => "duration",
            PricingError::TotalMismatch { .. } => "total",
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::TotalMismatch {
                submitted,
                computed,
            } => AppError::with_message(ErrorCode::SaleTermsMismatch, err.to_string())
                .with_detail("submitted_total", submitted)
                .with_detail("computed_total", computed),
            _ => AppError::with_message(ErrorCode::ValueOutOfRange, err.to_string())
                .with_detail("field", err.field()),
        }
    }
}

/// Fully priced sale terms, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct SaleQuote {
    pub mode: PricingMode,
    pub price: f64,
    /// Markup amount: the flat profit, or the interest computed from the rate
    pub profit: f64,
    pub interest_rate: Option<f64>,
    pub total: f64,
    pub down_payment: f64,
    pub monthly_installment: f64,
    pub duration: i64,
    /// Completed when the down payment already covers the total
    pub status: SaleStatus,
}

fn finite(field: &'static str, value: f64) -> Result<f64, PricingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PricingError::NotFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<Decimal, PricingError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(PricingError::Negative { field, value });
    }
    try_money(value).ok_or(PricingError::OutOfRange { field })
}

/// Markup produced by a strategy on a given price
pub fn markup(price: Decimal, strategy: &PricingStrategy) -> Result<Decimal, PricingError> {
    match *strategy {
        PricingStrategy::FlatProfit { profit } => non_negative("profit", profit),
        PricingStrategy::InterestRate { rate_percent } => {
            let rate = finite("interest_rate", rate_percent)?;
            if rate < 0.0 {
                return Err(PricingError::Negative {
                    field: "interest_rate",
                    value: rate,
                });
            }
            let out_of_range = PricingError::OutOfRange {
                field: "interest_rate",
            };
            let rate = try_decimal(rate).ok_or(out_of_range.clone())?;
            price
                .checked_mul(rate)
                .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
                .map(round_money)
                .ok_or(out_of_range)
        }
    }
}

/// `round2((total - down_payment) / duration)`
pub fn monthly_installment(total: Decimal, down_payment: Decimal, duration: i64) -> Decimal {
    if duration < 1 {
        return Decimal::ZERO;
    }
    round_money((total - down_payment) / Decimal::from(duration))
}

/// Price a sale: validate the terms, compute total and monthly installment
pub fn quote(terms: &SaleTerms) -> Result<SaleQuote, PricingError> {
    let price = non_negative("price", terms.price)?;
    let profit = markup(price, &terms.pricing)?;
    let total = price
        .checked_add(profit)
        .ok_or(PricingError::OutOfRange { field: "total" })?;

    if let Some(submitted) = terms.total {
        let submitted = finite("total", submitted)?;
        let submitted_dec =
            try_money(submitted).ok_or(PricingError::OutOfRange { field: "total" })?;
        let diff = submitted_dec.checked_sub(total);
        if diff.is_none_or(|d| d.abs() > MONEY_TOLERANCE) {
            return Err(PricingError::TotalMismatch {
                submitted,
                computed: to_f64(total),
            });
        }
    }

    let down_payment = non_negative("down_payment", terms.down_payment)?;
    if down_payment > total {
        return Err(PricingError::DownPaymentOutOfRange {
            down_payment: terms.down_payment,
            total: to_f64(total),
        });
    }

    if terms.duration < 1 {
        return Err(PricingError::InvalidDuration(terms.duration));
    }

    let monthly = match terms.monthly_installment {
        Some(m) => non_negative("monthly_installment", m)?,
        None => monthly_installment(total, down_payment, terms.duration),
    };

    let status = engine::reconcile_status(
        SaleStatus::Active,
        total - down_payment,
        Transition::Add,
    );

    let interest_rate = match terms.pricing {
        PricingStrategy::InterestRate { rate_percent } => Some(rate_percent),
        PricingStrategy::FlatProfit { .. } => None,
    };

    Ok(SaleQuote {
        mode: terms.pricing.mode(),
        price: to_f64(price),
        profit: to_f64(profit),
        interest_rate,
        total: to_f64(total),
        down_payment: to_f64(down_payment),
        monthly_installment: to_f64(monthly),
        duration: terms.duration,
        status,
    })
}
