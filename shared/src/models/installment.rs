//! Installment Sale Models
//!
//! Row types for `installment_sale`, `installment_guarantor` and
//! `installment_payment`, the request payloads that create/mutate them, and
//! the read views that carry the derived ledger figures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::{Customer, CustomerInput, Product, Salesman};

/// Unknown enum literal read from the database or a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// =============================================================================
// Status
// =============================================================================

/// Sale lifecycle status
///
/// `Active` until the remaining balance reaches zero, then `Completed`.
/// A deleted payment can move a completed sale back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Active,
    Completed,
}

impl SaleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Active => "active",
            SaleStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SaleStatus::Active),
            "completed" => Ok(SaleStatus::Completed),
            other => Err(UnknownVariant {
                kind: "sale status",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SaleStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// Which formula produced a sale's total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMode {
    FlatProfit,
    InterestRate,
}

impl PricingMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PricingMode::FlatProfit => "flat_profit",
            PricingMode::InterestRate => "interest_rate",
        }
    }
}

impl FromStr for PricingMode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flat_profit" => Ok(PricingMode::FlatProfit),
            "interest_rate" => Ok(PricingMode::InterestRate),
            other => Err(UnknownVariant {
                kind: "pricing mode",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PricingMode {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Pricing strategy selected when the sale is created
///
/// - `FlatProfit`: total = price + profit
/// - `InterestRate`: total = price + price × rate / 100
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingStrategy {
    FlatProfit { profit: f64 },
    InterestRate { rate_percent: f64 },
}

impl PricingStrategy {
    pub fn mode(&self) -> PricingMode {
        match self {
            PricingStrategy::FlatProfit { .. } => PricingMode::FlatProfit,
            PricingStrategy::InterestRate { .. } => PricingMode::InterestRate,
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

/// Installment sale row (分期销售)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InstallmentSale {
    pub id: i64,
    pub product_id: i64,
    pub customer_id: i64,
    pub salesman_id: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub pricing_mode: PricingMode,
    pub price: f64,
    /// Markup amount (flat profit, or the interest computed from the rate)
    pub profit: f64,
    /// Interest rate in percent, only for `InterestRate` pricing
    pub interest_rate: Option<f64>,
    pub total: f64,
    pub down_payment: f64,
    pub monthly_installment: f64,
    /// Duration in months
    pub duration: i64,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: SaleStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Guarantor row, one per sale; descriptive only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InstallmentGuarantor {
    pub id: i64,
    pub installment_sale_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub cnic: Option<String>,
    pub relationship: Option<String>,
    pub created_at: i64,
}

/// Payment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InstallmentPayment {
    pub id: i64,
    pub installment_sale_id: i64,
    pub amount: f64,
    /// Business date of the payment (YYYY-MM-DD), assigned by the server
    pub paid_at: String,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

// =============================================================================
// Payloads
// =============================================================================

/// Guarantor fields submitted with a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuarantorInput {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub cnic: Option<String>,
    pub relationship: Option<String>,
}

/// Commercial terms of a new sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleTerms {
    pub price: f64,
    pub pricing: PricingStrategy,
    /// Client computed total, cross-checked against the pricing strategy
    pub total: Option<f64>,
    pub down_payment: f64,
    /// Client chosen installment; computed from the terms when absent
    pub monthly_installment: Option<f64>,
    pub duration: i64,
}

/// Everything needed to open a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub product_id: i64,
    pub customer: CustomerInput,
    pub guarantor: GuarantorInput,
    pub terms: SaleTerms,
}

/// Body of payment create/update requests
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentInput {
    pub amount: f64,
    #[serde(default)]
    #[validate(length(max = 255, message = "notes must be at most 255 characters"))]
    pub notes: Option<String>,
}

// =============================================================================
// Views
// =============================================================================

/// Ledger figures derived from a sale and its payment set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// down_payment + Σ payments
    pub total_paid: f64,
    /// total − total_paid
    pub remaining_balance: f64,
    pub payments_count: i64,
}

/// Sale with its relations and derived ledger figures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: InstallmentSale,
    #[serde(flatten)]
    pub ledger: LedgerSummary,
    pub product: Option<Product>,
    pub customer: Option<Customer>,
    pub guarantor: Option<InstallmentGuarantor>,
    pub payments: Vec<InstallmentPayment>,
    pub salesman: Option<Salesman>,
}

/// Response of `POST /api/installment-sales`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreated {
    pub message: String,
    pub sale_id: i64,
}

/// Response of the payment mutation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutcome {
    pub message: String,
    /// The written payment; absent after a delete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<InstallmentPayment>,
    pub status: SaleStatus,
    pub ledger: LedgerSummary,
}
