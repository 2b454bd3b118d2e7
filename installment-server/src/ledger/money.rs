//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64` (SQLite REAL) and serialized as JSON numbers.
//! Every calculation converts to `Decimal` first, then rounds back to two
//! decimal places before storage.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
///
/// `None` for NaN, infinities and magnitudes beyond `Decimal::MAX`.
#[inline]
pub fn try_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Like [`try_decimal`], rounded to cents
#[inline]
pub fn try_money(value: f64) -> Option<Decimal> {
    try_decimal(value).map(round_money)
}

/// Convert a stored amount to a Decimal rounded to cents
///
/// Stored amounts went through [`try_money`] on the way in, so the zero
/// fallback is unreachable for rows written by this server.
#[inline]
pub fn to_money(value: f64) -> Decimal {
    try_money(value).unwrap_or_default()
}

/// Round a Decimal to cents
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Sum amounts with precise arithmetic
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = f64>,
{
    amounts.into_iter().map(to_money).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let a = 0.1_f64;
        let b = 0.2_f64;
        assert_ne!(a + b, 0.3);

        let sum_dec = try_decimal(a).unwrap() + try_decimal(b).unwrap();
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // 1000 payments of 0.01
        let total = sum_amounts(std::iter::repeat_n(0.01, 1000));
        assert_eq!(to_f64(total), 10.0);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(to_f64(Decimal::new(12345, 3)), 12.35);
        assert_eq!(to_f64(Decimal::new(-12345, 3)), -12.35);
        assert_eq!(to_money(66.666666), Decimal::new(6667, 2));
    }

    #[test]
    fn test_unrepresentable_values_are_rejected() {
        assert_eq!(try_decimal(f64::NAN), None);
        assert_eq!(try_decimal(f64::INFINITY), None);
        assert_eq!(try_money(f64::MAX), None);
        // just past Decimal::MAX (~7.92e28)
        assert_eq!(try_money(1e29), None);
        assert!(try_money(7.0e28).is_some());
    }
}
