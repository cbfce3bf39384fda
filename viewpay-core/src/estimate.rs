//! Earnings estimate calculation.
//!
//! Converts a raw view count into an estimated payout. The per-view rate
//! is a fixed heuristic, not a revenue model; the point of the pipeline
//! is the live conversion, not accuracy.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::models::CurrencyState;

/// Estimated USD earnings per raw view.
pub const UNIT_RATE_USD: Decimal = dec!(0.000026);

/// Values below this threshold keep extra precision so small posts do
/// not all collapse to `0.00`.
const PRECISION_THRESHOLD: Decimal = dec!(0.1);

/// Decimal places used at or above the threshold.
pub const SCALE_NORMAL: u32 = 2;

/// Decimal places used below the threshold.
pub const SCALE_SMALL: u32 = 5;

/// Converts a raw count into a USD estimate.
///
/// The result is rounded to five decimal places when it falls below 0.1
/// and to two otherwise. Rounding happens here, on the USD figure,
/// before any currency conversion; see DESIGN.md for the rationale.
/// Monotonically non-decreasing in `count`.
pub fn to_usd(count: u64) -> Decimal {
    let raw = Decimal::from(count) * UNIT_RATE_USD;
    raw.round_dp_with_strategy(scale_for(raw), RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a USD amount into the target currency.
///
/// Plain multiplication with no additional rounding; display rounding is
/// the formatter's responsibility.
pub fn to_currency(usd_amount: Decimal, exchange_rate_to_usd: Decimal) -> Decimal {
    usd_amount * exchange_rate_to_usd
}

/// Computes the full estimate for a count in the given currency.
pub fn estimate_in(count: u64, state: &CurrencyState) -> Decimal {
    to_currency(to_usd(count), state.exchange_rate_to_usd)
}

/// Returns the display scale for an amount under the precision policy.
pub fn scale_for(amount: Decimal) -> u32 {
    if amount.abs() < PRECISION_THRESHOLD {
        SCALE_SMALL
    } else {
        SCALE_NORMAL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_large_count_two_decimals() {
        // 2,100,000 x 0.000026 = 54.6
        assert_eq!(to_usd(2_100_000), dec!(54.60));
    }

    #[test]
    fn test_small_count_five_decimals() {
        // 500 x 0.000026 = 0.013
        assert_eq!(to_usd(500), dec!(0.01300));
    }

    #[test]
    fn test_zero_count() {
        assert_eq!(to_usd(0), dec!(0.00000));
    }

    #[test]
    fn test_monotonic_in_count() {
        let counts = [0u64, 1, 10, 500, 3_846, 3_847, 100_000, 2_100_000];
        let mut last = Decimal::MIN;
        for count in counts {
            let usd = to_usd(count);
            assert!(usd >= last, "to_usd({count}) regressed");
            last = usd;
        }
    }

    #[test]
    fn test_threshold_boundary() {
        // 3,846 x 0.000026 = 0.099996 -> below threshold, 5 decimals
        assert_eq!(to_usd(3_846), dec!(0.10000));
        // 3,847 x 0.000026 = 0.100022 -> at/above threshold, 2 decimals
        assert_eq!(to_usd(3_847), dec!(0.10));
    }

    #[test]
    fn test_conversion_is_unrounded() {
        let usd = to_usd(2_100_000); // 54.60
        let eur = to_currency(usd, dec!(0.9137));
        assert_eq!(eur, dec!(49.888020));
    }

    #[test]
    fn test_estimate_in_identity_currency() {
        let state = CurrencyState::usd();
        assert_eq!(estimate_in(2_100_000, &state), dec!(54.60));
    }
}
