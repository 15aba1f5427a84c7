//! Monetary rounding policy.
//!
//! All currency amounts in the engine are `rust_decimal::Decimal` rounded to
//! two places, half-up, at the line level - never at the aggregate level.
//! Aggregates are exact sums of already-rounded line values, which is what
//! keeps `grand_total = taxable_amount + tax_total` true to the cent.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places carried by every currency amount.
pub const CURRENCY_DP: u32 = 2;

/// Round a currency amount to two places, half-up.
///
/// `MidpointAwayFromZero` is round-half-up for the non-negative values the
/// engine produces; inputs that could make an intermediate negative are
/// rejected by validation before they reach arithmetic.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Split a rounded tax amount into two components that sum to it exactly.
///
/// The first component is `round_currency(total / 2)`; the second is the
/// remainder. When the total has an odd number of cents the extra cent lands
/// on the first component, never lost and never invented.
pub fn split_half(total: Decimal) -> (Decimal, Decimal) {
    let first = round_currency(total / Decimal::TWO);
    let second = total - first;
    (first, second)
}
