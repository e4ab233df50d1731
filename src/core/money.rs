//! Cent-precision helpers shared by the split, balance and settlement code.
//!
//! Every stored amount is rounded to two decimal places using
//! round-half-away-from-zero (`2.345 -> 2.35`, `-2.345 -> -2.35`).

use rust_decimal::{Decimal, RoundingStrategy};

pub const CENT_SCALE: u32 = 2;

pub fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Truncates toward zero to whole cents.
pub fn truncate_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::ToZero)
}

pub fn one_cent() -> Decimal {
    Decimal::new(1, CENT_SCALE)
}

/// True when `value` carries no precision finer than a cent.
pub fn is_whole_cents(value: Decimal) -> bool {
    value.normalize().scale() <= CENT_SCALE
}

pub fn within(a: Decimal, b: Decimal, tolerance: Decimal) -> bool {
    (a - b).abs() <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_cents(dec!(2.345)), dec!(2.35));
        assert_eq!(round_cents(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_cents(dec!(3.3333)), dec!(3.33));
    }

    #[test]
    fn truncation_never_rounds_up() {
        assert_eq!(truncate_cents(dec!(3.339)), dec!(3.33));
        assert_eq!(truncate_cents(dec!(0.009)), dec!(0.00));
    }

    #[test]
    fn detects_sub_cent_precision() {
        assert!(is_whole_cents(dec!(10.50)));
        assert!(is_whole_cents(dec!(10.500)));
        assert!(!is_whole_cents(dec!(10.505)));
    }
}
