//! Binary64 arithmetic for every derivation step.
//!
//! Figures are derived in IEEE-754 doubles, in the same operation order and
//! with the same half-up rounding as the published payout figures, and handed
//! back as `Decimal` through the shortest decimal string that round-trips.
//! Converting such a `Decimal` back with [`to_f64`] recovers the identical
//! double, so results can be chained through the typed API without drift.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Above this magnitude every double is already an integer.
const INTEGRAL_THRESHOLD: f64 = 4_503_599_627_370_496.0;

/// The nearest double to a decimal value.
pub fn to_f64(value: Decimal) -> f64 {
    value
        .to_string()
        .parse()
        .unwrap_or_else(|_| value.to_f64().unwrap_or(0.0))
}

/// The shortest decimal that round-trips to `value`. Non-finite input maps to
/// zero; magnitudes beyond `Decimal` saturate.
pub fn to_decimal(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .unwrap_or(if value < 0.0 { Decimal::MIN } else { Decimal::MAX })
}

/// Round to the nearest integer, ties toward positive infinity. Never
/// returns negative zero.
pub fn round_half_up(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= INTEGRAL_THRESHOLD {
        return value;
    }
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded + 0.0
}

/// Round a monetary amount to cents.
pub fn round_currency(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Whether `value` survives a trip through binary64 unchanged.
pub fn is_binary64_exact(value: Decimal) -> bool {
    to_decimal(to_f64(value)) == value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_follows_binary_midpoints() {
        // 1.005 is stored as 1.00499999999999989...
        assert_eq!(round_currency(1.005), 1.0);
        assert_eq!(round_currency(1.015), 1.01);
        assert_eq!(round_currency(2.675), 2.68);
        assert_eq!(round_currency(0.285), 0.28);
        assert_eq!(round_currency(101999.9999999), 102000.0);
    }

    #[test]
    fn test_negative_midpoint_rounds_toward_positive() {
        let zero = round_currency(-0.005);
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_positive());
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(12.75), 13.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(1e300), 1e300);
    }

    #[test]
    fn test_decimal_conversions_round_trip() {
        assert_eq!(to_decimal(0.1 + 0.2), dec!(0.30000000000000004));
        assert_eq!(to_decimal(2226000.0), dec!(2226000));
        assert_eq!(to_f64(dec!(0.30000000000000004)), 0.1 + 0.2);
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(1e40), Decimal::MAX);
    }

    #[test]
    fn test_binary64_exactness() {
        assert!(is_binary64_exact(dec!(2400.10)));
        assert!(is_binary64_exact(dec!(1.005)));
        assert!(!is_binary64_exact(dec!(2400.123456789012345678)));
    }
}
