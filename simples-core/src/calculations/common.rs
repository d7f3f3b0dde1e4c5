//! Shared helpers for the tax calculators.
//!
//! Calculators keep full precision internally; rounding to cents is left to
//! presentation code and tests, which use [`round_half_up`].

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(773.3333)), dec!(773.33));
/// assert_eq!(round_half_up(dec!(856.4650)), dec!(856.47));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use simples_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-54000.00), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(54000.00), dec!(0)), dec!(54000.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a percentage into the closed `0..=100` range.
pub fn clamp_percent(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Converts a fraction into the 0-100 scale used at the interface boundary.
pub fn to_percent(fraction: Decimal) -> Decimal {
    fraction * Decimal::ONE_HUNDRED
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(773.334)), dec!(773.33));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_handles_long_fractions() {
        let third = dec!(20880) / dec!(270000) * dec!(10000);

        assert_eq!(round_half_up(third), dec!(773.33));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
    }

    #[test]
    fn max_floors_negative_at_zero() {
        assert_eq!(max(dec!(-50.00), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // clamp_percent / to_percent tests
    // =========================================================================

    #[test]
    fn clamp_percent_caps_at_one_hundred() {
        assert_eq!(clamp_percent(dec!(140)), dec!(100));
    }

    #[test]
    fn clamp_percent_floors_at_zero() {
        assert_eq!(clamp_percent(dec!(-3)), dec!(0));
    }

    #[test]
    fn clamp_percent_keeps_in_range_values() {
        assert_eq!(clamp_percent(dec!(70)), dec!(70));
    }

    #[test]
    fn to_percent_scales_fraction() {
        assert_eq!(to_percent(dec!(0.112)), dec!(11.2));
    }
}
