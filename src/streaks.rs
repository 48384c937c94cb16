//! Pure streak-to-multiplier math: the "fertilizer boost" reward curve.
//!
//! The curve is a policy decision, not derived data: every consecutive day
//! of logged income adds [`crate::constants::STREAK_STEP`] on top of the
//! base multiplier until the cap is reached. Bookkeeping (reading and
//! incrementing a user's streak) lives in the income service; nothing here
//! touches storage.

use rust_decimal::Decimal;

use crate::constants::{STREAK_BASE_MULTIPLIER, STREAK_MULTIPLIER_CAP, STREAK_STEP};

/// Multiplier earned by a consecutive income-logging streak.
///
/// Monotone in the streak length and capped, so a ten-day streak and a
/// hundred-day streak both earn the maximum boost.
pub fn streak_multiplier(streak_count: i32) -> Decimal {
    if streak_count <= 0 {
        return STREAK_BASE_MULTIPLIER;
    }
    let raw = STREAK_BASE_MULTIPLIER + STREAK_STEP * Decimal::from(streak_count);
    raw.min(STREAK_MULTIPLIER_CAP)
}

/// Applies a multiplier to an income amount. Exact decimal product.
pub fn fertilizer_boost(amount: Decimal, multiplier: Decimal) -> Decimal {
    amount * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn base_multiplier_without_streak() {
        assert_eq!(streak_multiplier(0), dec!(1.0));
        assert_eq!(streak_multiplier(-3), dec!(1.0));
    }

    #[test]
    fn linear_step_up_to_cap() {
        assert_eq!(streak_multiplier(1), dec!(1.1));
        assert_eq!(streak_multiplier(5), dec!(1.5));
        assert_eq!(streak_multiplier(10), dec!(2.0));
        assert_eq!(streak_multiplier(11), dec!(2.0));
        assert_eq!(streak_multiplier(365), dec!(2.0));
    }

    #[test]
    fn boost_is_exact_product() {
        assert_eq!(fertilizer_boost(dec!(100), dec!(1.5)), dec!(150.0));
        assert_eq!(fertilizer_boost(dec!(12.34), dec!(2.0)), dec!(24.68));
        assert_eq!(fertilizer_boost(dec!(7), dec!(1.0)), dec!(7));
    }

    proptest! {
        #[test]
        fn multiplier_is_monotone_and_capped(streak in 0i32..1000) {
            let current = streak_multiplier(streak);
            let next = streak_multiplier(streak + 1);
            prop_assert!(next >= current);
            prop_assert!(current >= dec!(1.0));
            prop_assert!(current <= dec!(2.0));
        }

        #[test]
        fn boost_scales_with_multiplier(cents in 1u64..10_000_000u64, streak in 0i32..20) {
            let amount = Decimal::new(cents as i64, 2);
            let boosted = fertilizer_boost(amount, streak_multiplier(streak));
            prop_assert!(boosted >= amount);
            prop_assert!(boosted <= amount * dec!(2.0));
        }
    }
}
