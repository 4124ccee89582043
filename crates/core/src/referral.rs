//! Referral bonus computation.
//!
//! When a user invests in a plan that carries a referral bonus percent and
//! the user was referred by someone, the referrer is credited
//! `amount * percent / 100`, quantized to the ledger's minor unit. A
//! missing or malformed percent yields no bonus; the caller logs and skips
//! rather than failing the investment write.

use rust_decimal::Decimal;

use crate::ledger::amount::quantize;

/// Computes the referral bonus for an investment, if any.
///
/// Returns `None` when no bonus applies: absent percent, percent outside
/// `(0, 100]`, non-positive investment amount, or a bonus that quantizes
/// to zero.
#[must_use]
pub fn compute_bonus(invested_amount: Decimal, bonus_percent: Option<Decimal>) -> Option<Decimal> {
    let percent = bonus_percent?;
    if percent <= Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return None;
    }
    if invested_amount <= Decimal::ZERO {
        return None;
    }

    let bonus = quantize(invested_amount * percent / Decimal::ONE_HUNDRED);
    (bonus > Decimal::ZERO).then_some(bonus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bonus_for_vip_plan() {
        // VIP plan: 8% referral bonus
        assert_eq!(
            compute_bonus(dec!(11000.00), Some(dec!(8))),
            Some(dec!(880.00))
        );
    }

    #[test]
    fn test_no_percent_no_bonus() {
        assert_eq!(compute_bonus(dec!(500.00), None), None);
    }

    #[test]
    fn test_malformed_percent_skipped() {
        assert_eq!(compute_bonus(dec!(500.00), Some(dec!(0))), None);
        assert_eq!(compute_bonus(dec!(500.00), Some(dec!(-5))), None);
        assert_eq!(compute_bonus(dec!(500.00), Some(dec!(101))), None);
    }

    #[test]
    fn test_non_positive_amount_skipped() {
        assert_eq!(compute_bonus(Decimal::ZERO, Some(dec!(8))), None);
        assert_eq!(compute_bonus(dec!(-100), Some(dec!(8))), None);
    }

    #[test]
    fn test_bonus_is_quantized() {
        // 1/3 percent of 100 = 0.333... -> 8 decimal places
        assert_eq!(
            compute_bonus(dec!(100), Some(dec!(0.333333333333))),
            Some(dec!(0.33333333))
        );
    }

    #[test]
    fn test_dust_bonus_skipped() {
        // Bonus rounds to zero at ledger precision
        assert_eq!(
            compute_bonus(dec!(0.00000001), Some(dec!(1))),
            None
        );
    }

    #[test]
    fn test_full_percent_caps_at_amount() {
        assert_eq!(
            compute_bonus(dec!(250.00), Some(dec!(100))),
            Some(dec!(250.00))
        );
    }
}

#[cfg(test)]
mod props {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use super::compute_bonus;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..1_000_000_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn percent_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        /// For any valid percent in (0, 100], the bonus never exceeds the
        /// invested amount and is never negative.
        #[test]
        fn prop_bonus_bounded_by_amount(
            amount in amount_strategy(),
            percent in percent_strategy(),
        ) {
            if let Some(bonus) = compute_bonus(amount, Some(percent)) {
                prop_assert!(bonus > Decimal::ZERO);
                prop_assert!(bonus <= amount);
            }
        }

        /// Bonus is monotonic in the invested amount.
        #[test]
        fn prop_bonus_monotonic_in_amount(
            amount in amount_strategy(),
            percent in percent_strategy(),
        ) {
            let smaller = compute_bonus(amount, Some(percent));
            let larger = compute_bonus(amount * Decimal::TWO, Some(percent));
            if let (Some(s), Some(l)) = (smaller, larger) {
                prop_assert!(l >= s);
            }
        }
    }
}
