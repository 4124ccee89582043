//! Property tests for amount quantization and validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::amount::{LEDGER_SCALE, max_amount, quantize, validate_amount};
use super::entry::{EntryDirection, replay_balance};

/// Strategy for arbitrary in-range amounts with up to 12 decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000_000_000_000i64, 0u32..=12u32)
        .prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Quantization is idempotent.
    #[test]
    fn prop_quantize_idempotent(amount in amount_strategy()) {
        prop_assert_eq!(quantize(quantize(amount)), quantize(amount));
    }

    /// Quantized amounts never carry more than LEDGER_SCALE decimal places.
    #[test]
    fn prop_quantize_scale_bounded(amount in amount_strategy()) {
        prop_assert!(quantize(amount).scale() <= LEDGER_SCALE);
    }

    /// A validated amount is positive, in range, and already quantized.
    #[test]
    fn prop_validated_amount_is_normalized(amount in amount_strategy()) {
        if let Ok(validated) = validate_amount(amount) {
            prop_assert!(validated > Decimal::ZERO);
            prop_assert!(validated < max_amount());
            prop_assert_eq!(validated, quantize(validated));
        }
    }

    /// A credit followed by an equal debit nets to zero.
    #[test]
    fn prop_credit_then_debit_nets_zero(amount in amount_strategy()) {
        let entries = vec![
            (EntryDirection::Credit, amount),
            (EntryDirection::Debit, amount),
        ];
        prop_assert_eq!(replay_balance(entries), Decimal::ZERO);
    }

    /// Replay order of credits alone does not change the result.
    #[test]
    fn prop_replay_is_sum_of_signed(
        amounts in proptest::collection::vec(amount_strategy(), 0..16),
    ) {
        let entries: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| {
                let dir = if i % 2 == 0 {
                    EntryDirection::Credit
                } else {
                    EntryDirection::Debit
                };
                (dir, a)
            })
            .collect();

        let expected: Decimal = entries.iter().map(|(d, a)| d.signed(*a)).sum();
        prop_assert_eq!(replay_balance(entries), expected);
    }
}
