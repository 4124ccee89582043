//! Property tests for the withdrawal state machine.

use proptest::prelude::*;

use crate::withdrawal::{WithdrawalStatus, validate_transition};

fn status_strategy() -> impl Strategy<Value = WithdrawalStatus> {
    prop_oneof![
        Just(WithdrawalStatus::Pending),
        Just(WithdrawalStatus::Approved),
        Just(WithdrawalStatus::Processing),
        Just(WithdrawalStatus::Sent),
        Just(WithdrawalStatus::Failed),
        Just(WithdrawalStatus::Rejected),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Terminal states accept no transition at all.
    #[test]
    fn prop_terminal_states_are_final(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        if from.is_terminal() {
            prop_assert!(validate_transition(from, to).is_err());
        }
    }

    /// Self-transitions are always rejected, so every transition that the
    /// machine allows is taken at most once.
    #[test]
    fn prop_no_self_transitions(status in status_strategy()) {
        prop_assert!(validate_transition(status, status).is_err());
    }

    /// The debit-bearing transition (pending -> approved) is reachable from
    /// pending only.
    #[test]
    fn prop_only_pending_can_be_approved(from in status_strategy()) {
        let result = validate_transition(from, WithdrawalStatus::Approved);
        prop_assert_eq!(result.is_ok(), from == WithdrawalStatus::Pending);
    }

    /// A failed transition reports exactly the states involved.
    #[test]
    fn prop_error_carries_states(
        from in status_strategy(),
        to in status_strategy(),
    ) {
        if let Err(err) = validate_transition(from, to) {
            prop_assert_eq!(err.from, from);
            prop_assert_eq!(err.to, to);
        }
    }
}
