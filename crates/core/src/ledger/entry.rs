//! Entry direction and its effect on a running balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a ledger entry.
///
/// A credit increases the owner's balance, a debit decreases it. Every
/// balance mutation is recorded as exactly one entry; the entry log is
/// append-only and authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Balance-increasing entry.
    Credit,
    /// Balance-decreasing entry.
    Debit,
}

impl EntryDirection {
    /// Returns the signed effect of an entry with this direction.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

/// Replays a chronological sequence of entries into a balance.
///
/// The reconciliation invariant requires that for every account the stored
/// balance equals `replay_balance` over that account's entries.
#[must_use]
pub fn replay_balance<I>(entries: I) -> Decimal
where
    I: IntoIterator<Item = (EntryDirection, Decimal)>,
{
    entries
        .into_iter()
        .fold(Decimal::ZERO, |acc, (direction, amount)| {
            acc + direction.signed(amount)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_effect() {
        assert_eq!(EntryDirection::Credit.signed(dec!(10)), dec!(10));
        assert_eq!(EntryDirection::Debit.signed(dec!(10)), dec!(-10));
    }

    #[test]
    fn test_replay_empty_is_zero() {
        assert_eq!(replay_balance(std::iter::empty()), Decimal::ZERO);
    }

    #[test]
    fn test_replay_credits_minus_debits() {
        let entries = vec![
            (EntryDirection::Credit, dec!(100.00)),
            (EntryDirection::Debit, dec!(40.00)),
            (EntryDirection::Credit, dec!(5.50)),
        ];
        assert_eq!(replay_balance(entries), dec!(65.50));
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&EntryDirection::Credit).unwrap(),
            "\"credit\""
        );
        assert_eq!(
            serde_json::from_str::<EntryDirection>("\"debit\"").unwrap(),
            EntryDirection::Debit
        );
    }
}
