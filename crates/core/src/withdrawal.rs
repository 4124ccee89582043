//! Withdrawal approval and payout state machine.
//!
//! A withdrawal request is created `pending` with no balance effect. The
//! debit happens exactly once, at the pending→approved transition. After
//! approval a payout executor takes over: `processing` while the payout is
//! in flight, then `sent` on success or `failed` on failure. A failed
//! payout re-credits the user so debited funds are never silently lost.
//! `rejected` is the terminal no-balance-effect outcome of admin review.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nexvest_shared::AppError;

/// Lifecycle state of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Awaiting admin review. No balance effect yet.
    Pending,
    /// Approved by an admin; the owner has been debited.
    Approved,
    /// Claimed by the payout executor.
    Processing,
    /// Payout broadcast; terminal.
    Sent,
    /// Payout failed after debit; owner re-credited. Terminal.
    Failed,
    /// Declined by an admin with no balance effect. Terminal.
    Rejected,
}

impl WithdrawalStatus {
    /// Returns true if no further transitions are allowed.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Sent | Self::Failed | Self::Rejected)
    }
}

/// Invalid withdrawal state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Withdrawal cannot move from {from:?} to {to:?}")]
pub struct WithdrawalStateError {
    /// State the request was in.
    pub from: WithdrawalStatus,
    /// State the caller asked for.
    pub to: WithdrawalStatus,
}

/// Validates a requested state transition.
///
/// Allowed transitions:
/// - pending → approved | rejected
/// - approved → processing | sent | failed
/// - processing → sent | failed
///
/// # Errors
///
/// Returns `WithdrawalStateError` for anything else, including repeats of
/// an already-taken transition (a second approve must not debit again).
pub fn validate_transition(
    from: WithdrawalStatus,
    to: WithdrawalStatus,
) -> Result<(), WithdrawalStateError> {
    use WithdrawalStatus::{Approved, Failed, Pending, Processing, Rejected, Sent};

    let allowed = matches!(
        (from, to),
        (Pending, Approved | Rejected)
            | (Approved, Processing | Sent | Failed)
            | (Processing, Sent | Failed)
    );

    if allowed {
        Ok(())
    } else {
        Err(WithdrawalStateError { from, to })
    }
}

/// Appends an audit line to a withdrawal's admin note.
///
/// Notes are append-only: every admin or executor action adds a line with
/// the actor and timestamp, nothing is ever overwritten.
#[must_use]
pub fn append_note(
    existing: Option<&str>,
    action: &str,
    actor: &str,
    at: DateTime<Utc>,
) -> String {
    let line = format!("{action} by {actor} at {}", at.to_rfc3339());
    match existing {
        Some(note) if !note.is_empty() => format!("{note}\n{line}"),
        _ => line,
    }
}

impl From<WithdrawalStateError> for AppError {
    fn from(err: WithdrawalStateError) -> Self {
        Self::InvalidStateTransition(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pending_can_be_approved_or_rejected() {
        assert!(validate_transition(WithdrawalStatus::Pending, WithdrawalStatus::Approved).is_ok());
        assert!(validate_transition(WithdrawalStatus::Pending, WithdrawalStatus::Rejected).is_ok());
    }

    #[test]
    fn test_double_approve_fails() {
        let err = validate_transition(WithdrawalStatus::Approved, WithdrawalStatus::Approved)
            .unwrap_err();
        assert_eq!(err.from, WithdrawalStatus::Approved);
        assert_eq!(err.to, WithdrawalStatus::Approved);
    }

    #[test]
    fn test_payout_outcomes() {
        assert!(validate_transition(WithdrawalStatus::Approved, WithdrawalStatus::Sent).is_ok());
        assert!(validate_transition(WithdrawalStatus::Approved, WithdrawalStatus::Failed).is_ok());
        assert!(
            validate_transition(WithdrawalStatus::Approved, WithdrawalStatus::Processing).is_ok()
        );
        assert!(validate_transition(WithdrawalStatus::Processing, WithdrawalStatus::Sent).is_ok());
        assert!(
            validate_transition(WithdrawalStatus::Processing, WithdrawalStatus::Failed).is_ok()
        );
    }

    #[test]
    fn test_terminal_states_allow_nothing() {
        for terminal in [
            WithdrawalStatus::Sent,
            WithdrawalStatus::Failed,
            WithdrawalStatus::Rejected,
        ] {
            for to in [
                WithdrawalStatus::Pending,
                WithdrawalStatus::Approved,
                WithdrawalStatus::Processing,
                WithdrawalStatus::Sent,
                WithdrawalStatus::Failed,
                WithdrawalStatus::Rejected,
            ] {
                assert!(validate_transition(terminal, to).is_err());
            }
            assert!(terminal.is_terminal());
        }
    }

    #[test]
    fn test_rejected_skips_payout_states() {
        assert!(
            validate_transition(WithdrawalStatus::Pending, WithdrawalStatus::Sent).is_err()
        );
        assert!(
            validate_transition(WithdrawalStatus::Pending, WithdrawalStatus::Processing).is_err()
        );
    }

    #[test]
    fn test_append_note_starts_fresh() {
        let at = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let note = append_note(None, "Approved", "admin@nexvest.io", at);
        assert_eq!(note, "Approved by admin@nexvest.io at 2026-08-01T12:00:00+00:00");
    }

    #[test]
    fn test_append_note_preserves_history() {
        let at = Utc.with_ymd_and_hms(2026, 8, 1, 12, 5, 0).unwrap();
        let note = append_note(Some("Approved by a at t0"), "Failed", "payout-svc", at);
        assert!(note.starts_with("Approved by a at t0\n"));
        assert!(note.ends_with("Failed by payout-svc at 2026-08-01T12:05:00+00:00"));
    }

    #[test]
    fn test_state_error_maps_to_app_error() {
        let app: AppError = WithdrawalStateError {
            from: WithdrawalStatus::Sent,
            to: WithdrawalStatus::Approved,
        }
        .into();
        assert_eq!(app.error_code(), "INVALID_STATE_TRANSITION");
    }
}
