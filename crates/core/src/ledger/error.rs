//! Ledger error types for validation and funds preconditions.

use rust_decimal::Decimal;
use thiserror::Error;

use nexvest_shared::AppError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount must be positive after quantization.
    #[error("Amount must be positive, got {0}")]
    AmountNotPositive(Decimal),

    /// Amount exceeds the ledger's upper bound.
    #[error("Amount {0} exceeds the maximum the ledger accepts")]
    AmountTooLarge(Decimal),

    /// Funds precondition failed.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Balance at the instant of the authoritative check.
        available: Decimal,
        /// Amount the operation asked for.
        requested: Decimal,
    },

    /// Sender and receiver of a transfer are the same user.
    #[error("Cannot transfer to self")]
    SelfTransfer,
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AmountNotPositive(_) => "AMOUNT_NOT_POSITIVE",
            Self::AmountTooLarge(_) => "AMOUNT_TOO_LARGE",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::SelfTransfer => "SELF_TRANSFER",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AmountNotPositive(_) | LedgerError::AmountTooLarge(_) => {
                Self::Validation(err.to_string())
            }
            LedgerError::InsufficientBalance {
                available,
                requested,
            } => Self::InsufficientBalance {
                available,
                requested,
            },
            LedgerError::SelfTransfer => Self::SelfTransfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::AmountNotPositive(Decimal::ZERO).error_code(),
            "AMOUNT_NOT_POSITIVE"
        );
        assert_eq!(LedgerError::SelfTransfer.error_code(), "SELF_TRANSFER");
    }

    #[test]
    fn test_insufficient_balance_display() {
        let err = LedgerError::InsufficientBalance {
            available: dec!(100.00),
            requested: dec!(150.00),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 100.00, requested 150.00"
        );
    }

    #[test]
    fn test_maps_to_app_error() {
        let app: AppError = LedgerError::SelfTransfer.into();
        assert_eq!(app.error_code(), "SELF_TRANSFER");

        let app: AppError = LedgerError::AmountNotPositive(Decimal::ZERO).into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");

        let app: AppError = LedgerError::InsufficientBalance {
            available: dec!(1),
            requested: dec!(2),
        }
        .into();
        assert_eq!(app.status_code(), 422);
    }
}
