//! Application-wide error types.
//!
//! Every domain error produced by the ledger core maps into one of these
//! variants at the application boundary, so callers always receive a typed,
//! recoverable result with a stable error code.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input shape or range (non-positive amount, malformed field).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Funds precondition failed.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Balance available at the instant of the check.
        available: Decimal,
        /// Amount the operation asked for.
        requested: Decimal,
    },

    /// Sender and receiver of a transfer are the same user.
    #[error("Cannot transfer to self")]
    SelfTransfer,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Requested state transition is not allowed.
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Conflict (e.g., duplicate entry).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage unavailable or failed; the caller should retry.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::SelfTransfer => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InsufficientBalance { .. } | Self::InvalidStateTransition(_) => 422,
            Self::Storage(_) => 503,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::SelfTransfer => "SELF_TRANSFER",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if retrying the whole operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::SelfTransfer.status_code(), 400);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(
            AppError::InsufficientBalance {
                available: Decimal::ZERO,
                requested: Decimal::ONE,
            }
            .status_code(),
            422
        );
        assert_eq!(
            AppError::InvalidStateTransition(String::new()).status_code(),
            422
        );
        assert_eq!(AppError::Storage(String::new()).status_code(), 503);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::SelfTransfer.error_code(), "SELF_TRANSFER");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::InvalidStateTransition(String::new()).error_code(),
            "INVALID_STATE_TRANSITION"
        );
        assert_eq!(
            AppError::Storage(String::new()).error_code(),
            "STORAGE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_only_storage_is_retryable() {
        assert!(AppError::Storage(String::new()).is_retryable());
        assert!(!AppError::SelfTransfer.is_retryable());
        assert!(!AppError::Validation(String::new()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::InsufficientBalance {
            available: Decimal::new(10000, 2),
            requested: Decimal::new(15000, 2),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 100.00, requested 150.00"
        );
        assert_eq!(AppError::SelfTransfer.to_string(), "Cannot transfer to self");
    }
}
