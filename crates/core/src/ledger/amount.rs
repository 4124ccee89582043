//! Minor-unit precision and amount validation.
//!
//! Every amount that enters the ledger is quantized to the ledger's
//! minor-unit precision using Banker's Rounding, then range-checked.
//! Validation happens once at the boundary; everything downstream can
//! assume a positive, in-range, correctly scaled `Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::LedgerError;

/// Number of decimal places the ledger tracks (crypto minor units).
pub const LEDGER_SCALE: u32 = 8;

/// Exclusive upper bound on a single amount: one quadrillion whole units.
///
/// Keeps every amount well inside the store's NUMERIC(28,8) columns.
#[must_use]
pub fn max_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000_i64)
}

/// Rounds an amount to the ledger's minor-unit precision.
///
/// Uses Banker's Rounding (`MidpointNearestEven`) so repeated conversions
/// do not drift in one direction.
#[must_use]
pub fn quantize(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(LEDGER_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Validates an amount for use in a ledger operation.
///
/// Returns the quantized amount on success.
///
/// # Errors
///
/// Returns `LedgerError::AmountNotPositive` if the quantized amount is zero
/// or negative, and `LedgerError::AmountTooLarge` if it equals or exceeds
/// [`max_amount`].
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    let quantized = quantize(amount);
    if quantized <= Decimal::ZERO {
        return Err(LedgerError::AmountNotPositive(amount));
    }
    if quantized >= max_amount() {
        return Err(LedgerError::AmountTooLarge(amount));
    }
    Ok(quantized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantize_rounds_to_eight_places() {
        assert_eq!(quantize(dec!(1.123456789)), dec!(1.12345679));
        assert_eq!(quantize(dec!(100)), dec!(100));
    }

    #[test]
    fn test_quantize_uses_bankers_rounding() {
        // Midpoint rounds to the even neighbour
        assert_eq!(quantize(dec!(0.000000015)), dec!(0.00000002));
        assert_eq!(quantize(dec!(0.000000025)), dec!(0.00000002));
    }

    #[test]
    fn test_validate_positive_amount() {
        assert_eq!(validate_amount(dec!(40.00)).unwrap(), dec!(40.00));
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(matches!(
            validate_amount(Decimal::ZERO),
            Err(LedgerError::AmountNotPositive(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative() {
        assert!(matches!(
            validate_amount(dec!(-1)),
            Err(LedgerError::AmountNotPositive(_))
        ));
    }

    #[test]
    fn test_validate_rejects_dust_below_scale() {
        // Rounds to zero at 8 decimal places
        assert!(matches!(
            validate_amount(dec!(0.000000001)),
            Err(LedgerError::AmountNotPositive(_))
        ));
    }

    #[test]
    fn test_validate_rejects_too_large() {
        // The bound is exclusive: max_amount() itself is rejected.
        assert!(matches!(
            validate_amount(max_amount()),
            Err(LedgerError::AmountTooLarge(_))
        ));
    }

    #[test]
    fn test_validate_accepts_just_below_bound() {
        let amount = max_amount() - dec!(0.00000001);
        assert_eq!(validate_amount(amount).unwrap(), amount);
    }
}
