//! Credit/debit ledger semantics.
//!
//! This module implements the pure side of the balance ledger:
//! - Minor-unit precision and amount validation
//! - Entry direction and its signed effect on a running balance
//! - Error types for ledger operations

pub mod amount;
pub mod entry;
pub mod error;

#[cfg(test)]
mod amount_props;

pub use amount::{LEDGER_SCALE, max_amount, quantize, validate_amount};
pub use entry::{EntryDirection, replay_balance};
pub use error::LedgerError;
