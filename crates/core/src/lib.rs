//! Core business logic for Nexvest.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here.
//!
//! # Modules
//!
//! - `ledger` - Amount validation and credit/debit entry semantics
//! - `deposit` - Deposit confirmation state machine
//! - `withdrawal` - Withdrawal approval/payout state machine
//! - `referral` - Referral bonus computation

pub mod deposit;
pub mod ledger;
pub mod referral;
pub mod withdrawal;

#[cfg(test)]
mod withdrawal_props;
