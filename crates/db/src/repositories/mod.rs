//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Every balance mutation goes through a repository so the
//! locking discipline lives in one place.

pub mod balance;
pub mod deposit;
pub mod investment;
pub mod user;
pub mod withdrawal;

pub use balance::{BalanceError, BalanceRepository, Reconciliation, TransferOutcome};
pub use deposit::{DepositError, DepositRepository};
pub use investment::{InvestmentError, InvestmentRepository};
pub use user::UserRepository;
pub use withdrawal::{WithdrawalError, WithdrawalRepository};
