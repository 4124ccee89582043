//! `SeaORM` entity definitions for the balance ledger schema.

pub mod balance_accounts;
pub mod deposits;
pub mod investment_plans;
pub mod ledger_entries;
pub mod p2p_transfers;
pub mod sea_orm_active_enums;
pub mod user_investments;
pub mod users;
pub mod withdrawal_requests;
