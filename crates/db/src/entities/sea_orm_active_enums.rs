//! Database enum types and their conversions to the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use nexvest_core::deposit::DepositStatus as CoreDepositStatus;
use nexvest_core::ledger::EntryDirection as CoreEntryDirection;
use nexvest_core::withdrawal::WithdrawalStatus as CoreWithdrawalStatus;

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_direction")]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Balance-increasing entry.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// Balance-decreasing entry.
    #[sea_orm(string_value = "debit")]
    Debit,
}

/// Deposit lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deposit_status")]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    /// Awaiting external confirmation.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Confirmed; balance credited.
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    /// Rejected; terminal, no balance effect.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Withdrawal request lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "withdrawal_status")]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    /// Awaiting admin review.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved; owner debited.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Claimed by the payout executor.
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Payout broadcast; terminal.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Payout failed; owner re-credited. Terminal.
    #[sea_orm(string_value = "failed")]
    Failed,
    /// Declined by an admin. Terminal.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Supported blockchain networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "chain")]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    /// Ethereum (ERC20).
    #[sea_orm(string_value = "ethereum")]
    Ethereum,
    /// Binance Smart Chain (BEP20).
    #[sea_orm(string_value = "bsc")]
    Bsc,
    /// Tron (TRC20).
    #[sea_orm(string_value = "tron")]
    Tron,
    /// Bitcoin.
    #[sea_orm(string_value = "bitcoin")]
    Bitcoin,
    /// Solana.
    #[sea_orm(string_value = "solana")]
    Solana,
    /// Polygon.
    #[sea_orm(string_value = "polygon")]
    Polygon,
}

impl From<CoreEntryDirection> for EntryDirection {
    fn from(direction: CoreEntryDirection) -> Self {
        match direction {
            CoreEntryDirection::Credit => Self::Credit,
            CoreEntryDirection::Debit => Self::Debit,
        }
    }
}

impl From<EntryDirection> for CoreEntryDirection {
    fn from(direction: EntryDirection) -> Self {
        match direction {
            EntryDirection::Credit => Self::Credit,
            EntryDirection::Debit => Self::Debit,
        }
    }
}

impl From<DepositStatus> for CoreDepositStatus {
    fn from(status: DepositStatus) -> Self {
        match status {
            DepositStatus::Pending => Self::Pending,
            DepositStatus::Confirmed => Self::Confirmed,
            DepositStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreDepositStatus> for DepositStatus {
    fn from(status: CoreDepositStatus) -> Self {
        match status {
            CoreDepositStatus::Pending => Self::Pending,
            CoreDepositStatus::Confirmed => Self::Confirmed,
            CoreDepositStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<WithdrawalStatus> for CoreWithdrawalStatus {
    fn from(status: WithdrawalStatus) -> Self {
        match status {
            WithdrawalStatus::Pending => Self::Pending,
            WithdrawalStatus::Approved => Self::Approved,
            WithdrawalStatus::Processing => Self::Processing,
            WithdrawalStatus::Sent => Self::Sent,
            WithdrawalStatus::Failed => Self::Failed,
            WithdrawalStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<CoreWithdrawalStatus> for WithdrawalStatus {
    fn from(status: CoreWithdrawalStatus) -> Self {
        match status {
            CoreWithdrawalStatus::Pending => Self::Pending,
            CoreWithdrawalStatus::Approved => Self::Approved,
            CoreWithdrawalStatus::Processing => Self::Processing,
            CoreWithdrawalStatus::Sent => Self::Sent,
            CoreWithdrawalStatus::Failed => Self::Failed,
            CoreWithdrawalStatus::Rejected => Self::Rejected,
        }
    }
}

impl Chain {
    /// Stable lowercase name used in API payloads and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Bsc => "bsc",
            Self::Tron => "tron",
            Self::Bitcoin => "bitcoin",
            Self::Solana => "solana",
            Self::Polygon => "polygon",
        }
    }
}
