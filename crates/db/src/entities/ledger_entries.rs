//! `SeaORM` Entity for the ledger_entries table.
//!
//! Append-only audit trail. Rows are never updated or deleted; the
//! account balance must always equal the sum of signed entry amounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::EntryDirection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub direction: EntryDirection,
    pub amount: Decimal,
    /// Human-readable cause, e.g. `deposit`, `withdrawal`, `transfer_out`.
    pub reason: String,
    /// Id of the deposit, withdrawal, transfer, or investment that caused
    /// this entry, when one exists.
    pub reference_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::balance_accounts::Entity",
        from = "Column::AccountId",
        to = "super::balance_accounts::Column::Id"
    )]
    BalanceAccounts,
}

impl Related<super::balance_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BalanceAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
