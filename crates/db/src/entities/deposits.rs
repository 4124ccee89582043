//! `SeaORM` Entity for the deposits table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Chain, DepositStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deposits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub amount: Decimal,
    pub chain: Chain,
    /// On-chain transaction hash. Unique; re-submission of the same hash
    /// returns the existing deposit instead of creating a second one.
    #[sea_orm(unique)]
    pub tx_identifier: String,
    pub status: DepositStatus,
    /// Number of on-chain confirmations observed, recorded at confirm time.
    pub confirmations: i32,
    /// One-time credit flag. Set in the same transaction as the ledger
    /// credit so re-confirmation can never credit twice.
    pub credited: bool,
    pub admin_note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
