//! `SeaORM` Entity for the investment_plans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "investment_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub profit_percent: Decimal,
    pub duration_hours: i32,
    pub min_amount: Decimal,
    /// Upper bound on a single investment; `None` means unbounded.
    pub max_amount: Option<Decimal>,
    /// Percent of the invested amount credited to the investor's referrer.
    /// `None` disables the bonus for this plan.
    pub referral_bonus_percent: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_investments::Entity")]
    UserInvestments,
}

impl Related<super::user_investments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserInvestments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
