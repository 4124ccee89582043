//! `SeaORM` Entity for the user_investments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "user_investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub plan_id: Uuid,
    pub amount: Decimal,
    pub expected_profit: Decimal,
    pub started_at: DateTimeWithTimeZone,
    pub matures_at: DateTimeWithTimeZone,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::investment_plans::Entity",
        from = "Column::PlanId",
        to = "super::investment_plans::Column::Id"
    )]
    InvestmentPlans,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::investment_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvestmentPlans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
