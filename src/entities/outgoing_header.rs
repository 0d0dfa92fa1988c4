use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shared metadata of one outgoing issue, charged against a cost center.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "outgoing_headers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub cost_center_id: i64,
    pub remarks: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::outgoing_line::Entity")]
    OutgoingLines,
    #[sea_orm(
        belongs_to = "super::cost_center::Entity",
        from = "Column::CostCenterId",
        to = "super::cost_center::Column::Id"
    )]
    CostCenter,
}

impl Related<super::outgoing_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingLines.def()
    }
}

impl Related<super::cost_center::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CostCenter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
