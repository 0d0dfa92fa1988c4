use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "adjustment_headers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub remarks: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::adjustment_line::Entity")]
    AdjustmentLines,
}

impl Related<super::adjustment_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdjustmentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
