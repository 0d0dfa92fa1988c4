use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Master list of stockable items. Rows are edited administratively and
/// never deleted; movement lines reference them by id.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
    pub unit: String,
    pub price: Decimal,
    pub max_qty: Decimal,
    pub min_qty: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incoming_line::Entity")]
    IncomingLines,
    #[sea_orm(has_many = "super::outgoing_line::Entity")]
    OutgoingLines,
    #[sea_orm(has_many = "super::adjustment_line::Entity")]
    AdjustmentLines,
}

impl Related<super::incoming_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomingLines.def()
    }
}

impl Related<super::outgoing_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingLines.def()
    }
}

impl Related<super::adjustment_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdjustmentLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
