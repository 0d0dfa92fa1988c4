use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "outgoing_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub outgoing_id: i64,
    pub product_id: i64,
    pub quantity: Decimal,
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::outgoing_header::Entity",
        from = "Column::OutgoingId",
        to = "super::outgoing_header::Column::Id"
    )]
    OutgoingHeader,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::outgoing_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingHeader.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
