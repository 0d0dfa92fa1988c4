use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One product movement within an incoming receipt. `price` is the unit
/// price at time of receipt, independent of the catalog price.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "incoming_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub incoming_id: i64,
    pub product_id: i64,
    pub quantity: Decimal,
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incoming_header::Entity",
        from = "Column::IncomingId",
        to = "super::incoming_header::Column::Id"
    )]
    IncomingHeader,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::incoming_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomingHeader.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
