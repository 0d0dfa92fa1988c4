use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shared metadata of one incoming receipt: supplier delivery-note number,
/// supplier name, date and free-form remarks.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "incoming_headers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Date,
    pub dn_number: String,
    pub supplier: String,
    pub remarks: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::incoming_line::Entity")]
    IncomingLines,
}

impl Related<super::incoming_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomingLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
