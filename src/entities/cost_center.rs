use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cost center lookup referenced by outgoing headers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cost_centers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub code: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::outgoing_header::Entity")]
    OutgoingHeaders,
}

impl Related<super::outgoing_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OutgoingHeaders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
