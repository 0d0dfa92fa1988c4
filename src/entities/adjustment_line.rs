use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of an adjustment line. Stored as a string in the `kind`
/// column; the sign of the stored quantity always agrees with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentKind {
    Increase,
    Decrease,
}

impl AdjustmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentKind::Increase => "increase",
            AdjustmentKind::Decrease => "decrease",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "increase" => Some(AdjustmentKind::Increase),
            "decrease" => Some(AdjustmentKind::Decrease),
            _ => None,
        }
    }
}

/// One product movement within an adjustment. `quantity` is signed:
/// positive for kind = increase, negative for kind = decrease.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "adjustment_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub adjustment_id: i64,
    pub product_id: i64,
    pub quantity: Decimal,
    pub price: Decimal,
    pub kind: String,
}

impl Model {
    /// Signed amount of the line (quantity already carries the sign).
    pub fn amount(&self) -> Decimal {
        self.quantity * self.price
    }

    pub fn kind(&self) -> Option<AdjustmentKind> {
        AdjustmentKind::from_str(&self.kind)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::adjustment_header::Entity",
        from = "Column::AdjustmentId",
        to = "super::adjustment_header::Column::Id"
    )]
    AdjustmentHeader,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::adjustment_header::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdjustmentHeader.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
