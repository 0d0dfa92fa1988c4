use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Access role of a user account. Stored as "ADMIN" / "STANDARD".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Standard,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Standard => "STANDARD",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(UserRole::Admin),
            "STANDARD" => Some(UserRole::Standard),
            _ => None,
        }
    }
}

/// User account row. `password_digest` is the hex-encoded salted SHA-224
/// digest of the secret; the clear secret is never persisted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub username: String,
    #[sea_orm(column_type = "Text")]
    pub password_digest: String,
    pub role: String,
}

impl Model {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_str(&self.role)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
