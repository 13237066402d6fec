//! Operation entity - A single recorded financial transaction.
//!
//! `amount` is an unsigned magnitude. Whether an operation is income or
//! expense is derived from its category's type, never from the sign.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Operation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    /// Unique identifier for the operation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of this operation
    pub user_id: i64,
    /// Category the operation is filed under
    pub category_id: i64,
    /// Short description (e.g., "Начисление стипендии")
    pub name: String,
    /// When the operation happened, normalized to UTC
    pub date: DateTimeUtc,
    /// Magnitude of the operation
    pub amount: f64,
}

/// Defines relationships between Operation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each operation belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// Each operation belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
