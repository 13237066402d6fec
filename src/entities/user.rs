//! User entity - A registered ledger owner.
//!
//! Users are identified by their Discord user id. Each user owns a set of
//! categories and operations and may set a monthly budget limit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user id, the external identity of this user
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Display name chosen at registration
    pub name: String,
    /// Monthly expense ceiling; `0.0` means no limit is set
    pub budget_limit: f64,
    /// When the user registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many categories
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    /// One user has many operations
    #[sea_orm(has_many = "super::operation::Entity")]
    Operations,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::operation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
