//! Category entity - A named, colored grouping of operations.
//!
//! Every category has a fixed `category_type` which decides whether its
//! operations count as income or expense. Amounts on operations are stored
//! unsigned, so the category type is the only source of sign.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Whether a category collects income or expenses
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Money coming in
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl CategoryType {
    /// Canonical lowercase name, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Russian display label used in operation listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "доход",
            Self::Expense => "расход",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = crate::errors::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "доход" | "доходы" => Ok(Self::Income),
            "expense" | "расход" | "расходы" => Ok(Self::Expense),
            _ => Err(crate::errors::Error::InvalidCategoryType {
                value: s.to_string(),
            }),
        }
    }
}

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of this category
    pub user_id: i64,
    /// Human-readable name (e.g., "Продукты", "Стипендия")
    pub name: String,
    /// Display color as `#rrggbb`
    pub color: String,
    /// Income or expense
    pub category_type: CategoryType,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each category belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    /// One category has many operations
    #[sea_orm(has_many = "super::operation::Entity")]
    Operations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::operation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Operations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_type_parses_english_and_russian() {
        assert_eq!("income".parse::<CategoryType>().ok(), Some(CategoryType::Income));
        assert_eq!(" Expense ".parse::<CategoryType>().ok(), Some(CategoryType::Expense));
        assert_eq!("доход".parse::<CategoryType>().ok(), Some(CategoryType::Income));
        assert_eq!("Расходы".parse::<CategoryType>().ok(), Some(CategoryType::Expense));
    }

    #[test]
    fn test_category_type_rejects_unknown() {
        let result = "savings".parse::<CategoryType>();
        assert!(matches!(
            result,
            Err(crate::errors::Error::InvalidCategoryType { value }) if value == "savings"
        ));
    }

    #[test]
    fn test_category_type_display_matches_storage() {
        assert_eq!(CategoryType::Income.to_string(), "income");
        assert_eq!(CategoryType::Expense.to_string(), "expense");
    }
}
