//! Category business logic - Handles all category-related operations.
//!
//! Categories are owned by a single user and names are unique per user, so
//! the bot layer can refer to them by name. Deleting a category also deletes
//! every operation filed under it, inside one database transaction.

use super::clean_name;
use crate::{
    entities::{Category, CategoryType, Operation, category, operation},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Default category color when none is given
pub const DEFAULT_COLOR: &str = "#561ecb";

/// Validates and normalizes a `#rrggbb` color. The leading `#` is optional
/// on input; the result is always lowercase with `#`.
pub fn normalize_color(color: &str) -> Result<String> {
    let trimmed = color.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor {
            color: color.to_string(),
        });
    }

    Ok(format!("#{}", hex.to_ascii_lowercase()))
}

/// Fields that can be changed on an existing category
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    /// New name
    pub name: Option<String>,
    /// New color
    pub color: Option<String>,
    /// New type
    pub category_type: Option<CategoryType>,
}

/// Retrieves all categories of a user, ordered alphabetically by name.
pub async fn get_categories_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its id.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds one of the user's categories by exact name.
pub async fn get_category_by_name(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .filter(category::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_category_by_name`] but a missing category is an error.
pub async fn require_category_by_name(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<category::Model> {
    get_category_by_name(db, user_id, name)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: name.trim().to_string(),
        })
}

/// Loads a category and checks that `user_id` owns it.
pub async fn get_owned_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
) -> Result<category::Model> {
    let category = get_category_by_id(db, category_id)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: category_id.to_string(),
        })?;

    if category.user_id != user_id {
        return Err(Error::Forbidden {
            message: "category belongs to another user".to_string(),
        });
    }

    Ok(category)
}

/// Creates a new category, validating the name and color.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: String,
    color: Option<String>,
    category_type: CategoryType,
) -> Result<category::Model> {
    let name = clean_name("Category name", &name)?;
    let color = normalize_color(color.as_deref().unwrap_or(DEFAULT_COLOR))?;

    if get_category_by_name(db, user_id, &name).await?.is_some() {
        return Err(Error::Validation {
            message: format!("Category '{name}' already exists"),
        });
    }

    let category = category::ActiveModel {
        user_id: Set(user_id),
        name: Set(name),
        color: Set(color),
        category_type: Set(category_type),
        ..Default::default()
    };

    let category = category.insert(db).await?;
    info!(category_id = category.id, user_id, "Category created");
    Ok(category)
}

/// Applies `update` to one of the user's categories.
pub async fn update_category(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    update: CategoryUpdate,
) -> Result<category::Model> {
    let category = get_owned_category(db, user_id, category_id).await?;
    let mut active_model: category::ActiveModel = category.clone().into();

    if let Some(name) = update.name {
        let name = clean_name("Category name", &name)?;
        if name != category.name && get_category_by_name(db, user_id, &name).await?.is_some() {
            return Err(Error::Validation {
                message: format!("Category '{name}' already exists"),
            });
        }
        active_model.name = Set(name);
    }
    if let Some(color) = update.color {
        active_model.color = Set(normalize_color(&color)?);
    }
    if let Some(category_type) = update.category_type {
        active_model.category_type = Set(category_type);
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Deletes one of the user's categories together with all of its operations.
///
/// Returns the number of operations that were removed with it.
pub async fn delete_category(db: &DatabaseConnection, user_id: i64, category_id: i64) -> Result<u64> {
    let category = get_owned_category(db, user_id, category_id).await?;

    let txn = db.begin().await?;

    let removed = Operation::delete_many()
        .filter(operation::Column::CategoryId.eq(category.id))
        .exec(&txn)
        .await?
        .rows_affected;

    category.delete(&txn).await?;

    txn.commit().await?;

    info!(category_id, removed_operations = removed, "Category deleted");
    Ok(removed)
}
