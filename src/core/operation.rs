//! Operation business logic - Handles all operation-related operations.
//!
//! This module provides functions for creating, retrieving, updating and
//! deleting financial operations. Amounts are stored as positive magnitudes;
//! the category decides whether an operation is income or expense. Every
//! write checks that the operation and its category belong to the acting
//! user, and dates are normalized to UTC before they are stored.

use super::{
    category::get_owned_category,
    clean_name,
    filter::{CategoryFilter, FilterSpec, date_bounds},
};
use crate::{
    entities::{Operation, operation},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Optional server-side narrowing of an operation listing
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationQuery {
    /// Only operations in this category
    pub category_id: Option<i64>,
    /// Only operations at or after this instant
    pub start: Option<DateTime<Utc>>,
    /// Only operations at or before this instant
    pub end: Option<DateTime<Utc>>,
}

impl OperationQuery {
    /// The narrowest read still holding every operation that `spec` keeps
    /// at `now`. Data type is left to the in-memory filter.
    #[must_use]
    pub fn for_filter(spec: &FilterSpec, now: DateTime<Utc>) -> Self {
        let (start, end) = date_bounds(spec, now);
        Self {
            category_id: match spec.category {
                CategoryFilter::All => None,
                CategoryFilter::Category(id) => Some(id),
            },
            start,
            end,
        }
    }
}

/// Fields that can be changed on an existing operation
#[derive(Debug, Clone, Default)]
pub struct OperationUpdate {
    /// New description
    pub name: Option<String>,
    /// New date
    pub date: Option<DateTime<Utc>>,
    /// New amount
    pub amount: Option<f64>,
    /// Move to another category
    pub category_id: Option<i64>,
}

/// Parses a user supplied date.
///
/// Accepts RFC 3339 timestamps (converted to UTC), naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps (taken as UTC) and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_operation_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(date.and_utc());
    }
    if let Some(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(date.and_utc());
    }

    Err(Error::InvalidDate {
        value: value.to_string(),
    })
}

fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Records a new operation in one of the user's categories.
pub async fn create_operation(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    name: String,
    amount: f64,
    date: DateTime<Utc>,
) -> Result<operation::Model> {
    let amount = validate_amount(amount)?;
    let name = clean_name("Operation name", &name)?;
    get_owned_category(db, user_id, category_id).await?;

    let operation = operation::ActiveModel {
        user_id: Set(user_id),
        category_id: Set(category_id),
        name: Set(name),
        date: Set(date),
        amount: Set(amount),
        ..Default::default()
    };

    let operation = operation.insert(db).await?;
    info!(operation_id = operation.id, user_id, category_id, "Operation created");
    Ok(operation)
}

/// Retrieves the user's operations, newest first.
pub async fn get_operations_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    query: &OperationQuery,
) -> Result<Vec<operation::Model>> {
    let mut select = Operation::find().filter(operation::Column::UserId.eq(user_id));

    if let Some(category_id) = query.category_id {
        select = select.filter(operation::Column::CategoryId.eq(category_id));
    }
    if let Some(start) = query.start {
        select = select.filter(operation::Column::Date.gte(start));
    }
    if let Some(end) = query.end {
        select = select.filter(operation::Column::Date.lte(end));
    }

    select
        .order_by_desc(operation::Column::Date)
        .order_by_desc(operation::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an operation by its id.
pub async fn get_operation_by_id(
    db: &DatabaseConnection,
    operation_id: i64,
) -> Result<Option<operation::Model>> {
    Operation::find_by_id(operation_id)
        .one(db)
        .await
        .map_err(Into::into)
}

async fn get_owned_operation(
    db: &DatabaseConnection,
    user_id: i64,
    operation_id: i64,
) -> Result<operation::Model> {
    let operation = get_operation_by_id(db, operation_id)
        .await?
        .ok_or(Error::OperationNotFound { id: operation_id })?;

    if operation.user_id != user_id {
        return Err(Error::Forbidden {
            message: "operation belongs to another user".to_string(),
        });
    }

    Ok(operation)
}

/// Applies `update` to one of the user's operations.
pub async fn update_operation(
    db: &DatabaseConnection,
    user_id: i64,
    operation_id: i64,
    update: OperationUpdate,
) -> Result<operation::Model> {
    let operation = get_owned_operation(db, user_id, operation_id).await?;
    let mut active_model: operation::ActiveModel = operation.into();

    if let Some(category_id) = update.category_id {
        get_owned_category(db, user_id, category_id).await?;
        active_model.category_id = Set(category_id);
    }
    if let Some(name) = update.name {
        active_model.name = Set(clean_name("Operation name", &name)?);
    }
    if let Some(date) = update.date {
        active_model.date = Set(date);
    }
    if let Some(amount) = update.amount {
        active_model.amount = Set(validate_amount(amount)?);
    }

    let updated = active_model.update(db).await?;
    info!(operation_id, user_id, "Operation updated");
    Ok(updated)
}

/// Deletes one of the user's operations.
pub async fn delete_operation(db: &DatabaseConnection, user_id: i64, operation_id: i64) -> Result<()> {
    let operation = get_owned_operation(db, user_id, operation_id).await?;
    operation.delete(db).await?;
    info!(operation_id, user_id, "Operation deleted");
    Ok(())
}
