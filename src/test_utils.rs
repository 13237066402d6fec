//! Shared test utilities for `PocketLedger`.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and building in-memory
//! models for the pure aggregation engine.

use crate::{
    core::{category, operation, user},
    entities::{self, CategoryType},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;

/// Parses an RFC 3339 timestamp. Panics on malformed input, which is fine for
/// literals in tests.
#[allow(clippy::expect_used)]
#[must_use]
pub fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .expect("test timestamp must be RFC 3339")
        .with_timezone(&Utc)
}

/// Builds an operation model without touching the database.
///
/// # Defaults
/// * `user_id`: 1
/// * `name`: `"Test operation"`
#[must_use]
pub fn operation_model(
    id: i64,
    category_id: i64,
    amount: f64,
    date: &str,
) -> entities::operation::Model {
    entities::operation::Model {
        id,
        user_id: 1,
        category_id,
        name: "Test operation".to_string(),
        date: at(date),
        amount,
    }
}

/// Builds a category model without touching the database.
///
/// # Defaults
/// * `user_id`: 1
/// * `color`: the default category color
#[must_use]
pub fn category_model(id: i64, name: &str, category_type: CategoryType) -> entities::category::Model {
    entities::category::Model {
        id,
        user_id: 1,
        name: name.to_string(),
        color: category::DEFAULT_COLOR.to_string(),
        category_type,
    }
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test user for `discord_id`.
///
/// # Defaults
/// * `name`: `"Test User"`
/// * `budget_limit`: 0.0 (no limit)
pub async fn create_test_user(db: &DatabaseConnection, discord_id: &str) -> Result<entities::user::Model> {
    user::register_user(db, discord_id.to_string(), "Test User".to_string()).await
}

/// Sets up a database with one registered user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "1001").await?;
    Ok((db, user))
}

/// Creates a test category with the default color.
pub async fn create_test_category(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    category_type: CategoryType,
) -> Result<entities::category::Model> {
    category::create_category(db, user_id, name.to_string(), None, category_type).await
}

/// Creates a test operation with sensible defaults.
///
/// # Defaults
/// * `name`: `"Test operation"`
/// * `date`: the current time
pub async fn create_test_operation(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount: f64,
) -> Result<entities::operation::Model> {
    operation::create_operation(
        db,
        user_id,
        category_id,
        "Test operation".to_string(),
        amount,
        Utc::now(),
    )
    .await
}

/// Creates a test operation at a specific RFC 3339 date.
pub async fn create_custom_operation(
    db: &DatabaseConnection,
    user_id: i64,
    category_id: i64,
    amount: f64,
    date: &str,
) -> Result<entities::operation::Model> {
    operation::create_operation(
        db,
        user_id,
        category_id,
        "Test operation".to_string(),
        amount,
        at(date),
    )
    .await
}
