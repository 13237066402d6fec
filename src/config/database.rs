//! Database configuration module for pocket-ledger.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{Category, Operation, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::{debug, info};

/// Default location of the database when neither the config file nor the
/// environment provides one.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pocket_ledger.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to database at {database_url}");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
///
/// Tables are created parent-first (users, categories, operations) so the
/// foreign keys generated from the entity relations always resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut user_table = schema.create_table_from_entity(User);
    let mut category_table = schema.create_table_from_entity(Category);
    let mut operation_table = schema.create_table_from_entity(Operation);

    db.execute(builder.build(user_table.if_not_exists())).await?;
    db.execute(builder.build(category_table.if_not_exists())).await?;
    db.execute(builder.build(operation_table.if_not_exists()))
        .await?;

    info!("Database tables are ready");
    Ok(())
}

/// Connects and makes sure the schema exists. Used by the binary at startup.
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection> {
    let db = create_connection(database_url).await?;
    create_tables(&db).await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CategoryModel, OperationModel, UserModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<CategoryModel> = Category::find().limit(1).all(&db).await?;
        let _: Vec<OperationModel> = Operation::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_init_db_in_memory() -> Result<()> {
        let db = init_db("sqlite::memory:").await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        Ok(())
    }
}
