//! User business logic - registration, lookup and the monthly budget limit.

use super::clean_name;
use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Registers a new user for a Discord account.
///
/// Fails with `UserAlreadyRegistered` when the Discord account already has a
/// profile. The budget limit starts at zero (no limit).
pub async fn register_user(
    db: &DatabaseConnection,
    discord_id: String,
    name: String,
) -> Result<user::Model> {
    let name = clean_name("User name", &name)?;

    if get_user_by_discord_id(db, &discord_id).await?.is_some() {
        return Err(Error::UserAlreadyRegistered { discord_id });
    }

    let user = user::ActiveModel {
        discord_id: Set(discord_id),
        name: Set(name),
        budget_limit: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let user = user.insert(db).await?;
    info!(user_id = user.id, "Registered new user");
    Ok(user)
}

/// Finds the profile linked to a Discord account.
pub async fn get_user_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Like [`get_user_by_discord_id`] but a missing profile is an error.
pub async fn require_user(db: &DatabaseConnection, discord_id: &str) -> Result<user::Model> {
    get_user_by_discord_id(db, discord_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            discord_id: discord_id.to_string(),
        })
}

/// Renames a user.
pub async fn update_user_name(
    db: &DatabaseConnection,
    user: user::Model,
    name: String,
) -> Result<user::Model> {
    let name = clean_name("User name", &name)?;
    let mut active_model: user::ActiveModel = user.into();
    active_model.name = Set(name);
    active_model.update(db).await.map_err(Into::into)
}

/// Sets the monthly budget limit. Zero removes the limit.
pub async fn set_budget_limit(
    db: &DatabaseConnection,
    user: user::Model,
    budget_limit: f64,
) -> Result<user::Model> {
    if !budget_limit.is_finite() || budget_limit < 0.0 {
        return Err(Error::InvalidAmount {
            amount: budget_limit,
        });
    }

    let user_id = user.id;
    let mut active_model: user::ActiveModel = user.into();
    active_model.budget_limit = Set(budget_limit);
    let updated = active_model.update(db).await?;
    info!(user_id, budget_limit, "Budget limit updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_user() -> Result<()> {
        let db = setup_test_db().await?;

        let user = register_user(&db, "1001".to_string(), "  Иван  ".to_string()).await?;
        assert_eq!(user.name, "Иван");
        assert_eq!(user.discord_id, "1001");
        assert_eq!(user.budget_limit, 0.0);

        let found = get_user_by_discord_id(&db, "1001").await?;
        assert_eq!(found.map(|u| u.id), Some(user.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_twice_fails() -> Result<()> {
        let db = setup_test_db().await?;
        register_user(&db, "1001".to_string(), "Иван".to_string()).await?;

        let result = register_user(&db, "1001".to_string(), "Пётр".to_string()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::UserAlreadyRegistered { discord_id } if discord_id == "1001"
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_register_requires_name() -> Result<()> {
        let db = setup_test_db().await?;
        let result = register_user(&db, "1001".to_string(), "   ".to_string()).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_require_user_missing() -> Result<()> {
        let db = setup_test_db().await?;
        let result = require_user(&db, "nobody").await;
        assert!(matches!(result.unwrap_err(), Error::UserNotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_budget_limit() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "1001").await?;

        let user = set_budget_limit(&db, user, 10_000.0).await?;
        assert_eq!(user.budget_limit, 10_000.0);

        let reloaded = require_user(&db, "1001").await?;
        assert_eq!(reloaded.budget_limit, 10_000.0);

        let result = set_budget_limit(&db, reloaded.clone(), -1.0).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        let result = set_budget_limit(&db, reloaded, f64::INFINITY).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_name() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "1001").await?;

        let user = update_user_name(&db, user, "Мария".to_string()).await?;
        assert_eq!(user.name, "Мария");
        Ok(())
    }
}
