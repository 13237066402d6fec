//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `PocketLedger` application,
//! including all slash commands, autocomplete handlers, and bot context management.

/// Discord command implementations (profile, category, operation, analytics, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::AppConfig,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the application
/// configuration that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Application settings (currency, listing limits)
    pub config: AppConfig,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection
    /// and configuration.
    #[must_use]
    pub const fn new(database: DatabaseConnection, config: AppConfig) -> Self {
        Self { database, config }
    }
}

/// Text shown to the user when a command fails with `error`.
///
/// Validation and lookup failures are explained; storage and gateway failures
/// get a generic message and are only detailed in the logs.
#[must_use]
pub fn user_facing_message(error: &Error) -> String {
    match error {
        Error::UserNotFound { .. } => {
            "❌ Профиль не найден. Зарегистрируйтесь командой `/register`.".to_string()
        }
        Error::UserAlreadyRegistered { .. } => "⚠️ Вы уже зарегистрированы.".to_string(),
        Error::CategoryNotFound { name } => format!("❌ Категория '{name}' не найдена."),
        Error::OperationNotFound { id } => format!("❌ Операция #{id} не найдена."),
        Error::Forbidden { .. } => "❌ Нет доступа к этой записи.".to_string(),
        Error::InvalidAmount { .. } => {
            "❌ Некорректная сумма: нужно конечное положительное число.".to_string()
        }
        Error::InvalidColor { color } => {
            format!("❌ Некорректный цвет '{color}': ожидается формат #rrggbb.")
        }
        Error::InvalidCategoryType { value } => {
            format!("❌ Неизвестный тип категории '{value}': используйте доход или расход.")
        }
        Error::InvalidDate { value } => {
            format!("❌ Некорректная дата '{value}': используйте ГГГГ-ММ-ДД.")
        }
        Error::InvalidFilter { field, value } => {
            format!("❌ Некорректное значение фильтра {field}: '{value}'.")
        }
        Error::Validation { message } => format!("❌ {message}"),
        Error::Config { .. } | Error::Database(_) | Error::Discord(_) | Error::Format(_) => {
            "❌ Что-то пошло не так. Попробуйте позже.".to_string()
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, "Command failed: {error:?}");
            if let Err(e) = ctx.say(user_facing_message(&error)).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework, registers the slash commands and runs the
/// gateway client until it stops.
///
/// Commands are registered in `config.dev_guild_id` when set (instant
/// updates while developing) and globally otherwise.
#[instrument(skip(token, config, database))]
pub async fn run_bot(token: String, config: AppConfig, database: DatabaseConnection) -> Result<()> {
    let dev_guild_id = config.dev_guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::register(),
                commands::profile(),
                commands::budget(),
                commands::category(),
                commands::operation(),
                commands::operations(),
                commands::stats(),
                commands::chart(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Some(guild_id) = dev_guild_id {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                        .await?;
                    info!(%guild_id, "Registered commands in development guild");
                } else {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Registered commands globally");
                }
                Ok(BotData::new(database, config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;

    Ok(())
}

pub use commands::*;
pub use handlers::*;
