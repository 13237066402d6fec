//! Profile Discord commands - `register`, `profile show|rename` and `budget`.
//!
//! A profile links a Discord account to a ledger. The monthly budget limit
//! lives on the profile and is checked against the current month's expenses.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{ledger::Ledger, report, user},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    /// Creates a ledger profile for the command author.
    #[poise::command(slash_command, prefix_command)]
    pub async fn register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Имя для профиля"] name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let discord_id = ctx.author().id.to_string();

        let user = user::register_user(db, discord_id, name).await?;

        ctx.say(format!(
            "✅ Профиль '{}' создан. Добавьте категории командой `/category add`.",
            user.name
        ))
        .await?;
        Ok(())
    }

    /// Parent command for the author's profile.
    #[poise::command(slash_command, subcommands("profile_show", "profile_rename"))]
    pub async fn profile(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Профиль. Подкоманды:\n\
            `/profile show` - Профиль и расходы за месяц\n\
            `/profile rename` - Изменить имя профиля";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the author's profile with this month's expenses.
    #[poise::command(slash_command, rename = "show")]
    pub async fn profile_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let currency = data.config.currency.as_str();
        let user = user::require_user(&data.database, &ctx.author().id.to_string()).await?;
        let ledger = Ledger::load(&data.database, user).await?;
        let now = Utc::now();

        let budget = if ledger.user.budget_limit > 0.0 {
            format!("{} {currency}", report::format_amount(ledger.user.budget_limit))
        } else {
            "не установлен".to_string()
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("👤 {}", ledger.user.name))
            .color(0x0056_1ECB)
            .field(
                "Расходы за месяц",
                format!("{} {currency}", report::format_amount(ledger.month_expense(now))),
                true,
            )
            .field("Лимит бюджета", budget, true)
            .field("Категорий", ledger.categories.len().to_string(), true)
            .field("Операций", ledger.operations.len().to_string(), true)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "С нами с {}",
                ledger.user.created_at.format("%d.%m.%Y")
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Changes the display name of the author's profile.
    #[poise::command(slash_command, rename = "rename")]
    pub async fn profile_rename(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Новое имя"] name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        let old_name = user.name.clone();

        let user = user::update_user_name(db, user, name).await?;

        ctx.say(format!("✏️ Профиль '{old_name}' переименован в '{}'.", user.name))
            .await?;
        Ok(())
    }

    /// Parent command for the monthly budget limit.
    #[poise::command(slash_command, subcommands("budget_set", "budget_status"))]
    pub async fn budget(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Управление бюджетом. Подкоманды:\n\
            `/budget set` - Установить месячный лимит\n\
            `/budget status` - Расходы относительно лимита";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sets the monthly expense limit. Zero removes the limit.
    #[poise::command(slash_command, rename = "set")]
    pub async fn budget_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Месячный лимит расходов (0 - без лимита)"] amount: f64,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.config.currency.as_str();
        let user = user::require_user(&data.database, &ctx.author().id.to_string()).await?;
        let user = user::set_budget_limit(&data.database, user, amount).await?;

        if user.budget_limit > 0.0 {
            ctx.say(format!(
                "✅ Лимит бюджета: {} {currency} в месяц.",
                report::format_amount(user.budget_limit)
            ))
            .await?;
        } else {
            ctx.say("✅ Лимит бюджета снят.").await?;
        }
        Ok(())
    }

    /// Compares this month's expenses against the limit.
    #[poise::command(slash_command, rename = "status")]
    pub async fn budget_status(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let currency = data.config.currency.as_str();
        let user = user::require_user(&data.database, &ctx.author().id.to_string()).await?;

        if user.budget_limit <= 0.0 {
            ctx.say("ℹ️ Лимит бюджета не установлен. Используйте `/budget set`.")
                .await?;
            return Ok(());
        }

        let ledger = Ledger::load(&data.database, user).await?;
        let now = Utc::now();
        let spent = ledger.month_expense(now);

        let message = ledger.budget_warning(now, currency).map_or_else(
            || {
                format!(
                    "✅ Расходы за месяц: {} {currency} {} (лимит {} {currency})",
                    report::format_amount(spent),
                    report::format_bar(spent, ledger.user.budget_limit, 10),
                    report::format_amount(ledger.user.budget_limit),
                )
            },
            |warning| format!("⚠️ {}", warning.message),
        );

        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
