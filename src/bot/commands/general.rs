//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**PocketLedger — справка**\n\
        Учёт доходов и расходов по категориям.\n\n\
        **Профиль**\n\
        • `/register <имя>` - Создать профиль.\n\
        • `/profile show` - Показать профиль и расходы за месяц.\n\
        • `/profile rename <имя>` - Изменить имя профиля.\n\
        • `/budget set <сумма>` - Установить месячный лимит расходов (0 - без лимита).\n\
        • `/budget status` - Проверить расходы относительно лимита.\n\n\
        **Категории**\n\
        • `/category add <название> <тип> [цвет]` - Добавить категорию.\n\
        • `/category list` - Список категорий.\n\
        • `/category edit <название> [новое название] [цвет] [тип]` - Изменить категорию.\n\
        • `/category delete <название>` - Удалить категорию вместе с её операциями.\n\n\
        **Операции**\n\
        • `/operation add <категория> <сумма> <описание> [дата]` - Записать операцию.\n\
        • `/operation edit <id> ...` - Изменить операцию.\n\
        • `/operation delete <id>` - Удалить операцию.\n\n\
        **Аналитика**\n\
        • `/operations [фильтры]` - Последние операции.\n\
        • `/stats [фильтры]` - Суммы доходов, расходов и баланс.\n\
        • `/chart <вид> [фильтры]` - Данные для графика.\n\n\
        Фильтры: категория, период (всё, неделя, месяц, год, выбранный год, выбранный месяц), год, месяц и тип данных.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
