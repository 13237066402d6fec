//! Category Discord commands - `category add|list|edit|delete`.
//!
//! Categories are addressed by name in commands; names are unique per user.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            category::{self, CategoryUpdate},
            report, user,
        },
        entities::CategoryType,
        errors::{Error, Result},
    };

    /// Parent command for managing income and expense categories.
    #[poise::command(
        slash_command,
        subcommands("category_add", "category_list", "category_edit", "category_delete")
    )]
    pub async fn category(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Управление категориями. Подкоманды:\n\
            `/category add` - Добавить категорию\n\
            `/category list` - Список категорий\n\
            `/category edit` - Изменить название, цвет или тип\n\
            `/category delete` - Удалить категорию и все её операции";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a new category.
    #[poise::command(slash_command, rename = "add")]
    pub async fn category_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Название категории (например, 'Продукты')"] name: String,
        #[description = "Тип: доход или расход"]
        #[autocomplete = "autocomplete::autocomplete_category_type"]
        category_type: String,
        #[description = "Цвет в формате #rrggbb"] color: Option<String>,
    ) -> Result<()> {
        let category_type: CategoryType = category_type.parse()?;
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;

        let category = category::create_category(db, user.id, name, color, category_type).await?;

        ctx.say(format!(
            "✅ Категория '{}' ({}, {}) добавлена.",
            category.name,
            category.category_type.label(),
            category.color
        ))
        .await?;
        Ok(())
    }

    /// Lists the author's categories grouped by type.
    #[poise::command(slash_command, rename = "list")]
    pub async fn category_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        let categories = category::get_categories_for_user(db, user.id).await?;

        if categories.is_empty() {
            ctx.say("📂 Категорий пока нет. Добавьте первую командой `/category add`.")
                .await?;
            return Ok(());
        }

        let header = "**📂 Ваши категории**\n";
        let mut lines = Vec::new();
        for category_type in [CategoryType::Income, CategoryType::Expense] {
            lines.push(format!("\n**{}**", category_type.label()));
            for category in categories.iter().filter(|c| c.category_type == category_type) {
                lines.push(format!("• {} `{}`", category.name, category.color));
            }
        }
        let budget = report::MESSAGE_CHAR_LIMIT.saturating_sub(header.chars().count());

        ctx.say(format!("{header}{}", report::fit_lines(&lines, 0, budget)))
            .await?;
        Ok(())
    }

    /// Renames, recolors or retypes one of the author's categories.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn category_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Категория для изменения"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        name: String,
        #[description = "Новое название"] new_name: Option<String>,
        #[description = "Новый цвет в формате #rrggbb"] color: Option<String>,
        #[description = "Новый тип: доход или расход"]
        #[autocomplete = "autocomplete::autocomplete_category_type"]
        category_type: Option<String>,
    ) -> Result<()> {
        if new_name.is_none() && color.is_none() && category_type.is_none() {
            ctx.say("ℹ️ Укажите хотя бы одно поле для изменения.").await?;
            return Ok(());
        }

        let category_type = category_type
            .as_deref()
            .map(str::parse::<CategoryType>)
            .transpose()?;
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        let target = category::require_category_by_name(db, user.id, &name).await?;

        let updated = category::update_category(
            db,
            user.id,
            target.id,
            CategoryUpdate {
                name: new_name,
                color,
                category_type,
            },
        )
        .await?;

        ctx.say(format!(
            "✏️ Категория '{}' изменена: '{}' ({}, {}).",
            target.name,
            updated.name,
            updated.category_type.label(),
            updated.color
        ))
        .await?;
        Ok(())
    }

    /// Deletes a category together with all of its operations.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn category_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Категория для удаления"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        let target = category::require_category_by_name(db, user.id, &name).await?;

        let removed = category::delete_category(db, user.id, target.id).await?;

        ctx.say(format!(
            "🗑️ Категория '{}' удалена вместе с операциями: {removed}.",
            target.name
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
