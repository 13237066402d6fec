//! Operation Discord commands - `operation add|edit|delete`.
//!
//! After an expense is recorded or changed, the author's monthly budget is
//! re-checked and any warning is appended to the reply.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            category,
            filter::{DateFilter, FilterSpec},
            ledger::Ledger,
            operation::{self, OperationQuery, OperationUpdate, parse_operation_date},
            report, user,
        },
        entities::{CategoryType, user as user_entity},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use sea_orm::DatabaseConnection;

    /// Budget warning line for the user's current month, if any.
    async fn budget_note(
        db: &DatabaseConnection,
        user: user_entity::Model,
        currency: &str,
    ) -> Result<Option<String>> {
        if user.budget_limit <= 0.0 {
            return Ok(None);
        }
        let now = Utc::now();
        let this_month = FilterSpec {
            date: DateFilter::SelectedMonth,
            ..FilterSpec::all(now)
        };
        let categories = category::get_categories_for_user(db, user.id).await?;
        let query = OperationQuery::for_filter(&this_month, now);
        let ledger = Ledger::load_with_categories(db, user, categories, &query).await?;
        Ok(ledger
            .budget_warning(now, currency)
            .map(|warning| format!("⚠️ {}", warning.message)))
    }

    /// Parent command for recording and changing operations.
    #[poise::command(
        slash_command,
        subcommands("operation_add", "operation_edit", "operation_delete")
    )]
    pub async fn operation(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Операции. Подкоманды:\n\
            `/operation add` - Записать доход или расход\n\
            `/operation edit` - Изменить операцию\n\
            `/operation delete` - Удалить операцию";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Records an income or expense in one of the author's categories.
    #[poise::command(slash_command, rename = "add")]
    pub async fn operation_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Категория операции"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category_name: String,
        #[description = "Сумма (положительное число)"] amount: f64,
        #[description = "Описание (например, 'Обед')"] name: String,
        #[description = "Дата в формате ГГГГ-ММ-ДД (по умолчанию сейчас)"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let currency = data.config.currency.as_str();

        let date = date
            .as_deref()
            .map(parse_operation_date)
            .transpose()?
            .unwrap_or_else(Utc::now);
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        let target = category::require_category_by_name(db, user.id, &category_name).await?;

        let created = operation::create_operation(db, user.id, target.id, name, amount, date).await?;
        let categories = [target];

        let mut response = format!(
            "✅ Операция записана:\n{}",
            report::format_operation_summary(&created, &categories, currency)
        );
        if categories[0].category_type == CategoryType::Expense {
            if let Some(note) = budget_note(db, user, currency).await? {
                response.push('\n');
                response.push_str(&note);
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Changes an existing operation. Omitted fields stay as they are.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn operation_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Номер операции"] id: i64,
        #[description = "Новая категория"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category_name: Option<String>,
        #[description = "Новая сумма"] amount: Option<f64>,
        #[description = "Новое описание"] name: Option<String>,
        #[description = "Новая дата в формате ГГГГ-ММ-ДД"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;
        let currency = data.config.currency.as_str();

        if category_name.is_none() && amount.is_none() && name.is_none() && date.is_none() {
            ctx.say("ℹ️ Укажите хотя бы одно поле для изменения.").await?;
            return Ok(());
        }

        let date = date.as_deref().map(parse_operation_date).transpose()?;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        let category_id = match category_name {
            Some(category_name) => {
                Some(category::require_category_by_name(db, user.id, &category_name).await?.id)
            }
            None => None,
        };

        let updated = operation::update_operation(
            db,
            user.id,
            id,
            OperationUpdate {
                name,
                date,
                amount,
                category_id,
            },
        )
        .await?;
        let categories = category::get_categories_for_user(db, user.id).await?;

        let mut response = format!(
            "✏️ Операция изменена:\n{}",
            report::format_operation_summary(&updated, &categories, currency)
        );
        if let Some(note) = budget_note(db, user, currency).await? {
            response.push('\n');
            response.push_str(&note);
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Deletes one of the author's operations.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn operation_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Номер операции"] id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;

        operation::delete_operation(db, user.id, id).await?;

        ctx.say(format!("🗑️ Операция #{id} удалена.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
