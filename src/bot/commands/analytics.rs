//! Analytics Discord commands - `operations`, `stats` and `chart`.
//!
//! All three share the same filter parameters, turn them into a
//! [`FilterSpec`] and run the aggregation engine over the author's ledger.

use crate::{
    core::filter::{CategoryFilter, DataType, DateFilter, FilterSpec},
    entities::category,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};

/// Raw filter options as they arrive from a slash command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Category name, `"all"` or a numeric id
    pub category: Option<String>,
    /// Time window
    pub period: DateFilter,
    /// Year for the selected-year and selected-month windows
    pub year: Option<i32>,
    /// Month (1-12) for the selected-month window
    pub month: Option<u32>,
    /// Income/expense restriction
    pub data_type: DataType,
}

/// Resolves command options into a [`FilterSpec`] against the user's
/// categories.
///
/// A category is looked up by name first; anything else goes through
/// [`CategoryFilter`]'s parser, so `"all"` and numeric ids also work.
pub fn resolve_filter(
    options: &FilterOptions,
    categories: &[category::Model],
    now: DateTime<Utc>,
) -> Result<FilterSpec> {
    let mut spec = FilterSpec {
        date: options.period,
        data_type: options.data_type,
        ..FilterSpec::all(now)
    };

    if let Some(name) = options.category.as_deref() {
        spec.category = match categories.iter().find(|c| c.name == name.trim()) {
            Some(found) => CategoryFilter::Category(found.id),
            None => name.parse::<CategoryFilter>().map_err(|_| Error::CategoryNotFound {
                name: name.trim().to_string(),
            })?,
        };
    }
    if let Some(year) = options.year {
        spec.selected_year = year;
    }
    if let Some(month) = options.month {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidFilter {
                field: "month",
                value: month.to_string(),
            });
        }
        spec.selected_month = month;
    }

    Ok(spec)
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{FilterOptions, resolve_filter};
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            category,
            chart::ChartKind,
            filter::{DataType, DateFilter, FilterSpec},
            ledger::Ledger,
            operation::OperationQuery,
            report, user,
        },
        errors::{Error, Result},
    };
    use chrono::{DateTime, Utc};
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PeriodChoice {
        #[name = "всё время"]
        All,
        #[name = "неделя"]
        Week,
        #[name = "месяц"]
        Month,
        #[name = "год"]
        Year,
        #[name = "выбранный год"]
        SelectedYear,
        #[name = "выбранный месяц"]
        SelectedMonth,
    }

    impl From<PeriodChoice> for DateFilter {
        fn from(choice: PeriodChoice) -> Self {
            match choice {
                PeriodChoice::All => Self::All,
                PeriodChoice::Week => Self::Week,
                PeriodChoice::Month => Self::Month,
                PeriodChoice::Year => Self::Year,
                PeriodChoice::SelectedYear => Self::SelectedYear,
                PeriodChoice::SelectedMonth => Self::SelectedMonth,
            }
        }
    }

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum DataTypeChoice {
        #[name = "доходы и расходы"]
        All,
        #[name = "доходы"]
        Income,
        #[name = "расходы"]
        Expense,
    }

    impl From<DataTypeChoice> for DataType {
        fn from(choice: DataTypeChoice) -> Self {
            match choice {
                DataTypeChoice::All => Self::All,
                DataTypeChoice::Income => Self::Income,
                DataTypeChoice::Expense => Self::Expense,
            }
        }
    }

    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ChartChoice {
        #[name = "линейный"]
        Line,
        #[name = "столбчатый"]
        Bar,
        #[name = "круговой"]
        Pie,
        #[name = "полярный"]
        Polar,
    }

    impl From<ChartChoice> for ChartKind {
        fn from(choice: ChartChoice) -> Self {
            match choice {
                ChartChoice::Line => Self::Line,
                ChartChoice::Bar => Self::Bar,
                ChartChoice::Pie => Self::Pie,
                ChartChoice::Polar => Self::Polar,
            }
        }
    }

    fn options(
        category: Option<String>,
        period: Option<PeriodChoice>,
        year: Option<i32>,
        month: Option<u32>,
        data_type: Option<DataTypeChoice>,
    ) -> FilterOptions {
        FilterOptions {
            category,
            period: period.map(Into::into).unwrap_or_default(),
            year,
            month,
            data_type: data_type.map(Into::into).unwrap_or_default(),
        }
    }

    async fn load_ledger(ctx: poise::Context<'_, BotData, Error>) -> Result<Ledger> {
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        Ledger::load(db, user).await
    }

    /// Resolves the filter, then loads only the operations it can keep.
    async fn load_filtered_ledger(
        ctx: poise::Context<'_, BotData, Error>,
        options: &FilterOptions,
        now: DateTime<Utc>,
    ) -> Result<(FilterSpec, Ledger)> {
        let db = &ctx.data().database;
        let user = user::require_user(db, &ctx.author().id.to_string()).await?;
        let categories = category::get_categories_for_user(db, user.id).await?;
        let spec = resolve_filter(options, &categories, now)?;

        let query = OperationQuery::for_filter(&spec, now);
        let ledger = Ledger::load_with_categories(db, user, categories, &query).await?;
        Ok((spec, ledger))
    }

    /// Lists the author's most recent operations matching the filters.
    #[poise::command(slash_command, prefix_command)]
    pub async fn operations(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Категория"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category: Option<String>,
        #[description = "Период"] period: Option<PeriodChoice>,
        #[description = "Год для выбранного периода"] year: Option<i32>,
        #[description = "Месяц (1-12) для выбранного периода"]
        #[min = 1]
        #[max = 12]
        month: Option<u32>,
        #[description = "Тип данных"] data_type: Option<DataTypeChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.config.currency.as_str();
        let limit = data.config.recent_operations_limit;
        let now = Utc::now();

        let (spec, ledger) =
            load_filtered_ledger(ctx, &options(category, period, year, month, data_type), now)
                .await?;
        let filtered = ledger.filtered(&spec, now);

        if filtered.is_empty() {
            ctx.say("📭 Нет операций по выбранным фильтрам.").await?;
            return Ok(());
        }

        let response = report::format_operations_message(
            &format!("📋 Последние операции (всего {})", filtered.len()),
            &filtered,
            &ledger.categories,
            currency,
            limit,
        );

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows income, expense and balance totals for the filters.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stats(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Категория"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category: Option<String>,
        #[description = "Период"] period: Option<PeriodChoice>,
        #[description = "Год для выбранного периода"] year: Option<i32>,
        #[description = "Месяц (1-12) для выбранного периода"]
        #[min = 1]
        #[max = 12]
        month: Option<u32>,
        #[description = "Тип данных"] data_type: Option<DataTypeChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.config.currency.as_str();
        let ledger = load_ledger(ctx).await?;
        let now = Utc::now();

        let spec = resolve_filter(
            &options(category, period, year, month, data_type),
            &ledger.categories,
            now,
        )?;
        let stats = ledger.statistics(&spec, now);

        let mut description = report::format_statistics(&stats, currency)?;
        if stats.uncategorized_count > 0 {
            write!(
                description,
                "\n{}: {} оп. не учтено",
                report::UNCATEGORIZED_LABEL,
                stats.uncategorized_count
            )?;
        }

        let years = ledger.years();
        let footer = if years.is_empty() {
            format!("Период: {}", spec.date)
        } else {
            let years: Vec<String> = years.iter().map(ToString::to_string).collect();
            format!("Период: {} | Годы с операциями: {}", spec.date, years.join(", "))
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("📊 Статистика {}", spec.data_type.title()))
            .description(description)
            .color(if stats.balance < 0.0 { 0x00E7_4C3C } else { 0x002E_CC71 })
            .footer(serenity::CreateEmbedFooter::new(footer));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows chart data for the filters as text bars.
    #[poise::command(slash_command, prefix_command)]
    pub async fn chart(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Вид графика"] kind: ChartChoice,
        #[description = "Категория"]
        #[autocomplete = "autocomplete::autocomplete_category_name"]
        category: Option<String>,
        #[description = "Период"] period: Option<PeriodChoice>,
        #[description = "Год для выбранного периода"] year: Option<i32>,
        #[description = "Месяц (1-12) для выбранного периода"]
        #[min = 1]
        #[max = 12]
        month: Option<u32>,
        #[description = "Тип данных"] data_type: Option<DataTypeChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let currency = data.config.currency.as_str();
        let now = Utc::now();
        let kind = ChartKind::from(kind);

        let (spec, ledger) =
            load_filtered_ledger(ctx, &options(category, period, year, month, data_type), now)
                .await?;
        let chart = ledger.chart(&spec, kind, now);

        let title = format!("{} {}", kind.title(), spec.data_type.title());
        let response = report::render_chart_message(&title, &chart, currency);

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
