//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are scoped to the invoking user's own categories.

use crate::{
    bot::BotData,
    core::{category, user},
    entities::CategoryType,
    errors::Error,
};

/// Discord shows at most this many autocomplete choices.
const MAX_SUGGESTIONS: usize = 25;

/// Keeps the names containing `partial` (case-insensitive), sorted, capped
/// at the Discord limit.
#[must_use]
pub fn matching_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();

    matching.sort();
    matching.truncate(MAX_SUGGESTIONS);
    matching
}

/// Provides autocomplete suggestions for the author's category names.
///
/// Unregistered users and database failures get no suggestions.
pub async fn autocomplete_category_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let discord_id = ctx.author().id.to_string();

    let Ok(Some(user)) = user::get_user_by_discord_id(db, &discord_id).await else {
        return Vec::new();
    };
    let Ok(categories) = category::get_categories_for_user(db, user.id).await else {
        return Vec::new();
    };

    matching_names(categories.into_iter().map(|c| c.name), partial)
}

/// Provides autocomplete suggestions for category types.
#[allow(clippy::unused_async)] // poise awaits every autocomplete callback
pub async fn autocomplete_category_type(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let types = [CategoryType::Income, CategoryType::Expense];
    matching_names(types.iter().map(|t| t.label().to_string()), partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_names_filters_case_insensitively_and_sorts() {
        let names = vec![
            "Транспорт".to_string(),
            "Продукты".to_string(),
            "Подарки".to_string(),
            "Зарплата".to_string(),
        ];

        assert_eq!(
            matching_names(names.clone(), "п"),
            vec!["Зарплата", "Подарки", "Продукты", "Транспорт"]
        );
        assert_eq!(matching_names(names.clone(), "пр"), vec!["Продукты"]);
        assert_eq!(matching_names(names.clone(), "ЗАР"), vec!["Зарплата"]);
        assert_eq!(matching_names(names, "").len(), 4);
    }

    #[test]
    fn test_matching_names_caps_suggestions() {
        let names = (0..40).map(|i| format!("Категория {i:02}"));
        assert_eq!(matching_names(names, "").len(), MAX_SUGGESTIONS);
    }
}
