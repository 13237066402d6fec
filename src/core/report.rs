//! Report formatting.
//!
//! Turns engine output into display strings: amounts, dates, operation
//! summaries and a text rendering of chart data for chat messages. Nothing
//! here touches the database.

use super::chart::ChartData;
use super::stats::{Statistics, magnitude};
use crate::entities::{CategoryType, category, operation};
use std::fmt::Write;

/// Name shown for operations whose category cannot be resolved
pub const UNCATEGORIZED_LABEL: &str = "Без категории";

/// Discord rejects messages longer than this many characters.
pub const MESSAGE_CHAR_LIMIT: usize = 2000;

/// Opening "```\n" plus closing "```"
const CODE_FENCES: &str = "```\n```";

/// Formats an amount the way the ledger displays money: absolute value, two
/// decimals, comma as decimal separator and non-breaking spaces between
/// thousands (`1 234,50`).
#[must_use]
pub fn format_amount(amount: f64) -> String {
    // Cast safety: display amounts are far below 2^53 cents.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cents = (magnitude(amount) * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(digit);
    }

    format!("{grouped},{fraction:02}")
}

/// Formats an ISO `YYYY-MM-DD` label as `DD.MM.YYYY`. Other labels pass
/// through unchanged.
#[must_use]
pub fn format_date_label(label: &str) -> String {
    chrono::NaiveDate::parse_from_str(label, "%Y-%m-%d")
        .map_or_else(|_| label.to_string(), |d| d.format("%d.%m.%Y").to_string())
}

/// Name of the operation's category, or [`UNCATEGORIZED_LABEL`].
#[must_use]
pub fn category_name(categories: &[category::Model], category_id: i64) -> &str {
    categories
        .iter()
        .find(|c| c.id == category_id)
        .map_or(UNCATEGORIZED_LABEL, |c| c.name.as_str())
}

/// Type of the operation's category, if the category is known.
#[must_use]
pub fn category_type(categories: &[category::Model], category_id: i64) -> Option<CategoryType> {
    categories
        .iter()
        .find(|c| c.id == category_id)
        .map(|c| c.category_type)
}

/// One line describing an operation, e.g.
/// `#12 | 15.01.2024 | Стипендия | Стипендия (доход) | +3 516,48 руб.`
#[must_use]
pub fn format_operation_summary(
    operation: &operation::Model,
    categories: &[category::Model],
    currency: &str,
) -> String {
    let sign = match category_type(categories, operation.category_id) {
        Some(CategoryType::Income) => "+",
        Some(CategoryType::Expense) => "-",
        None => "",
    };
    let kind = category_type(categories, operation.category_id)
        .map_or(String::new(), |t| format!(" ({})", t.label()));

    format!(
        "#{} | {} | {} | {}{} | {sign}{} {currency}",
        operation.id,
        operation.date.format("%d.%m.%Y"),
        operation.name,
        category_name(categories, operation.category_id),
        kind,
        format_amount(operation.amount),
    )
}

/// Multi-line summary of statistics.
pub fn format_statistics(stats: &Statistics, currency: &str) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "Сумма доходов: {} {currency} ({} оп.)",
        format_amount(stats.total_income),
        stats.income_count
    )?;
    writeln!(
        out,
        "Сумма расходов: {} {currency} ({} оп.)",
        format_amount(stats.total_expense),
        stats.expense_count
    )?;
    let sign = if stats.balance < 0.0 { "-" } else { "" };
    write!(out, "Баланс: {sign}{} {currency}", format_amount(stats.balance))?;
    Ok(out)
}

/// Creates a text-based bar like `████░░░░░░` for `value` out of `max`.
#[must_use]
pub fn format_bar(value: f64, max: f64, bar_length: usize) -> String {
    let ratio = if max > 0.0 {
        (magnitude(value) / max).clamp(0.0, 1.0)
    } else {
        0.0
    };

    // Cast safety: ratio ∈ [0, 1] and bar_length is small, so the product is in [0, bar_length].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (ratio * bar_length as f64).round() as usize;
    let empty = bar_length.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Joins `lines` with newlines, keeping as many leading lines as fit in
/// `max_chars` characters. When lines are dropped, or `hidden` more were
/// never passed in, a final `…и ещё N` line counts what is missing.
#[must_use]
pub fn fit_lines(lines: &[String], hidden: usize, max_chars: usize) -> String {
    let full = lines.join("\n");
    if hidden == 0 && full.chars().count() <= max_chars {
        return full;
    }

    // Room for the longest tail this call can produce, plus its newline
    let reserved = more_line(lines.len() + hidden).chars().count() + 1;
    let mut out = String::new();
    let mut used = 0;
    let mut kept = 0;
    for line in lines {
        let cost = line.chars().count() + usize::from(kept > 0);
        if used + cost + reserved > max_chars {
            break;
        }
        if kept > 0 {
            out.push('\n');
        }
        out.push_str(line);
        used += cost;
        kept += 1;
    }

    if kept > 0 {
        out.push('\n');
    }
    out.push_str(&more_line(lines.len() - kept + hidden));
    out
}

fn more_line(count: usize) -> String {
    format!("…и ещё {count}")
}

/// Renders chart data as text: one block per series, one bar per label.
/// Bars are scaled against the largest value across all series. Every
/// series gets an equal share of `max_chars`; rows past it are counted in a
/// `…и ещё N` line.
#[must_use]
pub fn render_chart_text(chart: &ChartData, currency: &str, max_chars: usize) -> String {
    let max = chart
        .datasets
        .iter()
        .flat_map(|d| d.data.iter().copied())
        .fold(0.0_f64, f64::max);
    let labels: Vec<String> = chart.labels.iter().map(|l| format_date_label(l)).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let share = max_chars / chart.datasets.len().max(1);

    let mut out = String::new();
    for (i, dataset) in chart.datasets.iter().enumerate() {
        let rows: Vec<String> = labels
            .iter()
            .zip(&dataset.data)
            .map(|(label, value)| {
                format!(
                    "  {label}{} {} {} {currency}",
                    " ".repeat(width - label.chars().count()),
                    format_bar(*value, max, 12),
                    format_amount(*value),
                )
            })
            .collect();

        // Separator, label line and trailing newline
        let overhead = usize::from(i > 0) + dataset.label.chars().count() + 2;
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&dataset.label);
        out.push('\n');
        out.push_str(&fit_lines(&rows, 0, share.saturating_sub(overhead)));
        out.push('\n');
    }
    out
}

/// Full chat message for a chart: a bold title, then the text rendering in
/// a code block, never longer than [`MESSAGE_CHAR_LIMIT`].
#[must_use]
pub fn render_chart_message(title: &str, chart: &ChartData, currency: &str) -> String {
    let header = format!("**📈 {title}**\n");
    if chart.is_placeholder() {
        return format!("{header}Нет данных для отображения.");
    }

    let budget = MESSAGE_CHAR_LIMIT.saturating_sub(header.chars().count() + CODE_FENCES.len());
    format!("{header}```\n{}```", render_chart_text(chart, currency, budget))
}

/// Chat message listing up to `limit` operations under `title`, never longer
/// than [`MESSAGE_CHAR_LIMIT`].
#[must_use]
pub fn format_operations_message(
    title: &str,
    operations: &[operation::Model],
    categories: &[category::Model],
    currency: &str,
    limit: usize,
) -> String {
    let header = format!("**{title}**\n");
    let lines: Vec<String> = operations
        .iter()
        .take(limit)
        .map(|op| format_operation_summary(op, categories, currency))
        .collect();
    let hidden = operations.len() - lines.len();

    let budget = MESSAGE_CHAR_LIMIT.saturating_sub(header.chars().count());
    format!("{header}{}", fit_lines(&lines, hidden, budget))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{
        chart::{ChartKind, build_chart_series},
        filter::DataType,
    };
    use crate::test_utils::{category_model, operation_model};

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0,00");
        assert_eq!(format_amount(5.5), "5,50");
        assert_eq!(format_amount(999.999), "1\u{a0}000,00");
        assert_eq!(format_amount(1_234_567.891), "1\u{a0}234\u{a0}567,89");
        assert_eq!(format_amount(-3516.48), "3\u{a0}516,48");
    }

    #[test]
    fn test_format_date_label() {
        assert_eq!(format_date_label("2024-01-15"), "15.01.2024");
        assert_eq!(format_date_label("Нет данных"), "Нет данных");
    }

    #[test]
    fn test_category_lookup_falls_back_to_uncategorized() {
        let categories = vec![category_model(1, "Зарплата", CategoryType::Income)];
        assert_eq!(category_name(&categories, 1), "Зарплата");
        assert_eq!(category_name(&categories, 2), UNCATEGORIZED_LABEL);
        assert_eq!(category_type(&categories, 2), None);
    }

    #[test]
    fn test_format_operation_summary() {
        let categories = vec![category_model(1, "Стипендия", CategoryType::Income)];
        let op = operation_model(12, 1, 3516.48, "2024-01-15T00:00:00Z");
        let line = format_operation_summary(&op, &categories, "руб.");
        assert_eq!(
            line,
            "#12 | 15.01.2024 | Test operation | Стипендия (доход) | +3\u{a0}516,48 руб."
        );

        let orphan = operation_model(13, 9, 10.0, "2024-01-16T00:00:00Z");
        let line = format_operation_summary(&orphan, &categories, "руб.");
        assert!(line.contains(UNCATEGORIZED_LABEL));
        assert!(line.ends_with("| 10,00 руб."));
    }

    #[test]
    fn test_format_statistics_negative_balance() {
        let stats = Statistics {
            total_income: 100.0,
            total_expense: 250.0,
            income_count: 1,
            expense_count: 2,
            balance: -150.0,
            uncategorized_count: 0,
        };
        let text = format_statistics(&stats, "руб.").unwrap();
        assert!(text.contains("Сумма доходов: 100,00 руб. (1 оп.)"));
        assert!(text.ends_with("Баланс: -150,00 руб."));
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 100.0, 10), "█████░░░░░");
        assert_eq!(format_bar(100.0, 100.0, 4), "████");
        assert_eq!(format_bar(10.0, 0.0, 4), "░░░░");
    }

    #[test]
    fn test_render_chart_text() {
        let categories = vec![
            category_model(1, "Продукты", CategoryType::Expense),
            category_model(2, "Кафе", CategoryType::Expense),
        ];
        let ops = vec![
            operation_model(1, 1, 100.0, "2024-01-01T00:00:00Z"),
            operation_model(2, 2, 50.0, "2024-01-02T00:00:00Z"),
        ];
        let chart = build_chart_series(&ops, &categories, ChartKind::Pie, DataType::Expense);

        let text = render_chart_text(&chart, "руб.", MESSAGE_CHAR_LIMIT);
        assert!(text.starts_with("Расходы\n"));
        assert!(text.contains("Продукты ████████████ 100,00 руб."));
        assert!(text.contains("Кафе     ██████░░░░░░ 50,00 руб."));
    }

    #[test]
    fn test_render_line_chart_formats_dates() {
        let categories = vec![category_model(1, "Зарплата", CategoryType::Income)];
        let ops = vec![operation_model(1, 1, 100.0, "2024-01-05T00:00:00Z")];
        let chart = build_chart_series(&ops, &categories, ChartKind::Line, DataType::Income);

        let text = render_chart_text(&chart, "руб.", MESSAGE_CHAR_LIMIT);
        assert!(text.contains("05.01.2024"));
    }

    #[test]
    fn test_fit_lines_keeps_everything_that_fits() {
        let lines = vec!["один".to_string(), "два".to_string()];
        assert_eq!(fit_lines(&lines, 0, 100), "один\nдва");
        assert_eq!(fit_lines(&lines, 3, 100), "один\nдва\n…и ещё 3");
    }

    #[test]
    fn test_fit_lines_counts_dropped_lines() {
        let lines: Vec<String> = (0..10).map(|i| format!("строка {i}")).collect();
        let text = fit_lines(&lines, 2, 40);

        assert!(text.chars().count() <= 40);
        assert!(text.starts_with("строка 0\n"));
        let kept = text.lines().count() - 1;
        assert!(text.ends_with(&format!("…и ещё {}", 10 - kept + 2)));
    }

    #[test]
    fn test_month_long_line_chart_message_fits_discord_limit() {
        let categories = vec![
            category_model(1, "Зарплата", CategoryType::Income),
            category_model(2, "Продукты", CategoryType::Expense),
        ];
        let mut ops = Vec::new();
        for day in 1..=31 {
            let date = format!("2024-01-{day:02}T12:00:00Z");
            ops.push(operation_model(day * 2, 1, 5000.0, &date));
            ops.push(operation_model(day * 2 + 1, 2, 1200.0, &date));
        }
        let chart = build_chart_series(&ops, &categories, ChartKind::Line, DataType::All);
        assert_eq!(chart.labels.len(), 31);

        let message = render_chart_message("Линейный график", &chart, "руб.");
        assert!(message.chars().count() <= MESSAGE_CHAR_LIMIT);
        assert!(message.starts_with("**📈 Линейный график**\n```\n"));
        assert!(message.ends_with("```"));
        assert!(message.contains("Доходы\n  01.01.2024"));
        assert!(message.contains("Расходы\n  01.01.2024"));
        assert!(message.contains("…и ещё"));
    }

    #[test]
    fn test_placeholder_chart_message() {
        let chart = ChartData::placeholder();
        let message = render_chart_message("Круговая диаграмма", &chart, "руб.");
        assert_eq!(message, "**📈 Круговая диаграмма**\nНет данных для отображения.");
    }

    #[test]
    fn test_operations_message_with_long_names_fits_discord_limit() {
        let categories = vec![category_model(1, "Продукты", CategoryType::Expense)];
        let ops: Vec<operation::Model> = (1..=10)
            .map(|id| {
                let mut op = operation_model(id, 1, 100.0, "2024-01-15T00:00:00Z");
                op.name = "я".repeat(256);
                op
            })
            .collect();

        let message = format_operations_message("📋 Последние операции", &ops, &categories, "руб.", 10);
        assert!(message.chars().count() <= MESSAGE_CHAR_LIMIT);
        assert!(message.starts_with("**📋 Последние операции**\n#1 | "));
        assert!(message.contains("…и ещё"));
    }

    #[test]
    fn test_operations_message_counts_operations_past_limit() {
        let categories = vec![category_model(1, "Продукты", CategoryType::Expense)];
        let ops: Vec<operation::Model> = (1..=12)
            .map(|id| operation_model(id, 1, 100.0, "2024-01-15T00:00:00Z"))
            .collect();

        let message = format_operations_message("📋 Последние операции", &ops, &categories, "руб.", 10);
        assert_eq!(message.lines().count(), 12);
        assert!(message.ends_with("…и ещё 2"));
    }
}
