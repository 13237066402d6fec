//! Monthly budget limit tracking.
//!
//! Compares the current calendar month's expenses against a user's budget
//! limit and derives a warning once spending approaches or passes it.

use super::{
    report::format_amount,
    stats::{index_categories, magnitude},
};
use crate::entities::{CategoryType, category, operation};
use chrono::{DateTime, Datelike, Utc};
use std::fmt;

/// Share of the limit at which the "approaching" warning starts.
pub const WARNING_THRESHOLD: f64 = 0.8;

/// Severity of a budget warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetWarningKind {
    /// Spending is at or above [`WARNING_THRESHOLD`] of the limit
    Warning,
    /// Spending is above the limit
    Exceeded,
}

impl BudgetWarningKind {
    /// Stable identifier of the warning kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Exceeded => "exceeded",
        }
    }
}

impl fmt::Display for BudgetWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display-ready budget warning
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetWarning {
    /// How serious the warning is
    pub kind: BudgetWarningKind,
    /// Message shown to the user
    pub message: String,
}

/// Sum of expense amounts dated in the calendar month (UTC) containing `now`.
/// Operations with unknown categories are ignored.
#[must_use]
pub fn current_month_expense_total(
    operations: &[operation::Model],
    categories: &[category::Model],
    now: DateTime<Utc>,
) -> f64 {
    let by_id = index_categories(categories);

    operations
        .iter()
        .filter(|op| op.date.year() == now.year() && op.date.month() == now.month())
        .filter(|op| {
            by_id
                .get(&op.category_id)
                .is_some_and(|c| c.category_type == CategoryType::Expense)
        })
        .map(|op| magnitude(op.amount))
        .sum()
}

/// Derives the warning for `month_expense` against `budget_limit`.
///
/// A limit of zero or less means no limit is set and never warns.
#[must_use]
pub fn check_budget(month_expense: f64, budget_limit: f64, currency: &str) -> Option<BudgetWarning> {
    if !budget_limit.is_finite() || budget_limit <= 0.0 {
        return None;
    }

    let ratio = month_expense / budget_limit;
    if ratio > 1.0 {
        Some(BudgetWarning {
            kind: BudgetWarningKind::Exceeded,
            message: format!(
                "Вы превысили лимит бюджета! Расходы: {} {currency} (Лимит: {} {currency})",
                format_amount(month_expense),
                format_amount(budget_limit),
            ),
        })
    } else if ratio >= WARNING_THRESHOLD {
        Some(BudgetWarning {
            kind: BudgetWarningKind::Warning,
            message: format!(
                "Вы приближаетесь к лимиту бюджета! Расходы: {} {currency} ({:.1}% от лимита {} {currency})",
                format_amount(month_expense),
                ratio * 100.0,
                format_amount(budget_limit),
            ),
        })
    } else {
        None
    }
}
