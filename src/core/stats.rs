//! Summary statistics over a filtered operation list.
//!
//! Operations carry unsigned amounts; whether one counts as income or expense
//! is decided by its category. Operations whose category cannot be resolved
//! contribute nothing and are only logged.

use crate::entities::{CategoryType, category, operation};
use std::collections::HashMap;
use tracing::warn;

/// Totals and counts for a set of operations.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    /// Sum of income amounts
    pub total_income: f64,
    /// Sum of expense amounts
    pub total_expense: f64,
    /// Number of income operations
    pub income_count: usize,
    /// Number of expense operations
    pub expense_count: usize,
    /// `total_income - total_expense`
    pub balance: f64,
    /// Operations skipped because their category is unknown
    pub uncategorized_count: usize,
}

/// Index of categories by id, built once per computation.
pub(crate) fn index_categories(categories: &[category::Model]) -> HashMap<i64, &category::Model> {
    categories.iter().map(|c| (c.id, c)).collect()
}

/// Absolute value of an amount, with non-finite values counted as zero.
pub(crate) fn magnitude(amount: f64) -> f64 {
    if amount.is_finite() { amount.abs() } else { 0.0 }
}

/// Computes income/expense totals, counts and balance for `operations`.
#[must_use]
pub fn compute_statistics(
    operations: &[operation::Model],
    categories: &[category::Model],
) -> Statistics {
    let by_id = index_categories(categories);
    let mut stats = Statistics::default();

    for op in operations {
        let Some(category) = by_id.get(&op.category_id) else {
            warn!(
                operation_id = op.id,
                category_id = op.category_id,
                "Category not found for operation, skipping it in totals"
            );
            stats.uncategorized_count += 1;
            continue;
        };

        let amount = magnitude(op.amount);
        match category.category_type {
            CategoryType::Income => {
                stats.total_income += amount;
                stats.income_count += 1;
            }
            CategoryType::Expense => {
                stats.total_expense += amount;
                stats.expense_count += 1;
            }
        }
    }

    // Derived from the totals rather than accumulated so the identity is exact.
    stats.balance = stats.total_income - stats.total_expense;
    stats
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{category_model, operation_model};

    #[test]
    fn test_single_income_operation() {
        let ops = vec![operation_model(1, 10, 100.0, "2024-01-05T00:00:00Z")];
        let categories = vec![category_model(10, "Зарплата", CategoryType::Income)];

        let stats = compute_statistics(&ops, &categories);
        assert_eq!(stats.total_income, 100.0);
        assert_eq!(stats.total_expense, 0.0);
        assert_eq!(stats.balance, 100.0);
        assert_eq!(stats.income_count, 1);
        assert_eq!(stats.expense_count, 0);
    }

    #[test]
    fn test_unknown_category_is_skipped() {
        let ops = vec![operation_model(1, 99, 100.0, "2024-01-05T00:00:00Z")];
        let categories = vec![category_model(10, "Зарплата", CategoryType::Income)];

        let stats = compute_statistics(&ops, &categories);
        assert_eq!(stats.total_income, 0.0);
        assert_eq!(stats.total_expense, 0.0);
        assert_eq!(stats.balance, 0.0);
        assert_eq!(stats.income_count, 0);
        assert_eq!(stats.uncategorized_count, 1);
    }

    #[test]
    fn test_mixed_operations_balance_and_partition() {
        let ops = vec![
            operation_model(1, 10, 1000.0, "2024-01-05T00:00:00Z"),
            operation_model(2, 20, 250.5, "2024-01-06T00:00:00Z"),
            operation_model(3, 20, -49.5, "2024-01-07T00:00:00Z"), // legacy signed amount
            operation_model(4, 30, 10.0, "2024-01-08T00:00:00Z"),
        ];
        let categories = vec![
            category_model(10, "Зарплата", CategoryType::Income),
            category_model(20, "Продукты", CategoryType::Expense),
        ];

        let stats = compute_statistics(&ops, &categories);
        assert_eq!(stats.total_income, 1000.0);
        assert_eq!(stats.total_expense, 300.0);
        assert_eq!(stats.balance, stats.total_income - stats.total_expense);
        assert_eq!(stats.income_count, 1);
        assert_eq!(stats.expense_count, 2);
        assert_eq!(
            stats.income_count + stats.expense_count + stats.uncategorized_count,
            ops.len()
        );
    }

    #[test]
    fn test_balance_identity_holds_for_awkward_floats() {
        let ops = vec![
            operation_model(1, 10, 0.1, "2024-01-05T00:00:00Z"),
            operation_model(2, 20, 0.2, "2024-01-06T00:00:00Z"),
            operation_model(3, 10, 0.7, "2024-01-07T00:00:00Z"),
            operation_model(4, 20, 0.3, "2024-01-08T00:00:00Z"),
        ];
        let categories = vec![
            category_model(10, "Подработка", CategoryType::Income),
            category_model(20, "Кафе", CategoryType::Expense),
        ];

        let stats = compute_statistics(&ops, &categories);
        assert_eq!(stats.balance, stats.total_income - stats.total_expense);
    }

    #[test]
    fn test_non_finite_amount_counts_as_zero() {
        let ops = vec![operation_model(1, 10, f64::NAN, "2024-01-05T00:00:00Z")];
        let categories = vec![category_model(10, "Зарплата", CategoryType::Income)];

        let stats = compute_statistics(&ops, &categories);
        assert_eq!(stats.total_income, 0.0);
        assert_eq!(stats.income_count, 1);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(compute_statistics(&[], &[]), Statistics::default());
    }

    #[test]
    fn test_statistics_are_idempotent() {
        let ops = vec![operation_model(1, 10, 42.0, "2024-01-05T00:00:00Z")];
        let categories = vec![category_model(10, "Продукты", CategoryType::Expense)];
        assert_eq!(
            compute_statistics(&ops, &categories),
            compute_statistics(&ops, &categories)
        );
    }
}
