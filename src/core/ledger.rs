//! A user's ledger loaded into memory.
//!
//! Commands that aggregate (listing, statistics, charts, budget checks) load
//! the user's categories and operations once and hand them to the pure
//! engine functions. The snapshot is read-only; it is rebuilt per command.

use super::{
    budget::{BudgetWarning, check_budget, current_month_expense_total},
    category::get_categories_for_user,
    chart::{ChartData, ChartKind, build_chart_series},
    filter::{FilterSpec, available_years, filter_operations, sort_newest_first},
    operation::{OperationQuery, get_operations_for_user},
    stats::{Statistics, compute_statistics, index_categories},
};
use crate::{
    entities::{category, operation, user},
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Snapshot of one user's categories and operations
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Owner of the ledger
    pub user: user::Model,
    /// The user's categories, by name
    pub categories: Vec<category::Model>,
    /// The loaded operations (all of them unless a query narrowed the
    /// load), newest first
    pub operations: Vec<operation::Model>,
}

impl Ledger {
    /// Loads every category and operation of `user`.
    pub async fn load(db: &DatabaseConnection, user: user::Model) -> Result<Self> {
        let categories = get_categories_for_user(db, user.id).await?;
        Self::load_with_categories(db, user, categories, &OperationQuery::default()).await
    }

    /// Loads the operations of `user` matching `query`, next to categories the
    /// caller already read (usually to resolve a filter first).
    pub async fn load_with_categories(
        db: &DatabaseConnection,
        user: user::Model,
        categories: Vec<category::Model>,
        query: &OperationQuery,
    ) -> Result<Self> {
        let mut operations = get_operations_for_user(db, user.id, query).await?;
        sort_newest_first(&mut operations);

        debug!(
            user_id = user.id,
            categories = categories.len(),
            operations = operations.len(),
            "Ledger loaded"
        );

        Ok(Self {
            user,
            categories,
            operations,
        })
    }

    /// Operations passing the category and date criteria of `spec`, plus its
    /// data type. Operations with an unknown category are kept so they still
    /// show up as uncategorized.
    #[must_use]
    pub fn filtered(&self, spec: &FilterSpec, now: DateTime<Utc>) -> Vec<operation::Model> {
        let by_id = index_categories(&self.categories);
        filter_operations(&self.operations, spec, now)
            .into_iter()
            .filter(|op| {
                by_id
                    .get(&op.category_id)
                    .is_none_or(|c| spec.data_type.includes(c.category_type))
            })
            .collect()
    }

    /// Statistics over [`Self::filtered`].
    #[must_use]
    pub fn statistics(&self, spec: &FilterSpec, now: DateTime<Utc>) -> Statistics {
        compute_statistics(&self.filtered(spec, now), &self.categories)
    }

    /// Chart of `kind` over the operations passing the category and date
    /// criteria of `spec`. The chart itself applies the data type.
    #[must_use]
    pub fn chart(&self, spec: &FilterSpec, kind: ChartKind, now: DateTime<Utc>) -> ChartData {
        let operations = filter_operations(&self.operations, spec, now);
        build_chart_series(&operations, &self.categories, kind, spec.data_type)
    }

    /// Expenses in the current calendar month.
    #[must_use]
    pub fn month_expense(&self, now: DateTime<Utc>) -> f64 {
        current_month_expense_total(&self.operations, &self.categories, now)
    }

    /// Budget warning for the current calendar month, if any.
    #[must_use]
    pub fn budget_warning(&self, now: DateTime<Utc>, currency: &str) -> Option<BudgetWarning> {
        check_budget(self.month_expense(now), self.user.budget_limit, currency)
    }

    /// Years that have operations, newest first.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        available_years(&self.operations)
    }
}
