//! Operation filtering.
//!
//! Narrows a user's operation list by category, date range and data type.
//! Everything here is pure: inputs are borrowed, the result is a fresh vector
//! in the same relative order as the input.

use crate::{
    entities::{CategoryType, operation},
    errors::Error,
};
use chrono::{DateTime, Datelike, Months, NaiveDate, TimeDelta, Utc};
use std::{collections::BTreeSet, fmt, str::FromStr};

/// Which categories pass the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,
    /// A single category by id
    Category(i64),
}

impl FromStr for CategoryFilter {
    type Err = Error;

    /// Accepts `"all"` or a category id. Ids arrive as text from every user
    /// facing surface and are normalized to `i64` here, once.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<i64>()
            .map(Self::Category)
            .map_err(|_| Error::InvalidFilter {
                field: "category",
                value: s.to_string(),
            })
    }
}

/// Time window relative to "now" or to a selected year/month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    /// No date restriction
    #[default]
    All,
    /// The last 7 days
    Week,
    /// The last calendar month
    Month,
    /// The last calendar year
    Year,
    /// Only operations in `FilterSpec::selected_year`
    SelectedYear,
    /// Only operations in `FilterSpec::selected_month` of `selected_year`
    SelectedMonth,
}

impl DateFilter {
    /// Canonical name used in commands and config.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::SelectedYear => "selected_year",
            Self::SelectedMonth => "selected_month",
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "selected_year" => Ok(Self::SelectedYear),
            "selected_month" => Ok(Self::SelectedMonth),
            _ => Err(Error::InvalidFilter {
                field: "date",
                value: s.to_string(),
            }),
        }
    }
}

/// Which side of the ledger to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    /// Income and expenses
    #[default]
    All,
    /// Income only
    Income,
    /// Expenses only
    Expense,
}

impl DataType {
    /// Whether operations of this category type belong to the data type.
    #[must_use]
    pub const fn includes(self, category_type: CategoryType) -> bool {
        matches!(
            (self, category_type),
            (Self::All, _)
                | (Self::Income, CategoryType::Income)
                | (Self::Expense, CategoryType::Expense)
        )
    }

    /// Whether an income series is expected for this data type.
    #[must_use]
    pub const fn wants_income(self) -> bool {
        matches!(self, Self::All | Self::Income)
    }

    /// Whether an expense series is expected for this data type.
    #[must_use]
    pub const fn wants_expense(self) -> bool {
        matches!(self, Self::All | Self::Expense)
    }

    /// Russian genitive phrase used in chart titles ("График доходов").
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::All => "доходов и расходов",
            Self::Income => "доходов",
            Self::Expense => "расходов",
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(Error::InvalidFilter {
                field: "data type",
                value: s.to_string(),
            }),
        }
    }
}

/// The full set of user-selected criteria for one view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Category restriction
    pub category: CategoryFilter,
    /// Date restriction
    pub date: DateFilter,
    /// Year used by `SelectedYear` and `SelectedMonth`
    pub selected_year: i32,
    /// Month (1-12) used by `SelectedMonth`
    pub selected_month: u32,
    /// Income/expense restriction, applied by statistics and charts
    pub data_type: DataType,
}

impl FilterSpec {
    /// A spec that lets everything through, with the selected year and month
    /// preset to the month containing `now`.
    #[must_use]
    pub fn all(now: DateTime<Utc>) -> Self {
        Self {
            category: CategoryFilter::All,
            date: DateFilter::All,
            selected_year: now.year(),
            selected_month: now.month(),
            data_type: DataType::All,
        }
    }
}

/// Returns the operations that pass the category and date criteria of `spec`,
/// evaluating relative windows against `now`.
///
/// The input order is preserved; callers sort once when operations are loaded
/// (see [`sort_newest_first`]). `spec.data_type` is not applied here because
/// it depends on category types; statistics and charts apply it.
#[must_use]
pub fn filter_operations(
    operations: &[operation::Model],
    spec: &FilterSpec,
    now: DateTime<Utc>,
) -> Vec<operation::Model> {
    operations
        .iter()
        .filter(|op| matches_category(op, spec.category))
        .filter(|op| matches_date(op, spec, now))
        .cloned()
        .collect()
}

/// Inclusive `(start, end)` instants enclosing every operation the date
/// criterion of `spec` can keep, for narrowing a database read. The bounds
/// may admit a little more (the first instant of the next year or month);
/// [`filter_operations`] stays the authority.
#[must_use]
pub fn date_bounds(
    spec: &FilterSpec,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    match spec.date {
        DateFilter::All => (None, None),
        DateFilter::Week => (now.checked_sub_signed(TimeDelta::days(7)), None),
        DateFilter::Month => (window_start(now, 1), None),
        DateFilter::Year => (window_start(now, 12), None),
        DateFilter::SelectedYear => (
            month_start(spec.selected_year, 1),
            month_start(spec.selected_year.saturating_add(1), 1),
        ),
        DateFilter::SelectedMonth => {
            let start = month_start(spec.selected_year, spec.selected_month);
            (start, start.and_then(|s| s.checked_add_months(Months::new(1))))
        }
    }
}

fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

fn matches_category(op: &operation::Model, filter: CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Category(id) => op.category_id == id,
    }
}

fn matches_date(op: &operation::Model, spec: &FilterSpec, now: DateTime<Utc>) -> bool {
    match spec.date {
        DateFilter::All => true,
        DateFilter::Week => op.date >= now - TimeDelta::days(7),
        DateFilter::Month => window_start(now, 1).is_none_or(|start| op.date >= start),
        DateFilter::Year => window_start(now, 12).is_none_or(|start| op.date >= start),
        DateFilter::SelectedYear => op.date.year() == spec.selected_year,
        DateFilter::SelectedMonth => {
            op.date.year() == spec.selected_year && op.date.month() == spec.selected_month
        }
    }
}

/// `now` moved back by whole calendar months, clamping the day the way chrono
/// does (March 31 minus one month is the last day of February).
fn window_start(now: DateTime<Utc>, months: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_months(Months::new(months))
}

/// Sorts operations by date, newest first. Equal dates keep their order.
pub fn sort_newest_first(operations: &mut [operation::Model]) {
    operations.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Distinct years that have at least one operation, newest first.
/// Feeds the year picker of the selected-year and selected-month filters.
#[must_use]
pub fn available_years(operations: &[operation::Model]) -> Vec<i32> {
    let years: BTreeSet<i32> = operations.iter().map(|op| op.date.year()).collect();
    years.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{at, operation_model};

    fn spec(date: DateFilter) -> FilterSpec {
        FilterSpec {
            date,
            ..FilterSpec::all(at("2024-03-15T12:00:00Z"))
        }
    }

    #[test]
    fn test_all_filter_keeps_everything_in_order() {
        let ops = vec![
            operation_model(1, 10, 100.0, "2024-03-10T00:00:00Z"),
            operation_model(2, 11, 50.0, "2020-01-01T00:00:00Z"),
        ];
        let now = at("2024-03-15T12:00:00Z");

        let filtered = filter_operations(&ops, &spec(DateFilter::All), now);
        assert_eq!(filtered, ops);
    }

    #[test]
    fn test_category_filter() {
        let ops = vec![
            operation_model(1, 10, 100.0, "2024-03-10T00:00:00Z"),
            operation_model(2, 11, 50.0, "2024-03-09T00:00:00Z"),
            operation_model(3, 10, 25.0, "2024-03-08T00:00:00Z"),
        ];
        let filter = FilterSpec {
            category: CategoryFilter::Category(10),
            ..spec(DateFilter::All)
        };

        let filtered = filter_operations(&ops, &filter, at("2024-03-15T12:00:00Z"));
        let ids: Vec<i64> = filtered.iter().map(|op| op.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_week_filter_is_inclusive_at_boundary() {
        let now = at("2024-03-15T12:00:00Z");
        let ops = vec![
            operation_model(1, 10, 1.0, "2024-03-08T12:00:00Z"), // exactly 7 days
            operation_model(2, 10, 1.0, "2024-03-08T11:59:59Z"),
        ];

        let filtered = filter_operations(&ops, &spec(DateFilter::Week), now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_month_filter_uses_calendar_month() {
        let now = at("2024-03-31T10:00:00Z");
        let ops = vec![
            operation_model(1, 10, 1.0, "2024-02-29T10:00:00Z"), // clamped start
            operation_model(2, 10, 1.0, "2024-02-28T10:00:00Z"),
        ];

        let filtered = filter_operations(&ops, &spec(DateFilter::Month), now);
        let ids: Vec<i64> = filtered.iter().map(|op| op.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_year_filter() {
        let now = at("2024-03-15T12:00:00Z");
        let ops = vec![
            operation_model(1, 10, 1.0, "2023-03-15T12:00:00Z"),
            operation_model(2, 10, 1.0, "2023-03-14T12:00:00Z"),
        ];

        let filtered = filter_operations(&ops, &spec(DateFilter::Year), now);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_selected_year_filter() {
        let ops = vec![
            operation_model(1, 10, 1.0, "2023-12-31T23:59:59Z"),
            operation_model(2, 10, 1.0, "2024-01-01T00:00:00Z"),
        ];
        let filter = FilterSpec {
            selected_year: 2023,
            ..spec(DateFilter::SelectedYear)
        };

        let filtered = filter_operations(&ops, &filter, at("2024-03-15T12:00:00Z"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_selected_month_keeps_only_january() {
        let ops = vec![
            operation_model(1, 10, 1.0, "2024-01-15T00:00:00Z"),
            operation_model(2, 10, 1.0, "2024-02-01T00:00:00Z"),
        ];
        let filter = FilterSpec {
            selected_year: 2024,
            selected_month: 1,
            ..spec(DateFilter::SelectedMonth)
        };

        let filtered = filter_operations(&ops, &filter, at("2024-03-15T12:00:00Z"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_date_bounds() {
        let now = at("2024-03-31T12:00:00Z");
        let bounds = |date| {
            date_bounds(
                &FilterSpec {
                    date,
                    selected_year: 2023,
                    selected_month: 12,
                    ..FilterSpec::all(now)
                },
                now,
            )
        };

        assert_eq!(bounds(DateFilter::All), (None, None));
        assert_eq!(bounds(DateFilter::Week), (Some(at("2024-03-24T12:00:00Z")), None));
        assert_eq!(bounds(DateFilter::Month), (Some(at("2024-02-29T12:00:00Z")), None));
        assert_eq!(bounds(DateFilter::Year), (Some(at("2023-03-31T12:00:00Z")), None));
        assert_eq!(
            bounds(DateFilter::SelectedYear),
            (Some(at("2023-01-01T00:00:00Z")), Some(at("2024-01-01T00:00:00Z")))
        );
        assert_eq!(
            bounds(DateFilter::SelectedMonth),
            (Some(at("2023-12-01T00:00:00Z")), Some(at("2024-01-01T00:00:00Z")))
        );
    }

    #[test]
    fn test_filter_does_not_mutate_and_is_idempotent() {
        let ops = vec![
            operation_model(1, 10, 1.0, "2024-03-14T00:00:00Z"),
            operation_model(2, 11, 2.0, "2024-01-01T00:00:00Z"),
        ];
        let snapshot = ops.clone();
        let now = at("2024-03-15T12:00:00Z");
        let filter = spec(DateFilter::Week);

        let first = filter_operations(&ops, &filter, now);
        let second = filter_operations(&ops, &filter, now);
        assert_eq!(first, second);
        assert_eq!(ops, snapshot);
    }

    #[test]
    fn test_sort_newest_first_and_available_years() {
        let mut ops = vec![
            operation_model(1, 10, 1.0, "2022-05-01T00:00:00Z"),
            operation_model(2, 10, 1.0, "2024-01-01T00:00:00Z"),
            operation_model(3, 10, 1.0, "2022-07-01T00:00:00Z"),
        ];
        sort_newest_first(&mut ops);
        let ids: Vec<i64> = ops.iter().map(|op| op.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(available_years(&ops), vec![2024, 2022]);
    }

    #[test]
    fn test_filter_values_parse_from_text() {
        assert_eq!("all".parse::<CategoryFilter>().ok(), Some(CategoryFilter::All));
        assert_eq!(
            " 42 ".parse::<CategoryFilter>().ok(),
            Some(CategoryFilter::Category(42))
        );
        assert!("groceries".parse::<CategoryFilter>().is_err());
        assert_eq!(
            "selected_month".parse::<DateFilter>().ok(),
            Some(DateFilter::SelectedMonth)
        );
        assert!("fortnight".parse::<DateFilter>().is_err());
        assert_eq!("Expense".parse::<DataType>().ok(), Some(DataType::Expense));
    }

    #[test]
    fn test_data_type_includes() {
        assert!(DataType::All.includes(CategoryType::Income));
        assert!(DataType::All.includes(CategoryType::Expense));
        assert!(DataType::Income.includes(CategoryType::Income));
        assert!(!DataType::Income.includes(CategoryType::Expense));
        assert!(!DataType::Expense.includes(CategoryType::Income));
    }
}
