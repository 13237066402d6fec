//! Chart-ready series built from filtered operations.
//!
//! The output mirrors what a charting front end needs: a list of labels and
//! one or more labeled numeric series with display colors. Line charts are
//! grouped by ISO calendar date; bar, pie and polar charts by category.
//! Charts never come back empty: when there is nothing to plot a documented
//! placeholder is returned instead.

use super::{
    filter::DataType,
    stats::{index_categories, magnitude},
};
use crate::{
    entities::{CategoryType, category, operation},
    errors::Error,
};
use chrono::NaiveDate;
use std::{collections::BTreeMap, fmt, str::FromStr};
use tracing::debug;

/// Series label for income
pub const INCOME_LABEL: &str = "Доходы";
/// Series label for expenses
pub const EXPENSE_LABEL: &str = "Расходы";
/// Series label for a pie/polar chart over both sides
pub const ALL_LABEL: &str = "Доходы и расходы";
/// Label of the placeholder sector and of empty bar charts
pub const NO_DATA_LABEL: &str = "Нет данных";
/// Label of an empty line chart
pub const NO_OPERATIONS_LABEL: &str = "Нет операций";
/// Color of placeholders and categories without a color
pub const NEUTRAL_COLOR: &str = "#cccccc";

const INCOME_LINE_COLOR: &str = "rgba(75, 192, 192, 1)";
const EXPENSE_LINE_COLOR: &str = "rgba(255, 99, 132, 1)";
const INCOME_BAR_COLOR: &str = "rgba(54, 162, 235, 0.6)";
const EXPENSE_BAR_COLOR: &str = "rgba(255, 99, 132, 0.6)";

/// Kind of chart to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    /// Income/expense per day
    #[default]
    Line,
    /// Income/expense per category
    Bar,
    /// Share per category
    Pie,
    /// Share per category, drawn as a polar area
    Polar,
}

impl ChartKind {
    /// Russian title of the chart kind.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Line => "Линейный график",
            Self::Bar => "Столбчатая диаграмма",
            Self::Pie => "Круговая диаграмма",
            Self::Polar => "Полярная диаграмма",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Polar => "polar",
        })
    }
}

impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            "polar" => Ok(Self::Polar),
            _ => Err(Error::InvalidFilter {
                field: "chart kind",
                value: s.to_string(),
            }),
        }
    }
}

/// One labeled numeric series
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Legend label
    pub label: String,
    /// One value per chart label
    pub data: Vec<f64>,
    /// A single color for the whole series, or one color per value
    pub colors: Vec<String>,
}

impl Dataset {
    fn uniform(label: &str, data: Vec<f64>, color: &str) -> Self {
        Self {
            label: label.to_string(),
            data,
            colors: vec![color.to_string()],
        }
    }
}

/// Labels plus the series plotted over them
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// X-axis labels (dates for line charts, category names otherwise)
    pub labels: Vec<String>,
    /// Series over `labels`
    pub datasets: Vec<Dataset>,
    placeholder: bool,
}

impl ChartData {
    /// The single "Нет данных" sector shown when a pie/polar chart has no data.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            labels: vec![NO_DATA_LABEL.to_string()],
            datasets: vec![Dataset::uniform(NO_DATA_LABEL, vec![1.0], NEUTRAL_COLOR)],
            placeholder: true,
        }
    }

    /// Plotted data over `labels`.
    #[must_use]
    pub const fn new(labels: Vec<String>, datasets: Vec<Dataset>) -> Self {
        Self {
            labels,
            datasets,
            placeholder: false,
        }
    }

    /// Whether this is the "no data" placeholder sector. Real data that
    /// happens to look like it is never a placeholder.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}

/// Builds chart series of the requested kind for `operations`.
///
/// With no operations or no categories a kind-specific empty structure is
/// returned (one zero point per expected series, or the placeholder sector).
#[must_use]
pub fn build_chart_series(
    operations: &[operation::Model],
    categories: &[category::Model],
    kind: ChartKind,
    data_type: DataType,
) -> ChartData {
    if operations.is_empty() || categories.is_empty() {
        debug!(%kind, "Nothing to plot, returning empty chart");
        return empty_chart(kind, data_type);
    }

    match kind {
        ChartKind::Line => line_chart(operations, categories, data_type),
        ChartKind::Bar => bar_chart(operations, categories, data_type),
        ChartKind::Pie | ChartKind::Polar => share_chart(operations, categories, data_type),
    }
}

fn empty_chart(kind: ChartKind, data_type: DataType) -> ChartData {
    let (label, income_color, expense_color) = match kind {
        ChartKind::Line => (NO_OPERATIONS_LABEL, INCOME_LINE_COLOR, EXPENSE_LINE_COLOR),
        ChartKind::Bar => (NO_DATA_LABEL, INCOME_BAR_COLOR, EXPENSE_BAR_COLOR),
        ChartKind::Pie | ChartKind::Polar => return ChartData::placeholder(),
    };

    let mut datasets = Vec::new();
    if data_type.wants_income() {
        datasets.push(Dataset::uniform(INCOME_LABEL, vec![0.0], income_color));
    }
    if data_type.wants_expense() {
        datasets.push(Dataset::uniform(EXPENSE_LABEL, vec![0.0], expense_color));
    }

    ChartData::new(vec![label.to_string()], datasets)
}

fn line_chart(
    operations: &[operation::Model],
    categories: &[category::Model],
    data_type: DataType,
) -> ChartData {
    let by_id = index_categories(categories);
    // (income, expense) per UTC calendar day, ordered chronologically
    let mut by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for op in operations {
        let day = by_day.entry(op.date.date_naive()).or_default();
        match by_id.get(&op.category_id).map(|c| c.category_type) {
            Some(CategoryType::Income) => day.0 += magnitude(op.amount),
            Some(CategoryType::Expense) => day.1 += magnitude(op.amount),
            None => {}
        }
    }

    let labels = by_day
        .keys()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    let mut datasets = Vec::new();
    if data_type.wants_income() {
        let data = by_day.values().map(|(income, _)| *income).collect();
        datasets.push(Dataset::uniform(INCOME_LABEL, data, INCOME_LINE_COLOR));
    }
    if data_type.wants_expense() {
        let data = by_day.values().map(|(_, expense)| *expense).collect();
        datasets.push(Dataset::uniform(EXPENSE_LABEL, data, EXPENSE_LINE_COLOR));
    }

    ChartData::new(labels, datasets)
}

/// Per-category sums, in the order categories were given.
struct CategoryTotals<'a> {
    name: &'a str,
    /// `None` when the category has no color of its own
    color: Option<&'a str>,
    income: f64,
    expense: f64,
}

fn category_totals<'a>(
    operations: &[operation::Model],
    categories: &'a [category::Model],
) -> Vec<CategoryTotals<'a>> {
    let mut totals: Vec<CategoryTotals<'a>> = categories
        .iter()
        .map(|c| CategoryTotals {
            name: &c.name,
            color: Some(c.color.as_str()).filter(|color| !color.is_empty()),
            income: 0.0,
            expense: 0.0,
        })
        .collect();
    let position: BTreeMap<i64, usize> = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id, i))
        .collect();

    for op in operations {
        let Some(&i) = position.get(&op.category_id) else {
            continue;
        };
        match categories[i].category_type {
            CategoryType::Income => totals[i].income += magnitude(op.amount),
            CategoryType::Expense => totals[i].expense += magnitude(op.amount),
        }
    }

    totals
}

fn bar_chart(
    operations: &[operation::Model],
    categories: &[category::Model],
    data_type: DataType,
) -> ChartData {
    let totals = category_totals(operations, categories);

    let mut income: Vec<&CategoryTotals<'_>> = totals.iter().filter(|t| t.income > 0.0).collect();
    income.sort_by(|a, b| b.income.total_cmp(&a.income));
    let mut expense: Vec<&CategoryTotals<'_>> =
        totals.iter().filter(|t| t.expense > 0.0).collect();
    expense.sort_by(|a, b| b.expense.total_cmp(&a.expense));

    match data_type {
        DataType::All => {
            let mut labels: Vec<String> = Vec::new();
            for name in income.iter().chain(expense.iter()).map(|t| t.name) {
                if !labels.iter().any(|l| l == name) {
                    labels.push(name.to_string());
                }
            }
            let income_data = labels
                .iter()
                .map(|l| income.iter().find(|t| t.name == l.as_str()).map_or(0.0, |t| t.income))
                .collect();
            let expense_data = labels
                .iter()
                .map(|l| {
                    expense
                        .iter()
                        .find(|t| t.name == l.as_str())
                        .map_or(0.0, |t| t.expense)
                })
                .collect();

            ChartData::new(
                labels,
                vec![
                    Dataset::uniform(INCOME_LABEL, income_data, INCOME_BAR_COLOR),
                    Dataset::uniform(EXPENSE_LABEL, expense_data, EXPENSE_BAR_COLOR),
                ],
            )
        }
        DataType::Income => {
            per_category_series(INCOME_LABEL, &income, INCOME_BAR_COLOR, |t| t.income)
        }
        DataType::Expense => {
            per_category_series(EXPENSE_LABEL, &expense, EXPENSE_BAR_COLOR, |t| t.expense)
        }
    }
}

/// One series colored per category; uncolored categories take `series_color`.
fn per_category_series(
    label: &str,
    totals: &[&CategoryTotals<'_>],
    series_color: &str,
    value: impl Fn(&CategoryTotals<'_>) -> f64,
) -> ChartData {
    ChartData::new(
        totals.iter().map(|t| t.name.to_string()).collect(),
        vec![Dataset {
            label: label.to_string(),
            data: totals.iter().map(|t| value(*t)).collect(),
            colors: totals
                .iter()
                .map(|t| t.color.unwrap_or(series_color).to_string())
                .collect(),
        }],
    )
}

fn share_chart(
    operations: &[operation::Model],
    categories: &[category::Model],
    data_type: DataType,
) -> ChartData {
    let totals = category_totals(operations, categories);

    let mut shares: Vec<(&CategoryTotals<'_>, f64)> = totals
        .iter()
        .zip(categories)
        .filter(|(_, c)| data_type.includes(c.category_type))
        .map(|(t, _)| (t, t.income + t.expense))
        .filter(|(_, amount)| *amount > 0.0)
        .collect();

    if shares.is_empty() {
        return ChartData::placeholder();
    }
    shares.sort_by(|a, b| b.1.total_cmp(&a.1));

    let label = match data_type {
        DataType::All => ALL_LABEL,
        DataType::Income => INCOME_LABEL,
        DataType::Expense => EXPENSE_LABEL,
    };

    ChartData::new(
        shares.iter().map(|(t, _)| t.name.to_string()).collect(),
        vec![Dataset {
            label: label.to_string(),
            data: shares.iter().map(|(_, amount)| *amount).collect(),
            colors: shares
                .iter()
                .map(|(t, _)| t.color.unwrap_or(NEUTRAL_COLOR).to_string())
                .collect(),
        }],
    )
}
