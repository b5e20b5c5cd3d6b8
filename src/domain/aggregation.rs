//! Aggregation - Breakdowns and spend trends
//!
//! Breakdown entries come from the server; trends are derived locally from
//! the expense list.

use crate::domain::Expense;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One slice of the category or phase breakdown
///
/// Accepts both `{name, value}` and `{category|phase, amount}` shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    #[serde(alias = "category", alias = "phase")]
    pub name: String,
    #[serde(alias = "amount")]
    pub value: f64,
}

/// Total spend on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Sum of expense amounts per date, ascending; undated expenses are skipped
pub fn expense_trend<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for expense in expenses {
        if let Some(date) = expense.date {
            *by_date.entry(date).or_default() += expense.amount;
        }
    }
    by_date
        .into_iter()
        .map(|(date, amount)| TrendPoint { date, amount })
        .collect()
}

/// Running total over a daily trend
pub fn cumulative_trend(trend: &[TrendPoint]) -> Vec<TrendPoint> {
    trend
        .iter()
        .scan(0.0, |total, point| {
            *total += point.amount;
            Some(TrendPoint {
                date: point.date,
                amount: *total,
            })
        })
        .collect()
}

/// Total spent in the calendar month containing `today`
pub fn month_total<'a>(expenses: impl IntoIterator<Item = &'a Expense>, today: NaiveDate) -> f64 {
    expenses
        .into_iter()
        .filter(|expense| {
            expense
                .date
                .is_some_and(|d| d.year() == today.year() && d.month() == today.month())
        })
        .map(|expense| expense.amount)
        .sum()
}

/// Sum of breakdown values
pub fn breakdown_total(entries: &[BreakdownEntry]) -> f64 {
    entries.iter().map(|entry| entry.value).sum()
}
