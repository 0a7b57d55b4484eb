// 📊 Aggregator
// Group-by-and-sum summaries over the expense table (pure, read-only)

use crate::error::ExpenseError;
use crate::store::{Expense, ExpenseTable};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;

/// Date format accepted by the month/day groupings
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// GENERIC GROUP-BY
// ============================================================================

/// Ordered group-by-key-then-reduce
///
/// Groups come back in ascending key order. The first error from `key`
/// aborts the whole grouping.
pub fn group_by<T, K, V, E>(
    items: impl IntoIterator<Item = T>,
    mut key: impl FnMut(&T) -> Result<K, E>,
    value: impl Fn(&T) -> V,
    combine: impl Fn(V, V) -> V,
) -> Result<Vec<(K, V)>, E>
where
    K: Ord,
{
    let mut groups: BTreeMap<K, V> = BTreeMap::new();

    for item in items {
        let k = key(&item)?;
        let v = value(&item);
        match groups.remove(&k) {
            Some(acc) => groups.insert(k, combine(acc, v)),
            None => groups.insert(k, v),
        };
    }

    Ok(groups.into_iter().collect())
}

/// Parse a stored date, reporting the 1-based record position on failure
pub fn parse_date(row: usize, value: &str) -> Result<NaiveDate, ExpenseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ExpenseError::InvalidDate {
        row,
        value: value.to_string(),
    })
}

// ============================================================================
// KEYS & RESULTS
// ============================================================================

/// Calendar month, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Overall statistics across every amount in the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendingStats {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

impl SpendingStats {
    /// `None` when there is nothing to summarize
    pub fn from_amounts(amounts: &[f64]) -> Option<Self> {
        let (&first, rest) = amounts.split_first()?;

        let (total, max, min) = rest.iter().fold(
            (first, first, first),
            |(total, max, min), &amount| (total + amount, max.max(amount), min.min(amount)),
        );

        Some(SpendingStats {
            count: amounts.len(),
            total,
            average: total / amounts.len() as f64,
            max,
            min,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    /// Chronological month totals
    pub months: Vec<(YearMonth, f64)>,
    /// `None` for an empty table
    pub stats: Option<SpendingStats>,
}

impl MonthlySummary {
    pub fn is_empty(&self) -> bool {
        self.stats.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

// ============================================================================
// SUMMARIES
// ============================================================================

fn dated(table: &ExpenseTable) -> impl Iterator<Item = (usize, &Expense)> + '_ {
    table.iter().enumerate().map(|(i, expense)| (i + 1, expense))
}

/// Total per calendar month plus overall stats
pub fn monthly_summary(table: &ExpenseTable) -> Result<MonthlySummary, ExpenseError> {
    let months = group_by(
        dated(table),
        |(row, expense)| parse_date(*row, &expense.date).map(YearMonth::of),
        |(_, expense)| expense.amount,
        |a, b| a + b,
    )?;

    let amounts: Vec<f64> = table.iter().map(|e| e.amount).collect();

    Ok(MonthlySummary {
        months,
        stats: SpendingStats::from_amounts(&amounts),
    })
}

/// Total per category, largest first
///
/// Categories match exactly (case-sensitive). Equal totals keep ascending
/// name order.
pub fn category_summary(table: &ExpenseTable) -> Vec<CategoryTotal> {
    let groups = group_by(
        table.iter(),
        |expense| Ok::<_, Infallible>(expense.category.clone()),
        |expense| expense.amount,
        |a, b| a + b,
    )
    .unwrap_or_default();

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();

    // Stable sort keeps the BTreeMap's name order for ties
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Total per exact date, chronological
pub fn daily_summary(table: &ExpenseTable) -> Result<Vec<(NaiveDate, f64)>, ExpenseError> {
    group_by(
        dated(table),
        |(row, expense)| parse_date(*row, &expense.date),
        |(_, expense)| expense.amount,
        |a, b| a + b,
    )
}
