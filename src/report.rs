// 🧾 Text Reports
// Plain-text rendering of the table and its summaries

use crate::aggregate::{CategoryTotal, MonthlySummary, DATE_FORMAT};
use crate::store::{ExpenseTable, COLUMNS};
use chrono::NaiveDate;

/// Default number of rows shown by the recent view
pub const DEFAULT_RECENT_LIMIT: usize = 10;

pub const NO_EXPENSES: &str = "No expenses recorded yet.";
pub const NO_SUMMARY_DATA: &str = "No data available for summary.";

/// Join report lines, each ending in a newline
fn block(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn table_row(cells: [&str; 4], widths: &[usize; 4]) -> String {
    let line = format!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}",
        cells[0],
        cells[1],
        cells[2],
        cells[3],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    );
    line.trim_end().to_string()
}

/// Last `n` expenses as an aligned table, insertion order
pub fn render_recent(table: &ExpenseTable, n: usize) -> String {
    if table.is_empty() {
        return format!("\n{}\n", NO_EXPENSES);
    }

    let rows: Vec<[String; 4]> = table
        .last(n)
        .iter()
        .map(|e| {
            [
                e.date.clone(),
                e.category.clone(),
                e.description.clone(),
                format!("{:.2}", e.amount),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![
        String::new(),
        format!("--- Last {} expenses ---", n),
        table_row(COLUMNS, &widths),
    ];
    lines.extend(
        rows.iter()
            .map(|row| table_row([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()], &widths)),
    );
    block(lines)
}

/// Month totals followed by overall stats
pub fn render_monthly(summary: &MonthlySummary) -> String {
    let stats = match summary.stats {
        Some(stats) => stats,
        None => return format!("\n{}\n", NO_SUMMARY_DATA),
    };

    let mut lines = vec![String::new(), "--- Monthly Spending ---".to_string()];
    lines.extend(
        summary
            .months
            .iter()
            .map(|(month, total)| format!("{}: {:.2}", month, total)),
    );
    lines.extend([
        String::new(),
        "--- Overall Stats ---".to_string(),
        format!("Total spent  : {:.2}", stats.total),
        format!("Average spend: {:.2}", stats.average),
        format!("Max spend    : {:.2}", stats.max),
        format!("Min spend    : {:.2}", stats.min),
    ]);
    block(lines)
}

pub fn render_categories(totals: &[CategoryTotal]) -> String {
    let mut lines = vec![String::new(), "--- Spending by Category ---".to_string()];
    lines.extend(totals.iter().map(|t| format!("{}: {:.2}", t.category, t.total)));
    block(lines)
}

pub fn render_daily(days: &[(NaiveDate, f64)]) -> String {
    let mut lines = vec![String::new(), "--- Daily Spending ---".to_string()];
    lines.extend(
        days.iter()
            .map(|(day, total)| format!("{}: {:.2}", day.format(DATE_FORMAT), total)),
    );
    block(lines)
}
