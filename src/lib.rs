// Expense Tracker - Core Library
// Exposes all modules for use in the CLI and tests

pub mod error;
pub mod config;
pub mod store;      // Record Store - CSV persistence
pub mod entry;      // Entry Collector - interactive input
pub mod aggregate;  // Aggregator - group-by summaries
pub mod report;     // Presenter - text output
pub mod chart;      // Presenter - chart data + renderer seam
pub mod menu;       // Session + menu loop

// Only compile terminal charts when TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use error::ExpenseError;
pub use config::{Config, Invocation, USAGE};
pub use store::{Expense, ExpenseTable, RecordStore, COLUMNS, DEFAULT_DATA_FILE};
pub use entry::{parse_amount, EntryCollector};
pub use aggregate::{
    category_summary, daily_summary, group_by, monthly_summary,
    CategoryTotal, MonthlySummary, SpendingStats, YearMonth,
};
pub use report::{render_categories, render_daily, render_monthly, render_recent};
pub use chart::{category_chart, daily_chart, ChartData, ChartRenderer, TextCharts};
pub use menu::{run_menu, MenuChoice, MenuOptions, Session};

#[cfg(feature = "tui")]
pub use ui::TerminalCharts;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
