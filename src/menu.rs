// 🧭 Menu Loop
// Session state (table + store) and the single-character dispatch loop

use crate::aggregate::{category_summary, daily_summary, monthly_summary};
use crate::chart::{category_chart, daily_chart, ChartRenderer, NO_PLOT_DATA};
use crate::entry::EntryCollector;
use crate::report::{
    render_categories, render_daily, render_monthly, render_recent, DEFAULT_RECENT_LIMIT,
    NO_SUMMARY_DATA,
};
use crate::store::{Expense, ExpenseTable, RecordStore};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};
use tracing::{info, warn};

// ============================================================================
// SESSION
// ============================================================================

/// The loaded table plus the store it is saved back to
///
/// Loaded once at startup; every add rewrites the whole file. A file that
/// fails to load is remembered instead of ending the program: reads report
/// the load error and adds refuse to overwrite the file.
#[derive(Debug)]
pub struct Session {
    store: RecordStore,
    table: ExpenseTable,
    load_error: Option<anyhow::Error>,
}

impl Session {
    pub fn open(store: RecordStore) -> Self {
        match store.load() {
            Ok(table) => Session::with_table(store, table),
            Err(err) => {
                let err = err.context(format!(
                    "Failed to load expenses from {}",
                    store.path().display()
                ));
                warn!(error = %format!("{:#}", err), "data file could not be loaded");
                Session {
                    store,
                    table: ExpenseTable::new(),
                    load_error: Some(err),
                }
            }
        }
    }

    pub fn with_table(store: RecordStore, table: ExpenseTable) -> Self {
        Session {
            store,
            table,
            load_error: None,
        }
    }

    /// Load failure from `open`, if any
    pub fn load_error(&self) -> Option<&anyhow::Error> {
        self.load_error.as_ref()
    }

    pub fn table(&self) -> Result<&ExpenseTable> {
        match &self.load_error {
            Some(err) => Err(anyhow!("{:#}", err)),
            None => Ok(&self.table),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Append and persist. On a failed save the append is undone.
    pub fn add(&mut self, expense: Expense) -> Result<()> {
        if let Some(err) = &self.load_error {
            bail!(
                "Refusing to overwrite {} that could not be loaded: {:#}",
                self.store.path().display(),
                err
            );
        }

        self.table.push(expense);

        if let Err(err) = self.store.save(&self.table) {
            self.table.pop();
            return Err(err.context("Expense was not saved"));
        }

        info!(count = self.table.len(), "expense added");
        Ok(())
    }
}

// ============================================================================
// MENU
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddExpense,
    ViewRecent,
    MonthlySummary,
    CategoryChart,
    DailyTrend,
    Exit,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::AddExpense),
            "2" => Some(MenuChoice::ViewRecent),
            "3" => Some(MenuChoice::MonthlySummary),
            "4" => Some(MenuChoice::CategoryChart),
            "5" => Some(MenuChoice::DailyTrend),
            "0" => Some(MenuChoice::Exit),
            _ => None,
        }
    }
}

const MENU: &str = "==== Expense Tracker ====
1. Add expense
2. View recent expenses
3. Show monthly summary
4. Plot expenses by category
5. Plot daily trend
0. Exit";

#[derive(Debug, Clone)]
pub struct MenuOptions {
    pub recent_limit: usize,
    /// Fixed "today" for blank entry dates; `None` uses the local clock
    pub today: Option<NaiveDate>,
}

impl Default for MenuOptions {
    fn default() -> Self {
        MenuOptions {
            recent_limit: DEFAULT_RECENT_LIMIT,
            today: None,
        }
    }
}

impl MenuOptions {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Run the menu until "0" or end of input
///
/// Handler failures are printed and the menu comes back; only I/O errors on
/// `output` end the loop early.
pub fn run_menu<R, W, C>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
    charts: &mut C,
    options: &MenuOptions,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    C: ChartRenderer,
{
    loop {
        writeln!(output, "{}", MENU)?;
        write!(output, "Choose an option: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read menu choice")? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        let choice = match MenuChoice::parse(&line) {
            Some(choice) => choice,
            None => {
                writeln!(output, "Invalid choice, please try again.\n")?;
                continue;
            }
        };

        let result = match choice {
            MenuChoice::Exit => {
                writeln!(output, "Goodbye!")?;
                return Ok(());
            }
            MenuChoice::AddExpense => add_expense(session, input, output, options),
            MenuChoice::ViewRecent => session
                .table()
                .and_then(|table| view_recent(table, output, options.recent_limit)),
            MenuChoice::MonthlySummary => session
                .table()
                .and_then(|table| show_monthly(table, output)),
            MenuChoice::CategoryChart => session
                .table()
                .and_then(|table| plot_categories(table, output, charts)),
            MenuChoice::DailyTrend => session
                .table()
                .and_then(|table| plot_daily(table, output, charts)),
        };

        match result {
            Ok(()) => writeln!(output)?,
            Err(err) => {
                warn!(?choice, error = %format!("{:#}", err), "menu action failed");
                writeln!(output, "\n❌ {:#}\n", err)?;
            }
        }
    }
}

fn add_expense<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
    options: &MenuOptions,
) -> Result<()> {
    let expense = EntryCollector::new(input, output, options.today()).collect()?;
    session.add(expense)?;
    writeln!(output, "Expense added successfully!")?;
    Ok(())
}

fn view_recent<W: Write>(table: &ExpenseTable, output: &mut W, limit: usize) -> Result<()> {
    write!(output, "{}", render_recent(table, limit))?;
    Ok(())
}

fn show_monthly<W: Write>(table: &ExpenseTable, output: &mut W) -> Result<()> {
    if table.is_empty() {
        writeln!(output, "\n{}", NO_SUMMARY_DATA)?;
        return Ok(());
    }

    let summary = monthly_summary(table).context("Monthly summary failed")?;
    write!(output, "{}", render_monthly(&summary))?;
    Ok(())
}

fn plot_categories<W: Write, C: ChartRenderer>(
    table: &ExpenseTable,
    output: &mut W,
    charts: &mut C,
) -> Result<()> {
    if table.is_empty() {
        writeln!(output, "\n{}", NO_PLOT_DATA)?;
        return Ok(());
    }

    let totals = category_summary(table);
    write!(output, "{}", render_categories(&totals))?;
    output.flush()?;

    charts
        .bar_chart(&category_chart(&totals))
        .context("Failed to display category chart")
}

fn plot_daily<W: Write, C: ChartRenderer>(
    table: &ExpenseTable,
    output: &mut W,
    charts: &mut C,
) -> Result<()> {
    if table.is_empty() {
        writeln!(output, "\n{}", NO_PLOT_DATA)?;
        return Ok(());
    }

    let days = daily_summary(table).context("Daily trend failed")?;
    write!(output, "{}", render_daily(&days))?;
    output.flush()?;

    charts
        .line_chart(&daily_chart(&days))
        .context("Failed to display daily trend")
}
