// 🗄️ Record Store
// Expense table <-> flat CSV file (header + one row per expense)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Fixed column order of the persisted file
pub const COLUMNS: [&str; 4] = ["Date", "Category", "Description", "Amount"];

/// Default data file, relative to the working directory
pub const DEFAULT_DATA_FILE: &str = "expenses.csv";

// ============================================================================
// EXPENSE RECORD
// ============================================================================

/// One expense entry
///
/// `date` keeps the text exactly as it was entered or read from disk.
/// Only the aggregation layer parses it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Expense {
    #[serde(rename = "Date")]
    pub date: String,

    #[serde(rename = "Category")]
    pub category: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Amount")]
    pub amount: f64,
}

impl Expense {
    pub fn new(date: &str, category: &str, description: &str, amount: f64) -> Self {
        Expense {
            date: date.to_string(),
            category: category.to_string(),
            description: description.to_string(),
            amount,
        }
    }
}

// ============================================================================
// EXPENSE TABLE
// ============================================================================

/// Ordered expenses; insertion order is file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseTable {
    records: Vec<Expense>,
}

impl ExpenseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Expense>) -> Self {
        ExpenseTable { records }
    }

    pub fn push(&mut self, expense: Expense) {
        self.records.push(expense);
    }

    /// Removes the most recently appended expense
    pub fn pop(&mut self) -> Option<Expense> {
        self.records.pop()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Expense> {
        self.records.iter()
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    /// Last `n` expenses, still in insertion order
    pub fn last(&self, n: usize) -> &[Expense] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }
}

impl<'a> IntoIterator for &'a ExpenseTable {
    type Item = &'a Expense;
    type IntoIter = std::slice::Iter<'a, Expense>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// RECORD STORE
// ============================================================================

/// CSV-backed persistence for the expense table
///
/// Whole-table semantics: `load` reads everything, `save` rewrites everything.
/// There is no atomic rename, so a crash mid-write can leave a truncated file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RecordStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole table. A missing file is an empty table, not an error.
    pub fn load(&self) -> Result<ExpenseTable> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "data file not found, starting with an empty table");
            return Ok(ExpenseTable::new());
        }

        let mut rdr = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut records = Vec::new();
        for (index, result) in rdr.deserialize().enumerate() {
            let expense: Expense = result.with_context(|| {
                format!(
                    "Malformed expense on data row {} of {}",
                    index + 1,
                    self.path.display()
                )
            })?;
            records.push(expense);
        }

        debug!(count = records.len(), path = %self.path.display(), "loaded expenses");
        Ok(ExpenseTable::from_records(records))
    }

    /// Overwrite the file with the full table, header row first
    pub fn save(&self, table: &ExpenseTable) -> Result<()> {
        // Header is written by hand so an empty table still gets one
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .with_context(|| format!("Failed to create {}", self.path.display()))?;

        wtr.write_record(COLUMNS)
            .context("Failed to write CSV header")?;

        for expense in table {
            wtr.serialize(expense)
                .context("Failed to serialize expense")?;
        }

        wtr.flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;

        debug!(count = table.len(), path = %self.path.display(), "saved expenses");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_table() -> ExpenseTable {
        ExpenseTable::from_records(vec![
            Expense::new("2024-01-05", "Food", "Lunch", 10.00),
            Expense::new("2024-01-20", "Food", "Dinner, with friends", 15.25),
            Expense::new("2024-02-01", "Travel", "Taxi \"airport\"", 30.125),
        ])
    }

    #[test]
    fn test_missing_file_loads_empty_table() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("nope.csv"));

        let table = store.load().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_save_then_load_preserves_records() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("expenses.csv"));
        let table = sample_table();

        store.save(&table).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_save_load_save_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("expenses.csv"));

        store.save(&sample_table()).unwrap();
        let first = fs::read_to_string(store.path()).unwrap();

        let reloaded = store.load().unwrap();
        store.save(&reloaded).unwrap();
        let second = fs::read_to_string(store.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_save_writes_header_and_escapes_delimiters() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("expenses.csv"));

        store.save(&sample_table()).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        let mut lines = contents.lines();

        assert_eq!(lines.next(), Some("Date,Category,Description,Amount"));
        assert_eq!(lines.next(), Some("2024-01-05,Food,Lunch,10.0"));
        assert_eq!(lines.next(), Some("2024-01-20,Food,\"Dinner, with friends\",15.25"));
    }

    #[test]
    fn test_empty_table_saves_header_only() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("expenses.csv"));

        store.save(&ExpenseTable::new()).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();

        assert_eq!(contents.trim_end(), "Date,Category,Description,Amount");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_amount_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.csv");
        fs::write(&path, "Date,Category,Description,Amount\n2024-01-05,Food,Lunch,ten\n").unwrap();

        let err = RecordStore::new(&path).load().unwrap_err();
        assert!(format!("{:#}", err).contains("data row 1"));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.csv");
        fs::write(&path, "Date,Category,Amount\n2024-01-05,Food,10\n").unwrap();

        assert!(RecordStore::new(&path).load().is_err());
    }

    #[test]
    fn test_last_keeps_insertion_order() {
        let table = sample_table();

        let tail = table.last(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].description, "Dinner, with friends");
        assert_eq!(tail[1].category, "Travel");

        assert_eq!(table.last(10).len(), 3);
        assert!(table.last(0).is_empty());
    }
}
