// ✍️ Entry Collector
// Gathers one expense from an interactive input source

use crate::aggregate::{parse_date, DATE_FORMAT};
use crate::error::ExpenseError;
use crate::store::Expense;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use tracing::warn;

/// Validate one amount answer
///
/// Any finite decimal is accepted; sign and range are not checked.
pub fn parse_amount(input: &str) -> Result<f64, ExpenseError> {
    let trimmed = input.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ExpenseError::InvalidAmount(trimmed.to_string())),
    }
}

/// Prompts for date, category, description and amount
///
/// Reads from any `BufRead` and writes prompts to any `Write`, so the
/// console is just one possible source. `today` fills in a blank date.
pub struct EntryCollector<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
    today: NaiveDate,
}

impl<'a, R: BufRead, W: Write> EntryCollector<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W, today: NaiveDate) -> Self {
        EntryCollector {
            input,
            output,
            today,
        }
    }

    /// Collect one expense. Does not persist it.
    pub fn collect(&mut self) -> Result<Expense> {
        writeln!(self.output, "\n--- Add New Expense ---")?;

        let date = self.ask("Date (YYYY-MM-DD, leave blank for today): ")?;
        let date = if date.is_empty() {
            self.today.format(DATE_FORMAT).to_string()
        } else {
            if parse_date(0, &date).is_err() {
                warn!(date = %date, "expense date is not YYYY-MM-DD");
                writeln!(
                    self.output,
                    "⚠️  '{}' is not YYYY-MM-DD; monthly and daily summaries will reject it.",
                    date
                )?;
            }
            date
        };

        let category = self.ask("Category (Food, Travel, Bills, etc.): ")?;
        let description = self.ask("Short description: ")?;

        let amount = loop {
            let answer = self.ask("Amount: ")?;
            match parse_amount(&answer) {
                Ok(amount) => break amount,
                Err(_) => writeln!(self.output, "Please enter a valid number for amount.")?,
            }
        };

        Ok(Expense {
            date,
            category,
            description,
            amount,
        })
    }

    /// Print a prompt and read one trimmed line
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Err(ExpenseError::InputClosed.into());
        }

        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn collect_from(script: &str) -> (Result<Expense>, String) {
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output = Vec::new();
        let result = EntryCollector::new(&mut input, &mut output, today()).collect();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_amount_accepts_decimals() {
        assert_eq!(parse_amount("12.50").unwrap(), 12.5);
        assert_eq!(parse_amount("  -3 ").unwrap(), -3.0);
        assert_eq!(parse_amount("1e2").unwrap(), 100.0);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(
            parse_amount("abc"),
            Err(ExpenseError::InvalidAmount("abc".to_string()))
        );
        assert!(parse_amount("").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("12,50").is_err());
    }

    #[test]
    fn test_collect_fields_match_input() {
        let (result, _) = collect_from("2024-01-05\n  Food \nLunch with team\n10.00\n");

        let expense = result.unwrap();
        assert_eq!(expense, Expense::new("2024-01-05", "Food", "Lunch with team", 10.0));
    }

    #[test]
    fn test_blank_date_defaults_to_today() {
        let (result, _) = collect_from("\nTravel\nTaxi\n30\n");

        assert_eq!(result.unwrap().date, "2024-06-30");
    }

    #[test]
    fn test_invalid_amount_is_reprompted() {
        let (result, output) = collect_from("2024-01-05\nFood\nLunch\nabc\n\n12.5\n");

        assert_eq!(result.unwrap().amount, 12.5);
        assert_eq!(output.matches("Please enter a valid number for amount.").count(), 2);
        assert_eq!(output.matches("Amount: ").count(), 3);
    }

    #[test]
    fn test_input_closed_while_reprompting() {
        let (result, _) = collect_from("2024-01-05\nFood\nLunch\nabc\n");

        let err = result.unwrap_err();
        assert_eq!(err.downcast_ref::<ExpenseError>(), Some(&ExpenseError::InputClosed));
    }

    #[test]
    fn test_non_iso_date_is_kept_with_notice() {
        let (result, output) = collect_from("05/01/2024\nFood\nLunch\n10\n");

        assert_eq!(result.unwrap().date, "05/01/2024");
        assert!(output.contains("is not YYYY-MM-DD"));
    }
}
