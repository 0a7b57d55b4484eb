// ⚠️ Domain Errors
// Failures callers need to tell apart (everything else travels as anyhow::Error)

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExpenseError {
    /// A stored date that summaries cannot place on the calendar
    #[error("record #{row} has invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { row: usize, value: String },

    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),

    /// Input source reached end-of-file in the middle of a prompt
    #[error("input closed before the expense was complete")]
    InputClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_message_names_row_and_value() {
        let err = ExpenseError::InvalidDate {
            row: 3,
            value: "yesterday".to_string(),
        };

        let message = err.to_string();
        assert!(message.contains("#3"));
        assert!(message.contains("'yesterday'"));
    }

    #[test]
    fn test_invalid_amount_message() {
        let err = ExpenseError::InvalidAmount("abc".to_string());
        assert_eq!(err.to_string(), "'abc' is not a valid amount");
    }
}
