use chrono::NaiveDate;
use thiserror::Error;

use crate::model::LedgerKind;

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty file path, duplicate columns, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// Tolerance is not a non-negative integer.
    #[error("invalid tolerance '{0}': expected a non-negative integer")]
    InvalidTolerance(String),
    /// The date column is absent from an input table.
    #[error("{ledger} ledger: missing column '{column}'")]
    MissingColumn { ledger: LedgerKind, column: String },
    /// Date parse error. `row` is 1-based over data rows.
    #[error("{ledger} ledger, row {row}: cannot parse date '{value}'")]
    UnparsableDate {
        ledger: LedgerKind,
        row: usize,
        value: String,
    },
    /// Quantity parse error.
    #[error("{ledger} ledger, row {row}: cannot parse quantity '{value}'")]
    UnparsableQuantity {
        ledger: LedgerKind,
        row: usize,
        value: String,
    },
    /// A per-day sum or the expected stock left the i64 range.
    #[error("quantity overflow for '{product}' on {date}")]
    QuantityOverflow { product: String, date: NaiveDate },
    /// Malformed CSV text.
    #[error("{origin}: malformed CSV: {message}")]
    Csv { origin: String, message: String },
    /// IO error (file read, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl ReconError {
    /// True for errors caused by the contents of an input table rather than
    /// by configuration or the filesystem.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::UnparsableDate { .. }
                | Self::UnparsableQuantity { .. }
                | Self::QuantityOverflow { .. }
                | Self::Csv { .. }
        )
    }
}
