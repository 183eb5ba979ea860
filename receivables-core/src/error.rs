//! Error types for receivables values

use crate::types::Currency;
use thiserror::Error;

/// Result type for receivables value operations
pub type Result<T> = std::result::Result<T, Error>;

/// Receivables value errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed or out-of-range input (dates, amounts, balances)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Values in different currencies were combined
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency the operation runs in
        expected: Currency,
        /// Offending currency
        found: Currency,
    },

    /// Checked money arithmetic overflowed
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}
