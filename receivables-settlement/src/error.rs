//! Error types for the settlement engine

use receivables_core::{Currency, InvoiceId, Money};
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
///
/// Every business variant is a deterministic rejection of bad input. None
/// of them is retryable.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed dates, negative amounts, invalid invoices
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Manual allocation larger than the invoice balance
    #[error("Allocation of {amount} to invoice {invoice} exceeds its balance of {balance}")]
    OverAllocation {
        /// Invoice
        invoice: InvoiceId,
        /// Proposed allocation
        amount: Money,
        /// Outstanding balance
        balance: Money,
    },

    /// Manual allocation below zero
    #[error("Allocation of {amount} to invoice {invoice} is negative")]
    NegativeAllocation {
        /// Invoice
        invoice: InvoiceId,
        /// Proposed allocation
        amount: Money,
    },

    /// Manual allocations add up to more than the settlement funds
    #[error("Allocations total {allocated} but only {available} is available")]
    FundsExceeded {
        /// Sum of proposed allocations
        allocated: Money,
        /// Payment plus WHT
        available: Money,
    },

    /// Full settlement requested without enough funds
    #[error("Full settlement requires {required} but only {available} is available")]
    InsufficientFunds {
        /// Sum of outstanding balances
        required: Money,
        /// Payment plus WHT
        available: Money,
    },

    /// Manual allocation names an invoice outside the account's open set
    #[error("Unknown invoice: {0}")]
    UnknownInvoice(InvoiceId),

    /// Invoice billed in a different currency than the settlement
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Settlement currency
        expected: Currency,
        /// Offending invoice currency
        found: Currency,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Stable label for metrics and UI message lookup
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::OverAllocation { .. } => "over_allocation",
            Error::NegativeAllocation { .. } => "negative_allocation",
            Error::FundsExceeded { .. } => "funds_exceeded",
            Error::InsufficientFunds { .. } => "insufficient_funds",
            Error::UnknownInvoice(_) => "unknown_invoice",
            Error::CurrencyMismatch { .. } => "currency_mismatch",
            Error::Config(_) => "config",
            Error::Metrics(_) => "metrics",
            Error::Io(_) => "io",
        }
    }

    /// True for rejections of caller input, as opposed to setup failures
    pub fn is_validation(&self) -> bool {
        !matches!(self, Error::Config(_) | Error::Metrics(_) | Error::Io(_))
    }
}

impl From<receivables_core::Error> for Error {
    fn from(err: receivables_core::Error) -> Self {
        match err {
            receivables_core::Error::InvalidInput(msg) => Error::InvalidInput(msg),
            receivables_core::Error::CurrencyMismatch { expected, found } => {
                Error::CurrencyMismatch { expected, found }
            }
            receivables_core::Error::Overflow(msg) => {
                Error::InvalidInput(format!("amount out of range: {}", msg))
            }
        }
    }
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::Metrics(err.to_string())
    }
}
