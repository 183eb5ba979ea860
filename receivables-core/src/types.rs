//! Core types for receivables
//!
//! All types are designed for:
//! - Deterministic serialization (serde, sorted maps)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (integer minor units for money)

use crate::{money::Money, Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Account identifier (member number or city-ledger code)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create new account ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invoice identifier
///
/// Ordered so allocation maps iterate deterministically and FIFO has a
/// stable final tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    /// Create new invoice ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for InvoiceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// ISO 4217 currency code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Currency {
    /// Thai Baht
    #[default]
    THB,
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Singapore Dollar
    SGD,
    /// Japanese Yen
    JPY,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::THB => "THB",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::SGD => "SGD",
            Currency::JPY => "JPY",
        }
    }

    /// Parse from ISO code
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "THB" => Some(Currency::THB),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "SGD" => Some(Currency::SGD),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }

    /// Number of decimal places in the major unit
    pub fn minor_exponent(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Open receivable line
///
/// The aging bucket is never stored here; it is derived from `due_date`
/// and an as-of date every time it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice ID
    pub id: InvoiceId,

    /// Date the invoice was billed
    pub issue_date: NaiveDate,

    /// Payment due date
    pub due_date: NaiveDate,

    /// Original billed amount
    pub amount: Money,

    /// Current outstanding balance
    pub balance: Money,

    /// Currency
    #[serde(default)]
    pub currency: Currency,
}

impl Invoice {
    /// Create a freshly billed invoice (balance equals amount)
    pub fn new(
        id: impl Into<String>,
        issue_date: NaiveDate,
        due_date: NaiveDate,
        amount: Money,
        currency: Currency,
    ) -> Self {
        Self {
            id: InvoiceId::new(id),
            issue_date,
            due_date,
            amount,
            balance: amount,
            currency,
        }
    }

    /// Same invoice with a different outstanding balance
    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    /// Amount already settled against this invoice
    pub fn settled(&self) -> Money {
        Money::from_minor(
            self.amount
                .minor_units()
                .saturating_sub(self.balance.minor_units()),
        )
    }

    /// True while a balance is outstanding
    pub fn is_open(&self) -> bool {
        self.balance.is_positive()
    }

    /// Check the per-invoice invariants
    pub fn validate(&self) -> Result<()> {
        if self.amount.is_negative() {
            return Err(Error::InvalidInput(format!(
                "invoice {}: negative amount {}",
                self.id, self.amount
            )));
        }

        if self.balance.is_negative() {
            return Err(Error::InvalidInput(format!(
                "invoice {}: negative balance {}",
                self.id, self.balance
            )));
        }

        if self.balance > self.amount {
            return Err(Error::InvalidInput(format!(
                "invoice {}: balance {} exceeds amount {}",
                self.id, self.balance, self.amount
            )));
        }

        if self.due_date < self.issue_date {
            return Err(Error::InvalidInput(format!(
                "invoice {}: due date {} precedes issue date {}",
                self.id, self.due_date, self.issue_date
            )));
        }

        Ok(())
    }
}

/// Validate a member's open-invoice set as a whole.
///
/// Every invoice must be valid, ids must be unique, and all invoices must be
/// billed in `currency`.
pub fn validate_invoice_set(invoices: &[Invoice], currency: Currency) -> Result<()> {
    let mut seen = HashSet::with_capacity(invoices.len());

    for invoice in invoices {
        invoice.validate()?;

        if invoice.currency != currency {
            return Err(Error::CurrencyMismatch {
                expected: currency,
                found: invoice.currency,
            });
        }

        if !seen.insert(&invoice.id) {
            return Err(Error::InvalidInput(format!(
                "duplicate invoice id {}",
                invoice.id
            )));
        }
    }

    Ok(())
}
