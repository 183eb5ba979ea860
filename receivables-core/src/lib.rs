//! Receivables Core
//!
//! Value types shared by the accounts-receivable engine: exact money in
//! minor currency units, invoice and account identifiers, and open invoices.
//!
//! # Invariants
//!
//! - Money is an integer count of the smallest currency unit; arithmetic is checked
//! - An invoice balance stays within `0..=amount`
//! - Nothing here performs I/O or holds mutable shared state

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod error;
pub mod fingerprint;
pub mod money;
pub mod types;

// Re-exports
pub use error::{Error, Result};
pub use fingerprint::StateFingerprint;
pub use money::Money;
pub use types::{validate_invoice_set, AccountId, Currency, Invoice, InvoiceId};
