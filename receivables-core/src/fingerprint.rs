//! Invoice-state fingerprints
//!
//! A SHA-256 digest over the parts of an invoice set that aging and
//! suspension depend on (id, due date, balance, currency) plus the as-of
//! date. Display caches compare fingerprints to detect that a balance moved
//! underneath them.

use crate::types::Invoice;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 digest of an invoice set at an as-of date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateFingerprint([u8; 32]);

impl StateFingerprint {
    /// Compute the fingerprint. Input order does not matter.
    pub fn compute(invoices: &[Invoice], as_of: NaiveDate) -> Self {
        let mut sorted: Vec<&Invoice> = invoices.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut hasher = Sha256::new();
        hasher.update(as_of.num_days_from_ce().to_be_bytes());
        hasher.update((sorted.len() as u64).to_be_bytes());

        for invoice in sorted {
            let id = invoice.id.as_str().as_bytes();
            hasher.update((id.len() as u64).to_be_bytes());
            hasher.update(id);
            hasher.update(invoice.due_date.num_days_from_ce().to_be_bytes());
            hasher.update(invoice.balance.minor_units().to_be_bytes());
            hasher.update(invoice.currency.code().as_bytes());
        }

        Self(hasher.finalize().into())
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StateFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Currency, Money};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoices() -> Vec<Invoice> {
        vec![
            Invoice::new(
                "A",
                date(2026, 1, 1),
                date(2026, 1, 31),
                Money::from_minor(500),
                Currency::THB,
            ),
            Invoice::new(
                "B",
                date(2026, 2, 1),
                date(2026, 2, 28),
                Money::from_minor(700),
                Currency::THB,
            ),
        ]
    }

    #[test]
    fn test_order_independent() {
        let forward = invoices();
        let mut reversed = invoices();
        reversed.reverse();

        let as_of = date(2026, 6, 1);
        assert_eq!(
            StateFingerprint::compute(&forward, as_of),
            StateFingerprint::compute(&reversed, as_of)
        );
    }

    #[test]
    fn test_balance_change_detected() {
        let before = invoices();
        let mut after = invoices();
        after[0].balance = Money::from_minor(499);

        let as_of = date(2026, 6, 1);
        assert_ne!(
            StateFingerprint::compute(&before, as_of),
            StateFingerprint::compute(&after, as_of)
        );
        assert_ne!(
            StateFingerprint::compute(&before, as_of),
            StateFingerprint::compute(&before, date(2026, 6, 2))
        );
    }

    #[test]
    fn test_hex_display() {
        let fp = StateFingerprint::compute(&[], date(2026, 1, 1));
        let hex = fp.to_string();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
