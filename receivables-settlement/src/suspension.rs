//! Account suspension as a projection of invoice aging
//!
//! Status is never stored. An account is suspended iff it has an invoice
//! with a nonzero balance in the maximal aging bucket, unless an active
//! override says otherwise.

use crate::{aging::AgingClassifier, overrides::Override};
use chrono::NaiveDate;
use receivables_core::{Invoice, InvoiceId, Money};
use serde::{Deserialize, Serialize};

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    /// In good standing
    Current,
    /// Suspended for 91+ day arrears
    Suspended,
}

/// Result of evaluating an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspensionAssessment {
    /// Status from invoice aging alone
    pub raw_status: AccountStatus,

    /// Status after applying any active override
    pub effective_status: AccountStatus,

    /// Whether an override was active on the as-of date
    pub override_active: bool,

    /// Outstanding balance in the maximal bucket
    pub overdue_balance: Money,

    /// Invoices in the maximal bucket with a balance, sorted by id
    pub overdue_invoices: Vec<InvoiceId>,
}

impl SuspensionAssessment {
    /// Effective suspension
    pub fn is_suspended(&self) -> bool {
        self.effective_status == AccountStatus::Suspended
    }

    /// Suspended by aging, but an override keeps the account current.
    /// Drives the "override active" indicator.
    pub fn suspended_but_for_override(&self) -> bool {
        self.raw_status == AccountStatus::Suspended && self.override_active
    }
}

/// Suspension evaluator
#[derive(Debug, Default, Clone, Copy)]
pub struct SuspensionEvaluator {
    classifier: AgingClassifier,
}

impl SuspensionEvaluator {
    /// Create new evaluator
    pub fn new(classifier: AgingClassifier) -> Self {
        Self { classifier }
    }

    /// Derive account status from its invoices
    pub fn evaluate(
        &self,
        invoices: &[Invoice],
        status_override: Option<&Override>,
        as_of: NaiveDate,
    ) -> SuspensionAssessment {
        let mut overdue_balance = Money::ZERO;
        let mut overdue_invoices = Vec::new();

        for invoice in invoices {
            if invoice.is_open() && self.classifier.classify_invoice(invoice, as_of).is_maximal() {
                overdue_balance = overdue_balance.saturating_add(invoice.balance);
                overdue_invoices.push(invoice.id.clone());
            }
        }
        overdue_invoices.sort();

        let raw_status = if overdue_invoices.is_empty() {
            AccountStatus::Current
        } else {
            AccountStatus::Suspended
        };

        let override_active = status_override.is_some_and(|ov| ov.is_active(as_of));

        let effective_status = if override_active {
            AccountStatus::Current
        } else {
            raw_status
        };

        SuspensionAssessment {
            raw_status,
            effective_status,
            override_active,
            overdue_balance,
            overdue_invoices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use receivables_core::Currency;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn invoice(id: &str, days_overdue: i64, balance: i64) -> Invoice {
        let due = as_of() - Duration::days(days_overdue);
        Invoice::new(id, due - Duration::days(30), due, Money::from_minor(balance), Currency::THB)
    }

    #[test]
    fn test_empty_account_is_current() {
        let assessment = SuspensionEvaluator::default().evaluate(&[], None, as_of());
        assert_eq!(assessment.raw_status, AccountStatus::Current);
        assert_eq!(assessment.effective_status, AccountStatus::Current);
        assert_eq!(assessment.overdue_balance, Money::ZERO);
    }

    #[test]
    fn test_suspended_at_91_days() {
        let evaluator = SuspensionEvaluator::default();

        let at_90 = evaluator.evaluate(&[invoice("A", 90, 5_000)], None, as_of());
        assert_eq!(at_90.raw_status, AccountStatus::Current);

        let at_91 = evaluator.evaluate(&[invoice("A", 91, 5_000)], None, as_of());
        assert_eq!(at_91.raw_status, AccountStatus::Suspended);
        assert!(at_91.is_suspended());
        assert_eq!(at_91.overdue_balance, Money::from_minor(5_000));
        assert_eq!(at_91.overdue_invoices, vec![InvoiceId::new("A")]);
    }

    #[test]
    fn test_zero_balance_does_not_suspend() {
        let paid = invoice("A", 200, 5_000).with_balance(Money::ZERO);
        let assessment = SuspensionEvaluator::default().evaluate(&[paid], None, as_of());
        assert_eq!(assessment.raw_status, AccountStatus::Current);
    }

    #[test]
    fn test_override_forces_current_but_reports_raw() {
        let invoices = vec![invoice("B", 120, 700), invoice("A", 95, 300), invoice("C", 10, 50)];
        let ov = Override::for_days(as_of() - Duration::days(2), 14);

        let assessment = SuspensionEvaluator::default().evaluate(&invoices, Some(&ov), as_of());

        assert_eq!(assessment.raw_status, AccountStatus::Suspended);
        assert_eq!(assessment.effective_status, AccountStatus::Current);
        assert!(assessment.suspended_but_for_override());
        assert_eq!(assessment.overdue_balance, Money::from_minor(1_000));
        assert_eq!(
            assessment.overdue_invoices,
            vec![InvoiceId::new("A"), InvoiceId::new("B")]
        );
    }

    #[test]
    fn test_expired_override_ignored() {
        let ov = Override::until(as_of() - Duration::days(30), as_of() - Duration::days(1));
        let assessment =
            SuspensionEvaluator::default().evaluate(&[invoice("A", 100, 1)], Some(&ov), as_of());

        assert!(!assessment.override_active);
        assert_eq!(assessment.effective_status, AccountStatus::Suspended);
    }
}
