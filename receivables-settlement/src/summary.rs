//! Aging summary for dashboards
//!
//! Read-only roll-up of an account's open invoices by aging bucket.

use crate::aging::{AgingBucket, AgingClassifier};
use chrono::NaiveDate;
use receivables_core::{Invoice, Money};
use serde::{Deserialize, Serialize};

/// Totals for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotal {
    /// Bucket
    pub bucket: AgingBucket,
    /// Open invoices in the bucket
    pub invoice_count: usize,
    /// Outstanding balance in the bucket
    pub balance: Money,
}

/// Aging summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingSummary {
    /// Date aging was evaluated at
    pub as_of: NaiveDate,
    /// One entry per bucket, least severe first
    pub buckets: Vec<BucketTotal>,
    /// Number of open invoices
    pub open_invoice_count: usize,
    /// Total outstanding balance
    pub total_outstanding: Money,
    /// Days overdue of the oldest open invoice
    pub oldest_days_overdue: Option<u32>,
}

impl AgingSummary {
    /// Roll up invoices with a nonzero balance
    pub fn compute(classifier: &AgingClassifier, invoices: &[Invoice], as_of: NaiveDate) -> Self {
        let mut buckets: Vec<BucketTotal> = AgingBucket::ALL
            .iter()
            .map(|&bucket| BucketTotal {
                bucket,
                invoice_count: 0,
                balance: Money::ZERO,
            })
            .collect();

        let mut open_invoice_count = 0;
        let mut total_outstanding = Money::ZERO;
        let mut oldest_days_overdue: Option<u32> = None;

        for invoice in invoices.iter().filter(|inv| inv.is_open()) {
            let days = classifier.days_overdue(invoice.due_date, as_of);
            let bucket = AgingBucket::from_days_overdue(days);

            // ALL is in enum order, so the discriminant is the index
            let total = &mut buckets[bucket as usize];
            total.invoice_count += 1;
            total.balance = total.balance.saturating_add(invoice.balance);

            open_invoice_count += 1;
            total_outstanding = total_outstanding.saturating_add(invoice.balance);
            oldest_days_overdue = Some(oldest_days_overdue.map_or(days, |d| d.max(days)));
        }

        Self {
            as_of,
            buckets,
            open_invoice_count,
            total_outstanding,
            oldest_days_overdue,
        }
    }

    /// Totals for one bucket, zero if the summary has no entry for it
    pub fn bucket(&self, bucket: AgingBucket) -> BucketTotal {
        self.buckets
            .iter()
            .find(|total| total.bucket == bucket)
            .copied()
            .unwrap_or(BucketTotal {
                bucket,
                invoice_count: 0,
                balance: Money::ZERO,
            })
    }
}
