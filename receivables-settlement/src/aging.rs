//! Invoice aging classification
//!
//! Maps days overdue onto four ordered buckets:
//!
//! ```text
//! days overdue   bucket
//!   0 ..=  30    Current
//!  31 ..=  60    Bucket30
//!  61 ..=  90    Bucket60
//!  91 ..         Bucket90  (shown as "suspended")
//! ```
//!
//! Boundaries belong to the lower bucket: exactly 30 days overdue is still
//! `Current`. Dashboard thresholds and badge colours rely on this.

use crate::{Error, Result};
use chrono::NaiveDate;
use receivables_core::Invoice;
use serde::{Deserialize, Serialize};

/// Last day overdue that is still `Current`
pub const CURRENT_MAX_DAYS: u32 = 30;

/// Last day overdue in `Bucket30`
pub const BUCKET30_MAX_DAYS: u32 = 60;

/// Last day overdue in `Bucket60`
pub const BUCKET60_MAX_DAYS: u32 = 90;

/// Aging bucket, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgingBucket {
    /// 0-30 days overdue
    Current,
    /// 31-60 days overdue
    Bucket30,
    /// 61-90 days overdue
    Bucket60,
    /// 91+ days overdue; the maximal bucket
    Bucket90,
}

impl AgingBucket {
    /// All buckets, least severe first
    pub const ALL: [AgingBucket; 4] = [
        AgingBucket::Current,
        AgingBucket::Bucket30,
        AgingBucket::Bucket60,
        AgingBucket::Bucket90,
    ];

    /// Bucket for a number of days overdue
    pub fn from_days_overdue(days: u32) -> Self {
        match days {
            0..=CURRENT_MAX_DAYS => AgingBucket::Current,
            d if d <= BUCKET30_MAX_DAYS => AgingBucket::Bucket30,
            d if d <= BUCKET60_MAX_DAYS => AgingBucket::Bucket60,
            _ => AgingBucket::Bucket90,
        }
    }

    /// True for the bucket that drives suspension
    pub fn is_maximal(self) -> bool {
        self == AgingBucket::Bucket90
    }

    /// Invoice-level display label
    pub fn label(self) -> &'static str {
        match self {
            AgingBucket::Current => "current",
            AgingBucket::Bucket30 => "31-60",
            AgingBucket::Bucket60 => "61-90",
            AgingBucket::Bucket90 => "suspended",
        }
    }

    /// Inclusive day range; the maximal bucket is open-ended
    pub fn day_range(self) -> (u32, Option<u32>) {
        match self {
            AgingBucket::Current => (0, Some(CURRENT_MAX_DAYS)),
            AgingBucket::Bucket30 => (CURRENT_MAX_DAYS + 1, Some(BUCKET30_MAX_DAYS)),
            AgingBucket::Bucket60 => (BUCKET30_MAX_DAYS + 1, Some(BUCKET60_MAX_DAYS)),
            AgingBucket::Bucket90 => (BUCKET60_MAX_DAYS + 1, None),
        }
    }
}

/// Aging classifier
#[derive(Debug, Default, Clone, Copy)]
pub struct AgingClassifier;

impl AgingClassifier {
    /// Create new classifier
    pub fn new() -> Self {
        Self
    }

    /// Whole days past `due_date`, never negative
    pub fn days_overdue(&self, due_date: NaiveDate, as_of: NaiveDate) -> u32 {
        let days = (as_of - due_date).num_days().max(0);
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    /// Classify a due date as of a reference date
    pub fn classify(&self, due_date: NaiveDate, as_of: NaiveDate) -> AgingBucket {
        AgingBucket::from_days_overdue(self.days_overdue(due_date, as_of))
    }

    /// Classify a due date that may be missing from upstream data
    pub fn classify_opt(
        &self,
        due_date: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> Result<AgingBucket> {
        due_date
            .map(|due| self.classify(due, as_of))
            .ok_or_else(|| Error::InvalidInput("missing due date".to_string()))
    }

    /// Classify an invoice by its due date
    pub fn classify_invoice(&self, invoice: &Invoice, as_of: NaiveDate) -> AgingBucket {
        self.classify(invoice.due_date, as_of)
    }
}

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`)
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("invalid date '{}': {}", value, e)))
}
