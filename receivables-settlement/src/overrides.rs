//! Suspension overrides
//!
//! A manager can reinstate a suspended member ahead of payment. The override
//! forces the effective status to current while it is active; the raw
//! status underneath is still reported.

use crate::suspension::AccountStatus;
use chrono::{Duration, NaiveDate};
use receivables_core::Money;
use serde::{Deserialize, Serialize};

/// How long an override lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideDuration {
    /// Until the enclosing workflow decides a payment cleared it
    UntilPayment,
    /// A fixed number of days starting on the grant date
    Days {
        /// Number of active days (0 means never active)
        days: u32,
    },
    /// Through a custom end date, inclusive
    UntilDate {
        /// Last active day
        date: NaiveDate,
    },
}

/// Reinstatement override on an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    /// First active day
    pub granted_on: NaiveDate,

    /// Duration policy
    pub duration: OverrideDuration,

    /// Date the override was revoked or cleared; inactive from this day on
    #[serde(default)]
    pub cleared_on: Option<NaiveDate>,
}

impl Override {
    /// Create new override
    pub fn new(granted_on: NaiveDate, duration: OverrideDuration) -> Self {
        Self {
            granted_on,
            duration,
            cleared_on: None,
        }
    }

    /// Override that lasts until a qualifying payment
    pub fn until_payment(granted_on: NaiveDate) -> Self {
        Self::new(granted_on, OverrideDuration::UntilPayment)
    }

    /// Override that lasts `days` days
    pub fn for_days(granted_on: NaiveDate, days: u32) -> Self {
        Self::new(granted_on, OverrideDuration::Days { days })
    }

    /// Override that lasts through `date`
    pub fn until(granted_on: NaiveDate, date: NaiveDate) -> Self {
        Self::new(granted_on, OverrideDuration::UntilDate { date })
    }

    /// Same override, cleared on `date`
    pub fn cleared(mut self, date: NaiveDate) -> Self {
        self.cleared_on = Some(date);
        self
    }

    /// Last day the override is active by its duration alone.
    ///
    /// `None` for until-payment overrides and zero-day overrides.
    pub fn expires_on(&self) -> Option<NaiveDate> {
        match self.duration {
            OverrideDuration::UntilPayment => None,
            OverrideDuration::Days { days: 0 } => None,
            OverrideDuration::Days { days } => self
                .granted_on
                .checked_add_signed(Duration::days(i64::from(days) - 1)),
            OverrideDuration::UntilDate { date } => Some(date),
        }
    }

    /// True if the override suppresses suspension on `as_of`
    pub fn is_active(&self, as_of: NaiveDate) -> bool {
        if as_of < self.granted_on {
            return false;
        }

        if matches!(self.cleared_on, Some(cleared) if as_of >= cleared) {
            return false;
        }

        match self.duration {
            OverrideDuration::UntilPayment => true,
            OverrideDuration::Days { days } => {
                (as_of - self.granted_on).num_days() < i64::from(days)
            }
            OverrideDuration::UntilDate { date } => as_of <= date,
        }
    }

    /// True for until-payment overrides
    pub fn is_until_payment(&self) -> bool {
        self.duration == OverrideDuration::UntilPayment
    }
}

/// Which settlements clear an until-payment override
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UntilPaymentClearing {
    /// Never cleared by the engine; the enclosing workflow revokes it
    #[default]
    Workflow,
    /// Cleared by any settlement that allocates a nonzero amount
    AnyAllocation,
    /// Cleared once no balance remains in the maximal bucket
    MaximalBucketCleared,
}

impl UntilPaymentClearing {
    /// Parse from its configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "workflow" => Some(UntilPaymentClearing::Workflow),
            "any_allocation" => Some(UntilPaymentClearing::AnyAllocation),
            "maximal_bucket_cleared" => Some(UntilPaymentClearing::MaximalBucketCleared),
            _ => None,
        }
    }

    /// Does a settlement with this outcome clear an until-payment override?
    pub fn clears(self, allocated: Money, raw_status_after: AccountStatus) -> bool {
        match self {
            UntilPaymentClearing::Workflow => false,
            UntilPaymentClearing::AnyAllocation => allocated.is_positive(),
            UntilPaymentClearing::MaximalBucketCleared => {
                raw_status_after == AccountStatus::Current
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_fixed_days_window() {
        let ov = Override::for_days(date(10, 1), 7);

        assert!(!ov.is_active(date(9, 30)));
        assert!(ov.is_active(date(10, 1)));
        assert!(ov.is_active(date(10, 7)));
        assert!(!ov.is_active(date(10, 8)));
        assert_eq!(ov.expires_on(), Some(date(10, 7)));

        let never = Override::for_days(date(10, 1), 0);
        assert!(!never.is_active(date(10, 1)));
        assert_eq!(never.expires_on(), None);
    }

    #[test]
    fn test_custom_end_date_inclusive() {
        let ov = Override::until(date(10, 1), date(10, 31));

        assert!(ov.is_active(date(10, 31)));
        assert!(!ov.is_active(date(11, 1)));
    }

    #[test]
    fn test_until_payment_stays_active_until_cleared() {
        let ov = Override::until_payment(date(10, 1));
        assert!(ov.is_until_payment());
        assert!(ov.is_active(date(12, 31)));

        let cleared = ov.cleared(date(11, 15));
        assert!(cleared.is_active(date(11, 14)));
        assert!(!cleared.is_active(date(11, 15)));
    }

    #[test]
    fn test_clearing_policies() {
        let paid = Money::from_minor(100);

        assert!(!UntilPaymentClearing::Workflow.clears(paid, AccountStatus::Current));
        assert!(UntilPaymentClearing::AnyAllocation.clears(paid, AccountStatus::Suspended));
        assert!(!UntilPaymentClearing::AnyAllocation.clears(Money::ZERO, AccountStatus::Current));
        assert!(UntilPaymentClearing::MaximalBucketCleared.clears(paid, AccountStatus::Current));
        assert!(!UntilPaymentClearing::MaximalBucketCleared.clears(paid, AccountStatus::Suspended));

        assert_eq!(
            UntilPaymentClearing::from_name("maximal_bucket_cleared"),
            Some(UntilPaymentClearing::MaximalBucketCleared)
        );
        assert_eq!(UntilPaymentClearing::from_name("sometimes"), None);
    }
}
