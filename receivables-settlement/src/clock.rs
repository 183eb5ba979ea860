//! Source of "today" for aging
//!
//! Every computation takes an explicit as-of date; the clock only supplies
//! the default so tests and previews can pin it.

use chrono::NaiveDate;
use std::fmt::Debug;

/// Supplies the current business date
pub trait Clock: Debug + Send + Sync {
    /// Today's date in the club's local calendar
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the host's local time zone
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(NaiveDate);

impl FixedClock {
    /// Pin the clock to `date`
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
