//! Exact money in minor currency units
//!
//! Amounts are stored as `i64` counts of the smallest unit (satang, cents).
//! `Decimal` only appears at the presentation boundary, when a UI needs
//! `5000.00` instead of `500000`.

use crate::{types::Currency, Error, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount of money in the smallest currency unit
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero
    pub const ZERO: Money = Money(0);

    /// Create from minor units
    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// Minor units
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// True if exactly zero
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// True if strictly positive
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// True if strictly negative
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Money) -> Result<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| Error::Overflow(format!("{} + {}", self.0, other.0)))
    }

    /// Checked subtraction
    pub fn checked_sub(self, other: Money) -> Result<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or_else(|| Error::Overflow(format!("{} - {}", self.0, other.0)))
    }

    /// Saturating addition, for read-only totals that must not fail
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Checked sum of an iterator of amounts
    pub fn checked_sum<I>(amounts: I) -> Result<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, amount| acc.checked_add(amount))
    }

    /// Convert to a decimal in major units for display
    pub fn to_decimal(self, currency: Currency) -> Decimal {
        Decimal::new(self.0, currency.minor_exponent())
    }

    /// Parse a major-unit decimal coming from a UI form.
    ///
    /// Rejects values with more fractional digits than the currency has.
    pub fn from_decimal(value: Decimal, currency: Currency) -> Result<Money> {
        let factor = Decimal::from(10_i64.pow(currency.minor_exponent()));
        let scaled = value
            .checked_mul(factor)
            .ok_or_else(|| Error::Overflow(format!("{} {}", value, currency)))?;

        if !scaled.fract().is_zero() {
            return Err(Error::InvalidInput(format!(
                "{} has more than {} decimal places for {}",
                value,
                currency.minor_exponent(),
                currency
            )));
        }

        scaled
            .to_i64()
            .map(Money)
            .ok_or_else(|| Error::Overflow(format!("{} {}", value, currency)))
    }

    /// Human-readable amount, e.g. `5000.00 THB`
    pub fn display(self, currency: Currency) -> String {
        format!("{} {}", self.to_decimal(currency), currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
