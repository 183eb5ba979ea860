//! Payment allocation strategies
//!
//! Three closed strategies spread settlement funds (payment + WHT) across
//! a member's open invoices:
//!
//! - **Manual**: the caller proposes the map; the engine only validates it
//! - **FIFO**: oldest due date first, greedy until funds run out
//! - **Full**: every balance paid exactly, or nothing at all
//!
//! Whatever is not allocated becomes account credit.
//!
//! # Invariants
//!
//! - `allocation[i] <= invoice[i].balance` and `allocation[i] >= 0`
//! - `sum(allocations) + credit_to_add == funds`
//! - Validation happens before any result is built (all-or-nothing)
//!
//! # Example
//!
//! ```text
//! Open invoices (FIFO order):
//!   INV-1 due 95 days ago, balance 5000
//!   INV-2 due 40 days ago, balance 3000
//!
//! Funds 6000:
//!   INV-1 ← 5000   (remaining 1000)
//!   INV-2 ← 1000   (remaining 0, stop)
//!
//! Credit to add: 0
//! ```

use crate::{Error, Result};
use receivables_core::{Invoice, InvoiceId, Money};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Allocated amount per invoice, iterated in id order
pub type AllocationMap = BTreeMap<InvoiceId, Money>;

/// Settlement strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "allocations", rename_all = "snake_case")]
pub enum SettlementStrategy {
    /// Caller-selected allocations, validated as-is
    Manual(AllocationMap),
    /// Oldest-first greedy allocation
    Fifo,
    /// Pay every open balance in full
    Full,
}

impl SettlementStrategy {
    /// Strategy without its payload
    pub fn kind(&self) -> StrategyKind {
        match self {
            SettlementStrategy::Manual(_) => StrategyKind::Manual,
            SettlementStrategy::Fifo => StrategyKind::Fifo,
            SettlementStrategy::Full => StrategyKind::Full,
        }
    }
}

/// Strategy discriminant, used in results and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Manual
    Manual,
    /// FIFO
    Fifo,
    /// Full
    Full,
}

impl StrategyKind {
    /// Label
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Manual => "manual",
            StrategyKind::Fifo => "fifo",
            StrategyKind::Full => "full",
        }
    }
}

/// Outcome of a strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Amount applied to each invoice
    pub allocations: AllocationMap,

    /// Sum of allocations
    pub allocated: Money,

    /// Funds left over, credited to the account
    pub credit_to_add: Money,
}

impl Allocation {
    /// Amount applied to one invoice (zero if absent)
    pub fn amount_for(&self, invoice: &InvoiceId) -> Money {
        self.allocations.get(invoice).copied().unwrap_or(Money::ZERO)
    }
}

/// Run the selected strategy
pub fn allocate(
    strategy: &SettlementStrategy,
    funds: Money,
    invoices: &[Invoice],
) -> Result<Allocation> {
    match strategy {
        SettlementStrategy::Manual(proposed) => allocate_manual(proposed, funds, invoices),
        SettlementStrategy::Fifo => allocate_fifo(funds, invoices),
        SettlementStrategy::Full => allocate_full(funds, invoices),
    }
}

fn ensure_non_negative(funds: Money) -> Result<()> {
    if funds.is_negative() {
        return Err(Error::InvalidInput(format!(
            "settlement funds cannot be negative: {}",
            funds
        )));
    }
    Ok(())
}

/// Validate a caller-supplied allocation map
pub fn allocate_manual(
    proposed: &AllocationMap,
    funds: Money,
    invoices: &[Invoice],
) -> Result<Allocation> {
    ensure_non_negative(funds)?;

    let balances: HashMap<&InvoiceId, Money> =
        invoices.iter().map(|inv| (&inv.id, inv.balance)).collect();

    for (invoice, &amount) in proposed {
        let balance = *balances
            .get(invoice)
            .ok_or_else(|| Error::UnknownInvoice(invoice.clone()))?;

        if amount.is_negative() {
            return Err(Error::NegativeAllocation {
                invoice: invoice.clone(),
                amount,
            });
        }

        if amount > balance {
            return Err(Error::OverAllocation {
                invoice: invoice.clone(),
                amount,
                balance,
            });
        }
    }

    let allocated = Money::checked_sum(proposed.values().copied())?;
    if allocated > funds {
        return Err(Error::FundsExceeded {
            allocated,
            available: funds,
        });
    }

    Ok(Allocation {
        allocations: proposed.clone(),
        allocated,
        credit_to_add: funds.checked_sub(allocated)?,
    })
}

/// Order in which FIFO consumes invoices: due date, then issue date, then id
pub fn fifo_order(invoices: &[Invoice]) -> Vec<&Invoice> {
    let mut ordered: Vec<&Invoice> = invoices.iter().collect();
    ordered.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.issue_date.cmp(&b.issue_date))
            .then_with(|| a.id.cmp(&b.id))
    });
    ordered
}

/// Oldest-first greedy allocation
pub fn allocate_fifo(funds: Money, invoices: &[Invoice]) -> Result<Allocation> {
    ensure_non_negative(funds)?;

    let mut remaining = funds;
    let mut allocations = AllocationMap::new();

    for invoice in fifo_order(invoices) {
        if remaining.is_zero() {
            break;
        }
        if !invoice.is_open() {
            continue;
        }

        let amount = remaining.min(invoice.balance);
        remaining = remaining.checked_sub(amount)?;

        tracing::debug!(
            invoice = %invoice.id,
            due_date = %invoice.due_date,
            amount = amount.minor_units(),
            remaining = remaining.minor_units(),
            "FIFO allocation"
        );

        allocations.insert(invoice.id.clone(), amount);
    }

    Ok(Allocation {
        allocations,
        allocated: funds.checked_sub(remaining)?,
        credit_to_add: remaining,
    })
}

/// Settle every balance exactly; fails without a partial result if short
pub fn allocate_full(funds: Money, invoices: &[Invoice]) -> Result<Allocation> {
    ensure_non_negative(funds)?;

    let required = Money::checked_sum(invoices.iter().map(|inv| inv.balance))?;

    if funds < required {
        return Err(Error::InsufficientFunds {
            required,
            available: funds,
        });
    }

    let allocations = invoices
        .iter()
        .map(|inv| (inv.id.clone(), inv.balance))
        .collect();

    Ok(Allocation {
        allocations,
        allocated: required,
        credit_to_add: funds.checked_sub(required)?,
    })
}
