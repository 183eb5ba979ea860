//! Settlement calculator
//!
//! Composes a strategy's allocation with the WHT/cash split and the
//! before/after suspension status into one ledger entry preview.
//!
//! # Steps
//!
//! 1. **Validate**: non-negative payment and WHT, valid invoices, one currency
//! 2. **Allocate**: run the strategy over `payment + wht`
//! 3. **Project**: balances after, hypothetical post-allocation invoices
//! 4. **Evaluate**: suspension before and after, transition label
//!
//! Nothing is mutated. The caller persists the allocation and balances
//! inside its own transaction, against the same invoice read it passed in.

use crate::{
    allocation::{self, AllocationMap, SettlementStrategy, StrategyKind},
    overrides::{Override, UntilPaymentClearing},
    suspension::{AccountStatus, SuspensionAssessment, SuspensionEvaluator},
    Error, Result,
};
use chrono::NaiveDate;
use receivables_core::{validate_invoice_set, AccountId, Currency, Invoice, InvoiceId, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Input to a settlement computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// Paying account
    pub account: AccountId,

    /// Settlement currency
    pub currency: Currency,

    /// Cash/transfer amount received
    pub payment: Money,

    /// Pre-computed withholding tax certificate amount
    #[serde(default)]
    pub wht: Money,

    /// Open invoices as read from storage
    pub invoices: Vec<Invoice>,

    /// Allocation strategy
    pub strategy: SettlementStrategy,

    /// Reinstatement override on the account
    #[serde(default, rename = "override")]
    pub status_override: Option<Override>,

    /// Status the caller last displayed, if any
    #[serde(default)]
    pub cached_status: Option<AccountStatus>,
}

impl SettlementRequest {
    /// Create new request without WHT, override or cached status
    pub fn new(
        account: AccountId,
        currency: Currency,
        payment: Money,
        invoices: Vec<Invoice>,
        strategy: SettlementStrategy,
    ) -> Self {
        Self {
            account,
            currency,
            payment,
            wht: Money::ZERO,
            invoices,
            strategy,
            status_override: None,
            cached_status: None,
        }
    }

    /// Add a WHT amount
    pub fn with_wht(mut self, wht: Money) -> Self {
        self.wht = wht;
        self
    }

    /// Attach the account's override
    pub fn with_override(mut self, status_override: Override) -> Self {
        self.status_override = Some(status_override);
        self
    }

    /// Attach the caller's cached status
    pub fn with_cached_status(mut self, status: AccountStatus) -> Self {
        self.cached_status = Some(status);
        self
    }
}

/// How allocated money and credit divide between WHT and cash.
///
/// WHT is applied to invoices first; surplus credit comes out of whatever
/// of each source was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingSplit {
    /// WHT applied to invoices
    pub wht_applied: Money,

    /// Cash applied to invoices
    pub cash_applied: Money,

    /// Unapplied WHT credited to the account
    pub wht_to_credit: Money,

    /// Unapplied cash credited to the account
    pub cash_to_credit: Money,
}

impl FundingSplit {
    fn compute(payment: Money, wht: Money, allocated: Money) -> Result<Self> {
        let wht_applied = wht.min(allocated);
        let cash_applied = allocated.checked_sub(wht_applied)?;

        Ok(Self {
            wht_applied,
            cash_applied,
            wht_to_credit: wht.checked_sub(wht_applied)?,
            cash_to_credit: payment.checked_sub(cash_applied)?,
        })
    }
}

/// Status change the settlement would cause.
///
/// Computed from effective statuses. When an until-payment override is
/// cleared while 91+ arrears remain, the account goes from current to
/// suspended and the label is still `NoChange`; check
/// [`SettlementResult::override_cleared`] for that case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusTransition {
    /// Suspended before, current after
    Reinstatement,
    /// Suspended before and after
    StillSuspended {
        /// Balance still in the maximal bucket
        remaining_overdue: Money,
    },
    /// Anything else
    NoChange,
}

impl StatusTransition {
    fn between(before: &SuspensionAssessment, after: &SuspensionAssessment) -> Self {
        match (before.effective_status, after.effective_status) {
            (AccountStatus::Suspended, AccountStatus::Current) => StatusTransition::Reinstatement,
            (AccountStatus::Suspended, AccountStatus::Suspended) => {
                StatusTransition::StillSuspended {
                    remaining_overdue: after.overdue_balance,
                }
            }
            _ => StatusTransition::NoChange,
        }
    }
}

/// Settlement preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Paying account
    pub account: AccountId,

    /// Date aging was evaluated at
    pub as_of: NaiveDate,

    /// Strategy used
    pub strategy: StrategyKind,

    /// Payment plus WHT
    pub total_funds: Money,

    /// Amount applied to each invoice
    pub allocations: AllocationMap,

    /// Sum of allocations
    pub allocated: Money,

    /// Surplus credited to the account
    pub credit_to_add: Money,

    /// Balance of every input invoice after allocation
    pub balances_after: BTreeMap<InvoiceId, Money>,

    /// WHT/cash breakdown
    pub funding: FundingSplit,

    /// Assessment on the invoices as given
    pub before: SuspensionAssessment,

    /// Assessment on the post-allocation invoices
    pub after: SuspensionAssessment,

    /// Effective status before
    pub status_before: AccountStatus,

    /// Effective status after
    pub status_after: AccountStatus,

    /// Derived transition label
    pub transition: StatusTransition,

    /// An until-payment override would be cleared by this settlement
    pub override_cleared: bool,

    /// The caller's cached status disagreed with the derived one
    pub cached_status_stale: bool,
}

impl SettlementResult {
    /// Hypothetical invoice set after allocation
    pub fn invoices_after(&self, invoices: &[Invoice]) -> Vec<Invoice> {
        invoices
            .iter()
            .map(|inv| {
                let balance = self
                    .balances_after
                    .get(&inv.id)
                    .copied()
                    .unwrap_or(inv.balance);
                inv.clone().with_balance(balance)
            })
            .collect()
    }
}

/// Settlement calculator
#[derive(Debug, Default, Clone, Copy)]
pub struct SettlementCalculator {
    evaluator: SuspensionEvaluator,
    until_payment_clearing: UntilPaymentClearing,
}

impl SettlementCalculator {
    /// Create new calculator
    pub fn new(
        evaluator: SuspensionEvaluator,
        until_payment_clearing: UntilPaymentClearing,
    ) -> Self {
        Self {
            evaluator,
            until_payment_clearing,
        }
    }

    /// Compute a settlement preview as of `as_of`
    pub fn compute(
        &self,
        request: &SettlementRequest,
        as_of: NaiveDate,
    ) -> Result<SettlementResult> {
        // Step 1: Validate inputs
        self.validate(request)?;

        // Step 2: Allocate
        let total_funds = request.payment.checked_add(request.wht)?;
        let allocation = allocation::allocate(&request.strategy, total_funds, &request.invoices)?;

        // Step 3: Project balances
        let mut balances_after = BTreeMap::new();
        let mut invoices_after = Vec::with_capacity(request.invoices.len());
        for invoice in &request.invoices {
            let after = invoice
                .balance
                .checked_sub(allocation.amount_for(&invoice.id))?;
            balances_after.insert(invoice.id.clone(), after);
            invoices_after.push(invoice.clone().with_balance(after));
        }

        // Step 4: Evaluate status before and after
        let before = self
            .evaluator
            .evaluate(&request.invoices, request.status_override.as_ref(), as_of);

        let raw_after = self.evaluator.evaluate(&invoices_after, None, as_of);
        let override_cleared = request.status_override.as_ref().is_some_and(|ov| {
            ov.is_until_payment()
                && ov.is_active(as_of)
                && self
                    .until_payment_clearing
                    .clears(allocation.allocated, raw_after.raw_status)
        });
        let override_after = if override_cleared {
            None
        } else {
            request.status_override.as_ref()
        };
        let after = self.evaluator.evaluate(&invoices_after, override_after, as_of);

        let transition = StatusTransition::between(&before, &after);

        let cached_status_stale = request
            .cached_status
            .is_some_and(|cached| cached != before.effective_status);
        if cached_status_stale {
            tracing::warn!(
                account = %request.account,
                cached = ?request.cached_status,
                derived = ?before.effective_status,
                "Cached account status disagrees with invoice aging"
            );
        }

        let funding = FundingSplit::compute(request.payment, request.wht, allocation.allocated)?;

        tracing::info!(
            account = %request.account,
            strategy = request.strategy.kind().as_str(),
            total_funds = total_funds.minor_units(),
            allocated = allocation.allocated.minor_units(),
            credit = allocation.credit_to_add.minor_units(),
            transition = ?transition,
            "Settlement computed"
        );

        Ok(SettlementResult {
            account: request.account.clone(),
            as_of,
            strategy: request.strategy.kind(),
            total_funds,
            allocations: allocation.allocations,
            allocated: allocation.allocated,
            credit_to_add: allocation.credit_to_add,
            balances_after,
            funding,
            status_before: before.effective_status,
            status_after: after.effective_status,
            before,
            after,
            transition,
            override_cleared,
            cached_status_stale,
        })
    }

    fn validate(&self, request: &SettlementRequest) -> Result<()> {
        if request.payment.is_negative() {
            return Err(Error::InvalidInput(format!(
                "payment cannot be negative: {}",
                request.payment
            )));
        }

        if request.wht.is_negative() {
            return Err(Error::InvalidInput(format!(
                "WHT cannot be negative: {}",
                request.wht
            )));
        }

        validate_invoice_set(&request.invoices, request.currency)?;
        Ok(())
    }
}
