//! Display cache for account status
//!
//! A snapshot pairs an assessment with the fingerprint of the invoice state
//! it was computed from. It is only ever produced by evaluation; any balance
//! mutation, override change or new as-of date makes it stale.

use crate::{
    overrides::Override,
    suspension::{AccountStatus, SuspensionAssessment, SuspensionEvaluator},
};
use chrono::NaiveDate;
use receivables_core::{Invoice, StateFingerprint};
use serde::{Deserialize, Serialize};

/// Cached suspension assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    assessment: SuspensionAssessment,
    fingerprint: StateFingerprint,
    status_override: Option<Override>,
    as_of: NaiveDate,
}

impl StatusSnapshot {
    /// Evaluate and capture
    pub fn capture(
        evaluator: &SuspensionEvaluator,
        invoices: &[Invoice],
        status_override: Option<&Override>,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            assessment: evaluator.evaluate(invoices, status_override, as_of),
            fingerprint: StateFingerprint::compute(invoices, as_of),
            status_override: status_override.cloned(),
            as_of,
        }
    }

    /// True if the snapshot still describes this state
    pub fn is_fresh(
        &self,
        invoices: &[Invoice],
        status_override: Option<&Override>,
        as_of: NaiveDate,
    ) -> bool {
        self.as_of == as_of
            && self.status_override.as_ref() == status_override
            && self.fingerprint == StateFingerprint::compute(invoices, as_of)
    }

    /// Keep this snapshot if fresh, otherwise re-evaluate
    pub fn refresh(
        self,
        evaluator: &SuspensionEvaluator,
        invoices: &[Invoice],
        status_override: Option<&Override>,
        as_of: NaiveDate,
    ) -> Self {
        if self.is_fresh(invoices, status_override, as_of) {
            self
        } else {
            tracing::debug!(as_of = %as_of, "Status snapshot stale, re-evaluating");
            Self::capture(evaluator, invoices, status_override, as_of)
        }
    }

    /// Cached assessment
    pub fn assessment(&self) -> &SuspensionAssessment {
        &self.assessment
    }

    /// Cached effective status
    pub fn status(&self) -> AccountStatus {
        self.assessment.effective_status
    }

    /// Fingerprint the snapshot was taken against
    pub fn fingerprint(&self) -> StateFingerprint {
        self.fingerprint
    }
}
