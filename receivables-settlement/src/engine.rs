//! Main settlement engine
//!
//! Wires the classifier, evaluator and calculator to a configuration, a
//! clock and optional metrics. The engine holds no business state; one
//! instance can be shared across threads behind an `Arc`.

use crate::{
    aging::{AgingBucket, AgingClassifier},
    allocation::SettlementStrategy,
    calculator::{SettlementCalculator, SettlementRequest, SettlementResult},
    clock::{Clock, SystemClock},
    config::Config,
    metrics::Metrics,
    overrides::Override,
    snapshot::StatusSnapshot,
    summary::AgingSummary,
    suspension::{SuspensionAssessment, SuspensionEvaluator},
    Result,
};
use chrono::NaiveDate;
use receivables_core::{AccountId, Invoice, Money};
use std::time::Instant;

/// Settlement engine
#[derive(Debug)]
pub struct SettlementEngine<C: Clock = SystemClock> {
    /// Configuration
    config: Config,

    /// Source of "today"
    clock: C,

    /// Aging classifier
    classifier: AgingClassifier,

    /// Suspension evaluator
    evaluator: SuspensionEvaluator,

    /// Settlement calculator
    calculator: SettlementCalculator,

    /// Metrics (disabled by configuration)
    metrics: Option<Metrics>,
}

impl SettlementEngine<SystemClock> {
    /// Create new settlement engine on the wall clock
    pub fn new(config: Config) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> SettlementEngine<C> {
    /// Create new settlement engine with an explicit clock
    pub fn with_clock(config: Config, clock: C) -> Result<Self> {
        config.validate()?;

        let classifier = AgingClassifier::new();
        let evaluator = SuspensionEvaluator::new(classifier);
        let calculator =
            SettlementCalculator::new(evaluator, config.overrides.until_payment_clearing);

        let metrics = if config.telemetry.metrics_enabled {
            Some(Metrics::new()?)
        } else {
            None
        };

        tracing::info!(
            service = %config.service_name,
            version = %config.service_version,
            currency = %config.currency,
            "Settlement engine ready"
        );

        Ok(Self {
            config,
            clock,
            classifier,
            evaluator,
            calculator,
            metrics,
        })
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Metrics, if enabled
    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    /// Today according to the engine's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Aging bucket of a due date as of today
    pub fn classify(&self, due_date: NaiveDate) -> AgingBucket {
        self.classifier.classify(due_date, self.today())
    }

    /// Account status as of today
    pub fn evaluate(
        &self,
        invoices: &[Invoice],
        status_override: Option<&Override>,
    ) -> SuspensionAssessment {
        self.evaluator.evaluate(invoices, status_override, self.today())
    }

    /// Aging summary as of today
    pub fn summarize(&self, invoices: &[Invoice]) -> AgingSummary {
        AgingSummary::compute(&self.classifier, invoices, self.today())
    }

    /// Display-cache snapshot as of today
    pub fn snapshot(
        &self,
        invoices: &[Invoice],
        status_override: Option<&Override>,
    ) -> StatusSnapshot {
        StatusSnapshot::capture(&self.evaluator, invoices, status_override, self.today())
    }

    /// Build a request in the configured currency
    pub fn request(
        &self,
        account: AccountId,
        payment: Money,
        invoices: Vec<Invoice>,
        strategy: SettlementStrategy,
    ) -> SettlementRequest {
        SettlementRequest::new(account, self.config.currency, payment, invoices, strategy)
    }

    /// Preview a settlement as of today
    pub fn preview(&self, request: &SettlementRequest) -> Result<SettlementResult> {
        self.compute_as_of(request, self.today())
    }

    /// Compute a settlement as of a pinned date
    pub fn compute_as_of(
        &self,
        request: &SettlementRequest,
        as_of: NaiveDate,
    ) -> Result<SettlementResult> {
        let _span = tracing::info_span!(
            "settlement",
            account = %request.account,
            strategy = request.strategy.kind().as_str(),
            as_of = %as_of
        )
        .entered();

        let started = Instant::now();
        let outcome = self.calculator.compute(request, as_of);

        match (&outcome, &self.metrics) {
            (Ok(result), Some(metrics)) => metrics.record_settlement(result, started.elapsed()),
            (Err(err), Some(metrics)) => {
                tracing::warn!(reason = err.kind(), error = %err, "Settlement rejected");
                metrics.record_rejection(err);
            }
            (Err(err), None) => {
                tracing::warn!(reason = err.kind(), error = %err, "Settlement rejected");
            }
            (Ok(_), None) => {}
        }

        outcome
    }
}
