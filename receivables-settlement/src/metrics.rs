//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for monitoring settlements.
//!
//! # Metrics
//!
//! - `settlement_computations_total{strategy}` - Successful computations
//! - `settlement_rejections_total{reason}` - Rejected requests by error kind
//! - `settlement_allocated_minor_units_total` - Money applied to invoices
//! - `settlement_credit_minor_units_total` - Money turned into credit
//! - `settlement_reinstatements_total` - Previews that reinstate an account
//! - `settlement_compute_duration_seconds` - Computation latency

use crate::{calculator::SettlementResult, calculator::StatusTransition, Error, Result};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    computations: IntCounterVec,
    rejections: IntCounterVec,
    allocated_minor_units: IntCounter,
    credit_minor_units: IntCounter,
    reinstatements: IntCounter,
    compute_duration: Histogram,
    registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let computations = IntCounterVec::new(
            Opts::new(
                "settlement_computations_total",
                "Successful settlement computations",
            ),
            &["strategy"],
        )?;
        registry.register(Box::new(computations.clone()))?;

        let rejections = IntCounterVec::new(
            Opts::new(
                "settlement_rejections_total",
                "Rejected settlement requests by reason",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(rejections.clone()))?;

        let allocated_minor_units = IntCounter::new(
            "settlement_allocated_minor_units_total",
            "Minor currency units applied to invoices",
        )?;
        registry.register(Box::new(allocated_minor_units.clone()))?;

        let credit_minor_units = IntCounter::new(
            "settlement_credit_minor_units_total",
            "Minor currency units turned into account credit",
        )?;
        registry.register(Box::new(credit_minor_units.clone()))?;

        let reinstatements = IntCounter::new(
            "settlement_reinstatements_total",
            "Settlements that reinstate a suspended account",
        )?;
        registry.register(Box::new(reinstatements.clone()))?;

        let compute_duration = Histogram::with_opts(
            HistogramOpts::new(
                "settlement_compute_duration_seconds",
                "Histogram of settlement computation latencies",
            )
            .buckets(vec![0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05]),
        )?;
        registry.register(Box::new(compute_duration.clone()))?;

        Ok(Self {
            computations,
            rejections,
            allocated_minor_units,
            credit_minor_units,
            reinstatements,
            compute_duration,
            registry,
        })
    }

    /// Record a successful computation
    pub fn record_settlement(&self, result: &SettlementResult, elapsed: Duration) {
        self.computations
            .with_label_values(&[result.strategy.as_str()])
            .inc();
        self.allocated_minor_units
            .inc_by(result.allocated.minor_units().unsigned_abs());
        self.credit_minor_units
            .inc_by(result.credit_to_add.minor_units().unsigned_abs());
        if result.transition == StatusTransition::Reinstatement {
            self.reinstatements.inc();
        }
        self.compute_duration.observe(elapsed.as_secs_f64());
    }

    /// Record a rejected request
    pub fn record_rejection(&self, error: &Error) {
        self.rejections.with_label_values(&[error.kind()]).inc();
    }

    /// Successful computations for a strategy label
    pub fn computations(&self, strategy: &str) -> u64 {
        self.computations.with_label_values(&[strategy]).get()
    }

    /// Rejections for an error kind
    pub fn rejections(&self, reason: &str) -> u64 {
        self.rejections.with_label_values(&[reason]).get()
    }

    /// Reinstatement previews
    pub fn reinstatements(&self) -> u64 {
        self.reinstatements.get()
    }

    /// Registry, for hosts that expose their own scrape endpoint
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all metrics in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Metrics(e.to_string()))
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}
