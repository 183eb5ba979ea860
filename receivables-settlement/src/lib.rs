//! Receivables Settlement Engine
//!
//! Ages a member's open invoices, derives suspension status, and allocates
//! incoming payments across invoices.
//!
//! # Architecture
//!
//! 1. **Aging**: classify each invoice by days overdue (0-30, 31-60, 61-90, 91+)
//! 2. **Suspension**: an account is suspended while any 91+ invoice has a balance
//! 3. **Allocation**: Manual, FIFO or Full strategy over payment + WHT
//! 4. **Settlement**: balances after, credit to add, status transition preview
//!
//! The engine is pure and synchronous. It reads plain data and returns
//! plain data; persisting the outcome is the caller's job.
//!
//! # Example
//!
//! ```no_run
//! use receivables_settlement::{Config, SettlementEngine, SettlementStrategy};
//! use receivables_core::{AccountId, Money};
//!
//! fn main() -> receivables_settlement::Result<()> {
//!     let engine = SettlementEngine::new(Config::default())?;
//!
//!     let request = engine.request(
//!         AccountId::new("M-1001"),
//!         Money::from_minor(600_000),
//!         vec![], // open invoices loaded by the caller
//!         SettlementStrategy::Fifo,
//!     );
//!     let preview = engine.preview(&request)?;
//!     println!("credit to add: {}", preview.credit_to_add);
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod aging;
pub mod allocation;
pub mod calculator;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod overrides;
pub mod snapshot;
pub mod summary;
pub mod suspension;
pub mod telemetry;

// Re-exports
pub use aging::{parse_date, AgingBucket, AgingClassifier};
pub use allocation::{Allocation, AllocationMap, SettlementStrategy, StrategyKind};
pub use calculator::{
    FundingSplit, SettlementCalculator, SettlementRequest, SettlementResult, StatusTransition,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use overrides::{Override, OverrideDuration, UntilPaymentClearing};
pub use snapshot::StatusSnapshot;
pub use summary::{AgingSummary, BucketTotal};
pub use suspension::{AccountStatus, SuspensionAssessment, SuspensionEvaluator};
