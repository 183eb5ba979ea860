//! Integration tests for the settlement workflow
//!
//! Tests drive the engine the way its collaborators do:
//! 1. Payment recording: FIFO settlement that reinstates a suspended member
//! 2. Confirmation dialog: manual and full previews, rejected proposals
//! 3. Dashboard: aging summary and status snapshot
//! 4. JSON request/response at the boundary
//! 5. Shared engine across threads

use chrono::{Duration, NaiveDate};
use receivables_core::{AccountId, Currency, Invoice, InvoiceId, Money};
use receivables_settlement::{
    config::Config, AccountStatus, AgingBucket, AllocationMap, Error, FixedClock, Override,
    SettlementEngine, SettlementRequest, SettlementStrategy, StatusTransition,
    UntilPaymentClearing,
};
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn build_engine(config: Config) -> SettlementEngine<FixedClock> {
    SettlementEngine::with_clock(config, FixedClock::new(today())).expect("engine")
}

fn invoice(id: &str, days_overdue: i64, balance: i64) -> Invoice {
    let due = today() - Duration::days(days_overdue);
    Invoice::new(id, due - Duration::days(30), due, Money::from_minor(balance), Currency::THB)
}

fn money(units: i64) -> Money {
    Money::from_minor(units)
}

fn member() -> AccountId {
    AccountId::new("M-1001")
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment recording
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn fifo_payment_reinstates_suspended_member() {
    let engine = build_engine(Config::default());
    let invoices = vec![invoice("1", 95, 5_000), invoice("2", 40, 3_000)];

    let before = engine.evaluate(&invoices, None);
    assert_eq!(before.effective_status, AccountStatus::Suspended);

    let request =
        engine.request(member(), money(6_000), invoices.clone(), SettlementStrategy::Fifo);
    let result = engine.preview(&request).unwrap();

    let expected: AllocationMap = [
        (InvoiceId::new("1"), money(5_000)),
        (InvoiceId::new("2"), money(1_000)),
    ]
    .into_iter()
    .collect();
    assert_eq!(result.allocations, expected);
    assert_eq!(result.credit_to_add, Money::ZERO);
    assert_eq!(result.status_before, AccountStatus::Suspended);
    assert_eq!(result.status_after, AccountStatus::Current);
    assert_eq!(result.transition, StatusTransition::Reinstatement);

    // The caller persists the new balances; re-evaluating them agrees
    let persisted = result.invoices_after(&invoices);
    assert_eq!(engine.evaluate(&persisted, None).effective_status, AccountStatus::Current);
}

#[test]
fn single_overdue_invoice_cleared_in_full() {
    let engine = build_engine(Config::default());
    let invoices = vec![invoice("A", 91, 12_500)];

    let request = engine.request(member(), money(12_500), invoices, SettlementStrategy::Fifo);
    let result = engine.preview(&request).unwrap();

    assert_eq!(result.status_before, AccountStatus::Suspended);
    assert_eq!(result.status_after, AccountStatus::Current);
    assert_eq!(result.balances_after[&InvoiceId::new("A")], Money::ZERO);
}

#[test]
fn wht_certificate_counts_toward_settlement() {
    let engine = build_engine(Config::default());
    let invoices = vec![invoice("1", 95, 5_000), invoice("2", 40, 3_000)];

    let request = engine
        .request(member(), money(7_700), invoices, SettlementStrategy::Full)
        .with_wht(money(300));
    let result = engine.preview(&request).unwrap();

    assert_eq!(result.total_funds, money(8_000));
    assert_eq!(result.credit_to_add, Money::ZERO);
    assert_eq!(result.funding.wht_applied, money(300));
    assert_eq!(result.funding.cash_applied, money(7_700));
}

#[test]
fn overpayment_becomes_credit() {
    let engine = build_engine(Config::default());
    let invoices = vec![invoice("1", 10, 1_000)];

    let request = engine.request(member(), money(2_500), invoices, SettlementStrategy::Fifo);
    let result = engine.preview(&request).unwrap();

    assert_eq!(result.allocated, money(1_000));
    assert_eq!(result.credit_to_add, money(1_500));
    assert_eq!(result.funding.cash_to_credit, money(1_500));
    assert_eq!(result.transition, StatusTransition::NoChange);
}

// ─────────────────────────────────────────────────────────────────────────────
// Confirmation dialog
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn manual_selection_that_leaves_arrears() {
    let engine = build_engine(Config::default());
    let invoices = vec![invoice("1", 95, 5_000), invoice("2", 40, 3_000)];

    let selection: AllocationMap = [(InvoiceId::new("2"), money(3_000))].into_iter().collect();
    let request = engine.request(
        member(),
        money(3_000),
        invoices,
        SettlementStrategy::Manual(selection.clone()),
    );
    let result = engine.preview(&request).unwrap();

    assert_eq!(result.allocations, selection);
    assert_eq!(
        result.transition,
        StatusTransition::StillSuspended {
            remaining_overdue: money(5_000)
        }
    );
}

#[test]
fn manual_over_allocation_is_rejected_whole() {
    let engine = build_engine(Config::default());
    let invoices = vec![invoice("1", 95, 5_000), invoice("2", 40, 3_000)];

    let selection: AllocationMap = [
        (InvoiceId::new("1"), money(5_000)),
        (InvoiceId::new("2"), money(3_500)),
    ]
    .into_iter()
    .collect();
    let request = engine.request(
        member(),
        money(9_000),
        invoices,
        SettlementStrategy::Manual(selection),
    );

    let err = engine.preview(&request).unwrap_err();
    assert!(matches!(err, Error::OverAllocation { ref invoice, .. } if invoice.as_str() == "2"));
    assert_eq!(engine.metrics().unwrap().rejections("over_allocation"), 1);
}

#[test]
fn full_strategy_short_falls_back_to_fifo() {
    let engine = build_engine(Config::default());
    let invoices = vec![invoice("1", 95, 5_000), invoice("2", 40, 3_000)];

    let full = engine.request(member(), money(6_000), invoices.clone(), SettlementStrategy::Full);
    let err = engine.preview(&full).unwrap_err();
    assert!(matches!(err, Error::InsufficientFunds { .. }));

    // The caller decides to fall back
    let fifo = engine.request(member(), money(6_000), invoices, SettlementStrategy::Fifo);
    assert!(engine.preview(&fifo).is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// Overrides
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn until_payment_override_cleared_by_configured_policy() {
    let mut config = Config::default();
    config.overrides.until_payment_clearing = UntilPaymentClearing::MaximalBucketCleared;
    let engine = build_engine(config);

    let invoices = vec![invoice("1", 95, 5_000)];
    let ov = Override::until_payment(today() - Duration::days(5));

    let assessment = engine.evaluate(&invoices, Some(&ov));
    assert!(assessment.suspended_but_for_override());

    let request = engine
        .request(member(), money(5_000), invoices, SettlementStrategy::Fifo)
        .with_override(ov);
    let result = engine.preview(&request).unwrap();

    assert!(result.override_cleared);
    assert_eq!(result.after.raw_status, AccountStatus::Current);
    assert!(!result.after.override_active);
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn dashboard_summary_and_cached_badge() {
    let engine = build_engine(Config::default());
    let mut invoices = vec![invoice("1", 95, 5_000), invoice("2", 40, 3_000), invoice("3", 0, 800)];

    let summary = engine.summarize(&invoices);
    assert_eq!(summary.bucket(AgingBucket::Bucket90).balance, money(5_000));
    assert_eq!(summary.bucket(AgingBucket::Bucket30).balance, money(3_000));
    assert_eq!(summary.bucket(AgingBucket::Current).balance, money(800));

    let badge = engine.snapshot(&invoices, None);
    assert_eq!(badge.status(), AccountStatus::Suspended);

    invoices[0].balance = Money::ZERO;
    assert!(!badge.is_fresh(&invoices, None, today()));
}

// ─────────────────────────────────────────────────────────────────────────────
// Boundary encoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn json_request_round_trip_through_engine() {
    let engine = build_engine(Config::default());

    let body = serde_json::json!({
        "account": "M-1001",
        "currency": "THB",
        "payment": 6000,
        "invoices": [
            {
                "id": "1",
                "issue_date": "2026-06-16",
                "due_date": "2026-07-16",
                "amount": 5000,
                "balance": 5000
            },
            {
                "id": "2",
                "issue_date": "2026-08-10",
                "due_date": "2026-09-09",
                "amount": 3000,
                "balance": 3000
            }
        ],
        "strategy": { "kind": "fifo" },
        "cached_status": "current"
    });

    let request: SettlementRequest = serde_json::from_value(body).unwrap();
    let result = engine.preview(&request).unwrap();

    assert!(result.cached_status_stale);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["allocations"]["1"], 5000);
    assert_eq!(json["allocations"]["2"], 1000);
    assert_eq!(json["transition"]["kind"], "reinstatement");
    assert_eq!(json["status_before"], "suspended");
    assert_eq!(json["strategy"], "fifo");
}

#[test]
fn unknown_currency_in_request_is_rejected() {
    let engine = build_engine(Config::default());
    let usd_invoice = Invoice::new(
        "1",
        today() - Duration::days(60),
        today() - Duration::days(30),
        money(100),
        Currency::USD,
    );

    let request = engine.request(member(), money(100), vec![usd_invoice], SettlementStrategy::Fifo);
    let err = engine.preview(&request).unwrap_err();

    assert!(matches!(
        err,
        Error::CurrencyMismatch { expected: Currency::THB, found: Currency::USD }
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Concurrency
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn shared_engine_across_threads_is_deterministic() {
    let engine = Arc::new(build_engine(Config::default()));
    let invoices = vec![invoice("1", 95, 5_000), invoice("2", 40, 3_000)];
    let request = Arc::new(engine.request(
        member(),
        money(6_000),
        invoices,
        SettlementStrategy::Fifo,
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let request = Arc::clone(&request);
            std::thread::spawn(move || engine.preview(&request).unwrap())
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(engine.metrics().unwrap().computations("fifo"), 8);
}
