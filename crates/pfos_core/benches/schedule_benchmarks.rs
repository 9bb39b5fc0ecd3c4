//! Criterion benchmarks for pfos_core scheduling
//!
//! Run with: cargo bench -p pfos_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pfos_core::config::{EventBuilder, ManifestBuilder, ScheduleConfig};
use pfos_core::model::{AccountType, EventKind, EventManifest};
use pfos_core::{Scheduler, load_manifest, summarize};

fn create_household_manifest() -> EventManifest {
    ManifestBuilder::new()
        .start(2025, 1, 1)
        .cash(20_000.0)
        .account(AccountType::TaxDeferred, 150_000.0)
        .event(
            EventBuilder::income("Salary")
                .amount(8_000.0)
                .growth(0.03)
                .between(0, 299),
        )
        .event(EventBuilder::expense("Rent").amount(2_500.0).growth(0.025).starting(0))
        .event(EventBuilder::new(EventKind::HealthcareCost, "Healthcare").amount(400.0).starting(0))
        .event(
            EventBuilder::contribution("401k")
                .to_account(AccountType::TaxDeferred)
                .amount(1_500.0)
                .between(0, 299),
        )
        .event(
            EventBuilder::new(EventKind::RebalancePortfolio, "Rebalance")
                .annually()
                .starting(0),
        )
        .event(
            EventBuilder::new(EventKind::SocialSecurityIncome, "Social Security")
                .amount(3_200.0)
                .starting(300),
        )
        .event(EventBuilder::shock("Roof").amount(18_000.0).at(84))
        .build()
        .expect("benchmark manifest is valid")
}

/// `count` independent monthly expenses, all open-ended
fn create_wide_manifest(count: usize) -> EventManifest {
    (0..count)
        .map(|i| {
            EventBuilder::expense(format!("Expense {i}"))
                .amount(100.0 + i as f64)
                .starting(0)
        })
        .fold(ManifestBuilder::new(), ManifestBuilder::event)
        .build()
        .expect("benchmark manifest is valid")
}

fn bench_household_horizon(c: &mut Criterion) {
    let manifest = create_household_manifest();
    let scheduler = Scheduler::new(&manifest, ScheduleConfig::from_manifest(&manifest))
        .expect("benchmark manifest schedules");

    c.bench_function("household_30yr_schedule", |b| {
        b.iter(|| black_box(&scheduler).schedule_horizon())
    });

    c.bench_function("household_single_month", |b| {
        b.iter(|| black_box(&scheduler).schedule_month(black_box(120)))
    });
}

fn bench_wide_manifest(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_manifest");

    for count in [10, 100, 500].iter() {
        let manifest = create_wide_manifest(*count);
        let scheduler = Scheduler::new(&manifest, ScheduleConfig::default())
            .expect("benchmark manifest schedules");

        group.bench_with_input(BenchmarkId::new("events", count), count, |b, _| {
            b.iter(|| black_box(&scheduler).schedule_horizon())
        });
    }

    group.finish();
}

fn bench_load_and_summarize(c: &mut Criterion) {
    let data = serde_json::json!({
        "startDate": "2025-01-01",
        "initialAccounts": { "cash": 10000 },
        "events": [
            { "id": "salary", "kind": "INCOME", "amount": 6000, "startDateOffset": 0 },
            { "id": "rent", "kind": "RECURRING_EXPENSE", "amount": 2000, "startDateOffset": 0 },
            { "id": "div", "kind": "DIVIDEND_INCOME", "amount": 150, "startDateOffset": 0,
              "metadata": { "dividendType": "qualified" } },
            { "id": "pension", "kind": "PENSION_INCOME", "amount": 2100, "startDateOffset": 240 }
        ]
    });

    c.bench_function("load_manifest", |b| {
        b.iter(|| load_manifest(black_box(&data)))
    });

    let manifest = load_manifest(&data).expect("benchmark manifest is valid");
    let schedule = Scheduler::new(&manifest, ScheduleConfig::from_manifest(&manifest))
        .expect("benchmark manifest schedules")
        .schedule_horizon();

    c.bench_function("summarize_30yr", |b| b.iter(|| summarize(black_box(&schedule))));
}

criterion_group!(
    benches,
    bench_household_horizon,
    bench_wide_manifest,
    bench_load_and_summarize,
);
criterion_main!(benches);
