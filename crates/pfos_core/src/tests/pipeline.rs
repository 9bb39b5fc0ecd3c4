//! End-to-end tests: authored manifest to ordered monthly events

use serde_json::json;

use crate::config::ScheduleConfig;
use crate::model::{DriverKey, EventKind, Priority, TaxProfile};
use crate::schedule::Scheduler;
use crate::summary::summarize;
use crate::validate::{load_manifest, load_manifest_str};

fn household() -> serde_json::Value {
    json!({
        "startDate": "2025-01-31",
        "initialAccounts": { "cash": 20000, "tax_deferred": 150000, "roth": 40000 },
        "events": [
            {
                "id": "rent",
                "type": "RECURRING_EXPENSE",
                "amount": 2000,
                "startDateOffset": 0,
                "endDateOffset": 23
            },
            {
                "id": "salary",
                "type": "INCOME",
                "amount": 5000,
                "startDateOffset": 0,
                "annualGrowthRate": 0.03,
                "metadata": { "incomeSource": "salary", "employer": "Acme" }
            },
            {
                "id": "401k",
                "kind": "SCHEDULED_CONTRIBUTION",
                "amount": 800,
                "startDateOffset": 0,
                "targetAccountType": "tax_deferred"
            },
            {
                "id": "rebalance",
                "kind": "REBALANCE_PORTFOLIO",
                "monthOffset": 0,
                "frequency": "annually",
                "startDateOffset": 0
            },
            {
                "id": "roof",
                "kind": "ONE_TIME_EVENT",
                "amount": 15000,
                "monthOffset": 18
            }
        ],
        "goals": [
            { "id": "house", "name": "Down payment", "targetAmount": 100000, "targetDate": "2030-06-01" }
        ]
    })
}

#[test]
fn test_income_is_scheduled_before_expenses() {
    let manifest = load_manifest(&json!({
        "events": [
            { "id": "rent", "kind": "RECURRING_EXPENSE", "amount": 2000, "monthOffset": 0 },
            { "id": "salary", "kind": "INCOME", "amount": 5000, "monthOffset": 0 }
        ]
    }))
    .unwrap();
    let scheduler = Scheduler::new(&manifest, ScheduleConfig::default()).unwrap();
    let month = scheduler.schedule_month(0);

    let ids: Vec<&str> = month.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["salary", "rent"]);
    assert_eq!(month[0].amount, 5000.0);
    assert_eq!(month[1].amount, 2000.0);
}

#[test]
fn test_household_month_zero() {
    let manifest = load_manifest(&household()).unwrap();
    let scheduler = Scheduler::new(&manifest, ScheduleConfig::from_manifest(&manifest)).unwrap();
    let month = scheduler.schedule_month(0);

    let ids: Vec<&str> = month.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["salary", "rent", "401k", "rebalance"]);

    let salary = &month[0];
    assert_eq!(salary.kind, EventKind::CashflowIncome);
    assert_eq!(salary.legacy_kind, Some(EventKind::Income));
    assert_eq!(salary.priority, Priority(1));
    assert_eq!(salary.metadata.tax_profile, Some(TaxProfile::OrdinaryIncome));
    assert_eq!(salary.date, Some(jiff::civil::date(2025, 1, 31)));

    let contribution = &month[2];
    assert_eq!(contribution.kind, EventKind::AccountContribution);
    assert_eq!(contribution.metadata.driver_key, Some(DriverKey::ContributionSavings));

    // Standard kinds carry no PFOS-E fields
    assert_eq!(month[3].metadata, Default::default());
    assert_eq!(month[3].amount, 0.0);
}

#[test]
fn test_household_horizon() {
    let manifest = load_manifest(&household()).unwrap();
    let config = ScheduleConfig::from_manifest(&manifest).with_horizon_months(36);
    let schedule = Scheduler::new(&manifest, config).unwrap().schedule_horizon();

    assert_eq!(schedule.len(), 36);
    assert!(schedule.events().all(|e| e.id.as_str() != "rent" || e.month_offset <= 23));
    assert_eq!(
        schedule.events().filter(|e| e.id.as_str() == "rebalance").count(),
        3
    );

    let roof_month = schedule.month(18);
    assert!(roof_month.iter().any(|e| e.id.as_str() == "roof"));
    assert_eq!(roof_month[0].date, Some(jiff::civil::date(2026, 7, 31)));

    let february = schedule.month(1);
    assert_eq!(february[0].date, Some(jiff::civil::date(2025, 2, 28)));

    let summaries = summarize(&schedule);
    assert_eq!(summaries.len(), 36);
    assert!(summaries[18].outflow > summaries[17].outflow);
    assert!(summaries[30].outflow < summaries[17].outflow);
}

#[test]
fn test_schedule_serializes_camel_case() {
    let manifest = load_manifest_str(
        r#"{ "events": [ { "id": "pension", "kind": "PENSION_INCOME", "amount": 1200, "monthOffset": 3 } ] }"#,
    )
    .unwrap();
    let month = Scheduler::new(&manifest, ScheduleConfig::default())
        .unwrap()
        .schedule_month(3);
    let json = serde_json::to_value(&month[0]).unwrap();

    assert_eq!(json["kind"], "CASHFLOW_INCOME");
    assert_eq!(json["legacyKind"], "PENSION_INCOME");
    assert_eq!(json["monthOffset"], 3);
    assert_eq!(json["metadata"]["withholdingModel"], "voluntary");
    assert_eq!(json["metadata"]["driverKey"], "income:pension");
    assert!(json.get("date").is_none());
}

#[test]
fn test_manifest_is_not_modified_by_scheduling() {
    let manifest = load_manifest(&household()).unwrap();
    let before = manifest.clone();
    let scheduler = Scheduler::new(&manifest, ScheduleConfig::default()).unwrap();
    let _ = scheduler.schedule_horizon();
    assert_eq!(manifest, before);
}
