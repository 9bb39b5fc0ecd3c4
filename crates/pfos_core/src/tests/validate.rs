//! Manifest rejection and reports

use serde_json::json;

use crate::error::{IssueLocation, NormalizationError, Problem};
use crate::model::{EventKind, MetadataField};
use crate::validate::load_manifest;

#[test]
fn test_debt_payoff_suggests_debt_payment() {
    let report = load_manifest(&json!({
        "events": [{ "id": "loan", "kind": "DEBT_PAYOFF", "amount": 400, "monthOffset": 0 }]
    }))
    .unwrap_err();

    assert_eq!(report.len(), 1);
    let issue = &report.issues[0];
    assert_eq!(issue.kind.as_deref(), Some("DEBT_PAYOFF"));
    assert_eq!(issue.event_id(), Some("loan"));
    match &issue.problem {
        Problem::UnknownKind { suggestions } => assert_eq!(suggestions.first(), Some(&"DEBT_PAYMENT")),
        other => panic!("unexpected problem {other:?}"),
    }
    assert!(report.to_string().contains("did you mean DEBT_PAYMENT"));
}

#[test]
fn test_cashflow_income_without_tax_profile_is_rejected() {
    let report = load_manifest(&json!({
        "events": [{
            "id": "salary",
            "kind": "CASHFLOW_INCOME",
            "amount": 5000,
            "monthOffset": 0,
            "metadata": { "driverKey": "income:employment", "withholdingModel": "payroll" }
        }]
    }))
    .unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(
        report.issues[0].problem,
        Problem::Normalization(NormalizationError::MissingField {
            event_id: crate::model::EventId::new("salary"),
            kind: EventKind::CashflowIncome,
            field: MetadataField::TaxProfile,
        })
    );
}

#[test]
fn test_one_bad_record_does_not_hide_others() {
    let report = load_manifest(&json!({
        "events": [
            { "id": "a", "kind": "INCOME", "monthOffset": "soon" },
            { "id": "b", "kind": "NOT_A_KIND", "monthOffset": 0 },
            { "id": "c", "kind": "INCOME", "monthOffset": 0 },
            { "id": "d", "kind": "DIVIDEND_INCOME", "monthOffset": 0 }
        ]
    }))
    .unwrap_err();

    let located: Vec<Option<&str>> = report.iter().map(|i| i.event_id()).collect();
    assert_eq!(located, vec![Some("a"), Some("b"), Some("d")]);
    assert!(matches!(report.issues[0].problem, Problem::Malformed(_)));
    assert!(matches!(
        report.issues[2].problem,
        Problem::Normalization(NormalizationError::Unmappable { .. })
    ));
}

#[test]
fn test_malformed_record_still_claims_its_id() {
    let report = load_manifest(&json!({
        "events": [
            { "id": "x", "kind": "INCOME", "amount": "lots", "monthOffset": 0 },
            { "id": "x", "kind": "INCOME", "monthOffset": 0 }
        ]
    }))
    .unwrap_err();
    assert_eq!(report.len(), 2);
    assert_eq!(report.issues[1].problem, Problem::DuplicateId);
    assert_eq!(
        report.issues[1].location,
        IssueLocation::Event {
            index: 1,
            id: Some("x".to_string())
        }
    );
}

#[test]
fn test_shape_errors_are_reported_at_manifest_level() {
    let report = load_manifest(&json!({ "events": "none", "goals": 3 })).unwrap_err();
    assert_eq!(report.len(), 2);
    assert!(report.iter().all(|i| i.location == IssueLocation::Manifest));
    assert!(report.to_string().contains("'events' must be a list"));
}

#[test]
fn test_window_anchor_outside_bounds() {
    let report = load_manifest(&json!({
        "events": [{
            "id": "bonus",
            "kind": "INCOME",
            "frequency": "one-time",
            "monthOffset": 30,
            "startDateOffset": 0,
            "endDateOffset": 12
        }]
    }))
    .unwrap_err();
    assert_eq!(report.issues[0].problem, Problem::InvalidWindow);
}

#[test]
fn test_unknown_pfos_value_is_rejected_not_defaulted() {
    let report = load_manifest(&json!({
        "events": [{
            "id": "gift",
            "kind": "ANNUAL_GIFT",
            "monthOffset": 0,
            "metadata": { "constraintCodes": ["limit_exceeded", "gift_tax"] }
        }]
    }))
    .unwrap_err();
    assert!(matches!(
        &report.issues[0].problem,
        Problem::Normalization(NormalizationError::InvalidField { value, .. }) if value == "gift_tax"
    ));
}

#[test]
fn test_empty_manifest_is_valid() {
    let manifest = load_manifest(&json!({})).unwrap();
    assert!(manifest.events().is_empty());
    assert!(manifest.goals().is_empty());
    assert_eq!(manifest.initial_net_worth(), 0.0);
}

#[test]
fn test_growth_that_overflows_the_horizon_is_rejected() {
    let report = load_manifest(&json!({
        "events": [{
            "id": "draw",
            "kind": "WITHDRAWAL",
            "amount": 1000,
            "annualGrowthRate": 1e20,
            "startDateOffset": 0
        }]
    }))
    .unwrap_err();
    assert_eq!(report.issues[0].problem, Problem::GrowthOverflow { month: 359 });
    assert!(report.to_string().contains("by month 359"));

    // The same rate is fine when the window ends early enough
    let manifest = load_manifest(&json!({
        "events": [{
            "id": "draw",
            "kind": "WITHDRAWAL",
            "amount": 1000,
            "annualGrowthRate": 1e20,
            "startDateOffset": 0,
            "endDateOffset": 12
        }]
    }))
    .unwrap();
    assert_eq!(manifest.events().len(), 1);
}
