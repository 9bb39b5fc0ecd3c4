//! Manifest validation
//!
//! The only way to obtain an [`EventManifest`]. Every record is checked and every
//! problem is collected before anything is rejected, so a report lists all of
//! them at once. Nothing is ever defaulted to make a record pass.

use std::collections::BTreeMap;

use rustc_hash::FxHashSet;
use serde_json::Value;
use strsim::levenshtein;

use crate::config::DEFAULT_HORIZON_MONTHS;
use crate::error::{IssueLocation, Problem, ValidationReport};
use crate::model::{
    AccountRefs, AccountType, BaseEvent, EventCore, EventId, EventKind, EventManifest, Frequency,
    Priority, RawEvent, RawManifest, RawRecord, RecurrenceWindow,
};
use crate::normalize::normalize;
use crate::schedule::overflow_month;

/// Frequent misspellings and their registered kind
const COMMON_FIXES: &[(&str, EventKind)] = &[
    ("DEBT_PAYOFF", EventKind::DebtPayment),
    ("LOAN_PAYMENT", EventKind::DebtPayment),
    ("SALARY", EventKind::Income),
    ("WAGES", EventKind::Income),
    ("EXPENSE", EventKind::RecurringExpense),
    ("CONTRIBUTION", EventKind::ScheduledContribution),
    ("RMD", EventKind::RequiredMinimumDistribution),
    ("GOAL", EventKind::GoalDefine),
    ("LOAN", EventKind::LiabilityAdd),
    ("SOCIAL_SECURITY", EventKind::SocialSecurityIncome),
    ("REBALANCE", EventKind::RebalancePortfolio),
    ("HEALTHCARE", EventKind::HealthcareCost),
    ("PENSION", EventKind::PensionIncome),
    ("DIVIDEND", EventKind::DividendIncome),
];

const MAX_SUGGESTIONS: usize = 3;
const MAX_EDIT_DISTANCE: usize = 3;

/// Registered kinds the author most likely meant by `input`, best first
#[must_use]
pub fn suggest_kinds(input: &str) -> Vec<&'static str> {
    let canonical: String = input
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();

    let mut out: Vec<&'static str> = Vec::new();
    let push = |kind: EventKind, out: &mut Vec<&'static str>| {
        if !out.contains(&kind.as_str()) {
            out.push(kind.as_str());
        }
    };

    for (typo, fix) in COMMON_FIXES {
        if *typo == canonical {
            push(*fix, &mut out);
        }
    }
    if let Some(kind) = EventKind::ALL.iter().find(|k| k.as_str() == canonical) {
        push(*kind, &mut out);
    }

    let mut near: Vec<(usize, EventKind)> = EventKind::ALL
        .iter()
        .map(|k| (levenshtein(k.as_str(), &canonical), *k))
        .filter(|(distance, _)| *distance <= MAX_EDIT_DISTANCE)
        .collect();
    near.sort_by_key(|(distance, _)| *distance);
    for (_, kind) in near {
        push(kind, &mut out);
    }

    out.truncate(MAX_SUGGESTIONS);
    out
}

/// Validate an untyped manifest document
pub fn load_manifest(data: &Value) -> Result<EventManifest, ValidationReport> {
    match RawManifest::from_value(data) {
        Ok(raw) => validate_manifest(raw),
        Err(shape_errors) => {
            let mut report = ValidationReport::default();
            for e in shape_errors {
                report.push(IssueLocation::Manifest, None, Problem::Shape(e));
            }
            Err(reject(report))
        }
    }
}

/// Parse and validate a JSON manifest
pub fn load_manifest_str(text: &str) -> Result<EventManifest, ValidationReport> {
    match serde_json::from_str::<Value>(text) {
        Ok(data) => load_manifest(&data),
        Err(e) => {
            let mut report = ValidationReport::default();
            report.push(IssueLocation::Manifest, None, Problem::Malformed(e.to_string()));
            Err(reject(report))
        }
    }
}

/// Check every record of a decoded manifest and normalize its events.
pub fn validate_manifest(raw: RawManifest) -> Result<EventManifest, ValidationReport> {
    let mut report = ValidationReport::default();

    let initial_accounts = check_initial_accounts(raw.initial_accounts, &mut report);

    let start_date = match raw.start_date {
        None => None,
        Some(value) => match serde_json::from_value::<jiff::civil::Date>(value) {
            Ok(date) => Some(date),
            Err(e) => {
                report.push(
                    IssueLocation::Manifest,
                    None,
                    Problem::InvalidStartDate(e.to_string()),
                );
                None
            }
        },
    };

    let mut events = Vec::with_capacity(raw.events.len());
    let mut seen_ids = FxHashSet::default();
    for (index, record) in raw.events.into_iter().enumerate() {
        let raw_event = match record {
            RawRecord::Decoded(raw_event) => raw_event,
            RawRecord::Malformed { id, kind, error } => {
                if let Some(id) = &id {
                    seen_ids.insert(id.clone());
                }
                report.push(IssueLocation::Event { index, id }, kind, Problem::Malformed(error));
                continue;
            }
        };

        let location = IssueLocation::Event {
            index,
            id: Some(raw_event.id.clone()),
        };
        let spelled = Some(raw_event.kind.clone());
        let before = report.len();

        if !seen_ids.insert(raw_event.id.clone()) {
            report.push(location.clone(), spelled.clone(), Problem::DuplicateId);
        }

        let base = match decode_event(raw_event) {
            Ok(base) => base,
            Err(problems) => {
                for problem in problems {
                    report.push(location.clone(), spelled.clone(), problem);
                }
                continue;
            }
        };

        match normalize(&base) {
            Ok(event) => {
                for field in event.missing_fields() {
                    report.push(location.clone(), spelled.clone(), Problem::MissingMetadata(field));
                }
                if report.len() == before {
                    events.push(event);
                }
            }
            Err(e) => report.push(location, spelled, Problem::Normalization(e)),
        }
    }

    let mut goals = Vec::with_capacity(raw.goals.len());
    let mut seen_goals = FxHashSet::default();
    for (index, record) in raw.goals.into_iter().enumerate() {
        match record {
            RawRecord::Decoded(goal) => {
                let location = IssueLocation::Goal {
                    index,
                    id: Some(goal.id.as_str().to_string()),
                };
                let before = report.len();
                if !seen_goals.insert(goal.id.clone()) {
                    report.push(location.clone(), None, Problem::DuplicateId);
                }
                if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
                    report.push(location, None, Problem::InvalidTargetAmount);
                }
                if report.len() == before {
                    goals.push(goal);
                }
            }
            RawRecord::Malformed { id, error, .. } => {
                report.push(IssueLocation::Goal { index, id }, None, Problem::Malformed(error));
            }
        }
    }

    if !report.is_empty() {
        return Err(reject(report));
    }

    let manifest = EventManifest {
        initial_accounts,
        events,
        goals,
        start_date,
    };
    tracing::info!(
        events = manifest.events.len(),
        goals = manifest.goals.len(),
        "manifest accepted"
    );
    Ok(manifest)
}

fn reject(report: ValidationReport) -> ValidationReport {
    tracing::warn!(issues = report.len(), "manifest rejected");
    report
}

fn check_initial_accounts(
    accounts: BTreeMap<String, Value>,
    report: &mut ValidationReport,
) -> BTreeMap<AccountType, f64> {
    let mut balances = BTreeMap::new();
    for (key, value) in accounts {
        let location = IssueLocation::InitialAccount(key.clone());
        let account = key.parse::<AccountType>();
        let balance = value.as_f64().filter(|b| b.is_finite());
        if account.is_err() {
            report.push(
                location.clone(),
                None,
                Problem::UnknownAccountType {
                    field: "initialAccounts",
                    value: key.clone(),
                },
            );
        }
        if balance.is_none() {
            report.push(location, None, Problem::InvalidBalance);
        }
        if let (Ok(account), Some(balance)) = (account, balance) {
            balances.insert(account, balance);
        }
    }
    balances
}

fn account_ref(
    value: Option<String>,
    field: &'static str,
    problems: &mut Vec<Problem>,
) -> Option<AccountType> {
    let value = value?;
    match value.parse() {
        Ok(account) => Some(account),
        Err(_) => {
            problems.push(Problem::UnknownAccountType { field, value });
            None
        }
    }
}

/// Type the envelope of an authored event, collecting every field problem
fn decode_event(raw: RawEvent) -> Result<BaseEvent, Vec<Problem>> {
    let mut problems = Vec::new();

    let kind = match raw.kind.parse::<EventKind>() {
        Ok(kind) => Some(kind),
        Err(_) => {
            problems.push(Problem::UnknownKind {
                suggestions: suggest_kinds(&raw.kind),
            });
            None
        }
    };

    let month_offset = raw.month_offset.or(raw.start_date_offset);
    if month_offset.is_none() {
        problems.push(Problem::MissingMonthOffset);
    }

    let frequency = match raw.frequency {
        None => None,
        Some(value) => match value.parse::<Frequency>() {
            Ok(f) => Some(f),
            Err(_) => {
                problems.push(Problem::InvalidFrequency(value));
                None
            }
        },
    };

    let accounts = AccountRefs {
        account_type: account_ref(raw.account_type, "accountType", &mut problems),
        source_account_type: account_ref(
            raw.source_account_type,
            "sourceAccountType",
            &mut problems,
        ),
        target_account_type: account_ref(
            raw.target_account_type,
            "targetAccountType",
            &mut problems,
        ),
    };

    if raw.amount.is_some_and(|a| !a.is_finite()) {
        problems.push(Problem::InvalidAmount);
    }
    if raw
        .annual_growth_rate
        .is_some_and(|g| !g.is_finite() || g <= -1.0)
    {
        problems.push(Problem::InvalidGrowthRate);
    }

    let window = month_offset.map(|month_offset| RecurrenceWindow {
        month_offset,
        start_date_offset: raw.start_date_offset,
        end_date_offset: raw.end_date_offset,
        frequency,
    });
    if window.is_some_and(|w| !w.is_well_formed()) {
        problems.push(Problem::InvalidWindow);
    }
    if problems.is_empty() {
        let amount = raw.amount.unwrap_or(0.0);
        let overflow = window.and_then(|w| {
            overflow_month(amount, raw.annual_growth_rate, &w, DEFAULT_HORIZON_MONTHS)
        });
        if let Some(month) = overflow {
            problems.push(Problem::GrowthOverflow { month });
        }
    }

    match (kind, window) {
        (Some(kind), Some(window)) if problems.is_empty() => Ok(BaseEvent {
            core: EventCore {
                id: EventId::new(raw.id),
                name: raw.name,
                description: raw.description,
                window,
                annual_growth_rate: raw.annual_growth_rate,
                priority: raw.priority.map(Priority),
                amount: raw.amount,
                accounts,
                tags: raw.tags,
            },
            kind,
            metadata: raw.metadata,
        }),
        _ => Err(problems),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_common_fix_comes_first() {
        assert_eq!(suggest_kinds("DEBT_PAYOFF")[0], "DEBT_PAYMENT");
        assert_eq!(suggest_kinds("rmd"), vec!["REQUIRED_MINIMUM_DISTRIBUTION"]);
    }

    #[test]
    fn test_case_insensitive_match() {
        assert_eq!(suggest_kinds("recurring-expense")[0], "RECURRING_EXPENSE");
    }

    #[test]
    fn test_near_misses() {
        let suggestions = suggest_kinds("ROTH_CONVERSON");
        assert_eq!(suggestions[0], "ROTH_CONVERSION");
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        assert!(suggest_kinds("COMPLETELY_UNRELATED_THING").is_empty());
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest = load_manifest(&json!({
            "initialAccounts": { "cash": 10000.0, "roth": 5000 },
            "events": [
                { "id": "salary", "kind": "INCOME", "amount": 5000, "startDateOffset": 0 }
            ],
            "startDate": "2025-01-01"
        }))
        .unwrap();
        assert_eq!(manifest.events().len(), 1);
        assert_eq!(manifest.events()[0].kind, EventKind::CashflowIncome);
        assert_eq!(manifest.events()[0].core.window.month_offset, 0);
        assert_eq!(manifest.initial_net_worth(), 15000.0);
        assert_eq!(manifest.start_date(), Some(jiff::civil::date(2025, 1, 1)));
    }

    #[test]
    fn test_all_problems_are_collected() {
        let report = load_manifest(&json!({
            "initialAccounts": { "brokerage": 1.0, "cash": "lots" },
            "events": [
                { "id": "a", "kind": "DEBT_PAYOFF", "monthOffset": 0 },
                { "id": "a", "kind": "INCOME", "monthOffset": 0 },
                { "id": "c", "kind": "INCOME", "frequency": "weekly" },
                { "id": "d", "kind": "DEBT_PAYMENT", "monthOffset": 0, "annualGrowthRate": -1.0 },
                { "id": "e", "kind": "RECURRING_EXPENSE", "startDateOffset": 12, "endDateOffset": 6 },
                { "id": "f", "kind": "WITHDRAWAL", "monthOffset": 0, "sourceAccountType": "401k" }
            ],
            "goals": [{ "id": "g", "targetAmount": 0 }],
            "startDate": "soon"
        }))
        .unwrap_err();

        let problems: Vec<&Problem> = report.iter().map(|i| &i.problem).collect();
        assert!(problems.contains(&&Problem::DuplicateId));
        assert!(problems.contains(&&Problem::MissingMonthOffset));
        assert!(problems.contains(&&Problem::InvalidFrequency("weekly".into())));
        assert!(problems.contains(&&Problem::InvalidGrowthRate));
        assert!(problems.contains(&&Problem::InvalidWindow));
        assert!(problems.contains(&&Problem::InvalidTargetAmount));
        assert!(problems.contains(&&Problem::InvalidBalance));
        assert!(problems.contains(&&Problem::UnknownAccountType {
            field: "sourceAccountType",
            value: "401k".into()
        }));
        assert!(problems.contains(&&Problem::UnknownAccountType {
            field: "initialAccounts",
            value: "brokerage".into()
        }));
        assert!(problems.iter().any(|p| matches!(p, Problem::InvalidStartDate(_))));
        assert_eq!(report.for_event("a").count(), 2);
    }

    #[test]
    fn test_unparseable_text() {
        let report = load_manifest_str("{ not json").unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.issues[0].location, IssueLocation::Manifest);
    }
}
