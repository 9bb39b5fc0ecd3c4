//! Manifest Builder DSL
//!
//! Assembles accounts, events and goals into a manifest. `build()` runs the
//! same validation as authored JSON, so a fixture that builds is a manifest the
//! loader would also accept.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde_json::Value;

use super::event_builder::{EventBuilder, slug};
use crate::error::ValidationReport;
use crate::model::{AccountType, EventManifest, Goal, GoalId, RawEvent, RawManifest, RawRecord};
use crate::validate::validate_manifest;

/// Builder for a reporting goal
#[derive(Debug, Clone)]
pub struct GoalBuilder {
    goal: Goal,
}

impl GoalBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            goal: Goal {
                id: GoalId::new(slug(&name)),
                name: Some(name),
                target_amount: 0.0,
                target_date: None,
                priority: 0,
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.goal.id = GoalId::new(id);
        self
    }

    pub fn target(mut self, amount: f64) -> Self {
        self.goal.target_amount = amount;
        self
    }

    pub fn by(mut self, year: i16, month: i8, day: i8) -> Self {
        self.goal.target_date = Some(jiff::civil::date(year, month, day));
        self
    }

    pub fn by_date(mut self, date: Date) -> Self {
        self.goal.target_date = Some(date);
        self
    }

    pub fn priority(mut self, priority: u32) -> Self {
        self.goal.priority = priority;
        self
    }
}

/// Builder for complete manifests
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    initial_accounts: BTreeMap<String, Value>,
    events: Vec<RawEvent>,
    goals: Vec<Goal>,
    start_date: Option<Date>,
}

impl ManifestBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Plan anchor
    // =========================================================================

    pub fn start(self, year: i16, month: i8, day: i8) -> Self {
        self.start_date(jiff::civil::date(year, month, day))
    }

    pub fn start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Starting balance of an account bucket
    pub fn account(mut self, account: AccountType, balance: f64) -> Self {
        self.initial_accounts
            .insert(account.as_str().to_string(), Value::from(balance));
        self
    }

    pub fn cash(self, balance: f64) -> Self {
        self.account(AccountType::Cash, balance)
    }

    // =========================================================================
    // Events and goals
    // =========================================================================

    pub fn event(mut self, builder: EventBuilder) -> Self {
        self.events.push(builder.into_raw());
        self
    }

    /// Add an already-authored record as-is
    pub fn raw_event(mut self, raw: RawEvent) -> Self {
        self.events.push(raw);
        self
    }

    pub fn goal(mut self, builder: GoalBuilder) -> Self {
        self.goals.push(builder.goal);
        self
    }

    /// The manifest as the loader would receive it
    #[must_use]
    pub fn to_raw(&self) -> RawManifest {
        RawManifest {
            initial_accounts: self.initial_accounts.clone(),
            events: self.events.iter().cloned().map(RawRecord::Decoded).collect(),
            goals: self.goals.iter().cloned().map(RawRecord::Decoded).collect(),
            start_date: self.start_date.map(|d| Value::String(d.to_string())),
        }
    }

    /// Validate and normalize everything added so far
    pub fn build(self) -> Result<EventManifest, ValidationReport> {
        validate_manifest(self.to_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventKind;

    #[test]
    fn test_build_validates() {
        let manifest = ManifestBuilder::new()
            .start(2025, 1, 1)
            .cash(1_000.0)
            .event(EventBuilder::income("Salary").amount(5_000.0).monthly())
            .goal(GoalBuilder::new("Emergency Fund").target(30_000.0))
            .build()
            .unwrap();
        assert_eq!(manifest.events()[0].kind, EventKind::CashflowIncome);
        assert_eq!(manifest.goals()[0].id.as_str(), "emergency_fund");
        assert_eq!(manifest.initial_accounts()[&AccountType::Cash], 1_000.0);
        assert_eq!(manifest.start_date(), Some(jiff::civil::date(2025, 1, 1)));
    }

    #[test]
    fn test_build_rejects_invalid_fixture() {
        let report = ManifestBuilder::new()
            .event(EventBuilder::spelled("DEBT_PAYOFF", "Loan"))
            .goal(GoalBuilder::new("Nothing"))
            .build()
            .unwrap_err();
        assert_eq!(report.len(), 2);
    }
}
