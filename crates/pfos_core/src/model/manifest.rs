//! Manifests - complete financial plans
//!
//! A [`RawManifest`] is what arrives from authored data. Records are decoded one
//! at a time so a single malformed event cannot hide problems in the others.
//! An [`EventManifest`] only exists once validation has accepted every record;
//! it is created by [`crate::validate::validate_manifest`] and nowhere else.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::events::{AccountType, ConsolidatedEvent, RawEvent};
use super::ids::GoalId;

/// A reporting goal. Goals never affect scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub target_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<Date>,
    #[serde(default)]
    pub priority: u32,
}

impl Goal {
    /// Month offset of the target date relative to the plan start
    #[must_use]
    pub fn target_month(&self, start: Date) -> Option<i32> {
        self.target_date
            .map(|target| crate::date_math::months_between(start, target))
    }
}

/// One authored record: either decoded, or the reason it could not be
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord<T> {
    Decoded(T),
    Malformed {
        /// `id` field, when one could be read
        id: Option<String>,
        /// `kind`/`type` field, when one could be read
        kind: Option<String>,
        error: String,
    },
}

impl<T: DeserializeOwned> RawRecord<T> {
    pub fn decode(value: &serde_json::Value) -> Self {
        match T::deserialize(value) {
            Ok(decoded) => RawRecord::Decoded(decoded),
            Err(e) => {
                let field = |name: &str| {
                    value
                        .get(name)
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_string)
                };
                RawRecord::Malformed {
                    id: field("id"),
                    kind: field("kind").or_else(|| field("type")),
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Authored manifest before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawManifest {
    pub initial_accounts: BTreeMap<String, serde_json::Value>,
    pub events: Vec<RawRecord<RawEvent>>,
    pub goals: Vec<RawRecord<Goal>>,
    pub start_date: Option<serde_json::Value>,
}

/// Problems with the manifest's outer shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestShapeError {
    NotAnObject,
    FieldNotAList(&'static str),
    FieldNotAnObject(&'static str),
}

impl RawManifest {
    /// Split an untyped document into individually decoded records.
    pub fn from_value(data: &serde_json::Value) -> Result<Self, Vec<ManifestShapeError>> {
        let Some(root) = data.as_object() else {
            return Err(vec![ManifestShapeError::NotAnObject]);
        };

        let mut errors = Vec::new();
        let mut list = |key: &'static str| -> Vec<serde_json::Value> {
            match root.get(key) {
                None | Some(serde_json::Value::Null) => Vec::new(),
                Some(serde_json::Value::Array(items)) => items.clone(),
                Some(_) => {
                    errors.push(ManifestShapeError::FieldNotAList(key));
                    Vec::new()
                }
            }
        };
        let events = list("events");
        let goals = list("goals");

        let initial_accounts = match root.get("initialAccounts") {
            None | Some(serde_json::Value::Null) => BTreeMap::new(),
            Some(serde_json::Value::Object(map)) => {
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
            }
            Some(_) => {
                errors.push(ManifestShapeError::FieldNotAnObject("initialAccounts"));
                BTreeMap::new()
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RawManifest {
            initial_accounts,
            events: events.iter().map(RawRecord::decode).collect(),
            goals: goals.iter().map(RawRecord::decode).collect(),
            start_date: root
                .get("startDate")
                .filter(|v| !v.is_null())
                .cloned(),
        })
    }
}

/// A validated plan: every event is typed, normalized and metadata-complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventManifest {
    pub(crate) initial_accounts: BTreeMap<AccountType, f64>,
    pub(crate) events: Vec<ConsolidatedEvent>,
    pub(crate) goals: Vec<Goal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) start_date: Option<Date>,
}

impl EventManifest {
    #[must_use]
    pub fn initial_accounts(&self) -> &BTreeMap<AccountType, f64> {
        &self.initial_accounts
    }

    /// Events in authored order. Position is the scheduler's tie-break.
    #[must_use]
    pub fn events(&self) -> &[ConsolidatedEvent] {
        &self.events
    }

    #[must_use]
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    #[must_use]
    pub fn start_date(&self) -> Option<Date> {
        self.start_date
    }

    /// Sum of all starting balances
    #[must_use]
    pub fn initial_net_worth(&self) -> f64 {
        self.initial_accounts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_decode_independently() {
        let data = json!({
            "events": [
                { "id": "a", "kind": "INCOME", "monthOffset": 0 },
                { "id": "b", "kind": "INCOME", "monthOffset": -1 },
                { "kind": "RECURRING_EXPENSE" }
            ]
        });
        let raw = RawManifest::from_value(&data).unwrap();
        assert_eq!(raw.events.len(), 3);
        assert!(matches!(raw.events[0], RawRecord::Decoded(_)));
        assert!(matches!(
            &raw.events[1],
            RawRecord::Malformed { id: Some(id), .. } if id == "b"
        ));
        assert!(matches!(
            &raw.events[2],
            RawRecord::Malformed { id: None, kind: Some(k), .. } if k == "RECURRING_EXPENSE"
        ));
    }

    #[test]
    fn test_type_alias_for_kind() {
        let raw: RawEvent =
            serde_json::from_value(json!({ "id": "x", "type": "DEBT_PAYMENT" })).unwrap();
        assert_eq!(raw.kind, "DEBT_PAYMENT");
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            RawManifest::from_value(&json!([])),
            Err(vec![ManifestShapeError::NotAnObject])
        );
        assert_eq!(
            RawManifest::from_value(&json!({ "events": {}, "initialAccounts": [] })),
            Err(vec![
                ManifestShapeError::FieldNotAList("events"),
                ManifestShapeError::FieldNotAnObject("initialAccounts"),
            ])
        );
    }

    #[test]
    fn test_goal_target_month() {
        let goal = Goal {
            id: GoalId::new("house"),
            name: None,
            target_amount: 100_000.0,
            target_date: Some(jiff::civil::date(2030, 6, 1)),
            priority: 1,
        };
        assert_eq!(goal.target_month(jiff::civil::date(2025, 1, 1)), Some(65));
    }
}
