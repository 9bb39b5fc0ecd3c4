//! Simulation events - atomic per-month records for the external engine
//!
//! A `SimulationEvent` is one occurrence of a source event in one month. Ranges
//! and growth rates are already resolved: the engine applies `amount` as-is.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::events::{AccountRefs, Priority};
use super::ids::EventId;
use super::kind::{CashFlowDirection, EventKind};
use super::metadata::PfosMetadata;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationEvent {
    /// Id of the source event
    pub id: EventId,
    pub kind: EventKind,
    /// Kind as authored, when the source was normalized from a legacy kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_kind: Option<EventKind>,
    pub month_offset: u32,
    /// Calendar date of the month, when the plan has a start date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    pub amount: f64,
    /// Effective priority this occurrence was ordered by
    pub priority: Priority,
    /// Position of the source event in the manifest
    pub sequence: usize,
    #[serde(flatten)]
    pub accounts: AccountRefs,
    pub metadata: PfosMetadata,
}

impl SimulationEvent {
    #[must_use]
    pub fn direction(&self) -> CashFlowDirection {
        self.kind.flow_direction()
    }

    /// Ordering key within a month
    #[must_use]
    pub fn order_key(&self) -> (Priority, usize) {
        (self.priority, self.sequence)
    }
}
