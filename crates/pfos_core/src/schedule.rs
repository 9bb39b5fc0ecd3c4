//! Monthly scheduler
//!
//! Expands a validated manifest into per-month [`SimulationEvent`]s. Each month
//! is computed independently from the manifest alone, so months can be produced
//! in any order (or in parallel) with identical results.
//!
//! Within a month, occurrences are ordered by effective priority and then by the
//! source event's position in the manifest. Ids never take part in ordering.

use std::collections::BTreeMap;
use std::ops::Range;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde::Serialize;

use crate::config::ScheduleConfig;
use crate::date_math::month_offset_to_date;
use crate::error::ScheduleError;
use crate::model::{
    ConsolidatedEvent, EventManifest, PfosMetadata, Priority, RecurrenceWindow, SimulationEvent,
};
use crate::priority::{effective_priority, ensure_priority_table};

/// A source event with everything that does not depend on the month resolved
#[derive(Debug, Clone)]
struct Prepared {
    event: ConsolidatedEvent,
    priority: Priority,
    sequence: usize,
    metadata: PfosMetadata,
}

/// Scheduler over one manifest. Holds its own copy of the events; the
/// manifest is never modified.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Sorted by `(priority, sequence)`
    prepared: Vec<Prepared>,
    config: ScheduleConfig,
}

impl Scheduler {
    /// Prepare a manifest for scheduling. Fails if the priority table
    /// self-check does, or if an event's growth would leave the finite range
    /// before the horizon.
    pub fn new(manifest: &EventManifest, config: ScheduleConfig) -> Result<Self, ScheduleError> {
        ensure_priority_table()?;

        for event in manifest.events() {
            let core = &event.core;
            if let Some(month) = overflow_month(
                core.amount.unwrap_or(0.0),
                core.annual_growth_rate,
                &core.window,
                config.horizon_months,
            ) {
                return Err(ScheduleError::AmountOverflow {
                    event_id: core.id.clone(),
                    month,
                });
            }
        }

        let mut prepared: Vec<Prepared> = manifest
            .events()
            .iter()
            .enumerate()
            .map(|(sequence, event)| Prepared {
                priority: effective_priority(event),
                sequence,
                metadata: event.metadata(),
                event: event.clone(),
            })
            .collect();
        prepared.sort_by_key(|p| (p.priority, p.sequence));

        tracing::debug!(
            events = prepared.len(),
            horizon = config.horizon_months,
            "scheduler prepared"
        );
        Ok(Self { prepared, config })
    }

    #[must_use]
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Occurrences due in `month`, in execution order.
    ///
    /// Months at or past the horizon are empty.
    #[must_use]
    pub fn schedule_month(&self, month: u32) -> Vec<SimulationEvent> {
        if month >= self.config.horizon_months {
            return Vec::new();
        }
        let date = self
            .config
            .start_date
            .and_then(|start| month_offset_to_date(start, month));

        let events: Vec<SimulationEvent> = self
            .prepared
            .iter()
            .filter(|p| p.event.core.window.covers(month))
            .map(|p| occurrence(p, month, date))
            .collect();

        if !events.is_empty() {
            tracing::debug!(month, events = events.len(), "scheduled month");
        }
        events
    }

    /// Every non-empty month in `months`, clamped to the horizon
    #[must_use]
    pub fn schedule_range(&self, months: Range<u32>) -> Schedule {
        let months = months.start..months.end.min(self.config.horizon_months);

        #[cfg(feature = "parallel")]
        let scheduled: Vec<(u32, Vec<SimulationEvent>)> = months
            .into_par_iter()
            .map(|m| (m, self.schedule_month(m)))
            .filter(|(_, events)| !events.is_empty())
            .collect();

        #[cfg(not(feature = "parallel"))]
        let scheduled: Vec<(u32, Vec<SimulationEvent>)> = months
            .map(|m| (m, self.schedule_month(m)))
            .filter(|(_, events)| !events.is_empty())
            .collect();

        Schedule {
            months: scheduled.into_iter().collect(),
        }
    }

    /// Months `0..horizon`
    #[must_use]
    pub fn schedule_horizon(&self) -> Schedule {
        self.schedule_range(0..self.config.horizon_months)
    }
}

fn occurrence(p: &Prepared, month: u32, date: Option<jiff::civil::Date>) -> SimulationEvent {
    let core = &p.event.core;
    assert!(
        core.window.covers(month),
        "event '{}' scheduled in month {month}, outside its window",
        core.id
    );

    SimulationEvent {
        id: core.id.clone(),
        kind: p.event.kind,
        legacy_kind: p.event.legacy_kind,
        month_offset: month,
        date,
        amount: grown_amount(
            core.amount.unwrap_or(0.0),
            core.annual_growth_rate,
            core.window.growth_anchor(),
            month,
        ),
        priority: p.priority,
        sequence: p.sequence,
        accounts: core.accounts,
        metadata: p.metadata.clone(),
    }
}

/// Last month the window reaches before `horizon`, when the grown amount there
/// is no longer finite.
///
/// Growth is monotonic in the month, so no earlier month can overflow first.
pub(crate) fn overflow_month(
    amount: f64,
    annual_rate: Option<f64>,
    window: &RecurrenceWindow,
    horizon: u32,
) -> Option<u32> {
    let horizon_end = horizon.checked_sub(1)?;
    let last = window
        .last_month()
        .map_or(horizon_end, |end| end.min(horizon_end));
    if last < window.first_month() {
        return None;
    }
    let grown = grown_amount(amount, annual_rate, window.growth_anchor(), last);
    (!grown.is_finite()).then_some(last)
}

/// `amount * (1 + rate)^(elapsed / 12)`, compounding in fractional years
fn grown_amount(amount: f64, annual_rate: Option<f64>, anchor: u32, month: u32) -> f64 {
    match annual_rate {
        Some(rate) if rate != 0.0 => {
            let elapsed = f64::from(month) - f64::from(anchor);
            amount * (1.0 + rate).powf(elapsed / 12.0)
        }
        _ => amount,
    }
}

/// Immutable month-indexed schedule. Only months with occurrences are stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schedule {
    months: BTreeMap<u32, Vec<SimulationEvent>>,
}

impl Schedule {
    /// Occurrences of `month`, empty if none
    #[must_use]
    pub fn month(&self, month: u32) -> &[SimulationEvent] {
        self.months.get(&month).map(Vec::as_slice).unwrap_or_default()
    }

    /// Non-empty months in ascending order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[SimulationEvent])> {
        self.months.iter().map(|(m, events)| (*m, events.as_slice()))
    }

    /// Every occurrence, month by month in execution order
    pub fn events(&self) -> impl Iterator<Item = &SimulationEvent> {
        self.months.values().flatten()
    }

    /// Number of non-empty months
    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    #[must_use]
    pub fn event_count(&self) -> usize {
        self.months.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frequency;

    #[test]
    fn test_grown_amount() {
        assert_eq!(grown_amount(1000.0, None, 0, 24), 1000.0);
        assert!((grown_amount(1000.0, Some(0.06), 0, 12) - 1060.0).abs() < 1e-9);
        assert!((grown_amount(1000.0, Some(0.06), 12, 24) - 1060.0).abs() < 1e-9);
        assert!((grown_amount(1000.0, Some(0.06), 0, 6) - 1000.0 * 1.06_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_schedule_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schedule>();
        assert_send_sync::<Scheduler>();
    }

    #[test]
    fn test_empty_schedule() {
        let schedule = Schedule::default();
        assert!(schedule.is_empty());
        assert!(schedule.month(3).is_empty());
        assert_eq!(schedule.event_count(), 0);
    }

    #[test]
    fn test_overflow_month() {
        let open = RecurrenceWindow::recurring(Frequency::Monthly, 0, None);
        assert_eq!(overflow_month(1000.0, Some(1e20), &open, 360), Some(359));
        assert_eq!(overflow_month(1000.0, Some(0.05), &open, 360), None);
        assert_eq!(overflow_month(1000.0, Some(-0.99), &open, 360), None);
        assert_eq!(overflow_month(1000.0, Some(1e20), &open, 0), None);

        let short = RecurrenceWindow::recurring(Frequency::Monthly, 0, Some(12));
        assert_eq!(overflow_month(1000.0, Some(1e20), &short, 360), None);

        let late = RecurrenceWindow::one_time(400);
        assert_eq!(overflow_month(1000.0, Some(1e20), &late, 360), None);
    }
}
