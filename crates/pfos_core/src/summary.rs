//! Per-month cash-flow summaries of a schedule
//!
//! Amounts are taken as scheduled; nothing here knows about balances or taxes.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{CashFlowDirection, DriverKey};
use crate::schedule::Schedule;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub month: u32,
    pub inflow: f64,
    pub outflow: f64,
    /// Money moved between accounts; not part of `net`
    pub transfers: f64,
    /// `inflow - outflow`
    pub net: f64,
    /// Scheduled amount attributed to each driver
    pub by_driver: BTreeMap<DriverKey, f64>,
}

/// Summarize every non-empty month of a schedule
#[must_use]
pub fn summarize(schedule: &Schedule) -> Vec<MonthSummary> {
    schedule
        .iter()
        .map(|(month, events)| {
            let mut summary = MonthSummary {
                month,
                ..MonthSummary::default()
            };
            for event in events {
                match event.direction() {
                    CashFlowDirection::Inflow => summary.inflow += event.amount,
                    CashFlowDirection::Outflow => summary.outflow += event.amount,
                    CashFlowDirection::Transfer => summary.transfers += event.amount,
                    CashFlowDirection::NonCash => {}
                }
                if let Some(driver) = event.metadata.driver_key {
                    *summary.by_driver.entry(driver).or_insert(0.0) += event.amount;
                }
            }
            summary.net = summary.inflow - summary.outflow;
            summary
        })
        .collect()
}

/// Net cash flow over the whole schedule
#[must_use]
pub fn total_net(summaries: &[MonthSummary]) -> f64 {
    summaries.iter().map(|s| s.net).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EventBuilder, ManifestBuilder, ScheduleConfig};
    use crate::model::AccountType;
    use crate::schedule::Scheduler;

    #[test]
    fn test_summarize_by_direction_and_driver() {
        let manifest = ManifestBuilder::new()
            .event(EventBuilder::income("Salary").amount(5_000.0).between(0, 2))
            .event(EventBuilder::expense("Rent").amount(2_000.0).between(0, 2))
            .event(
                EventBuilder::contribution("401k")
                    .amount(500.0)
                    .to_account(AccountType::TaxDeferred)
                    .between(1, 2),
            )
            .event(EventBuilder::shock("Car repair").amount(800.0).at(2))
            .build()
            .unwrap();
        let schedule = Scheduler::new(&manifest, ScheduleConfig::default())
            .unwrap()
            .schedule_horizon();

        let summaries = summarize(&schedule);
        assert_eq!(summaries.len(), 3);

        let first = &summaries[0];
        assert_eq!(first.inflow, 5_000.0);
        assert_eq!(first.outflow, 2_000.0);
        assert_eq!(first.transfers, 0.0);
        assert_eq!(first.net, 3_000.0);

        let last = &summaries[2];
        assert_eq!(last.outflow, 2_800.0);
        assert_eq!(last.transfers, 500.0);
        assert_eq!(last.by_driver[&DriverKey::ExpenseShock], 800.0);
        assert_eq!(last.by_driver[&DriverKey::ContributionSavings], 500.0);
        assert_eq!(last.by_driver[&DriverKey::IncomeEmployment], 5_000.0);

        assert_eq!(total_net(&summaries), 3_000.0 * 3.0 - 800.0);
    }
}
