//! Scheduling configuration
//!
//! The main configuration type is `ScheduleConfig`, which tells the scheduler
//! how far to run and how to date occurrences.
//!
//! # Builder DSL
//!
//! Fixtures and tests can assemble a validated manifest fluently:
//!
//! ```ignore
//! use pfos_core::config::{EventBuilder, GoalBuilder, ManifestBuilder};
//!
//! let manifest = ManifestBuilder::new()
//!     .start(2025, 1, 1)
//!     .account(AccountType::Cash, 20_000.0)
//!     .event(EventBuilder::income("Salary").amount(8_000.0).monthly().starting(0))
//!     .event(EventBuilder::expense("Rent").amount(2_000.0).monthly().starting(0))
//!     .goal(GoalBuilder::new("House").target(100_000.0))
//!     .build()?;
//! ```

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::model::EventManifest;

pub mod builder;
pub mod event_builder;

pub use builder::{GoalBuilder, ManifestBuilder};
pub use event_builder::EventBuilder;

/// Horizon used when none is configured: 30 years
pub const DEFAULT_HORIZON_MONTHS: u32 = 360;

fn default_horizon_months() -> u32 {
    DEFAULT_HORIZON_MONTHS
}

/// How far and from when a manifest is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Months scheduled; open-ended windows stop here
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,

    /// Calendar date of month 0. Occurrences are undated without one.
    #[serde(default)]
    pub start_date: Option<Date>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon_months: default_horizon_months(),
            start_date: None,
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default horizon, dated from the manifest's `startDate` if it has one
    #[must_use]
    pub fn from_manifest(manifest: &EventManifest) -> Self {
        Self {
            start_date: manifest.start_date(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_horizon_months(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self
    }

    #[must_use]
    pub fn with_horizon_years(self, years: u32) -> Self {
        self.with_horizon_months(years.saturating_mul(12))
    }

    #[must_use]
    pub fn with_start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_defaults() {
        let config: ScheduleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ScheduleConfig::default());
        assert_eq!(config.horizon_months, 360);

        let config: ScheduleConfig =
            serde_json::from_str(r#"{ "horizonMonths": 24, "startDate": "2030-03-01" }"#).unwrap();
        assert_eq!(config.horizon_months, 24);
        assert_eq!(config.start_date, Some(jiff::civil::date(2030, 3, 1)));
    }

    #[test]
    fn test_with_helpers() {
        let config = ScheduleConfig::new()
            .with_horizon_years(10)
            .with_start_date(jiff::civil::date(2025, 1, 1));
        assert_eq!(config.horizon_months, 120);
        assert!(config.start_date.is_some());
    }
}
