//! Engine seam
//!
//! The scheduler decides what happens and in which order; a
//! [`SimulationEngine`] decides what it does to balances, taxes and the
//! like. [`drive`] is the one place that hands occurrences over, and it does so
//! strictly in schedule order.

use crate::model::SimulationEvent;
use crate::schedule::Schedule;

/// Consumer of scheduled occurrences
pub trait SimulationEngine {
    type Error;

    /// Called before the first occurrence of a non-empty month
    fn begin_month(&mut self, _month: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply one occurrence. Called in execution order within the month.
    fn apply(&mut self, event: &SimulationEvent) -> Result<(), Self::Error>;

    /// Called after the last occurrence of a non-empty month
    fn end_month(&mut self, _month: u32) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Feed every occurrence of `schedule` to `engine`, month by month.
///
/// Stops at the first error the engine returns.
pub fn drive<E: SimulationEngine>(schedule: &Schedule, engine: &mut E) -> Result<(), E::Error> {
    for (month, events) in schedule.iter() {
        engine.begin_month(month)?;
        for event in events {
            engine.apply(event)?;
        }
        engine.end_month(month)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EventBuilder, ManifestBuilder, ScheduleConfig};
    use crate::schedule::Scheduler;

    #[derive(Default)]
    struct Recorder {
        log: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl SimulationEngine for Recorder {
        type Error = String;

        fn begin_month(&mut self, month: u32) -> Result<(), String> {
            self.log.push(format!("begin {month}"));
            Ok(())
        }

        fn apply(&mut self, event: &SimulationEvent) -> Result<(), String> {
            if self.fail_on == Some(event.id.as_str()) {
                return Err(format!("cannot apply {}", event.id));
            }
            self.log.push(event.id.to_string());
            Ok(())
        }

        fn end_month(&mut self, month: u32) -> Result<(), String> {
            self.log.push(format!("end {month}"));
            Ok(())
        }
    }

    fn schedule() -> Schedule {
        let manifest = ManifestBuilder::new()
            .event(EventBuilder::expense("Rent").amount(2_000.0).between(0, 1))
            .event(EventBuilder::income("Salary").amount(5_000.0).between(0, 1))
            .build()
            .unwrap();
        Scheduler::new(&manifest, ScheduleConfig::default().with_horizon_months(2))
            .unwrap()
            .schedule_horizon()
    }

    #[test]
    fn test_drive_in_schedule_order() {
        let mut engine = Recorder::default();
        drive(&schedule(), &mut engine).unwrap();
        assert_eq!(
            engine.log,
            vec!["begin 0", "salary", "rent", "end 0", "begin 1", "salary", "rent", "end 1"]
        );
    }

    #[test]
    fn test_drive_stops_on_error() {
        let mut engine = Recorder {
            fail_on: Some("rent"),
            ..Recorder::default()
        };
        let err = drive(&schedule(), &mut engine).unwrap_err();
        assert_eq!(err, "cannot apply rent");
        assert_eq!(engine.log, vec!["begin 0", "salary"]);
    }
}
