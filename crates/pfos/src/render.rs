//! Text output for the command line

use std::io::Write;

use color_eyre::eyre::{Result, WrapErr};
use pfos_core::model::EventKind;
use pfos_core::{MonthSummary, Schedule};
use serde::Serialize;

/// One block per month, events in execution order
pub fn schedule_table(schedule: &Schedule, out: &mut impl Write) -> Result<()> {
    if schedule.is_empty() {
        writeln!(out, "(no events scheduled)")?;
        return Ok(());
    }

    for (month, events) in schedule.iter() {
        match events.first().and_then(|e| e.date) {
            Some(date) => writeln!(out, "Month {month} ({date})")?,
            None => writeln!(out, "Month {month}")?,
        }
        for event in events {
            let authored = event
                .legacy_kind
                .map(|k| format!("  <- {k}"))
                .unwrap_or_default();
            writeln!(
                out,
                "  {:>3}  {:<28} {:<24} {:>12.2}{authored}",
                event.priority.0,
                event.kind.as_str(),
                event.id.as_str(),
                event.amount,
            )?;
        }
    }
    Ok(())
}

pub fn summary_table(summaries: &[MonthSummary], out: &mut impl Write) -> Result<()> {
    writeln!(
        out,
        "{:>5}  {:>12} {:>12} {:>12} {:>12}",
        "month", "inflow", "outflow", "transfers", "net"
    )?;
    for s in summaries {
        writeln!(
            out,
            "{:>5}  {:>12.2} {:>12.2} {:>12.2} {:>12.2}",
            s.month, s.inflow, s.outflow, s.transfers, s.net
        )?;
    }
    Ok(())
}

/// Every registered kind in priority order
pub fn kinds_table(out: &mut impl Write) -> Result<()> {
    let mut kinds: Vec<EventKind> = EventKind::ALL.to_vec();
    kinds.sort_by_key(|k| (k.default_priority(), k.as_str()));

    writeln!(out, "{:>3}  {:<36} {:<20} {}", "pri", "kind", "phase", "normalizes to")?;
    for kind in kinds {
        let target = kind.consolidated_form().map_or("-", EventKind::as_str);
        writeln!(
            out,
            "{:>3}  {:<36} {:<20} {target}",
            kind.default_priority().0,
            kind.as_str(),
            kind.phase().label(),
        )?;
    }
    Ok(())
}

pub fn json<T: Serialize>(value: &T, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).wrap_err("failed to write JSON")?;
    writeln!(out)?;
    Ok(())
}

pub fn yaml<T: Serialize>(value: &T, out: &mut impl Write) -> Result<()> {
    let text = serde_saphyr::to_string(value).wrap_err("failed to write YAML")?;
    out.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pfos_core::config::{EventBuilder, ManifestBuilder, ScheduleConfig};
    use pfos_core::{Scheduler, summarize};

    fn schedule() -> Schedule {
        let manifest = ManifestBuilder::new()
            .start(2025, 1, 1)
            .event(EventBuilder::expense("Rent").amount(2_000.0).between(0, 1))
            .event(EventBuilder::income("Salary").amount(5_000.0).between(0, 1))
            .build()
            .unwrap();
        Scheduler::new(&manifest, ScheduleConfig::from_manifest(&manifest))
            .unwrap()
            .schedule_horizon()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_table() {
        let schedule = schedule();
        let text = render(|out| schedule_table(&schedule, out));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Month 0 (2025-01-01)");
        assert!(lines[1].contains("CASHFLOW_INCOME") && lines[1].ends_with("<- INCOME"));
        assert!(lines[2].contains("RECURRING_EXPENSE") && lines[2].contains("2000.00"));
        assert_eq!(lines[3], "Month 1 (2025-02-01)");
    }

    #[test]
    fn test_empty_schedule_table() {
        let text = render(|out| schedule_table(&Schedule::default(), out));
        assert_eq!(text, "(no events scheduled)\n");
    }

    #[test]
    fn test_summary_table() {
        let summaries = summarize(&schedule());
        let text = render(|out| summary_table(&summaries, out));
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().ends_with("3000.00"));
    }

    #[test]
    fn test_kinds_table_lists_every_kind_in_order() {
        let text = render(|out| kinds_table(out));
        let rows: Vec<i32> = text
            .lines()
            .skip(1)
            .map(|l| l.split_whitespace().next().unwrap().parse().unwrap())
            .collect();
        assert_eq!(rows.len(), EventKind::ALL.len());
        assert!(rows.is_sorted());
    }

    #[test]
    fn test_json_output() {
        let schedule = schedule();
        let text = render(|out| json(&schedule, out));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["0"][0]["id"], "salary");
        assert_eq!(value["1"][1]["kind"], "CASHFLOW_EXPENSE");
        assert_eq!(value["1"][1]["legacyKind"], "RECURRING_EXPENSE");
    }
}
