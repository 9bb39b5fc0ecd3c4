//! PFOS-E financial event model and monthly scheduling pipeline
//!
//! This crate turns an authored financial plan into an ordered, per-month stream
//! of atomic events for a downstream simulation engine:
//! - A closed registry of event kinds and PFOS-E metadata vocabularies
//! - Normalization of legacy kinds into consolidated, metadata-complete events
//! - Manifest validation that reports every problem at once
//! - A phase-banded priority table for deterministic intra-month ordering
//! - A monthly scheduler with recurrence windows and compounded growth
//!
//! # Pipeline
//!
//! ```ignore
//! use pfos_core::{ScheduleConfig, Scheduler, load_manifest_str, summarize};
//!
//! let manifest = load_manifest_str(&text)?;
//! let scheduler = Scheduler::new(&manifest, ScheduleConfig::from_manifest(&manifest))?;
//! let schedule = scheduler.schedule_horizon();
//! for (month, events) in schedule.iter() {
//!     // hand events to the engine, in order
//! }
//! let cash_flow = summarize(&schedule);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod date_math;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod priority;
pub mod registry;
pub mod schedule;
pub mod summary;
pub mod validate;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{EventBuilder, GoalBuilder, ManifestBuilder, ScheduleConfig};
pub use engine::{SimulationEngine, drive};
pub use error::{
    IssueLocation, NormalizationError, PriorityTableError, Problem, ScheduleError, UnknownVariant,
    ValidationIssue, ValidationReport,
};
pub use normalize::normalize;
pub use priority::{Phase, verify_priority_table};
pub use schedule::{Schedule, Scheduler};
pub use summary::{MonthSummary, summarize};
pub use validate::{load_manifest, load_manifest_str, suggest_kinds, validate_manifest};
