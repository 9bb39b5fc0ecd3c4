//! Integration tests for the PFOS-E pipeline
//!
//! Tests are organized by topic:
//! - `pipeline` - Authored JSON all the way to ordered monthly events
//! - `normalize` - Legacy-to-consolidated mapping across the whole registry
//! - `validate` - Manifest rejection and error reports
//! - `schedule` - Recurrence, growth and intra-month ordering
//! - `builder_dsl` - Builder DSL for fluent manifest setup

mod pipeline;
mod validate;
