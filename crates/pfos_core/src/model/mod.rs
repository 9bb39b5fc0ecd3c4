mod closed;
mod events;
mod ids;
mod kind;
mod manifest;
mod metadata;
mod simulation_event;

pub use events::{
    AccountRefs, AccountType, BaseEvent, ConsolidatedEvent, EventCore, EventPayload, Frequency,
    LEGACY_KIND_KEY, Metadata, Priority, RawEvent, RecurrenceWindow,
};
pub use ids::{EventId, GoalId};
pub use kind::{CashFlowDirection, EventCategory, EventKind};
pub use manifest::{EventManifest, Goal, ManifestShapeError, RawManifest, RawRecord};
pub use metadata::{
    ConstraintCode, DriverKey, ExpenseNature, ExposureType, InsuranceCoverage, LiquidityProfile,
    MetadataField, PfosMetadata, TaxProfile, TaxTreatment, WithholdingModel,
};
pub use simulation_event::SimulationEvent;
