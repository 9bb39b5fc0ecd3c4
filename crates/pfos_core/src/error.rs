use std::fmt;

use thiserror::Error;

use crate::model::{EventId, EventKind, ManifestShapeError, MetadataField, Priority};

/// A string that is not a member of a closed enum
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {type_name}")]
pub struct UnknownVariant {
    pub type_name: &'static str,
    pub value: String,
}

/// Why an event could not be brought to its consolidated form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("event '{event_id}' ({kind}): missing required metadata field '{field}'")]
    MissingField {
        event_id: EventId,
        kind: EventKind,
        field: MetadataField,
    },

    #[error("event '{event_id}' ({kind}): '{value}' is not a valid {field}")]
    InvalidField {
        event_id: EventId,
        kind: EventKind,
        field: MetadataField,
        value: String,
    },

    #[error("event '{event_id}' ({kind}): cannot determine '{field}' from {hint}")]
    Unmappable {
        event_id: EventId,
        kind: EventKind,
        field: MetadataField,
        hint: String,
    },

    #[error("event '{event_id}' ({kind}): legacyKind '{value}' does not normalize into {kind}")]
    InvalidLegacyKind {
        event_id: EventId,
        kind: EventKind,
        value: String,
    },
}

impl NormalizationError {
    #[must_use]
    pub fn event_id(&self) -> &EventId {
        match self {
            NormalizationError::MissingField { event_id, .. }
            | NormalizationError::InvalidField { event_id, .. }
            | NormalizationError::Unmappable { event_id, .. }
            | NormalizationError::InvalidLegacyKind { event_id, .. } => event_id,
        }
    }

    /// The metadata field that could not be resolved, if the failure concerns one
    #[must_use]
    pub fn field(&self) -> Option<MetadataField> {
        match self {
            NormalizationError::MissingField { field, .. }
            | NormalizationError::InvalidField { field, .. }
            | NormalizationError::Unmappable { field, .. } => Some(*field),
            NormalizationError::InvalidLegacyKind { .. } => None,
        }
    }
}

/// Startup self-check failures of the priority table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriorityTableError {
    #[error("event kind {0} does not round-trip through its wire name")]
    Unregistered(EventKind),

    #[error("event kind {0} is listed more than once in the registry")]
    DuplicateKind(EventKind),

    #[error("event kind {kind} has priority {priority}, outside its phase band {min}..={max}")]
    OutOfPhase {
        kind: EventKind,
        priority: Priority,
        min: i32,
        max: i32,
    },
}

/// Reasons a manifest cannot be scheduled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error(transparent)]
    PriorityTable(#[from] PriorityTableError),

    #[error("event '{event_id}' compounds past any finite amount by month {month}")]
    AmountOverflow { event_id: EventId, month: u32 },
}

/// Where in a manifest a validation issue was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueLocation {
    Manifest,
    InitialAccount(String),
    Event { index: usize, id: Option<String> },
    Goal { index: usize, id: Option<String> },
}

impl fmt::Display for IssueLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueLocation::Manifest => write!(f, "manifest"),
            IssueLocation::InitialAccount(key) => write!(f, "initialAccounts.{key}"),
            IssueLocation::Event { index, id: Some(id) } => write!(f, "event '{id}' (#{index})"),
            IssueLocation::Event { index, id: None } => write!(f, "event #{index}"),
            IssueLocation::Goal { index, id: Some(id) } => write!(f, "goal '{id}' (#{index})"),
            IssueLocation::Goal { index, id: None } => write!(f, "goal #{index}"),
        }
    }
}

/// What is wrong with a manifest record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Shape(ManifestShapeError),
    Malformed(String),
    DuplicateId,
    UnknownKind { suggestions: Vec<&'static str> },
    MissingMonthOffset,
    InvalidFrequency(String),
    UnknownAccountType { field: &'static str, value: String },
    InvalidWindow,
    InvalidAmount,
    InvalidGrowthRate,
    /// Compounded amount is no longer finite by this month
    GrowthOverflow { month: u32 },
    InvalidBalance,
    InvalidStartDate(String),
    InvalidTargetAmount,
    Normalization(NormalizationError),
    MissingMetadata(MetadataField),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Shape(ManifestShapeError::NotAnObject) => {
                write!(f, "manifest must be an object")
            }
            Problem::Shape(ManifestShapeError::FieldNotAList(key)) => {
                write!(f, "'{key}' must be a list")
            }
            Problem::Shape(ManifestShapeError::FieldNotAnObject(key)) => {
                write!(f, "'{key}' must be an object")
            }
            Problem::Malformed(msg) => write!(f, "malformed record: {msg}"),
            Problem::DuplicateId => write!(f, "id is already used by an earlier record"),
            Problem::UnknownKind { suggestions } if suggestions.is_empty() => {
                write!(f, "unknown event kind")
            }
            Problem::UnknownKind { suggestions } => {
                write!(f, "unknown event kind; did you mean {}?", suggestions.join(", "))
            }
            Problem::MissingMonthOffset => {
                write!(f, "neither monthOffset nor startDateOffset is set")
            }
            Problem::InvalidFrequency(value) => write!(
                f,
                "'{value}' is not a valid frequency (monthly, annually, one-time)"
            ),
            Problem::UnknownAccountType { field, value } => {
                write!(f, "{field} '{value}' is not a known account type")
            }
            Problem::InvalidWindow => write!(
                f,
                "recurrence window is inverted or does not contain its anchor month"
            ),
            Problem::InvalidAmount => write!(f, "amount must be a finite number"),
            Problem::InvalidGrowthRate => {
                write!(f, "annualGrowthRate must be finite and greater than -1")
            }
            Problem::GrowthOverflow { month } => write!(
                f,
                "annualGrowthRate compounds the amount past any finite value by month {month}"
            ),
            Problem::InvalidBalance => write!(f, "balance must be a finite number"),
            Problem::InvalidStartDate(msg) => write!(f, "invalid startDate: {msg}"),
            Problem::InvalidTargetAmount => {
                write!(f, "targetAmount must be a positive finite number")
            }
            Problem::Normalization(e) => write!(f, "{e}"),
            Problem::MissingMetadata(field) => {
                write!(f, "missing required metadata field '{field}'")
            }
        }
    }
}

/// One offending record in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub location: IssueLocation,
    /// Kind as spelled by the author, when known
    pub kind: Option<String>,
    pub problem: Problem,
}

impl ValidationIssue {
    #[must_use]
    pub fn event_id(&self) -> Option<&str> {
        match &self.location {
            IssueLocation::Event { id, .. } => id.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} [{kind}]: {}", self.location, self.problem),
            None => write!(f, "{}: {}", self.location, self.problem),
        }
    }
}

/// Every problem found in a manifest, in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter()
    }

    /// Issues reported against the event with the given id
    pub fn for_event<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ValidationIssue> {
        self.issues.iter().filter(move |i| i.event_id() == Some(id))
    }

    pub(crate) fn push(&mut self, location: IssueLocation, kind: Option<String>, problem: Problem) {
        self.issues.push(ValidationIssue {
            location,
            kind,
            problem,
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "manifest rejected with {} issue(s)", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  - {issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}
