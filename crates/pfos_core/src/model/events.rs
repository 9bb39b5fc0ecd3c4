//! Event envelopes
//!
//! Three shapes exist, one per pipeline stage:
//! - [`RawEvent`] is the authored record exactly as decoded from JSON/YAML:
//!   strings everywhere, an open metadata bag.
//! - [`BaseEvent`] is the typed envelope: the kind and enums are parsed, the
//!   metadata bag is still open. This is the normalizer's input.
//! - [`ConsolidatedEvent`] is the canonical form the scheduler consumes. Its
//!   PFOS-E metadata is a typed per-kind [`EventPayload`].

use serde::{Deserialize, Serialize};

use super::closed::closed_enum;
use super::ids::EventId;
use super::kind::EventKind;
use super::metadata::{
    ConstraintCode, DriverKey, ExpenseNature, ExposureType, InsuranceCoverage, LiquidityProfile,
    MetadataField, PfosMetadata, TaxProfile, TaxTreatment, WithholdingModel,
};

/// Open, kind-specific key/value bag carried by authored events
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Reserved metadata key recording the legacy kind a consolidated event came from
pub const LEGACY_KIND_KEY: &str = "legacyKind";

closed_enum! {
    /// How often a windowed event recurs
    pub enum Frequency {
        Monthly => "monthly",
        Annually => "annually",
        OneTime => "one-time",
    }
}

closed_enum! {
    /// Account buckets balances and flows are keyed by
    pub enum AccountType {
        Cash => "cash",
        Taxable => "taxable",
        TaxDeferred => "tax_deferred",
        Roth => "roth",
        Hsa => "hsa",
        FiveTwoNine => "529",
    }
}

/// Intra-month execution priority. Lower runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// When an event happens, in months since the start of the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceWindow {
    /// Month the event is anchored to
    pub month_offset: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_offset: Option<u32>,
    /// Inclusive last month; `None` runs to the end of the horizon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

impl RecurrenceWindow {
    pub fn one_time(month: u32) -> Self {
        Self {
            month_offset: month,
            start_date_offset: None,
            end_date_offset: None,
            frequency: Some(Frequency::OneTime),
        }
    }

    pub fn recurring(frequency: Frequency, start: u32, end: Option<u32>) -> Self {
        Self {
            month_offset: start,
            start_date_offset: Some(start),
            end_date_offset: end,
            frequency: Some(frequency),
        }
    }

    /// Explicit frequency, else monthly when a range is given, else one-time
    #[must_use]
    pub fn effective_frequency(&self) -> Frequency {
        match self.frequency {
            Some(f) => f,
            None if self.start_date_offset.is_some() || self.end_date_offset.is_some() => {
                Frequency::Monthly
            }
            None => Frequency::OneTime,
        }
    }

    /// Month growth compounds from
    #[must_use]
    pub fn growth_anchor(&self) -> u32 {
        self.start_date_offset.unwrap_or(self.month_offset)
    }

    /// First month the event can occur in
    #[must_use]
    pub fn first_month(&self) -> u32 {
        match self.effective_frequency() {
            Frequency::OneTime => self.month_offset,
            Frequency::Monthly | Frequency::Annually => self.growth_anchor(),
        }
    }

    /// Last month the event can occur in, `None` if open-ended
    #[must_use]
    pub fn last_month(&self) -> Option<u32> {
        match self.effective_frequency() {
            Frequency::OneTime => Some(self.month_offset),
            Frequency::Monthly | Frequency::Annually => self.end_date_offset,
        }
    }

    /// Whether `month` is inside the declared `[start, end]` bounds
    #[must_use]
    pub fn bounds_contain(&self, month: u32) -> bool {
        self.start_date_offset.is_none_or(|start| month >= start)
            && self.end_date_offset.is_none_or(|end| month <= end)
    }

    /// Whether the event produces an occurrence in `month`
    #[must_use]
    pub fn covers(&self, month: u32) -> bool {
        if !self.bounds_contain(month) {
            return false;
        }
        match self.effective_frequency() {
            Frequency::OneTime => month == self.month_offset,
            Frequency::Monthly => month >= self.first_month(),
            Frequency::Annually => {
                let first = self.first_month();
                month >= first && (month - first) % 12 == 0
            }
        }
    }

    /// False when start is after end, or a one-time anchor sits outside the bounds
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        if let (Some(start), Some(end)) = (self.start_date_offset, self.end_date_offset) {
            if start > end {
                return false;
            }
        }
        match self.effective_frequency() {
            Frequency::OneTime => self.bounds_contain(self.month_offset),
            Frequency::Monthly | Frequency::Annually => true,
        }
    }
}

/// Account references of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account_type: Option<AccountType>,
}

impl AccountRefs {
    /// Account money lands in: the explicit target, else the plain account
    #[must_use]
    pub fn destination(&self) -> Option<AccountType> {
        self.target_account_type.or(self.account_type)
    }
}

/// Fields every event carries regardless of its kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCore {
    pub id: EventId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub window: RecurrenceWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_growth_rate: Option<f64>,
    /// Overrides the priority table default when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(flatten)]
    pub accounts: AccountRefs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl EventCore {
    pub fn new(id: impl Into<String>, window: RecurrenceWindow) -> Self {
        Self {
            id: EventId::new(id),
            name: None,
            description: None,
            window,
            annual_growth_rate: None,
            priority: None,
            amount: None,
            accounts: AccountRefs::default(),
            tags: Vec::new(),
        }
    }
}

/// Authored event record, as decoded at the ingestion boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub id: String,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Defaults to `startDateOffset` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date_offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date_offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_growth_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: Metadata,
}

/// Typed event envelope with an open metadata bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEvent {
    #[serde(flatten)]
    pub core: EventCore,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub metadata: Metadata,
}

impl BaseEvent {
    pub fn new(kind: EventKind, core: EventCore) -> Self {
        Self {
            core,
            kind,
            metadata: Metadata::new(),
        }
    }

    /// Set a metadata entry
    pub fn with_meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &EventId {
        &self.core.id
    }
}

/// PFOS-E metadata, typed per consolidated kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payload", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EventPayload {
    CashflowIncome {
        tax_profile: TaxProfile,
        driver_key: DriverKey,
        withholding_model: WithholdingModel,
    },
    CashflowExpense {
        driver_key: DriverKey,
        expense_nature: ExpenseNature,
    },
    InsurancePremium {
        coverage: InsuranceCoverage,
        driver_key: DriverKey,
        expense_nature: ExpenseNature,
    },
    InsurancePayout {
        coverage: InsuranceCoverage,
        tax_profile: TaxProfile,
        driver_key: DriverKey,
    },
    AccountContribution {
        tax_treatment: TaxTreatment,
        liquidity_profile: LiquidityProfile,
        driver_key: DriverKey,
    },
    ExposureChange {
        exposure_type: ExposureType,
        liquidity_profile: LiquidityProfile,
        driver_key: DriverKey,
    },
    /// Kinds without PFOS-E requirements
    Standard,
}

impl EventPayload {
    /// The consolidated kind this payload belongs to, `None` for `Standard`
    #[must_use]
    pub const fn consolidated_kind(&self) -> Option<EventKind> {
        match self {
            EventPayload::CashflowIncome { .. } => Some(EventKind::CashflowIncome),
            EventPayload::CashflowExpense { .. } => Some(EventKind::CashflowExpense),
            EventPayload::InsurancePremium { .. } => Some(EventKind::InsurancePremium),
            EventPayload::InsurancePayout { .. } => Some(EventKind::InsurancePayout),
            EventPayload::AccountContribution { .. } => Some(EventKind::AccountContribution),
            EventPayload::ExposureChange { .. } => Some(EventKind::ExposureChange),
            EventPayload::Standard => None,
        }
    }

    /// Fields this payload supplies
    #[must_use]
    pub const fn provided_fields(&self) -> &'static [MetadataField] {
        use MetadataField as F;
        match self {
            EventPayload::CashflowIncome { .. } => {
                &[F::TaxProfile, F::DriverKey, F::WithholdingModel]
            }
            EventPayload::CashflowExpense { .. } => &[F::DriverKey, F::ExpenseNature],
            EventPayload::InsurancePremium { .. } => {
                &[F::Coverage, F::DriverKey, F::ExpenseNature]
            }
            EventPayload::InsurancePayout { .. } => &[F::Coverage, F::TaxProfile, F::DriverKey],
            EventPayload::AccountContribution { .. } => {
                &[F::TaxTreatment, F::LiquidityProfile, F::DriverKey]
            }
            EventPayload::ExposureChange { .. } => {
                &[F::ExposureType, F::LiquidityProfile, F::DriverKey]
            }
            EventPayload::Standard => &[],
        }
    }

    #[must_use]
    pub fn driver_key(&self) -> Option<DriverKey> {
        match *self {
            EventPayload::CashflowIncome { driver_key, .. }
            | EventPayload::CashflowExpense { driver_key, .. }
            | EventPayload::InsurancePremium { driver_key, .. }
            | EventPayload::InsurancePayout { driver_key, .. }
            | EventPayload::AccountContribution { driver_key, .. }
            | EventPayload::ExposureChange { driver_key, .. } => Some(driver_key),
            EventPayload::Standard => None,
        }
    }

    /// Flatten into the downstream metadata record
    #[must_use]
    pub fn to_metadata(&self, constraint_codes: &[ConstraintCode]) -> PfosMetadata {
        let mut meta = PfosMetadata {
            constraint_codes: constraint_codes.to_vec(),
            driver_key: self.driver_key(),
            ..PfosMetadata::default()
        };
        match *self {
            EventPayload::CashflowIncome {
                tax_profile,
                withholding_model,
                ..
            } => {
                meta.tax_profile = Some(tax_profile);
                meta.withholding_model = Some(withholding_model);
            }
            EventPayload::CashflowExpense { expense_nature, .. } => {
                meta.expense_nature = Some(expense_nature);
            }
            EventPayload::InsurancePremium {
                coverage,
                expense_nature,
                ..
            } => {
                meta.coverage = Some(coverage);
                meta.expense_nature = Some(expense_nature);
            }
            EventPayload::InsurancePayout {
                coverage,
                tax_profile,
                ..
            } => {
                meta.coverage = Some(coverage);
                meta.tax_profile = Some(tax_profile);
            }
            EventPayload::AccountContribution {
                tax_treatment,
                liquidity_profile,
                ..
            } => {
                meta.tax_treatment = Some(tax_treatment);
                meta.liquidity_profile = Some(liquidity_profile);
            }
            EventPayload::ExposureChange {
                exposure_type,
                liquidity_profile,
                ..
            } => {
                meta.exposure_type = Some(exposure_type);
                meta.liquidity_profile = Some(liquidity_profile);
            }
            EventPayload::Standard => {}
        }
        meta
    }
}

/// Canonical, metadata-complete event handed to the scheduler.
///
/// Legacy kinds never appear in `kind`; the kind as authored is kept in
/// `legacy_kind` so the priority table can still place it in its phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedEvent {
    #[serde(flatten)]
    pub core: EventCore,
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_kind: Option<EventKind>,
    pub payload: EventPayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraint_codes: Vec<ConstraintCode>,
    /// Authored metadata outside the PFOS-E vocabulary, carried through untouched
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub attributes: Metadata,
}

impl ConsolidatedEvent {
    #[must_use]
    pub fn id(&self) -> &EventId {
        &self.core.id
    }

    /// Kind the author wrote, before normalization
    #[must_use]
    pub fn authored_kind(&self) -> EventKind {
        self.legacy_kind.unwrap_or(self.kind)
    }

    #[must_use]
    pub fn metadata(&self) -> PfosMetadata {
        self.payload.to_metadata(&self.constraint_codes)
    }

    /// Required fields of `kind` the payload does not supply
    #[must_use]
    pub fn missing_fields(&self) -> Vec<MetadataField> {
        let provided = if self.payload.consolidated_kind() == Some(self.kind) {
            self.payload.provided_fields()
        } else {
            &[]
        };
        crate::registry::required_metadata_fields(self.kind)
            .iter()
            .copied()
            .filter(|f| !provided.contains(f))
            .collect()
    }

    /// Re-open the event into its envelope form.
    ///
    /// Normalizing the result yields this event again.
    #[must_use]
    pub fn to_base_event(&self) -> BaseEvent {
        let mut metadata = self.attributes.clone();
        let flat = self.metadata();
        let mut put = |field: MetadataField, value: Option<&'static str>| {
            if let Some(value) = value {
                metadata.insert(field.key().to_string(), value.into());
            }
        };
        put(MetadataField::TaxProfile, flat.tax_profile.map(|v| v.as_str()));
        put(MetadataField::DriverKey, flat.driver_key.map(|v| v.as_str()));
        put(
            MetadataField::WithholdingModel,
            flat.withholding_model.map(|v| v.as_str()),
        );
        put(
            MetadataField::ExpenseNature,
            flat.expense_nature.map(|v| v.as_str()),
        );
        put(
            MetadataField::LiquidityProfile,
            flat.liquidity_profile.map(|v| v.as_str()),
        );
        put(
            MetadataField::ExposureType,
            flat.exposure_type.map(|v| v.as_str()),
        );
        put(
            MetadataField::TaxTreatment,
            flat.tax_treatment.map(|v| v.as_str()),
        );
        put(MetadataField::Coverage, flat.coverage.map(|v| v.as_str()));
        if !self.constraint_codes.is_empty() {
            let codes = self
                .constraint_codes
                .iter()
                .map(|c| serde_json::Value::from(c.as_str()))
                .collect::<Vec<_>>();
            metadata.insert(MetadataField::ConstraintCodes.key().to_string(), codes.into());
        }
        if let Some(legacy) = self.legacy_kind {
            metadata.insert(LEGACY_KIND_KEY.to_string(), legacy.as_str().into());
        }
        BaseEvent {
            core: self.core.clone(),
            kind: self.kind,
            metadata,
        }
    }
}
