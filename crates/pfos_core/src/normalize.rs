//! Legacy normalizer
//!
//! Rewrites legacy kinds into their consolidated PFOS-E form and parses the
//! metadata of consolidated kinds into a typed [`EventPayload`]. Explicit PFOS-E
//! metadata always wins over inference; an explicit value that does not parse is
//! an error and is never replaced by an inferred one.

use std::str::FromStr;

use serde_json::Value;

use crate::error::NormalizationError;
use crate::model::{
    AccountType, BaseEvent, ConsolidatedEvent, ConstraintCode, DriverKey, EventKind,
    EventPayload, ExpenseNature, InsuranceCoverage, LEGACY_KIND_KEY, LiquidityProfile, Metadata,
    MetadataField, PfosMetadata, TaxProfile, TaxTreatment, WithholdingModel,
};

const INCOME_SOURCE_KEY: &str = "incomeSource";
const DIVIDEND_TYPE_KEY: &str = "dividendType";
const PREMIUMS_PRE_TAX_KEY: &str = "premiumsPaidPreTax";

/// Bring an event into its canonical consolidated form.
///
/// Non-consolidated, non-legacy kinds pass through with a `Standard` payload.
/// Normalizing the [`ConsolidatedEvent::to_base_event`] of a result yields the
/// same result again.
pub fn normalize(event: &BaseEvent) -> Result<ConsolidatedEvent, NormalizationError> {
    let (kind, legacy_kind) = resolve_kind(event)?;

    let explicit = explicit_metadata(event)?;
    let required = crate::registry::required_metadata_fields(kind);
    let metadata = if legacy_kind.is_some() && required.iter().any(|f| !is_set(&explicit, *f)) {
        merge(explicit, infer(event)?)
    } else {
        explicit
    };

    let payload = build_payload(event, kind, &metadata)?;
    let attributes = attributes(&event.metadata, &payload);

    if let Some(legacy) = legacy_kind {
        tracing::debug!(id = %event.id(), from = %legacy, to = %kind, "normalized legacy event");
    }

    Ok(ConsolidatedEvent {
        core: event.core.clone(),
        kind,
        legacy_kind,
        payload,
        constraint_codes: metadata.constraint_codes,
        attributes,
    })
}

/// Target kind and the legacy kind it came from.
///
/// A `legacyKind` entry in the bag must name a legacy kind that normalizes into
/// the target; on an event that is itself legacy it must repeat the event's kind.
fn resolve_kind(event: &BaseEvent) -> Result<(EventKind, Option<EventKind>), NormalizationError> {
    let (target, inherent) = match event.kind.consolidated_form() {
        Some(target) => (target, Some(event.kind)),
        None => (event.kind, None),
    };

    let Some(value) = event.metadata.get(LEGACY_KIND_KEY) else {
        return Ok((target, inherent));
    };
    let invalid = || NormalizationError::InvalidLegacyKind {
        event_id: event.id().clone(),
        kind: event.kind,
        value: value_text(value),
    };

    let declared = value
        .as_str()
        .and_then(|s| s.parse::<EventKind>().ok())
        .ok_or_else(invalid)?;
    if declared.consolidated_form() != Some(target) {
        return Err(invalid());
    }
    match inherent {
        Some(own) if own != declared => Err(invalid()),
        _ => Ok((target, Some(declared))),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn read_field<T: FromStr>(
    event: &BaseEvent,
    field: MetadataField,
) -> Result<Option<T>, NormalizationError> {
    let invalid = |value: String| NormalizationError::InvalidField {
        event_id: event.id().clone(),
        kind: event.kind,
        field,
        value,
    };
    match event.metadata.get(field.key()) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => s.parse().map(Some).map_err(|_| invalid(s.clone())),
        Some(other) => Err(invalid(other.to_string())),
    }
}

fn read_constraint_codes(event: &BaseEvent) -> Result<Vec<ConstraintCode>, NormalizationError> {
    let field = MetadataField::ConstraintCodes;
    let invalid = |value: String| NormalizationError::InvalidField {
        event_id: event.id().clone(),
        kind: event.kind,
        field,
        value,
    };
    match event.metadata.get(field.key()) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.parse().map_err(|_| invalid(s.clone())),
                other => Err(invalid(other.to_string())),
            })
            .collect(),
        Some(other) => Err(invalid(other.to_string())),
    }
}

/// Every PFOS-E value the author wrote, validated
fn explicit_metadata(event: &BaseEvent) -> Result<PfosMetadata, NormalizationError> {
    use MetadataField as F;
    Ok(PfosMetadata {
        tax_profile: read_field(event, F::TaxProfile)?,
        driver_key: read_field(event, F::DriverKey)?,
        withholding_model: read_field(event, F::WithholdingModel)?,
        expense_nature: read_field(event, F::ExpenseNature)?,
        liquidity_profile: read_field(event, F::LiquidityProfile)?,
        exposure_type: read_field(event, F::ExposureType)?,
        tax_treatment: read_field(event, F::TaxTreatment)?,
        coverage: read_field(event, F::Coverage)?,
        constraint_codes: read_constraint_codes(event)?,
    })
}

fn is_set(meta: &PfosMetadata, field: MetadataField) -> bool {
    match field {
        MetadataField::TaxProfile => meta.tax_profile.is_some(),
        MetadataField::DriverKey => meta.driver_key.is_some(),
        MetadataField::WithholdingModel => meta.withholding_model.is_some(),
        MetadataField::ExpenseNature => meta.expense_nature.is_some(),
        MetadataField::LiquidityProfile => meta.liquidity_profile.is_some(),
        MetadataField::ExposureType => meta.exposure_type.is_some(),
        MetadataField::TaxTreatment => meta.tax_treatment.is_some(),
        MetadataField::Coverage => meta.coverage.is_some(),
        MetadataField::ConstraintCodes => !meta.constraint_codes.is_empty(),
    }
}

/// Explicit values over inferred ones
fn merge(explicit: PfosMetadata, inferred: PfosMetadata) -> PfosMetadata {
    PfosMetadata {
        tax_profile: explicit.tax_profile.or(inferred.tax_profile),
        driver_key: explicit.driver_key.or(inferred.driver_key),
        withholding_model: explicit.withholding_model.or(inferred.withholding_model),
        expense_nature: explicit.expense_nature.or(inferred.expense_nature),
        liquidity_profile: explicit.liquidity_profile.or(inferred.liquidity_profile),
        exposure_type: explicit.exposure_type.or(inferred.exposure_type),
        tax_treatment: explicit.tax_treatment.or(inferred.tax_treatment),
        coverage: explicit.coverage.or(inferred.coverage),
        constraint_codes: explicit.constraint_codes,
    }
}

fn income(tax: TaxProfile, driver: DriverKey, withholding: WithholdingModel) -> PfosMetadata {
    PfosMetadata {
        tax_profile: Some(tax),
        driver_key: Some(driver),
        withholding_model: Some(withholding),
        ..PfosMetadata::default()
    }
}

fn expense(nature: ExpenseNature, driver: DriverKey) -> PfosMetadata {
    PfosMetadata {
        expense_nature: Some(nature),
        driver_key: Some(driver),
        ..PfosMetadata::default()
    }
}

fn contribution(treatment: TaxTreatment, liquidity: LiquidityProfile) -> PfosMetadata {
    PfosMetadata {
        tax_treatment: Some(treatment),
        liquidity_profile: Some(liquidity),
        driver_key: Some(DriverKey::ContributionSavings),
        ..PfosMetadata::default()
    }
}

fn payout(coverage: Option<InsuranceCoverage>, tax: TaxProfile) -> PfosMetadata {
    PfosMetadata {
        coverage,
        tax_profile: Some(tax),
        driver_key: Some(DriverKey::InsurancePayout),
        ..PfosMetadata::default()
    }
}

/// Metadata implied by a legacy kind and its kind-specific attributes
fn infer(event: &BaseEvent) -> Result<PfosMetadata, NormalizationError> {
    use DriverKey as D;
    use EventKind as K;
    use TaxProfile as T;
    use WithholdingModel as W;

    let unmappable = |field: MetadataField, hint: String| NormalizationError::Unmappable {
        event_id: event.id().clone(),
        kind: event.kind,
        field,
        hint,
    };
    let attr = |key: &str| event.metadata.get(key).filter(|v| !v.is_null());

    let inferred = match event.kind {
        K::Income => match attr(INCOME_SOURCE_KEY).map(|v| (v.as_str(), v)) {
            None => income(T::OrdinaryIncome, D::IncomeEmployment, W::Payroll),
            Some((Some("salary" | "wages" | "bonus" | "commission"), _)) => {
                income(T::OrdinaryIncome, D::IncomeEmployment, W::Payroll)
            }
            Some((Some("self_employment" | "consulting"), _)) => {
                income(T::ScheduleC, D::IncomeBusiness, W::EstimatedQuarterly)
            }
            Some((Some("rental"), _)) => {
                income(T::ScheduleE, D::IncomeRental, W::EstimatedQuarterly)
            }
            Some((Some("interest"), _)) => {
                income(T::OrdinaryIncome, D::IncomeInvestment, W::NotWithheld)
            }
            Some((_, other)) => {
                return Err(unmappable(
                    MetadataField::TaxProfile,
                    format!("incomeSource '{}'", value_text(other)),
                ));
            }
        },
        K::SocialSecurityIncome => {
            income(T::SocialSecurityBenefit, D::IncomeSocialSecurity, W::Voluntary)
        }
        K::PensionIncome => income(T::OrdinaryIncome, D::IncomePension, W::Voluntary),
        K::AnnuityPayment => income(T::OrdinaryIncome, D::IncomeAnnuity, W::Voluntary),
        K::RentalIncome => income(T::ScheduleE, D::IncomeRental, W::EstimatedQuarterly),
        K::BusinessIncome => income(T::ScheduleC, D::IncomeBusiness, W::EstimatedQuarterly),
        K::DividendIncome => {
            let tax = match attr(DIVIDEND_TYPE_KEY) {
                Some(Value::String(s)) if s == "qualified" => T::QualifiedDividend,
                Some(Value::String(s)) if s == "ordinary" => T::OrdinaryIncome,
                Some(other) => {
                    return Err(unmappable(
                        MetadataField::TaxProfile,
                        format!("dividendType '{}'", value_text(other)),
                    ));
                }
                None => {
                    return Err(unmappable(
                        MetadataField::TaxProfile,
                        "a dividend without dividendType".to_string(),
                    ));
                }
            };
            income(tax, D::IncomeInvestment, W::NotWithheld)
        }

        K::RecurringExpense => expense(ExpenseNature::Fixed, D::ExpenseFixed),
        K::OneTimeEvent => expense(ExpenseNature::Shock, D::ExpenseShock),
        K::HealthcareCost => expense(ExpenseNature::Variable, D::ExpenseHealthcare),

        K::LifeInsurancePremium
        | K::DisabilityInsurancePremium
        | K::LongTermCareInsurancePremium
        | K::HealthInsurancePremium => PfosMetadata {
            coverage: event.kind.insurance_coverage(),
            ..expense(ExpenseNature::Fixed, D::InsurancePremium)
        },

        K::LifeInsurancePayout | K::LongTermCarePayout => {
            payout(event.kind.insurance_coverage(), T::TaxExempt)
        }
        K::DisabilityInsurancePayout => {
            let tax = match attr(PREMIUMS_PRE_TAX_KEY) {
                Some(Value::Bool(true)) => T::OrdinaryIncome,
                Some(Value::Bool(false)) => T::TaxExempt,
                Some(other) => {
                    return Err(unmappable(
                        MetadataField::TaxProfile,
                        format!("premiumsPaidPreTax '{}'", value_text(other)),
                    ));
                }
                None => {
                    return Err(unmappable(
                        MetadataField::TaxProfile,
                        "a disability payout without premiumsPaidPreTax".to_string(),
                    ));
                }
            };
            payout(event.kind.insurance_coverage(), tax)
        }

        K::ScheduledContribution | K::EmployerMatch => match event.core.accounts.destination() {
            Some(AccountType::TaxDeferred) => {
                contribution(TaxTreatment::PreTax, LiquidityProfile::Locked)
            }
            Some(AccountType::Roth) => contribution(TaxTreatment::Roth, LiquidityProfile::SemiLiquid),
            Some(AccountType::Taxable | AccountType::Cash) => {
                contribution(TaxTreatment::AfterTax, LiquidityProfile::Liquid)
            }
            Some(AccountType::Hsa) => {
                contribution(TaxTreatment::TaxFree, LiquidityProfile::SemiLiquid)
            }
            Some(AccountType::FiveTwoNine) => {
                contribution(TaxTreatment::AfterTax, LiquidityProfile::Locked)
            }
            None => {
                return Err(unmappable(
                    MetadataField::TaxTreatment,
                    "a contribution without a target account".to_string(),
                ));
            }
        },
        K::HsaContribution => contribution(TaxTreatment::TaxFree, LiquidityProfile::SemiLiquid),
        K::FiveTwoNineContribution => contribution(TaxTreatment::AfterTax, LiquidityProfile::Locked),

        K::RsuVesting
        | K::RsuSale
        | K::PropertyTax
        | K::LargePurchase
        | K::LiabilityAdd
        | K::DebtPayment
        | K::Refinance
        | K::RothConversion
        | K::BackdoorRoth
        | K::MegaBackdoorRoth
        | K::TaxLossHarvesting
        | K::TaxGainHarvesting
        | K::FiveTwoNineWithdrawal
        | K::TuitionPayment
        | K::EducationExpense
        | K::Inheritance
        | K::TrustDistribution
        | K::TrustFunding
        | K::EstateTransfer
        | K::AnnualGift
        | K::CharitableDonation
        | K::DonorAdvisedFundContribution
        | K::RealEstatePurchase
        | K::RealEstateSale
        | K::Withdrawal
        | K::RequiredMinimumDistribution
        | K::QualifiedCharitableDistribution
        | K::SocialSecurityClaim
        | K::MedicareEnrollment
        | K::StrategicTrade
        | K::RebalancePortfolio
        | K::StockOptionExercise
        | K::GoalDefine
        | K::FinancialMilestone
        | K::EmergencyFundTarget
        | K::CareerChange
        | K::Retirement
        | K::Marriage
        | K::Divorce
        | K::ChildBirth
        | K::Relocation
        | K::Sabbatical
        | K::CashflowIncome
        | K::CashflowExpense
        | K::InsurancePremium
        | K::InsurancePayout
        | K::AccountContribution
        | K::ExposureChange => PfosMetadata::default(),
    };
    Ok(inferred)
}

fn build_payload(
    event: &BaseEvent,
    kind: EventKind,
    meta: &PfosMetadata,
) -> Result<EventPayload, NormalizationError> {
    use MetadataField as F;
    let missing = |field: MetadataField| NormalizationError::MissingField {
        event_id: event.id().clone(),
        kind: event.kind,
        field,
    };

    let payload = match kind {
        EventKind::CashflowIncome => EventPayload::CashflowIncome {
            tax_profile: meta.tax_profile.ok_or_else(|| missing(F::TaxProfile))?,
            driver_key: meta.driver_key.ok_or_else(|| missing(F::DriverKey))?,
            withholding_model: meta
                .withholding_model
                .ok_or_else(|| missing(F::WithholdingModel))?,
        },
        EventKind::CashflowExpense => EventPayload::CashflowExpense {
            driver_key: meta.driver_key.ok_or_else(|| missing(F::DriverKey))?,
            expense_nature: meta.expense_nature.ok_or_else(|| missing(F::ExpenseNature))?,
        },
        EventKind::InsurancePremium => EventPayload::InsurancePremium {
            coverage: meta.coverage.ok_or_else(|| missing(F::Coverage))?,
            driver_key: meta.driver_key.ok_or_else(|| missing(F::DriverKey))?,
            expense_nature: meta.expense_nature.ok_or_else(|| missing(F::ExpenseNature))?,
        },
        EventKind::InsurancePayout => EventPayload::InsurancePayout {
            coverage: meta.coverage.ok_or_else(|| missing(F::Coverage))?,
            tax_profile: meta.tax_profile.ok_or_else(|| missing(F::TaxProfile))?,
            driver_key: meta.driver_key.ok_or_else(|| missing(F::DriverKey))?,
        },
        EventKind::AccountContribution => EventPayload::AccountContribution {
            tax_treatment: meta.tax_treatment.ok_or_else(|| missing(F::TaxTreatment))?,
            liquidity_profile: meta
                .liquidity_profile
                .ok_or_else(|| missing(F::LiquidityProfile))?,
            driver_key: meta.driver_key.ok_or_else(|| missing(F::DriverKey))?,
        },
        EventKind::ExposureChange => EventPayload::ExposureChange {
            exposure_type: meta.exposure_type.ok_or_else(|| missing(F::ExposureType))?,
            liquidity_profile: meta
                .liquidity_profile
                .ok_or_else(|| missing(F::LiquidityProfile))?,
            driver_key: meta.driver_key.ok_or_else(|| missing(F::DriverKey))?,
        },
        EventKind::Income
        | EventKind::SocialSecurityIncome
        | EventKind::PensionIncome
        | EventKind::AnnuityPayment
        | EventKind::BusinessIncome
        | EventKind::RentalIncome
        | EventKind::DividendIncome
        | EventKind::RsuVesting
        | EventKind::RsuSale
        | EventKind::RecurringExpense
        | EventKind::OneTimeEvent
        | EventKind::HealthcareCost
        | EventKind::PropertyTax
        | EventKind::LargePurchase
        | EventKind::ScheduledContribution
        | EventKind::EmployerMatch
        | EventKind::HsaContribution
        | EventKind::LiabilityAdd
        | EventKind::DebtPayment
        | EventKind::Refinance
        | EventKind::RothConversion
        | EventKind::BackdoorRoth
        | EventKind::MegaBackdoorRoth
        | EventKind::TaxLossHarvesting
        | EventKind::TaxGainHarvesting
        | EventKind::LifeInsurancePremium
        | EventKind::DisabilityInsurancePremium
        | EventKind::LongTermCareInsurancePremium
        | EventKind::HealthInsurancePremium
        | EventKind::LifeInsurancePayout
        | EventKind::DisabilityInsurancePayout
        | EventKind::LongTermCarePayout
        | EventKind::FiveTwoNineContribution
        | EventKind::FiveTwoNineWithdrawal
        | EventKind::TuitionPayment
        | EventKind::EducationExpense
        | EventKind::Inheritance
        | EventKind::TrustDistribution
        | EventKind::TrustFunding
        | EventKind::EstateTransfer
        | EventKind::AnnualGift
        | EventKind::CharitableDonation
        | EventKind::DonorAdvisedFundContribution
        | EventKind::RealEstatePurchase
        | EventKind::RealEstateSale
        | EventKind::Withdrawal
        | EventKind::RequiredMinimumDistribution
        | EventKind::QualifiedCharitableDistribution
        | EventKind::SocialSecurityClaim
        | EventKind::MedicareEnrollment
        | EventKind::StrategicTrade
        | EventKind::RebalancePortfolio
        | EventKind::StockOptionExercise
        | EventKind::GoalDefine
        | EventKind::FinancialMilestone
        | EventKind::EmergencyFundTarget
        | EventKind::CareerChange
        | EventKind::Retirement
        | EventKind::Marriage
        | EventKind::Divorce
        | EventKind::ChildBirth
        | EventKind::Relocation
        | EventKind::Sabbatical => EventPayload::Standard,
    };
    Ok(payload)
}

/// Authored metadata the payload does not already carry
fn attributes(metadata: &Metadata, payload: &EventPayload) -> Metadata {
    let provided = payload.provided_fields();
    metadata
        .iter()
        .filter(|(key, _)| {
            key.as_str() != LEGACY_KIND_KEY
                && key.as_str() != MetadataField::ConstraintCodes.key()
                && !provided.iter().any(|f| f.key() == key.as_str())
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
