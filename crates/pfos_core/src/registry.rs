//! Type registry
//!
//! Total, stateless lookups over the closed event-kind set and the PFOS-E
//! vocabulary. Nothing here fails: unknown spellings answer `false`, and the
//! caller decides whether that is fatal.

use crate::model::{
    ConstraintCode, DriverKey, EventKind, ExpenseNature, ExposureType, InsuranceCoverage,
    LiquidityProfile, MetadataField, TaxProfile, TaxTreatment, WithholdingModel,
};

/// Whether `kind` is the exact wire spelling of a registered event kind
#[must_use]
pub fn is_valid_kind(kind: &str) -> bool {
    kind.parse::<EventKind>().is_ok()
}

/// Metadata fields a kind must carry. Empty for non-consolidated kinds.
#[must_use]
pub const fn required_metadata_fields(kind: EventKind) -> &'static [MetadataField] {
    use MetadataField as F;
    match kind {
        EventKind::CashflowIncome => &[F::TaxProfile, F::DriverKey, F::WithholdingModel],
        EventKind::CashflowExpense => &[F::DriverKey, F::ExpenseNature],
        EventKind::InsurancePremium => &[F::Coverage, F::DriverKey, F::ExpenseNature],
        EventKind::InsurancePayout => &[F::Coverage, F::TaxProfile, F::DriverKey],
        EventKind::AccountContribution => &[F::TaxTreatment, F::LiquidityProfile, F::DriverKey],
        EventKind::ExposureChange => &[F::ExposureType, F::LiquidityProfile, F::DriverKey],
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
        | EventKind::Sabbatical => &[],
    }
}

#[must_use]
pub fn is_valid_tax_profile(value: &str) -> bool {
    value.parse::<TaxProfile>().is_ok()
}

#[must_use]
pub fn is_valid_driver_key(value: &str) -> bool {
    value.parse::<DriverKey>().is_ok()
}

#[must_use]
pub fn is_valid_withholding_model(value: &str) -> bool {
    value.parse::<WithholdingModel>().is_ok()
}

#[must_use]
pub fn is_valid_expense_nature(value: &str) -> bool {
    value.parse::<ExpenseNature>().is_ok()
}

#[must_use]
pub fn is_valid_liquidity_profile(value: &str) -> bool {
    value.parse::<LiquidityProfile>().is_ok()
}

#[must_use]
pub fn is_valid_exposure_type(value: &str) -> bool {
    value.parse::<ExposureType>().is_ok()
}

#[must_use]
pub fn is_valid_tax_treatment(value: &str) -> bool {
    value.parse::<TaxTreatment>().is_ok()
}

#[must_use]
pub fn is_valid_coverage(value: &str) -> bool {
    value.parse::<InsuranceCoverage>().is_ok()
}

#[must_use]
pub fn is_valid_constraint_code(value: &str) -> bool {
    value.parse::<ConstraintCode>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_kind() {
        assert!(is_valid_kind("INCOME"));
        assert!(is_valid_kind("CASHFLOW_INCOME"));
        assert!(!is_valid_kind("DEBT_PAYOFF"));
        assert!(!is_valid_kind(""));
        assert!(!is_valid_kind("Income"));
    }

    #[test]
    fn test_only_consolidated_kinds_require_metadata() {
        for kind in EventKind::ALL {
            let required = required_metadata_fields(*kind);
            assert_eq!(
                !required.is_empty(),
                kind.is_consolidated(),
                "{kind} requirement mismatch"
            );
            assert!(required.contains(&MetadataField::DriverKey) || required.is_empty());
        }
    }

    #[test]
    fn test_income_requires_tax_profile() {
        assert!(
            required_metadata_fields(EventKind::CashflowIncome).contains(&MetadataField::TaxProfile)
        );
        assert!(required_metadata_fields(EventKind::Income).is_empty());
    }

    #[test]
    fn test_vocabulary_predicates() {
        assert!(is_valid_tax_profile("schedule_e"));
        assert!(!is_valid_tax_profile("capital_gain"));
        assert!(is_valid_driver_key("income:social_security"));
        assert!(is_valid_withholding_model("none"));
        assert!(is_valid_expense_nature("shock"));
        assert!(!is_valid_expense_nature("surprise"));
        assert!(is_valid_liquidity_profile("semi_liquid"));
        assert!(is_valid_exposure_type("concentrated_position"));
        assert!(is_valid_tax_treatment("roth"));
        assert!(is_valid_coverage("long_term_care"));
        assert!(is_valid_constraint_code("limit_exceeded"));
        assert!(!is_valid_constraint_code("over_limit"));
    }
}
