//! PFOS-E metadata vocabulary
//!
//! Consolidated events must classify themselves for tax treatment, sensitivity
//! attribution and liquidity. Downstream reporting switches on exact values, so
//! every field is a closed enum and none of them has a `Default`.

use serde::{Deserialize, Serialize};

use super::closed::closed_enum;

closed_enum! {
    /// How the engine taxes the cash an event produces
    pub enum TaxProfile {
        OrdinaryIncome => "ordinary_income",
        QualifiedDividend => "qualified_dividend",
        LongTermCapitalGain => "long_term_capital_gain",
        ShortTermCapitalGain => "short_term_capital_gain",
        SocialSecurityBenefit => "social_security_benefit",
        TaxExempt => "tax_exempt",
        ScheduleC => "schedule_c",
        ScheduleE => "schedule_e",
    }
}

closed_enum! {
    /// Sensitivity/attribution tag naming the financial lever an event moves
    pub enum DriverKey {
        IncomeEmployment => "income:employment",
        IncomeBusiness => "income:business",
        IncomeRental => "income:rental",
        IncomePension => "income:pension",
        IncomeSocialSecurity => "income:social_security",
        IncomeInvestment => "income:investment",
        IncomeAnnuity => "income:annuity",
        ExpenseFixed => "expense:fixed",
        ExpenseVariable => "expense:variable",
        ExpenseHealthcare => "expense:healthcare",
        ExpenseShock => "expense:shock",
        DebtInterest => "debt:interest",
        InsurancePremium => "insurance:premium",
        InsurancePayout => "insurance:payout",
        ContributionSavings => "contribution:savings",
        ExposureConcentration => "exposure:concentration",
    }
}

closed_enum! {
    /// How tax on an income stream is collected during the year
    pub enum WithholdingModel {
        NotWithheld => "none",
        Payroll => "payroll",
        EstimatedQuarterly => "estimated_quarterly",
        Voluntary => "voluntary",
    }
}

closed_enum! {
    pub enum ExpenseNature {
        Fixed => "fixed",
        Variable => "variable",
        Shock => "shock",
    }
}

closed_enum! {
    /// How accessible the money behind an event is
    pub enum LiquidityProfile {
        Liquid => "liquid",
        SemiLiquid => "semi_liquid",
        Locked => "locked",
        Illiquid => "illiquid",
    }
}

closed_enum! {
    pub enum ExposureType {
        Equity => "equity",
        FixedIncome => "fixed_income",
        RealEstate => "real_estate",
        ConcentratedPosition => "concentrated_position",
        Alternative => "alternative",
    }
}

closed_enum! {
    /// Tax treatment of money entering an account
    pub enum TaxTreatment {
        PreTax => "pre_tax",
        Roth => "roth",
        AfterTax => "after_tax",
        TaxFree => "tax_free",
    }
}

closed_enum! {
    pub enum InsuranceCoverage {
        Life => "life",
        Disability => "disability",
        LongTermCare => "long_term_care",
        Health => "health",
    }
}

closed_enum! {
    /// Reason an action was blocked or reduced
    pub enum ConstraintCode {
        LimitExceeded => "limit_exceeded",
        LockedUntilAge => "locked_until_age",
        InsufficientFunds => "insufficient_funds",
        IncomePhaseout => "income_phaseout",
        PenaltyApplies => "penalty_applies",
        MinimumBalance => "minimum_balance",
    }
}

/// Metadata fields a consolidated kind can declare as required
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetadataField {
    TaxProfile,
    DriverKey,
    WithholdingModel,
    ExpenseNature,
    LiquidityProfile,
    ExposureType,
    TaxTreatment,
    Coverage,
    ConstraintCodes,
}

impl MetadataField {
    pub const ALL: &'static [MetadataField] = &[
        MetadataField::TaxProfile,
        MetadataField::DriverKey,
        MetadataField::WithholdingModel,
        MetadataField::ExpenseNature,
        MetadataField::LiquidityProfile,
        MetadataField::ExposureType,
        MetadataField::TaxTreatment,
        MetadataField::Coverage,
        MetadataField::ConstraintCodes,
    ];

    /// Key used for this field in an event's metadata bag
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            MetadataField::TaxProfile => "taxProfile",
            MetadataField::DriverKey => "driverKey",
            MetadataField::WithholdingModel => "withholdingModel",
            MetadataField::ExpenseNature => "expenseNature",
            MetadataField::LiquidityProfile => "liquidityProfile",
            MetadataField::ExposureType => "exposureType",
            MetadataField::TaxTreatment => "taxTreatment",
            MetadataField::Coverage => "coverage",
            MetadataField::ConstraintCodes => "constraintCodes",
        }
    }

    /// Whether `value` is an accepted spelling for this field
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            MetadataField::TaxProfile => value.parse::<TaxProfile>().is_ok(),
            MetadataField::DriverKey => value.parse::<DriverKey>().is_ok(),
            MetadataField::WithholdingModel => value.parse::<WithholdingModel>().is_ok(),
            MetadataField::ExpenseNature => value.parse::<ExpenseNature>().is_ok(),
            MetadataField::LiquidityProfile => value.parse::<LiquidityProfile>().is_ok(),
            MetadataField::ExposureType => value.parse::<ExposureType>().is_ok(),
            MetadataField::TaxTreatment => value.parse::<TaxTreatment>().is_ok(),
            MetadataField::Coverage => value.parse::<InsuranceCoverage>().is_ok(),
            MetadataField::ConstraintCodes => value.parse::<ConstraintCode>().is_ok(),
        }
    }
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Flattened PFOS-E view attached to every scheduled occurrence.
///
/// Fields a kind does not declare are `None`; nothing is ever filled in by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PfosMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_profile: Option<TaxProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_key: Option<DriverKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub withholding_model: Option<WithholdingModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_nature: Option<ExpenseNature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidity_profile: Option<LiquidityProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure_type: Option<ExposureType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_treatment: Option<TaxTreatment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<InsuranceCoverage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraint_codes: Vec<ConstraintCode>,
}
