//! Event kinds - the closed taxonomy of financial actions
//!
//! Every event in a manifest names one of these kinds. The set is closed: each
//! consumer (priority table, normalizer, category and cash-flow lookups) matches
//! exhaustively, so a new kind does not compile until every consumer handles it.

use serde::{Deserialize, Serialize};

use super::closed::closed_enum;
use super::metadata::InsuranceCoverage;

closed_enum! {
    /// Discriminator for every event a plan can contain
    pub enum EventKind {
        // === Income ===
        Income => "INCOME",
        SocialSecurityIncome => "SOCIAL_SECURITY_INCOME",
        PensionIncome => "PENSION_INCOME",
        AnnuityPayment => "ANNUITY_PAYMENT",
        BusinessIncome => "BUSINESS_INCOME",
        RentalIncome => "RENTAL_INCOME",
        DividendIncome => "DIVIDEND_INCOME",
        RsuVesting => "RSU_VESTING",
        RsuSale => "RSU_SALE",

        // === Expense ===
        RecurringExpense => "RECURRING_EXPENSE",
        OneTimeEvent => "ONE_TIME_EVENT",
        HealthcareCost => "HEALTHCARE_COST",
        PropertyTax => "PROPERTY_TAX",
        LargePurchase => "LARGE_PURCHASE",

        // === Contribution ===
        ScheduledContribution => "SCHEDULED_CONTRIBUTION",
        EmployerMatch => "EMPLOYER_MATCH",
        HsaContribution => "HSA_CONTRIBUTION",

        // === Liability ===
        LiabilityAdd => "LIABILITY_ADD",
        DebtPayment => "DEBT_PAYMENT",
        Refinance => "REFINANCE",

        // === Tax strategy ===
        RothConversion => "ROTH_CONVERSION",
        BackdoorRoth => "BACKDOOR_ROTH",
        MegaBackdoorRoth => "MEGA_BACKDOOR_ROTH",
        TaxLossHarvesting => "TAX_LOSS_HARVESTING",
        TaxGainHarvesting => "TAX_GAIN_HARVESTING",

        // === Insurance ===
        LifeInsurancePremium => "LIFE_INSURANCE_PREMIUM",
        DisabilityInsurancePremium => "DISABILITY_INSURANCE_PREMIUM",
        LongTermCareInsurancePremium => "LONG_TERM_CARE_INSURANCE_PREMIUM",
        HealthInsurancePremium => "HEALTH_INSURANCE_PREMIUM",
        LifeInsurancePayout => "LIFE_INSURANCE_PAYOUT",
        DisabilityInsurancePayout => "DISABILITY_INSURANCE_PAYOUT",
        LongTermCarePayout => "LONG_TERM_CARE_PAYOUT",

        // === Education ===
        FiveTwoNineContribution => "FIVE_TWO_NINE_CONTRIBUTION",
        FiveTwoNineWithdrawal => "FIVE_TWO_NINE_WITHDRAWAL",
        TuitionPayment => "TUITION_PAYMENT",
        EducationExpense => "EDUCATION_EXPENSE",

        // === Estate ===
        Inheritance => "INHERITANCE",
        TrustDistribution => "TRUST_DISTRIBUTION",
        TrustFunding => "TRUST_FUNDING",
        EstateTransfer => "ESTATE_TRANSFER",
        AnnualGift => "ANNUAL_GIFT",
        CharitableDonation => "CHARITABLE_DONATION",
        DonorAdvisedFundContribution => "DONOR_ADVISED_FUND_CONTRIBUTION",

        // === Real estate ===
        RealEstatePurchase => "REAL_ESTATE_PURCHASE",
        RealEstateSale => "REAL_ESTATE_SALE",

        // === Retirement ===
        Withdrawal => "WITHDRAWAL",
        RequiredMinimumDistribution => "REQUIRED_MINIMUM_DISTRIBUTION",
        QualifiedCharitableDistribution => "QUALIFIED_CHARITABLE_DISTRIBUTION",
        SocialSecurityClaim => "SOCIAL_SECURITY_CLAIM",
        MedicareEnrollment => "MEDICARE_ENROLLMENT",

        // === Strategic trade ===
        StrategicTrade => "STRATEGIC_TRADE",
        RebalancePortfolio => "REBALANCE_PORTFOLIO",
        StockOptionExercise => "STOCK_OPTION_EXERCISE",

        // === Planning ===
        GoalDefine => "GOAL_DEFINE",
        FinancialMilestone => "FINANCIAL_MILESTONE",
        EmergencyFundTarget => "EMERGENCY_FUND_TARGET",

        // === Lifecycle transitions ===
        CareerChange => "CAREER_CHANGE",
        Retirement => "RETIREMENT",
        Marriage => "MARRIAGE",
        Divorce => "DIVORCE",
        ChildBirth => "CHILD_BIRTH",
        Relocation => "RELOCATION",
        Sabbatical => "SABBATICAL",

        // === Consolidated (PFOS-E) ===
        CashflowIncome => "CASHFLOW_INCOME",
        CashflowExpense => "CASHFLOW_EXPENSE",
        InsurancePremium => "INSURANCE_PREMIUM",
        InsurancePayout => "INSURANCE_PAYOUT",
        AccountContribution => "ACCOUNT_CONTRIBUTION",
        ExposureChange => "EXPOSURE_CHANGE",
    }
}

/// Broad grouping of event kinds, used for listings and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Income,
    Expense,
    Contribution,
    Liability,
    TaxStrategy,
    Insurance,
    Education,
    Estate,
    RealEstate,
    Retirement,
    StrategicTrade,
    Planning,
    Lifecycle,
    Consolidated,
}

/// How an occurrence moves cash relative to the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashFlowDirection {
    /// Money enters the household (wages, benefits, payouts)
    Inflow,
    /// Money leaves the household (expenses, premiums, gifts)
    Outflow,
    /// Money moves between the household's own accounts
    Transfer,
    /// Structural or informational; no cash moves
    NonCash,
}

impl EventKind {
    #[must_use]
    pub const fn category(self) -> EventCategory {
        use EventCategory as C;
        use EventKind as K;
        match self {
            K::Income
            | K::SocialSecurityIncome
            | K::PensionIncome
            | K::AnnuityPayment
            | K::BusinessIncome
            | K::RentalIncome
            | K::DividendIncome
            | K::RsuVesting
            | K::RsuSale => C::Income,
            K::RecurringExpense
            | K::OneTimeEvent
            | K::HealthcareCost
            | K::PropertyTax
            | K::LargePurchase => C::Expense,
            K::ScheduledContribution | K::EmployerMatch | K::HsaContribution => C::Contribution,
            K::LiabilityAdd | K::DebtPayment | K::Refinance => C::Liability,
            K::RothConversion
            | K::BackdoorRoth
            | K::MegaBackdoorRoth
            | K::TaxLossHarvesting
            | K::TaxGainHarvesting => C::TaxStrategy,
            K::LifeInsurancePremium
            | K::DisabilityInsurancePremium
            | K::LongTermCareInsurancePremium
            | K::HealthInsurancePremium
            | K::LifeInsurancePayout
            | K::DisabilityInsurancePayout
            | K::LongTermCarePayout => C::Insurance,
            K::FiveTwoNineContribution
            | K::FiveTwoNineWithdrawal
            | K::TuitionPayment
            | K::EducationExpense => C::Education,
            K::Inheritance
            | K::TrustDistribution
            | K::TrustFunding
            | K::EstateTransfer
            | K::AnnualGift
            | K::CharitableDonation
            | K::DonorAdvisedFundContribution => C::Estate,
            K::RealEstatePurchase | K::RealEstateSale => C::RealEstate,
            K::Withdrawal
            | K::RequiredMinimumDistribution
            | K::QualifiedCharitableDistribution
            | K::SocialSecurityClaim
            | K::MedicareEnrollment => C::Retirement,
            K::StrategicTrade | K::RebalancePortfolio | K::StockOptionExercise => {
                C::StrategicTrade
            }
            K::GoalDefine | K::FinancialMilestone | K::EmergencyFundTarget => C::Planning,
            K::CareerChange
            | K::Retirement
            | K::Marriage
            | K::Divorce
            | K::ChildBirth
            | K::Relocation
            | K::Sabbatical => C::Lifecycle,
            K::CashflowIncome
            | K::CashflowExpense
            | K::InsurancePremium
            | K::InsurancePayout
            | K::AccountContribution
            | K::ExposureChange => C::Consolidated,
        }
    }

    #[must_use]
    pub const fn flow_direction(self) -> CashFlowDirection {
        use CashFlowDirection as D;
        use EventKind as K;
        match self {
            K::Income
            | K::SocialSecurityIncome
            | K::PensionIncome
            | K::AnnuityPayment
            | K::BusinessIncome
            | K::RentalIncome
            | K::DividendIncome
            | K::RsuVesting
            | K::RsuSale
            | K::LifeInsurancePayout
            | K::DisabilityInsurancePayout
            | K::LongTermCarePayout
            | K::Inheritance
            | K::TrustDistribution
            | K::RealEstateSale
            | K::CashflowIncome
            | K::InsurancePayout => D::Inflow,
            K::RecurringExpense
            | K::OneTimeEvent
            | K::HealthcareCost
            | K::PropertyTax
            | K::LargePurchase
            | K::DebtPayment
            | K::LifeInsurancePremium
            | K::DisabilityInsurancePremium
            | K::LongTermCareInsurancePremium
            | K::HealthInsurancePremium
            | K::TuitionPayment
            | K::EducationExpense
            | K::EstateTransfer
            | K::AnnualGift
            | K::CharitableDonation
            | K::DonorAdvisedFundContribution
            | K::RealEstatePurchase
            | K::QualifiedCharitableDistribution
            | K::CashflowExpense
            | K::InsurancePremium => D::Outflow,
            K::ScheduledContribution
            | K::EmployerMatch
            | K::HsaContribution
            | K::RothConversion
            | K::BackdoorRoth
            | K::MegaBackdoorRoth
            | K::TaxLossHarvesting
            | K::TaxGainHarvesting
            | K::FiveTwoNineContribution
            | K::FiveTwoNineWithdrawal
            | K::TrustFunding
            | K::Withdrawal
            | K::RequiredMinimumDistribution
            | K::StrategicTrade
            | K::RebalancePortfolio
            | K::StockOptionExercise
            | K::AccountContribution
            | K::ExposureChange => D::Transfer,
            K::LiabilityAdd
            | K::Refinance
            | K::SocialSecurityClaim
            | K::MedicareEnrollment
            | K::GoalDefine
            | K::FinancialMilestone
            | K::EmergencyFundTarget
            | K::CareerChange
            | K::Retirement
            | K::Marriage
            | K::Divorce
            | K::ChildBirth
            | K::Relocation
            | K::Sabbatical => D::NonCash,
        }
    }

    /// The consolidated kind a legacy kind normalizes into, if any.
    ///
    /// Consolidated kinds themselves return `None`.
    #[must_use]
    pub const fn consolidated_form(self) -> Option<EventKind> {
        use EventKind as K;
        match self {
            K::Income
            | K::SocialSecurityIncome
            | K::PensionIncome
            | K::AnnuityPayment
            | K::BusinessIncome
            | K::RentalIncome
            | K::DividendIncome => Some(K::CashflowIncome),
            K::RecurringExpense | K::OneTimeEvent | K::HealthcareCost => Some(K::CashflowExpense),
            K::LifeInsurancePremium
            | K::DisabilityInsurancePremium
            | K::LongTermCareInsurancePremium
            | K::HealthInsurancePremium => Some(K::InsurancePremium),
            K::LifeInsurancePayout | K::DisabilityInsurancePayout | K::LongTermCarePayout => {
                Some(K::InsurancePayout)
            }
            K::ScheduledContribution
            | K::EmployerMatch
            | K::HsaContribution
            | K::FiveTwoNineContribution => Some(K::AccountContribution),
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
            | K::ExposureChange => None,
        }
    }

    /// True for the metadata-carrying PFOS-E kinds
    #[must_use]
    pub const fn is_consolidated(self) -> bool {
        matches!(self.category(), EventCategory::Consolidated)
    }

    /// True for kinds that the normalizer rewrites into a consolidated kind
    #[must_use]
    pub const fn is_legacy(self) -> bool {
        self.consolidated_form().is_some()
    }

    /// Coverage implied by an insurance kind
    #[must_use]
    pub const fn insurance_coverage(self) -> Option<InsuranceCoverage> {
        use EventKind as K;
        match self {
            K::LifeInsurancePremium | K::LifeInsurancePayout => Some(InsuranceCoverage::Life),
            K::DisabilityInsurancePremium | K::DisabilityInsurancePayout => {
                Some(InsuranceCoverage::Disability)
            }
            K::LongTermCareInsurancePremium | K::LongTermCarePayout => {
                Some(InsuranceCoverage::LongTermCare)
            }
            K::HealthInsurancePremium => Some(InsuranceCoverage::Health),
            K::Income
            | K::SocialSecurityIncome
            | K::PensionIncome
            | K::AnnuityPayment
            | K::BusinessIncome
            | K::RentalIncome
            | K::DividendIncome
            | K::RsuVesting
            | K::RsuSale
            | K::RecurringExpense
            | K::OneTimeEvent
            | K::HealthcareCost
            | K::PropertyTax
            | K::LargePurchase
            | K::ScheduledContribution
            | K::EmployerMatch
            | K::HsaContribution
            | K::LiabilityAdd
            | K::DebtPayment
            | K::Refinance
            | K::RothConversion
            | K::BackdoorRoth
            | K::MegaBackdoorRoth
            | K::TaxLossHarvesting
            | K::TaxGainHarvesting
            | K::FiveTwoNineContribution
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
            | K::ExposureChange => None,
        }
    }
}
