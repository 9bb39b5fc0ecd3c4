//! Priority table - intra-month execution order
//!
//! Events due in the same month run in phase order:
//!
//! | phase | band | contents |
//! |---|---|---|
//! | 1 | 1-8 | income and cash inflows |
//! | 1.5 | 9-12 | insurance payouts and inheritances |
//! | 2 | 20-39 | fixed obligations: debt service, healthcare, premiums, RMDs |
//! | 3 | 40-59 | discretionary contributions, withdrawals, one-time events |
//! | 4 | 60-79 | strategic trades, conversions, harvesting, rebalancing |
//! | 5 | 80-99 | administrative and structural events |
//!
//! Income posts before obligations are paid from it, discretionary and strategic
//! moves see the post-obligation cash position, and structural events never
//! perturb the month's cash flow. Lower numbers run first.

use std::sync::OnceLock;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::PriorityTableError;
use crate::model::{ConsolidatedEvent, EventKind, Priority};

/// Execution phase of a kind within its month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Income,
    Payouts,
    FixedObligations,
    Discretionary,
    Strategic,
    Administrative,
}

impl Phase {
    pub const ALL: &'static [Phase] = &[
        Phase::Income,
        Phase::Payouts,
        Phase::FixedObligations,
        Phase::Discretionary,
        Phase::Strategic,
        Phase::Administrative,
    ];

    /// Inclusive priority band reserved for the phase
    #[must_use]
    pub const fn band(self) -> (i32, i32) {
        match self {
            Phase::Income => (1, 8),
            Phase::Payouts => (9, 12),
            Phase::FixedObligations => (20, 39),
            Phase::Discretionary => (40, 59),
            Phase::Strategic => (60, 79),
            Phase::Administrative => (80, 99),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Phase::Income => "1",
            Phase::Payouts => "1.5",
            Phase::FixedObligations => "2",
            Phase::Discretionary => "3",
            Phase::Strategic => "4",
            Phase::Administrative => "5",
        }
    }
}

impl EventKind {
    #[must_use]
    pub const fn phase(self) -> Phase {
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
            | K::TrustDistribution
            | K::CashflowIncome => Phase::Income,
            K::LifeInsurancePayout
            | K::Inheritance
            | K::DisabilityInsurancePayout
            | K::LongTermCarePayout
            | K::InsurancePayout => Phase::Payouts,
            K::DebtPayment
            | K::HealthcareCost
            | K::LifeInsurancePremium
            | K::DisabilityInsurancePremium
            | K::LongTermCareInsurancePremium
            | K::HealthInsurancePremium
            | K::InsurancePremium
            | K::PropertyTax
            | K::RecurringExpense
            | K::CashflowExpense
            | K::TuitionPayment
            | K::RequiredMinimumDistribution => Phase::FixedObligations,
            K::ScheduledContribution
            | K::EmployerMatch
            | K::HsaContribution
            | K::FiveTwoNineContribution
            | K::AccountContribution
            | K::Withdrawal
            | K::FiveTwoNineWithdrawal
            | K::QualifiedCharitableDistribution
            | K::OneTimeEvent
            | K::EducationExpense
            | K::CharitableDonation
            | K::DonorAdvisedFundContribution
            | K::AnnualGift
            | K::LargePurchase => Phase::Discretionary,
            K::RothConversion
            | K::BackdoorRoth
            | K::MegaBackdoorRoth
            | K::TaxLossHarvesting
            | K::TaxGainHarvesting
            | K::StrategicTrade
            | K::StockOptionExercise
            | K::ExposureChange
            | K::RebalancePortfolio => Phase::Strategic,
            K::LiabilityAdd
            | K::Refinance
            | K::RealEstatePurchase
            | K::RealEstateSale
            | K::TrustFunding
            | K::EstateTransfer
            | K::GoalDefine
            | K::EmergencyFundTarget
            | K::FinancialMilestone
            | K::SocialSecurityClaim
            | K::MedicareEnrollment
            | K::CareerChange
            | K::Retirement
            | K::Marriage
            | K::Divorce
            | K::ChildBirth
            | K::Relocation
            | K::Sabbatical => Phase::Administrative,
        }
    }

    /// Default intra-month priority of the kind
    #[must_use]
    pub const fn default_priority(self) -> Priority {
        use EventKind as K;
        let p = match self {
            // Phase 1: income
            K::Income | K::CashflowIncome => 1,
            K::SocialSecurityIncome | K::PensionIncome => 2,
            K::AnnuityPayment | K::BusinessIncome => 3,
            K::RentalIncome => 4,
            K::DividendIncome => 5,
            K::RsuVesting => 6,
            K::RsuSale => 7,
            K::TrustDistribution => 8,

            // Phase 1.5: payouts
            K::LifeInsurancePayout | K::Inheritance => 9,
            K::DisabilityInsurancePayout | K::LongTermCarePayout | K::InsurancePayout => 10,

            // Phase 2: fixed obligations
            K::DebtPayment => 20,
            K::HealthcareCost => 22,
            K::LifeInsurancePremium
            | K::DisabilityInsurancePremium
            | K::LongTermCareInsurancePremium
            | K::HealthInsurancePremium
            | K::InsurancePremium => 24,
            K::PropertyTax => 26,
            K::RecurringExpense | K::CashflowExpense => 28,
            K::TuitionPayment => 30,
            K::RequiredMinimumDistribution => 32,

            // Phase 3: discretionary
            K::ScheduledContribution | K::EmployerMatch | K::AccountContribution => 40,
            K::HsaContribution => 41,
            K::FiveTwoNineContribution => 42,
            K::Withdrawal => 45,
            K::FiveTwoNineWithdrawal => 46,
            K::QualifiedCharitableDistribution => 47,
            K::OneTimeEvent => 48,
            K::EducationExpense => 49,
            K::CharitableDonation | K::DonorAdvisedFundContribution => 50,
            K::AnnualGift => 51,
            K::LargePurchase => 52,

            // Phase 4: strategic
            K::RothConversion => 60,
            K::BackdoorRoth | K::MegaBackdoorRoth => 61,
            K::TaxLossHarvesting | K::TaxGainHarvesting => 64,
            K::StrategicTrade | K::StockOptionExercise | K::ExposureChange => 66,
            K::RebalancePortfolio => 68,

            // Phase 5: administrative
            K::LiabilityAdd => 80,
            K::Refinance => 81,
            K::RealEstatePurchase | K::RealEstateSale => 82,
            K::TrustFunding | K::EstateTransfer => 84,
            K::GoalDefine | K::EmergencyFundTarget => 90,
            K::FinancialMilestone => 92,
            K::SocialSecurityClaim | K::MedicareEnrollment => 93,
            K::CareerChange | K::Retirement => 94,
            K::Marriage | K::Divorce | K::ChildBirth => 95,
            K::Relocation | K::Sabbatical => 96,
        };
        Priority(p)
    }
}

/// Priority an event runs at: its explicit override, else the table default for
/// the kind as authored. Normalization therefore never moves an event between phases.
#[must_use]
pub fn effective_priority(event: &ConsolidatedEvent) -> Priority {
    event
        .core
        .priority
        .unwrap_or_else(|| event.authored_kind().default_priority())
}

/// Check the table against the registry: every kind listed once, named by a
/// round-tripping wire spelling, with a default inside its phase band.
pub fn verify_priority_table() -> Result<(), PriorityTableError> {
    let mut seen = FxHashSet::default();
    for &kind in EventKind::ALL {
        if !seen.insert(kind) {
            return Err(PriorityTableError::DuplicateKind(kind));
        }
        if kind.as_str().parse::<EventKind>() != Ok(kind) {
            return Err(PriorityTableError::Unregistered(kind));
        }
        let priority = kind.default_priority();
        let (min, max) = kind.phase().band();
        if priority.0 < min || priority.0 > max {
            return Err(PriorityTableError::OutOfPhase {
                kind,
                priority,
                min,
                max,
            });
        }
    }
    Ok(())
}

/// [`verify_priority_table`], run at most once per process
pub fn ensure_priority_table() -> Result<(), PriorityTableError> {
    static CHECKED: OnceLock<Result<(), PriorityTableError>> = OnceLock::new();
    CHECKED
        .get_or_init(|| {
            let result = verify_priority_table();
            if let Err(e) = &result {
                tracing::error!(error = %e, "priority table self-check failed");
            }
            result
        })
        .clone()
}
