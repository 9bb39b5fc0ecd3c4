//! Event Builder DSL
//!
//! Provides a fluent API for authoring events without writing JSON.
//!
//! # Examples
//!
//! ```ignore
//! use pfos_core::config::EventBuilder;
//!
//! // Monthly salary, growing 3% a year
//! let salary = EventBuilder::income("Salary")
//!     .amount(8_000.0)
//!     .monthly()
//!     .starting(0)
//!     .growth(0.03);
//!
//! // Roth contributions for ten years
//! let roth = EventBuilder::contribution("Roth IRA")
//!     .to_account(AccountType::Roth)
//!     .amount(500.0)
//!     .between(0, 119);
//! ```

use serde_json::Value;

use crate::model::{AccountType, EventKind, Frequency, Metadata, RawEvent};

/// Id derived from a display name: lowercase, non-alphanumerics as `_`
pub(crate) fn slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Builder for a single authored event
#[derive(Debug, Clone)]
pub struct EventBuilder {
    pub(crate) raw: RawEvent,
}

impl EventBuilder {
    // =========================================================================
    // Event Kind Constructors
    // =========================================================================

    /// Event of any registered kind. Anchored at month 0 until told otherwise.
    pub fn new(kind: EventKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            raw: RawEvent {
                id: slug(&name),
                kind: kind.as_str().to_string(),
                name: Some(name),
                month_offset: Some(0),
                ..RawEvent::default()
            },
        }
    }

    /// Event with a kind spelled as authored; validation decides if it exists
    pub fn spelled(kind: impl Into<String>, name: impl Into<String>) -> Self {
        let mut builder = Self::new(EventKind::OneTimeEvent, name);
        builder.raw.kind = kind.into();
        builder
    }

    /// Employment income (`INCOME`)
    pub fn income(name: impl Into<String>) -> Self {
        Self::new(EventKind::Income, name)
    }

    /// Fixed recurring expense (`RECURRING_EXPENSE`)
    pub fn expense(name: impl Into<String>) -> Self {
        Self::new(EventKind::RecurringExpense, name)
    }

    /// Unplanned one-off cost (`ONE_TIME_EVENT`)
    pub fn shock(name: impl Into<String>) -> Self {
        Self::new(EventKind::OneTimeEvent, name).once()
    }

    /// Scheduled contribution into an account (`SCHEDULED_CONTRIBUTION`)
    pub fn contribution(name: impl Into<String>) -> Self {
        Self::new(EventKind::ScheduledContribution, name)
    }

    pub fn withdrawal(name: impl Into<String>) -> Self {
        Self::new(EventKind::Withdrawal, name)
    }

    pub fn debt_payment(name: impl Into<String>) -> Self {
        Self::new(EventKind::DebtPayment, name)
    }

    // =========================================================================
    // Identity
    // =========================================================================

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.raw.id = id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.raw.description = Some(description.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.raw.tags.push(tag.into());
        self
    }

    // =========================================================================
    // Amount
    // =========================================================================

    pub fn amount(mut self, amount: f64) -> Self {
        self.raw.amount = Some(amount);
        self
    }

    /// Annual growth rate, compounded monthly from the start of the window
    pub fn growth(mut self, rate: f64) -> Self {
        self.raw.annual_growth_rate = Some(rate);
        self
    }

    // =========================================================================
    // Timing
    // =========================================================================

    pub fn monthly(mut self) -> Self {
        self.raw.frequency = Some(Frequency::Monthly.as_str().to_string());
        self
    }

    pub fn annually(mut self) -> Self {
        self.raw.frequency = Some(Frequency::Annually.as_str().to_string());
        self
    }

    pub fn once(mut self) -> Self {
        self.raw.frequency = Some(Frequency::OneTime.as_str().to_string());
        self
    }

    /// Single occurrence in `month`
    pub fn at(mut self, month: u32) -> Self {
        self.raw.month_offset = Some(month);
        self.once()
    }

    /// First month of the window
    pub fn starting(mut self, month: u32) -> Self {
        self.raw.month_offset = Some(month);
        self.raw.start_date_offset = Some(month);
        self
    }

    /// Last month of the window, inclusive
    pub fn until(mut self, month: u32) -> Self {
        self.raw.end_date_offset = Some(month);
        self
    }

    /// Inclusive window `[start, end]`
    pub fn between(self, start: u32, end: u32) -> Self {
        self.starting(start).until(end)
    }

    /// Override the priority table default
    pub fn priority(mut self, priority: i32) -> Self {
        self.raw.priority = Some(priority);
        self
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub fn account(mut self, account: AccountType) -> Self {
        self.raw.account_type = Some(account.as_str().to_string());
        self
    }

    pub fn from_account(mut self, account: AccountType) -> Self {
        self.raw.source_account_type = Some(account.as_str().to_string());
        self
    }

    pub fn to_account(mut self, account: AccountType) -> Self {
        self.raw.target_account_type = Some(account.as_str().to_string());
        self
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Set a metadata entry (PFOS-E field or free-form attribute)
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.raw.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.raw.metadata.extend(metadata);
        self
    }

    /// The authored record this builder describes
    #[must_use]
    pub fn into_raw(self) -> RawEvent {
        self.raw
    }
}

impl From<EventBuilder> for RawEvent {
    fn from(builder: EventBuilder) -> Self {
        builder.into_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Salary"), "salary");
        assert_eq!(slug(" Car Loan #2 "), "car_loan__2");
    }

    #[test]
    fn test_window_helpers() {
        let raw = EventBuilder::expense("Rent").amount(2_000.0).between(6, 12).into_raw();
        assert_eq!(raw.kind, "RECURRING_EXPENSE");
        assert_eq!(raw.month_offset, Some(6));
        assert_eq!(raw.start_date_offset, Some(6));
        assert_eq!(raw.end_date_offset, Some(12));

        let raw = EventBuilder::shock("Roof").at(30).into_raw();
        assert_eq!(raw.month_offset, Some(30));
        assert_eq!(raw.frequency.as_deref(), Some("one-time"));
    }

    #[test]
    fn test_accounts_use_wire_names() {
        let raw = EventBuilder::contribution("529 plan")
            .to_account(AccountType::FiveTwoNine)
            .into_raw();
        assert_eq!(raw.id, "529_plan");
        assert_eq!(raw.target_account_type.as_deref(), Some("529"));
    }
}
