//! Calendar-month arithmetic for mapping month offsets onto civil dates.
//!
//! Schedules are computed in whole months since the plan start. The helpers
//! here do direct year/month arithmetic instead of going through jiff's `Span`
//! machinery, which keeps the per-event cost of dating an occurrence O(1).

use jiff::civil::Date;

#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Days in `month` of `year` without constructing a `jiff::civil::Date`.
#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

/// Shift a date by `months` calendar months, clamping the day to the end of
/// the target month (Jan 31 + 1 month = Feb 28/29).
///
/// Returns `None` when the result leaves jiff's supported year range.
#[inline]
pub fn add_months(d: Date, months: i64) -> Option<Date> {
    let total = i64::from(d.year()) * 12 + i64::from(d.month() - 1) + months;
    let year = i16::try_from(total.div_euclid(12)).ok()?;
    let month = (total.rem_euclid(12) + 1) as i8;
    let day = d.day().min(days_in_month(year, month));
    Date::new(year, month, day).ok()
}

/// Civil date of month `offset` of a plan starting on `start`
#[inline]
pub fn month_offset_to_date(start: Date, offset: u32) -> Option<Date> {
    add_months(start, i64::from(offset))
}

/// Whole calendar months from `from` to `to`, ignoring the day of month.
///
/// Positive when `to` is later.
#[inline]
pub fn months_between(from: Date, to: Date) -> i32 {
    let years = i32::from(to.year()) - i32::from(from.year());
    let months = i32::from(to.month()) - i32::from(from.month());
    years * 12 + months
}
