//! Helpers for filling in a create-stream form.

use bigdecimal::{BigDecimal, Zero};
use time::{Date, Month};

use crate::units::{SECONDS_IN_DAY, SECONDS_IN_HOUR, SECONDS_IN_MINUTE};

/// Streaming rate that spends `deposit` over `duration_secs`, rounded down
/// to a whole smallest unit. A zero duration yields a zero rate.
pub fn tokens_per_second(deposit: &BigDecimal, duration_secs: u64) -> BigDecimal {
    if duration_secs == 0 {
        return BigDecimal::zero();
    }
    (deposit / BigDecimal::from(duration_secs)).with_scale(0)
}

/// Length in seconds of a period given as calendar months plus fixed days,
/// hours and minutes, starting on `from`.
///
/// Months are calendar months, so their length depends on `from`. Returns
/// `None` if the period runs past the supported date range or does not
/// fit in `u64` seconds.
pub fn duration_in_seconds(
    from: Date,
    months: u32,
    days: u64,
    hours: u64,
    minutes: u64,
) -> Option<u64> {
    let days_in_months = (add_months(from, months)? - from).whole_days();
    let total_days = u64::try_from(days_in_months).ok()?.checked_add(days)?;
    total_days
        .checked_mul(SECONDS_IN_DAY)?
        .checked_add(hours.checked_mul(SECONDS_IN_HOUR)?)?
        .checked_add(minutes.checked_mul(SECONDS_IN_MINUTE)?)
}

/// Add calendar months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
fn add_months(date: Date, months: u32) -> Option<Date> {
    let month_index = i64::from(u8::from(date.month())) - 1 + i64::from(months);
    let year = i32::try_from(i64::from(date.year()) + month_index.div_euclid(12)).ok()?;
    let month = Month::try_from((month_index.rem_euclid(12) + 1) as u8).ok()?;
    let day = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}
