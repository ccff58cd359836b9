//! Coarse human-readable durations for "time left" labels.

use crate::units::{
    SECONDS_IN_DAY, SECONDS_IN_HOUR, SECONDS_IN_MINUTE, SECONDS_IN_MONTH, SECONDS_IN_YEAR,
};

/// Upper bound on a reported time left: a thousand (336-day) years.
pub const MAX_SECONDS: u64 = SECONDS_IN_YEAR * 1000;

/// A duration split into the fixed-length units used for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationParts {
    pub years: u64,
    pub months: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl DurationParts {
    /// Split whole seconds greedily, largest unit first.
    pub fn from_seconds(total: u64) -> Self {
        let mut rest = total;
        let mut take = |unit: u64| {
            let n = rest / unit;
            rest %= unit;
            n
        };
        let years = take(SECONDS_IN_YEAR);
        let months = take(SECONDS_IN_MONTH);
        let days = take(SECONDS_IN_DAY);
        let hours = take(SECONDS_IN_HOUR);
        let minutes = take(SECONDS_IN_MINUTE);
        DurationParts {
            years,
            months,
            days,
            hours,
            minutes,
            seconds: rest,
        }
    }

    fn has_day_or_longer(&self) -> bool {
        self.years > 0 || self.months > 0 || self.days > 0
    }
}

/// Format a millisecond duration as e.g. `"2 months 3d 4h 5m"` or `"12m 30s"`.
///
/// Seconds are dropped as soon as the duration spans at least a day. A zero
/// duration formats as an empty string.
pub fn format_time_left(millis: u64) -> String {
    let mut parts = DurationParts::from_seconds(millis / 1_000);
    if parts.has_day_or_longer() {
        parts.seconds = 0;
    }

    let mut out: Vec<String> = Vec::new();
    if parts.years > 0 {
        out.push(plural(parts.years, "year"));
    }
    if parts.months > 0 {
        out.push(plural(parts.months, "month"));
    }
    if parts.days > 0 {
        out.push(format!("{}d", parts.days));
    }
    if parts.hours > 0 {
        out.push(format!("{}h", parts.hours));
    }
    if parts.minutes > 0 {
        out.push(format!("{}m", parts.minutes));
    }
    if parts.seconds > 0 {
        out.push(format!("{}s", parts.seconds));
    }
    out.join(" ")
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
