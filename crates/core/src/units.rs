//! Time unit conversions.
//!
//! Chain timestamps are nanoseconds since the epoch; local timestamps are
//! milliseconds. Every crossing between the two goes through this module.

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer};

pub const NANOS_PER_MILLI: u64 = 1_000_000;
pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
pub const MILLIS_PER_SECOND: i64 = 1_000;

pub const SECONDS_IN_MINUTE: u64 = 60;
pub const SECONDS_IN_HOUR: u64 = SECONDS_IN_MINUTE * 60;
pub const SECONDS_IN_DAY: u64 = SECONDS_IN_HOUR * 24;
pub const SECONDS_IN_WEEK: u64 = SECONDS_IN_DAY * 7;
/// Fixed four-week month; not calendar accurate.
pub const SECONDS_IN_MONTH: u64 = SECONDS_IN_WEEK * 4;
pub const SECONDS_IN_YEAR: u64 = SECONDS_IN_MONTH * 12;

/// Nanosecond chain timestamp to whole milliseconds (truncating).
pub fn nanos_to_millis(nanos: u64) -> u64 {
    nanos / NANOS_PER_MILLI
}

/// Nanosecond chain timestamp to exact fractional milliseconds.
pub fn nanos_to_millis_exact(nanos: u64) -> BigDecimal {
    BigDecimal::from(nanos) / BigDecimal::from(NANOS_PER_MILLI)
}

/// Nanosecond chain timestamp to exact fractional seconds.
pub fn nanos_to_seconds(nanos: u64) -> BigDecimal {
    BigDecimal::from(nanos) / BigDecimal::from(NANOS_PER_SECOND)
}

/// Local millisecond timestamp to whole seconds, rounding toward negative
/// infinity.
pub fn millis_to_whole_seconds(millis: i64) -> i64 {
    millis.div_euclid(MILLIS_PER_SECOND)
}

/// Compare a local millisecond timestamp against a chain nanosecond
/// timestamp without losing precision on either side.
pub fn millis_at_or_after_nanos(millis: i64, nanos: u64) -> bool {
    i128::from(millis) * i128::from(NANOS_PER_MILLI) >= i128::from(nanos)
}

/// Current wall-clock time in milliseconds since the epoch.
pub fn now_millis() -> i64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos / i128::from(NANOS_PER_MILLI)) as i64
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Int(u64),
    Text(String),
}

fn parse_timestamp<E: de::Error>(raw: RawTimestamp) -> Result<u64, E> {
    match raw {
        RawTimestamp::Int(n) => Ok(n),
        RawTimestamp::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| E::custom(format!("invalid nanosecond timestamp '{}'", s))),
    }
}

/// Deserialize a nanosecond timestamp given as a JSON integer or string.
pub(crate) fn deserialize_nanos<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    parse_timestamp(RawTimestamp::deserialize(deserializer)?)
}

/// Optional variant of [`deserialize_nanos`]; `null` and a missing field
/// both mean "absent".
pub(crate) fn deserialize_optional_nanos<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(raw).map(Some),
        None => Ok(None),
    }
}
