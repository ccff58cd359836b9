//! Token amounts and their wire encoding.
//!
//! NEAR contracts return `U128` balances as decimal strings. Amounts are
//! held as `BigDecimal` so that 24-decimal tokens stay exact through every
//! multiplication and division in the calculator; `f64` only appears once
//! a value has been turned into a percentage.

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use serde::{de, Deserialize, Deserializer, Serializer};

use crate::error::SnapshotError;

/// Parse a smallest-unit token amount (e.g. yoctoNEAR) from its decimal
/// string form.
///
/// Rejects negative and fractional values: on-chain balances are unsigned
/// integers, so either would mean the data is corrupt.
pub fn parse_amount(field: &str, raw: &str) -> Result<BigDecimal, SnapshotError> {
    let invalid = || SnapshotError::InvalidAmount {
        field: field.to_string(),
        value: raw.to_string(),
    };
    let value = BigDecimal::from_str(raw.trim()).map_err(|_| invalid())?;
    check_unsigned_integer(&value).map_err(|_| invalid())?;
    Ok(value)
}

/// Render an amount without exponent notation or trailing zeros.
pub fn format_amount(value: &BigDecimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    value.normalized().to_plain_string()
}

fn check_unsigned_integer(value: &BigDecimal) -> Result<(), String> {
    if *value < BigDecimal::zero() {
        return Err(format!("amount {} is negative", value));
    }
    if !value.is_integer() {
        return Err(format!("amount {} is not a whole number of units", value));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Deserialize a non-negative integer amount from a JSON string or integer.
///
/// JSON integers are only exact up to `u64::MAX`; anything larger must come
/// as a string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match RawAmount::deserialize(deserializer)? {
        RawAmount::Text(s) => BigDecimal::from_str(s.trim())
            .map_err(|_| de::Error::custom(format!("invalid amount '{}'", s)))?,
        RawAmount::Unsigned(n) => BigDecimal::from(n),
        RawAmount::Signed(n) => BigDecimal::from(n),
        RawAmount::Float(f) if f.fract() == 0.0 && f >= u64::MAX as f64 => {
            return Err(de::Error::custom(format!(
                "amount {} is too large for a JSON number; send it as a decimal string",
                f
            )))
        }
        RawAmount::Float(f) => {
            return Err(de::Error::custom(format!(
                "amount {} is not a whole number of units",
                f
            )))
        }
    };
    check_unsigned_integer(&value).map_err(de::Error::custom)?;
    Ok(value)
}

/// Serialize an amount as a plain decimal string.
pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_amount(value))
}
