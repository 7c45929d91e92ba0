//! # Lenient Numeric Parsing
//!
//! Quote data is typed in by hand, so numeric fields arrive as numbers,
//! numeric strings, half-typed strings (`"12."`, `"3 ft"`), empty strings or
//! `null`. Every numeric field in the data model goes through this module so
//! the fallback policy lives in one place:
//!
//! - a finite number is used as-is
//! - a string contributes its leading numeric prefix (`"12.5 sqft"` → 12.5)
//! - anything else (garbage text, booleans, NaN, infinities) becomes 0
//! - an absent or `null` field takes the field's declared default
//!
//! ## Example
//!
//! ```rust
//! use quote_core::numeric::parse_number_or_zero;
//!
//! assert_eq!(parse_number_or_zero("42"), 42.0);
//! assert_eq!(parse_number_or_zero(" 7.5 rft"), 7.5);
//! assert_eq!(parse_number_or_zero("n/a"), 0.0);
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use crate::lenient::ObjectOrNone;

/// Parse a user-entered string into a number, falling back to 0.
///
/// Leading whitespace is skipped and the longest numeric prefix is used,
/// so `"10x"` parses as 10. Non-finite results are treated as 0.
pub fn parse_number_or_zero(input: &str) -> f64 {
    parse_number(input).unwrap_or(0.0)
}

/// Parse the leading number of a string, or `None` if there is none.
///
/// Same prefix rules as [`parse_number_or_zero`], for callers that need to
/// skip unparsable entries rather than treat them as 0.
pub fn parse_number(input: &str) -> Option<f64> {
    numeric_prefix(input.trim_start())
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Replace NaN and infinities with 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Longest prefix of `s` matching `[+-]?digits[.digits][(e|E)[+-]?digits]`.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    Some(&s[..end])
}

/// Visitor producing `Some(value)` for anything present and `None` for null.
struct LenientVisitor;

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = Option<f64>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(finite_or_zero(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(parse_number_or_zero(v)))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(Some(0.0))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientVisitor)
    }

    // Arrays and objects are nonsense for a numeric field; swallow them as 0.
    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(Some(0.0))
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(Some(0.0))
    }
}

/// `deserialize_with` helper: lenient number, `null` becomes 0.
///
/// Pair with `#[serde(default)]` so a missing field is 0 as well.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer.deserialize_any(LenientVisitor)?.unwrap_or(0.0))
}

/// `deserialize_with` helper for quantities: lenient number, `null` becomes 1.
///
/// Pair with `#[serde(default = "default_quantity")]`.
pub fn lenient_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserializer
        .deserialize_any(LenientVisitor)?
        .unwrap_or_else(default_quantity))
}

/// A number read leniently, for use inside collections.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LenientNumber(pub f64);

impl<'de> Deserialize<'de> for LenientNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient_f64(deserializer).map(LenientNumber)
    }
}

/// `deserialize_with` helper for name → price maps with lenient values.
pub fn lenient_price_map<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let ObjectOrNone(raw) = ObjectOrNone::<IndexMap<String, LenientNumber>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(name, LenientNumber(price))| (name, price))
        .collect())
}

/// Quantity used when none was entered.
pub fn default_quantity() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "lenient_f64")]
        value: f64,
        #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
        quantity: f64,
    }

    fn fields(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_number_or_zero("42"), 42.0);
        assert_eq!(parse_number_or_zero("-3.25"), -3.25);
        assert_eq!(parse_number_or_zero(".5"), 0.5);
        assert_eq!(parse_number_or_zero("1e3"), 1000.0);
    }

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_number_or_zero("12.5 sqft"), 12.5);
        assert_eq!(parse_number_or_zero("  8ft"), 8.0);
        assert_eq!(parse_number_or_zero("12."), 12.0);
        assert_eq!(parse_number_or_zero("2e"), 2.0);
        assert_eq!(parse_number_or_zero("2e+"), 2.0);
    }

    #[test]
    fn test_parse_number_distinguishes_missing() {
        assert_eq!(parse_number("500"), Some(500.0));
        assert_eq!(parse_number(" 1:2"), Some(1.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("free"), None);
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(parse_number_or_zero(""), 0.0);
        assert_eq!(parse_number_or_zero("abc"), 0.0);
        assert_eq!(parse_number_or_zero("-"), 0.0);
        assert_eq!(parse_number_or_zero("."), 0.0);
        assert_eq!(parse_number_or_zero("NaN"), 0.0);
        assert_eq!(parse_number_or_zero("1e999"), 0.0);
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let p = fields(r#"{"value": 7, "quantity": "3"}"#);
        assert_eq!(p.value, 7.0);
        assert_eq!(p.quantity, 3.0);

        let p = fields(r#"{"value": "oops", "quantity": ""}"#);
        assert_eq!(p.value, 0.0);
        assert_eq!(p.quantity, 0.0);
    }

    #[test]
    fn test_absent_and_null_take_defaults() {
        let p = fields("{}");
        assert_eq!(p.value, 0.0);
        assert_eq!(p.quantity, 1.0);

        let p = fields(r#"{"value": null, "quantity": null}"#);
        assert_eq!(p.value, 0.0);
        assert_eq!(p.quantity, 1.0);
    }

    #[test]
    fn test_lenient_price_map() {
        #[derive(Deserialize)]
        struct Prices {
            #[serde(default, deserialize_with = "lenient_price_map")]
            prices: IndexMap<String, f64>,
        }

        let p: Prices = serde_json::from_str(r#"{"prices": {"Veneer": "500", "PU": 800, "Odd": "x"}}"#).unwrap();
        assert_eq!(p.prices["Veneer"], 500.0);
        assert_eq!(p.prices["PU"], 800.0);
        assert_eq!(p.prices["Odd"], 0.0);

        let p: Prices = serde_json::from_str(r#"{"prices": null}"#).unwrap();
        assert!(p.prices.is_empty());

        let p: Prices = serde_json::from_str(r#"{"prices": "Veneer:500"}"#).unwrap();
        assert!(p.prices.is_empty());
    }

    #[test]
    fn test_non_numeric_json_is_zero() {
        let p = fields(r#"{"value": true, "quantity": [1, 2]}"#);
        assert_eq!(p.value, 0.0);
        assert_eq!(p.quantity, 0.0);

        let p = fields(r#"{"value": {"nested": 1}}"#);
        assert_eq!(p.value, 0.0);
    }
}
