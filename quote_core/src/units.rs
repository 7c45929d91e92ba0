//! # Units of Measure
//!
//! Every priced quantity in a quote is billed per one of three bases:
//!
//! - **Area** (`SFT`): length × height, priced per square unit
//! - **Length** (`RFT`): running length, priced per linear unit
//! - **Count** (`NOS`): discrete pieces
//!
//! The same multiplier is applied to the base rate, the material addition and
//! every add-on, so it lives here rather than in the calculator.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::units::UnitOfMeasure;
//!
//! let uom = UnitOfMeasure::from_code("RFT");
//! assert_eq!(uom, UnitOfMeasure::Length);
//! assert_eq!(uom.multiplier(10.0, 4.0, 3.0), 30.0); // height ignored
//!
//! // Anything unrecognized is priced per piece
//! assert_eq!(UnitOfMeasure::from_code("boxes"), UnitOfMeasure::Count);
//! ```

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// Pricing basis of a line item or rate-card entry.
///
/// Serializes as the short code used in stored quotes (`"SFT"`, `"RFT"`,
/// `"NOS"`). Deserialization accepts those codes, the long names (`"AREA"`,
/// `"LENGTH"`, `"COUNT"`) in any case, and resolves anything else, including
/// `null` and non-strings, to [`UnitOfMeasure::Count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitOfMeasure {
    /// Square feet: length × height
    Area,
    /// Running feet: length only
    Length,
    /// Numbers: per piece
    #[default]
    Count,
}

impl UnitOfMeasure {
    /// All units in display order
    pub const ALL: [UnitOfMeasure; 3] = [
        UnitOfMeasure::Area,
        UnitOfMeasure::Length,
        UnitOfMeasure::Count,
    ];

    /// Short code stored in quotes and rate cards
    pub fn code(&self) -> &'static str {
        match self {
            UnitOfMeasure::Area => "SFT",
            UnitOfMeasure::Length => "RFT",
            UnitOfMeasure::Count => "NOS",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            UnitOfMeasure::Area => "Square feet",
            UnitOfMeasure::Length => "Running feet",
            UnitOfMeasure::Count => "Numbers",
        }
    }

    /// Resolve a stored code, falling back to `Count` for anything unknown.
    pub fn from_code(code: &str) -> Self {
        Self::parse_strict(code).unwrap_or(UnitOfMeasure::Count)
    }

    /// Resolve a code, returning `None` when it is not recognized.
    ///
    /// Used by boundary code (CLI arguments, rate-card filters) that wants to
    /// reject typos instead of silently pricing per piece.
    pub fn parse_strict(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "SFT" | "AREA" | "SQFT" => Some(UnitOfMeasure::Area),
            "RFT" | "LENGTH" => Some(UnitOfMeasure::Length),
            "NOS" | "COUNT" => Some(UnitOfMeasure::Count),
            _ => None,
        }
    }

    /// Whether `length` contributes to the price
    pub fn uses_length(&self) -> bool {
        matches!(self, UnitOfMeasure::Area | UnitOfMeasure::Length)
    }

    /// Whether `height` contributes to the price
    pub fn uses_height(&self) -> bool {
        matches!(self, UnitOfMeasure::Area)
    }

    /// Billable units for the given dimensions.
    ///
    /// Any per-unit price (base rate, material addition, add-on rate) is
    /// multiplied by this value.
    pub fn multiplier(&self, length: f64, height: f64, quantity: f64) -> f64 {
        match self {
            UnitOfMeasure::Area => length * height * quantity,
            UnitOfMeasure::Length => length * quantity,
            UnitOfMeasure::Count => quantity,
        }
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for UnitOfMeasure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

struct UnitVisitor;

impl<'de> Visitor<'de> for UnitVisitor {
    type Value = UnitOfMeasure;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a unit of measure code")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(UnitOfMeasure::from_code(v))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(UnitOfMeasure::Count)
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Ok(UnitOfMeasure::Count)
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Ok(UnitOfMeasure::Count)
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Ok(UnitOfMeasure::Count)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(UnitOfMeasure::Count)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(UnitOfMeasure::Count)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(UnitVisitor)
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(UnitOfMeasure::Count)
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {}
        Ok(UnitOfMeasure::Count)
    }
}

impl<'de> Deserialize<'de> for UnitOfMeasure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(UnitVisitor)
    }
}
