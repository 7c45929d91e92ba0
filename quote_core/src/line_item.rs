//! # Line Items
//!
//! A line item is one priced row of work inside a room: a name, a unit of
//! measure, dimensions, a base rate, and optionally a material choice and a
//! menu of add-ons.
//!
//! ## Structure
//!
//! ```text
//! LineItem
//! ├── id, room, item, category
//! ├── unit_of_measure, length, height, quantity, rate
//! ├── material: Option<MaterialSelection> (options, selected, base, price additions)
//! ├── add_ons: AddOns (Structured map | Legacy string)
//! └── amount (cache of the last computation)
//! ```
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "room": "Master Bedroom",
//!   "item": "Wardrobe",
//!   "uom": "SFT",
//!   "length": 8,
//!   "height": 7,
//!   "quantity": 1,
//!   "rate": 1500,
//!   "material": {
//!     "options": ["Laminate", "Veneer", "PU"],
//!     "selected": "Veneer",
//!     "base_material": "Laminate",
//!     "price_additions": { "Laminate": 0, "Veneer": 500, "PU": 800 }
//!   },
//!   "add_ons": {
//!     "Lights": { "selected": true, "rate_per_unit": 250, "description": "LED strip lighting" }
//!   }
//! }
//! ```
//!
//! Numeric fields are read leniently (see [`crate::numeric`]) and `add_ons`
//! may also be the legacy comma-separated string form.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator;
use crate::catalog::AddOnKind;
use crate::errors::{QuoteError, QuoteResult};
use crate::lenient::{lenient_bool, lenient_id, lenient_name_list, lenient_object, lenient_opt_string, lenient_string, ObjectOrNone};
use crate::numeric::{default_quantity, lenient_f64, lenient_price_map, lenient_quantity};
use crate::units::UnitOfMeasure;

/// One billable unit of work within a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Stable identity within a project
    #[serde(default = "Uuid::new_v4", deserialize_with = "lenient_id")]
    pub id: Uuid,

    /// Name of the owning room
    #[serde(default, deserialize_with = "lenient_string")]
    pub room: String,

    /// Display name of the work or product
    #[serde(default, deserialize_with = "lenient_string")]
    pub item: String,

    /// Rate-card category this item was created from (empty for blank items)
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,

    /// Pricing basis
    #[serde(rename = "uom", alias = "unit_of_measure", alias = "unitOfMeasure", default)]
    pub unit_of_measure: UnitOfMeasure,

    /// Length (used by Area and Length items)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub length: f64,

    /// Height (used by Area items only)
    #[serde(default, deserialize_with = "lenient_f64")]
    pub height: f64,

    /// Multiplier applied regardless of unit of measure
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: f64,

    /// Base price per unit of measure
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,

    /// Material choice, if the item offers one
    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialSelection>,

    /// Optional extras layered onto the item
    #[serde(default, alias = "addOns")]
    pub add_ons: AddOns,

    /// Last computed amount. Never trusted as input; see [`LineItem::recompute`].
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
}

impl LineItem {
    /// Create a blank line item with quantity 1 and no dimensions.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quote_core::line_item::LineItem;
    /// use quote_core::units::UnitOfMeasure;
    ///
    /// let item = LineItem::new("Living Room", "Sofa", UnitOfMeasure::Count, 45000.0)
    ///     .with_quantity(2.0);
    /// assert_eq!(item.amount, 90000.0);
    /// ```
    pub fn new(room: impl Into<String>, item: impl Into<String>, unit_of_measure: UnitOfMeasure, rate: f64) -> Self {
        let mut line = LineItem {
            id: Uuid::new_v4(),
            room: room.into(),
            item: item.into(),
            category: String::new(),
            unit_of_measure,
            length: 0.0,
            height: 0.0,
            quantity: default_quantity(),
            rate,
            material: None,
            add_ons: AddOns::default(),
            amount: 0.0,
        };
        line.recompute();
        line
    }

    /// Set length and height (builder style). Recomputes the amount.
    pub fn with_dimensions(mut self, length: f64, height: f64) -> Self {
        self.length = length;
        self.height = height;
        self.recompute();
        self
    }

    /// Set the quantity (builder style). Recomputes the amount.
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self.recompute();
        self
    }

    /// Attach a material selection (builder style). Recomputes the amount.
    pub fn with_material(mut self, material: MaterialSelection) -> Self {
        self.material = Some(material);
        self.recompute();
        self
    }

    /// Add a structured add-on (builder style). Recomputes the amount.
    pub fn with_add_on(mut self, name: impl Into<String>, add_on: AddOnSelection) -> Self {
        self.migrate_legacy_add_ons();
        if let AddOns::Structured(map) = &mut self.add_ons {
            map.insert(name.into(), add_on);
        }
        self.recompute();
        self
    }

    /// Recompute and cache `amount` from the other fields.
    pub fn recompute(&mut self) -> f64 {
        self.amount = calculator::compute_line_item_amount(self);
        self.amount
    }

    /// Select a material by name. Recomputes the amount.
    ///
    /// The name must be one of the item's material options.
    pub fn select_material(&mut self, name: &str) -> QuoteResult<()> {
        let material = self
            .material
            .as_mut()
            .ok_or_else(|| QuoteError::invalid_input("material", name, "Item has no material options"))?;

        let option = material
            .options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(name.trim()))
            .cloned()
            .ok_or_else(|| {
                QuoteError::invalid_input(
                    "material",
                    name,
                    format!("Not one of: {}", material.options.join(", ")),
                )
            })?;

        material.selected = Some(option);
        self.recompute();
        Ok(())
    }

    /// Turn an add-on on or off by name. Recomputes the amount.
    ///
    /// Legacy string add-ons are migrated to the structured form first.
    pub fn set_add_on_selected(&mut self, name: &str, selected: bool) -> QuoteResult<()> {
        self.migrate_legacy_add_ons();

        let AddOns::Structured(map) = &mut self.add_ons else {
            return Err(QuoteError::Internal {
                message: "add-ons still in legacy form after migration".to_string(),
            });
        };

        let Some(index) = map.keys().position(|key| key.eq_ignore_ascii_case(name.trim())) else {
            let known: Vec<&str> = map.keys().map(String::as_str).collect();
            return Err(QuoteError::invalid_input(
                "add_ons",
                name,
                format!("Not one of: {}", known.join(", ")),
            ));
        };

        map[index].selected = selected;
        self.recompute();
        Ok(())
    }

    /// Convert legacy string add-ons into the structured form.
    ///
    /// The computed amount is unchanged: recognized names become add-ons at
    /// their historical rate, selected only when the item is priced by area
    /// (legacy add-ons never applied to other units). Unrecognized names are
    /// kept unselected at a zero rate. Returns `true` if anything changed.
    pub fn migrate_legacy_add_ons(&mut self) -> bool {
        let AddOns::Legacy(raw) = &self.add_ons else {
            return false;
        };

        let applies = self.unit_of_measure == UnitOfMeasure::Area;
        let mut map: IndexMap<String, AddOnSelection> = IndexMap::new();

        for name in split_names(raw) {
            let kind = AddOnKind::from_name(&name);
            let rate = kind.legacy_rate();

            // Repeated names were each charged in the legacy form
            if let Some(existing) = map.get_mut(&name) {
                if let Some(rate) = rate {
                    existing.rate_per_unit += rate;
                }
                continue;
            }

            map.insert(
                name.clone(),
                AddOnSelection {
                    selected: applies && rate.is_some(),
                    rate_per_unit: rate.unwrap_or(0.0),
                    description: kind.default_description(&name),
                },
            );
        }

        self.add_ons = AddOns::Structured(map);
        true
    }

    /// Check the item before it enters a project.
    ///
    /// The calculator accepts anything; this is where negative or non-finite
    /// numbers and blank names are rejected.
    pub fn validate(&self) -> QuoteResult<()> {
        if self.room.trim().is_empty() {
            return Err(QuoteError::missing_field("room"));
        }
        if self.item.trim().is_empty() {
            return Err(QuoteError::missing_field("item"));
        }

        for (field, value) in [
            ("length", self.length),
            ("height", self.height),
            ("quantity", self.quantity),
            ("rate", self.rate),
        ] {
            if !value.is_finite() {
                return Err(QuoteError::invalid_input(field, value.to_string(), "Must be a finite number"));
            }
            if value < 0.0 {
                return Err(QuoteError::invalid_input(field, value.to_string(), "Cannot be negative"));
            }
        }

        if let Some(material) = &self.material {
            if let Some(selected) = &material.selected {
                if !material.options.contains(selected) {
                    return Err(QuoteError::invalid_input(
                        "material.selected",
                        selected.clone(),
                        "Selected material is not one of the options",
                    ));
                }
            }
        }

        if let AddOns::Structured(map) = &self.add_ons {
            for (name, add_on) in map {
                if !add_on.rate_per_unit.is_finite() || add_on.rate_per_unit < 0.0 {
                    return Err(QuoteError::invalid_input(
                        format!("add_ons.{name}.rate_per_unit"),
                        add_on.rate_per_unit.to_string(),
                        "Cannot be negative",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Dimensions as shown on a quote: `"L × H"`, `"L"`, or `"N/A"`.
    pub fn dimensions_label(&self) -> String {
        match self.unit_of_measure {
            UnitOfMeasure::Area => format!("{} × {}", self.length, self.height),
            UnitOfMeasure::Length => format!("{}", self.length),
            UnitOfMeasure::Count => "N/A".to_string(),
        }
    }

    /// Name of the selected material, if any
    pub fn selected_material(&self) -> Option<&str> {
        self.material.as_ref().and_then(|m| m.selected.as_deref())
    }
}

/// Material choice embedded in a line item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialSelection {
    /// Available materials; the first is the base material
    #[serde(default, deserialize_with = "lenient_name_list")]
    pub options: Vec<String>,

    /// Currently chosen material
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,

    /// Material with zero price addition (normally `options[0]`)
    #[serde(
        default,
        alias = "baseMaterial",
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_material: Option<String>,

    /// Extra price per unit relative to the base material
    #[serde(default, alias = "priceAdditions", deserialize_with = "lenient_price_map")]
    pub price_additions: IndexMap<String, f64>,
}

impl MaterialSelection {
    /// Price addition for a material name, if one is declared.
    pub fn price_addition(&self, name: &str) -> Option<f64> {
        self.price_additions.get(name).copied()
    }

    /// Price addition of the selected material (0 when none applies).
    pub fn selected_addition(&self) -> f64 {
        self.selected
            .as_deref()
            .and_then(|name| self.price_addition(name))
            .unwrap_or(0.0)
    }
}

/// One entry of a line item's structured add-on menu.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddOnSelection {
    /// Whether the add-on is applied to this item
    #[serde(default, deserialize_with = "lenient_bool")]
    pub selected: bool,

    /// Extra price per unit of measure when selected
    #[serde(default, alias = "ratePerUnit", deserialize_with = "lenient_f64")]
    pub rate_per_unit: f64,

    /// Display text only
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
}

impl AddOnSelection {
    /// An unselected add-on at the given rate
    pub fn new(rate_per_unit: f64, description: impl Into<String>) -> Self {
        AddOnSelection {
            selected: false,
            rate_per_unit,
            description: description.into(),
        }
    }

    /// Mark as selected (builder style)
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }
}

/// Add-ons attached to a line item.
///
/// New data is always `Structured`. `Legacy` holds the comma-separated
/// string form found in older quotes; it is priced for compatibility and is
/// written back unchanged, but nothing in this crate creates it. Use
/// [`LineItem::migrate_legacy_add_ons`] to convert.
///
/// Deserializes from a JSON object (structured), a string (legacy), or
/// `null`/anything else (empty).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AddOns {
    /// Name → selection, in menu order
    Structured(IndexMap<String, AddOnSelection>),
    /// Comma-separated names with historical fixed pricing
    Legacy(String),
}

impl Default for AddOns {
    fn default() -> Self {
        AddOns::Structured(IndexMap::new())
    }
}

impl AddOns {
    /// Whether there is nothing that could contribute to the price
    pub fn is_empty(&self) -> bool {
        match self {
            AddOns::Structured(map) => map.is_empty(),
            AddOns::Legacy(raw) => split_names(raw).is_empty(),
        }
    }

    /// Whether this is the legacy string form
    pub fn is_legacy(&self) -> bool {
        matches!(self, AddOns::Legacy(_))
    }

    /// Names of the add-ons that are switched on.
    ///
    /// For the legacy form every listed name counts as selected.
    pub fn selected_names(&self) -> Vec<String> {
        match self {
            AddOns::Structured(map) => map
                .iter()
                .filter(|(_, add_on)| add_on.selected)
                .map(|(name, _)| name.clone())
                .collect(),
            AddOns::Legacy(raw) => split_names(raw),
        }
    }
}

struct AddOnsVisitor;

impl<'de> Visitor<'de> for AddOnsVisitor {
    type Value = AddOns;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an add-on map or a comma-separated list of add-on names")
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
        // Entries that are not objects are dropped
        let parsed =
            IndexMap::<String, ObjectOrNone<AddOnSelection>>::deserialize(de::value::MapAccessDeserializer::new(map))?;
        Ok(AddOns::Structured(
            parsed
                .into_iter()
                .filter_map(|(name, ObjectOrNone(entry))| entry.map(|entry| (name, entry)))
                .collect(),
        ))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.trim().is_empty() {
            Ok(AddOns::default())
        } else {
            Ok(AddOns::Legacy(v.to_string()))
        }
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(AddOns::default())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(AddOns::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(AddOnsVisitor)
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(AddOns::default())
    }

    fn visit_i64<E: de::Error>(self, _v: i64) -> Result<Self::Value, E> {
        Ok(AddOns::default())
    }

    fn visit_u64<E: de::Error>(self, _v: u64) -> Result<Self::Value, E> {
        Ok(AddOns::default())
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<Self::Value, E> {
        Ok(AddOns::default())
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        while seq.next_element::<de::IgnoredAny>()?.is_some() {}
        Ok(AddOns::default())
    }
}

impl<'de> Deserialize<'de> for AddOns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AddOnsVisitor)
    }
}

/// Split a comma-separated list, trimming and dropping empty names.
pub(crate) fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn wardrobe() -> LineItem {
        LineItem::new("Bedroom", "Wardrobe", UnitOfMeasure::Area, 1500.0)
            .with_dimensions(8.0, 7.0)
            .with_material(MaterialSelection {
                options: vec!["Laminate".into(), "Veneer".into()],
                selected: Some("Laminate".into()),
                base_material: Some("Laminate".into()),
                price_additions: IndexMap::from([("Laminate".to_string(), 0.0), ("Veneer".to_string(), 500.0)]),
            })
            .with_add_on("Lights", AddOnSelection::new(250.0, "LED strip lighting"))
    }

    #[test]
    fn test_new_item_is_priced() {
        let item = LineItem::new("Hall", "Chandelier", UnitOfMeasure::Count, 12000.0);
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.amount, 12000.0);
    }

    #[test]
    fn test_select_material_recomputes() {
        let mut item = wardrobe();
        assert_eq!(item.amount, 8.0 * 7.0 * 1500.0);

        item.select_material("veneer").unwrap();
        assert_eq!(item.selected_material(), Some("Veneer"));
        assert_eq!(item.amount, 8.0 * 7.0 * 2000.0);

        let err = item.select_material("Marble").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_toggle_add_on_recomputes() {
        let mut item = wardrobe();
        item.set_add_on_selected("lights", true).unwrap();
        assert_eq!(item.amount, 8.0 * 7.0 * (1500.0 + 250.0));

        item.set_add_on_selected("Lights", false).unwrap();
        assert_eq!(item.amount, 8.0 * 7.0 * 1500.0);

        assert!(item.set_add_on_selected("Mirror", true).is_err());
    }

    #[test]
    fn test_deserialize_from_browser_wire_format() {
        let json = r#"{
            "room": "Kitchen",
            "item": "Kitchen",
            "uom": "SFT",
            "length": "10",
            "height": 3,
            "rate": 2200,
            "material": {
                "options": ["Laminate", "Acrylic"],
                "selected": "Acrylic",
                "base_material": "Laminate",
                "price_additions": {"Laminate": 0, "Acrylic": 600}
            },
            "add_ons": {"Profile Door": {"selected": true, "rate_per_unit": 150}},
            "amount": 999999
        }"#;

        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.unit_of_measure, UnitOfMeasure::Area);
        assert_eq!(item.length, 10.0);
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.selected_material(), Some("Acrylic"));
        assert_eq!(item.add_ons.selected_names(), vec!["Profile Door".to_string()]);
        // Stored amount is only a cache
        assert_eq!(item.amount, 999999.0);
    }

    #[test]
    fn test_loose_field_types_still_load() {
        let json = r#"{
            "room": "Hall",
            "item": "TV Unit",
            "uom": "SFT",
            "length": 10,
            "height": 3,
            "rate": 1000,
            "material": {
                "options": "Laminate, Acrylic",
                "selected": "Acrylic",
                "price_additions": {"Acrylic": 600}
            },
            "add_ons": {
                "Profile Door": {"selected": 1, "rate_per_unit": 150, "description": null},
                "Lights": null,
                "Glass Shutter": "yes",
                "Handles": {"selected": "", "rate_per_unit": 80}
            }
        }"#;

        let mut item: LineItem = serde_json::from_str(json).unwrap();
        let material = item.material.as_ref().unwrap();
        assert_eq!(material.options, vec!["Laminate".to_string(), "Acrylic".to_string()]);

        let AddOns::Structured(menu) = &item.add_ons else {
            panic!("expected structured add-ons");
        };
        assert_eq!(menu.keys().collect::<Vec<_>>(), vec!["Profile Door", "Handles"]);
        assert_eq!(menu["Profile Door"].description, "");
        assert_eq!(item.add_ons.selected_names(), vec!["Profile Door".to_string()]);

        assert_eq!(item.recompute(), 30.0 * (1000.0 + 600.0 + 150.0));
    }

    #[test]
    fn test_malformed_nested_values_are_dropped() {
        let json = r#"{"id": "not-a-uuid", "room": null, "item": 42, "material": "Acrylic", "uom": {}}"#;
        let item: LineItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.room, "");
        assert_eq!(item.item, "42");
        assert!(item.material.is_none());
        assert_eq!(item.unit_of_measure, UnitOfMeasure::Count);
        assert!(!item.id.is_nil());
    }

    #[test]
    fn test_add_ons_shapes() {
        let item: LineItem = serde_json::from_str(r#"{"item": "TV Unit", "add_ons": "Lights, Profile Door"}"#).unwrap();
        assert_eq!(item.add_ons, AddOns::Legacy("Lights, Profile Door".to_string()));

        let item: LineItem = serde_json::from_str(r#"{"item": "TV Unit", "add_ons": null}"#).unwrap();
        assert!(item.add_ons.is_empty());

        let item: LineItem = serde_json::from_str(r#"{"item": "TV Unit", "add_ons": "  "}"#).unwrap();
        assert!(!item.add_ons.is_legacy());
    }

    #[test]
    fn test_legacy_add_ons_serialize_unchanged() {
        let mut item = LineItem::new("Hall", "TV Unit", UnitOfMeasure::Area, 1200.0);
        item.add_ons = AddOns::Legacy("Lights".to_string());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["add_ons"], serde_json::json!("Lights"));
    }

    #[test]
    fn test_migrate_legacy_preserves_amount_on_area() {
        let mut item = LineItem::new("Hall", "TV Unit", UnitOfMeasure::Area, 1200.0).with_dimensions(4.0, 3.0);
        item.add_ons = AddOns::Legacy("Lights, Profile Door, Glass Shelf".to_string());
        let before = item.recompute();

        assert!(item.migrate_legacy_add_ons());
        assert_eq!(item.recompute(), before);

        let AddOns::Structured(map) = &item.add_ons else {
            panic!("expected structured add-ons");
        };
        assert!(map["Lights"].selected);
        assert_eq!(map["Lights"].rate_per_unit, 250.0);
        assert_eq!(map["Profile Door"].rate_per_unit, 150.0);
        assert!(!map["Glass Shelf"].selected);
        assert_eq!(map["Glass Shelf"].rate_per_unit, 0.0);

        assert!(!item.migrate_legacy_add_ons());
    }

    #[test]
    fn test_migrate_legacy_on_length_item_stays_free() {
        let mut item = LineItem::new("Hall", "Skirting", UnitOfMeasure::Length, 90.0).with_dimensions(20.0, 0.0);
        item.add_ons = AddOns::Legacy("lights".to_string());
        let before = item.recompute();

        item.migrate_legacy_add_ons();
        assert_eq!(item.recompute(), before);
        assert_eq!(item.add_ons.selected_names(), Vec::<String>::new());
    }

    #[test]
    fn test_migrate_legacy_repeated_names() {
        let mut item = LineItem::new("Hall", "Panel", UnitOfMeasure::Area, 100.0).with_dimensions(2.0, 2.0);
        item.add_ons = AddOns::Legacy("Lights, lights".to_string());
        let before = item.recompute();

        item.migrate_legacy_add_ons();
        assert_eq!(item.recompute(), before);
    }

    #[test]
    fn test_validate_rejects_negative_values() {
        let item = LineItem::new("Hall", "Panel", UnitOfMeasure::Area, -5.0);
        let err = item.validate().unwrap_err();
        assert_eq!(err, QuoteError::invalid_input("rate", "-5", "Cannot be negative"));

        let item = LineItem::new("", "Panel", UnitOfMeasure::Area, 5.0);
        assert_eq!(item.validate().unwrap_err(), QuoteError::missing_field("room"));

        assert!(wardrobe().validate().is_ok());
    }

    #[test]
    fn test_dimensions_label() {
        let area = LineItem::new("Hall", "Ceiling", UnitOfMeasure::Area, 1.0).with_dimensions(12.0, 10.5);
        assert_eq!(area.dimensions_label(), "12 × 10.5");

        let length = LineItem::new("Hall", "Cornice", UnitOfMeasure::Length, 1.0).with_dimensions(30.0, 0.0);
        assert_eq!(length.dimensions_label(), "30");

        let count = LineItem::new("Hall", "Lamp", UnitOfMeasure::Count, 1.0);
        assert_eq!(count.dimensions_label(), "N/A");
    }
}
