//! # Rate Cards
//!
//! A rate card is a company's catalog of priceable item templates. Each
//! entry carries a base rate plus two comma-separated menus in the format
//! the catalog editor stores them:
//!
//! - `material_options` / `material_prices`: `"Laminate, Veneer, PU"` and `"Veneer:550, PU:900"`
//! - `add_ons` / `addon_prices`: `"Lights, Profile Door"` and `"Lights:300"`
//!
//! Instantiating an entry into a project turns those menus into a
//! [`MaterialSelection`] and a structured add-on map. Older catalogs omit
//! the price lists, so well-known materials and add-ons have declared default
//! prices ([`MaterialKind`], [`AddOnKind`]) and everything else gets a single
//! generic default.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::catalog::{build_material_selection, RateCardItem};
//! use quote_core::units::UnitOfMeasure;
//!
//! let entry = RateCardItem::new("Furniture", "TV Unit", UnitOfMeasure::Area, 1200.0)
//!     .with_materials("Laminate, Veneer, PU", "");
//!
//! let material = build_material_selection(&entry);
//! assert_eq!(material.base_material.as_deref(), Some("Laminate"));
//! assert_eq!(material.price_additions["Veneer"], 500.0);
//! assert_eq!(material.price_additions["PU"], 800.0);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::line_item::{split_names, AddOnSelection, AddOns, LineItem, MaterialSelection};
use crate::lenient::{lenient_object_list, lenient_string};
use crate::numeric::{lenient_f64, parse_number};
use crate::units::UnitOfMeasure;

// ============================================================================
// Known materials and add-ons
// ============================================================================

/// Materials with a declared default price addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Laminate,
    Veneer,
    Pu,
    Acrylic,
    Premium,
    Texture,
    /// Any other material name
    Other,
}

impl MaterialKind {
    /// Price addition used for anything not listed
    pub const GENERIC_ADDITION: f64 = 300.0;

    /// Classify a material name (case-insensitive, trimmed)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "laminate" => MaterialKind::Laminate,
            "veneer" => MaterialKind::Veneer,
            "pu" => MaterialKind::Pu,
            "acrylic" => MaterialKind::Acrylic,
            "premium" => MaterialKind::Premium,
            "texture" => MaterialKind::Texture,
            _ => MaterialKind::Other,
        }
    }

    /// Default price addition per unit over the base material
    pub fn default_addition(&self) -> f64 {
        match self {
            MaterialKind::Laminate => 0.0,
            MaterialKind::Veneer => 500.0,
            MaterialKind::Pu => 800.0,
            MaterialKind::Acrylic => 600.0,
            MaterialKind::Premium => 400.0,
            MaterialKind::Texture => 200.0,
            MaterialKind::Other => Self::GENERIC_ADDITION,
        }
    }
}

/// Add-ons with a declared default rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddOnKind {
    ProfileDoor,
    Lights,
    /// Any other add-on name
    Other,
}

impl AddOnKind {
    /// Rate per unit used for anything not listed
    pub const GENERIC_RATE: f64 = 100.0;

    /// Classify an add-on name (case-insensitive, trimmed)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "profile door" => AddOnKind::ProfileDoor,
            "lights" => AddOnKind::Lights,
            _ => AddOnKind::Other,
        }
    }

    /// Default rate per unit when the catalog gives none
    pub fn default_rate(&self) -> f64 {
        match self {
            AddOnKind::ProfileDoor => 150.0,
            AddOnKind::Lights => 250.0,
            AddOnKind::Other => Self::GENERIC_RATE,
        }
    }

    /// Rate charged by the legacy string form, which only knew two add-ons
    pub fn legacy_rate(&self) -> Option<f64> {
        match self {
            AddOnKind::ProfileDoor => Some(150.0),
            AddOnKind::Lights => Some(250.0),
            AddOnKind::Other => None,
        }
    }

    /// Description used when the catalog gives no price
    pub fn default_description(&self, name: &str) -> String {
        match self {
            AddOnKind::ProfileDoor => "Premium profile door finish".to_string(),
            AddOnKind::Lights => "LED strip lighting".to_string(),
            AddOnKind::Other => format!("Additional {} feature", name.trim()),
        }
    }
}

// ============================================================================
// Rate card entries
// ============================================================================

/// A catalog entry used as a template for line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCardItem {
    /// Grouping in the catalog (e.g., "Furniture")
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,

    /// Item name (e.g., "Wardrobe")
    #[serde(default, deserialize_with = "lenient_string")]
    pub item: String,

    /// Pricing basis
    #[serde(rename = "uom", alias = "unit_of_measure", alias = "unitOfMeasure", default)]
    pub unit_of_measure: UnitOfMeasure,

    /// Base rate per unit
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rate: f64,

    /// Comma-separated material names; the first is the base
    #[serde(rename = "material_options", alias = "materialOptionsRaw", default, deserialize_with = "lenient_string")]
    pub material_options_raw: String,

    /// Comma-separated `name:price` additions
    #[serde(rename = "material_prices", alias = "materialPricesRaw", default, deserialize_with = "lenient_string")]
    pub material_prices_raw: String,

    /// Comma-separated add-on names, or `"None"`
    #[serde(rename = "add_ons", alias = "addOnsRaw", default, deserialize_with = "lenient_string")]
    pub add_ons_raw: String,

    /// Comma-separated `name:price` add-on rates
    #[serde(rename = "addon_prices", alias = "add_on_prices", alias = "addOnPricesRaw", default, deserialize_with = "lenient_string")]
    pub add_on_prices_raw: String,
}

impl RateCardItem {
    /// Create an entry with no material or add-on menus
    pub fn new(category: impl Into<String>, item: impl Into<String>, unit_of_measure: UnitOfMeasure, rate: f64) -> Self {
        RateCardItem {
            category: category.into(),
            item: item.into(),
            unit_of_measure,
            rate,
            material_options_raw: String::new(),
            material_prices_raw: String::new(),
            add_ons_raw: String::new(),
            add_on_prices_raw: String::new(),
        }
    }

    /// Set the material menu (builder style)
    pub fn with_materials(mut self, options: impl Into<String>, prices: impl Into<String>) -> Self {
        self.material_options_raw = options.into();
        self.material_prices_raw = prices.into();
        self
    }

    /// Set the add-on menu (builder style)
    pub fn with_add_ons(mut self, add_ons: impl Into<String>, prices: impl Into<String>) -> Self {
        self.add_ons_raw = add_ons.into();
        self.add_on_prices_raw = prices.into();
        self
    }

    /// Create a priced line item for `room` from this entry.
    ///
    /// Quantity starts at 1 and dimensions at 0. The base material is
    /// selected and every add-on starts switched off.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quote_core::catalog::RateCard;
    ///
    /// let card = RateCard::sample();
    /// let wardrobe = card.find_item("Wardrobe").unwrap();
    ///
    /// let mut line = wardrobe.instantiate("Master Bedroom");
    /// line.length = 8.0;
    /// line.height = 7.0;
    /// line.select_material("Veneer").unwrap();
    /// assert_eq!(line.amount, 8.0 * 7.0 * (1500.0 + 500.0));
    /// ```
    pub fn instantiate(&self, room: impl Into<String>) -> LineItem {
        let mut line = LineItem::new(room, self.item.clone(), self.unit_of_measure, self.rate);
        line.category = self.category.clone();

        let mut material = build_material_selection(self);
        if !material.options.is_empty() {
            material.selected = material.base_material.clone();
            line.material = Some(material);
        }

        let add_ons = build_add_ons(self);
        if !add_ons.is_empty() {
            line.add_ons = AddOns::Structured(add_ons);
        }

        line.recompute();
        line
    }
}

/// Parse `"name:price, name:price"` into an ordered map.
///
/// Each pair is split on its first colon; the name is trimmed and the price
/// is the leading number of the remainder. Pairs without a colon or without
/// a parsable price are skipped. Later duplicates win.
pub fn parse_price_pairs(raw: &str) -> IndexMap<String, f64> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, price) = pair.split_once(':')?;
            let price = parse_number(price)?;
            Some((name.trim().to_string(), price))
        })
        .collect()
}

/// Build a line item's material menu from a catalog entry.
///
/// The first option is the base material with a zero addition. Other options
/// take their price from `material_prices`, falling back to
/// [`MaterialKind::default_addition`]. `selected` is left empty.
pub fn build_material_selection(entry: &RateCardItem) -> MaterialSelection {
    let options = split_names(&entry.material_options_raw);
    let Some(base) = options.first().cloned() else {
        return MaterialSelection::default();
    };

    let explicit = parse_price_pairs(&entry.material_prices_raw);
    let mut price_additions = IndexMap::new();
    price_additions.insert(base.clone(), 0.0);

    for option in options.iter().skip(1) {
        if *option == base {
            continue;
        }
        let price = explicit
            .get(option)
            .copied()
            .unwrap_or_else(|| MaterialKind::from_name(option).default_addition());
        price_additions.insert(option.clone(), price);
    }

    MaterialSelection {
        options,
        selected: None,
        base_material: Some(base),
        price_additions,
    }
}

/// Build a line item's add-on menu from a catalog entry.
///
/// A blank list or `"none"` (any case) yields an empty menu. Rates come from
/// `addon_prices`, falling back to [`AddOnKind::default_rate`]. Every add-on
/// starts unselected.
pub fn build_add_ons(entry: &RateCardItem) -> IndexMap<String, AddOnSelection> {
    let raw = entry.add_ons_raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return IndexMap::new();
    }

    let explicit = parse_price_pairs(&entry.add_on_prices_raw);

    split_names(raw)
        .into_iter()
        .map(|name| {
            let add_on = match explicit.get(&name) {
                Some(&rate) => AddOnSelection::new(rate, format!("{name} ({rate} per unit)")),
                None => {
                    let kind = AddOnKind::from_name(&name);
                    AddOnSelection::new(kind.default_rate(), kind.default_description(&name))
                }
            };
            (name, add_on)
        })
        .collect()
}

// ============================================================================
// Rate cards
// ============================================================================

/// Filter for browsing a rate card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateCardFilter {
    /// Exact category match
    pub category: Option<String>,
    /// Unit of measure match
    pub unit_of_measure: Option<UnitOfMeasure>,
    /// Case-insensitive substring of the item name or category
    pub search: Option<String>,
}

impl RateCardFilter {
    fn matches(&self, entry: &RateCardItem) -> bool {
        if let Some(category) = &self.category {
            if entry.category != *category {
                return false;
            }
        }
        if let Some(uom) = self.unit_of_measure {
            if entry.unit_of_measure != uom {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !entry.item.to_lowercase().contains(&term) && !entry.category.to_lowercase().contains(&term) {
                return false;
            }
        }
        true
    }
}

/// A named catalog of rate card entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    /// Catalog name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Entries in display order
    #[serde(default, deserialize_with = "lenient_object_list")]
    pub items: Vec<RateCardItem>,
}

impl RateCard {
    /// Create an empty rate card
    pub fn new(name: impl Into<String>) -> Self {
        RateCard {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// The demo catalog shipped with the application.
    pub fn sample() -> Self {
        use UnitOfMeasure::Area;

        let entries = [
            ("Wall Work", "POP Wall", 150.0, "Standard, Premium", "None"),
            ("Wall Work", "Wall Painting", 80.0, "Regular, Texture", "None"),
            ("Furniture", "TV Unit", 1200.0, "Laminate, Veneer, PU", "Lights, Profile Door"),
            ("Furniture", "Wardrobe", 1500.0, "Laminate, Veneer, PU", "Lights, Profile Door"),
            ("Furniture", "Kitchen", 2200.0, "Laminate, Acrylic, PU", "Lights, Profile Door"),
            ("Decorative", "False Ceiling", 220.0, "Regular, Cove", "Lights"),
            ("Decorative", "Curtains", 180.0, "Regular, Blackout", "None"),
        ];

        RateCard {
            name: "Standard Rates".to_string(),
            items: entries
                .into_iter()
                .map(|(category, item, rate, materials, add_ons)| {
                    RateCardItem::new(category, item, Area, rate)
                        .with_materials(materials, "")
                        .with_add_ons(add_ons, "")
                })
                .collect(),
        }
    }

    /// Distinct non-empty categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .items
            .iter()
            .map(|entry| entry.category.clone())
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Entries in one category
    pub fn items_in_category(&self, category: &str) -> Vec<&RateCardItem> {
        self.items.iter().filter(|entry| entry.category == category).collect()
    }

    /// Entries matching all set filter fields
    pub fn filter(&self, filter: &RateCardFilter) -> Vec<&RateCardItem> {
        self.items.iter().filter(|entry| filter.matches(entry)).collect()
    }

    /// Find an entry by item name (case-insensitive)
    pub fn find_item(&self, item: &str) -> Option<&RateCardItem> {
        let item = item.trim();
        self.items.iter().find(|entry| entry.item.eq_ignore_ascii_case(item))
    }

    /// Append an entry
    pub fn add_item(&mut self, entry: RateCardItem) {
        self.items.push(entry);
    }

    /// Remove the first entry with this item name (case-insensitive)
    pub fn remove_item(&mut self, item: &str) -> Option<RateCardItem> {
        let item = item.trim();
        let index = self.items.iter().position(|entry| entry.item.eq_ignore_ascii_case(item))?;
        Some(self.items.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(materials: &str, prices: &str) -> RateCardItem {
        RateCardItem::new("Furniture", "Wardrobe", UnitOfMeasure::Area, 1500.0).with_materials(materials, prices)
    }

    #[test]
    fn test_material_fallback_table() {
        let material = build_material_selection(&entry("Laminate,Veneer,PU", ""));
        assert_eq!(material.options, vec!["Laminate", "Veneer", "PU"]);
        assert_eq!(material.base_material.as_deref(), Some("Laminate"));
        assert_eq!(material.selected, None);
        assert_eq!(
            material.price_additions,
            IndexMap::from([
                ("Laminate".to_string(), 0.0),
                ("Veneer".to_string(), 500.0),
                ("PU".to_string(), 800.0),
            ])
        );
    }

    #[test]
    fn test_material_explicit_prices_win() {
        let material = build_material_selection(&entry("Regular, Cove, Marble", "Cove: 350, Regular:99"));
        // Base stays at zero even if priced
        assert_eq!(material.price_additions["Regular"], 0.0);
        assert_eq!(material.price_additions["Cove"], 350.0);
        // Unknown name, no price: generic default
        assert_eq!(material.price_additions["Marble"], 300.0);
    }

    #[test]
    fn test_material_fallback_is_case_insensitive() {
        let material = build_material_selection(&entry("Standard, premium, TEXTURE, acrylic", ""));
        assert_eq!(material.price_additions["premium"], 400.0);
        assert_eq!(material.price_additions["TEXTURE"], 200.0);
        assert_eq!(material.price_additions["acrylic"], 600.0);
    }

    #[test]
    fn test_material_base_repeated_later_stays_zero() {
        let material = build_material_selection(&entry("PU, Veneer, PU", ""));
        assert_eq!(material.price_additions["PU"], 0.0);
        assert_eq!(material.price_additions.len(), 2);
    }

    #[test]
    fn test_material_empty_options() {
        let material = build_material_selection(&entry("", "Veneer:500"));
        assert_eq!(material, MaterialSelection::default());
    }

    #[test]
    fn test_price_pairs_skip_bad_entries() {
        let prices = parse_price_pairs("Veneer:500, PU, Acrylic:abc, Glass: 12.5 , Odd:1:2");
        assert_eq!(
            prices,
            IndexMap::from([
                ("Veneer".to_string(), 500.0),
                ("Glass".to_string(), 12.5),
                ("Odd".to_string(), 1.0),
            ])
        );
    }

    #[test]
    fn test_add_ons_none_sentinel() {
        for raw in ["None", "none", "NONE", " None ", ""] {
            let entry = RateCardItem::new("Decor", "Curtains", UnitOfMeasure::Area, 180.0).with_add_ons(raw, "");
            assert!(build_add_ons(&entry).is_empty(), "expected no add-ons for {raw:?}");
        }
    }

    #[test]
    fn test_add_ons_defaults_and_explicit_prices() {
        let entry = RateCardItem::new("Furniture", "Kitchen", UnitOfMeasure::Area, 2200.0)
            .with_add_ons("Lights, Profile Door, Soft Close", "Soft Close:75");
        let add_ons = build_add_ons(&entry);

        assert_eq!(add_ons.keys().collect::<Vec<_>>(), vec!["Lights", "Profile Door", "Soft Close"]);
        assert_eq!(add_ons["Lights"], AddOnSelection::new(250.0, "LED strip lighting"));
        assert_eq!(add_ons["Profile Door"], AddOnSelection::new(150.0, "Premium profile door finish"));
        assert_eq!(add_ons["Soft Close"], AddOnSelection::new(75.0, "Soft Close (75 per unit)"));
        assert!(add_ons.values().all(|add_on| !add_on.selected));
    }

    #[test]
    fn test_add_ons_generic_default() {
        let entry = RateCardItem::new("Furniture", "Bed", UnitOfMeasure::Count, 30000.0).with_add_ons("Storage", "");
        let add_ons = build_add_ons(&entry);
        assert_eq!(add_ons["Storage"], AddOnSelection::new(100.0, "Additional Storage feature"));
    }

    #[test]
    fn test_instantiate_line_item() {
        let card = RateCard::sample();
        let tv_unit = card.find_item("tv unit").unwrap();
        let line = tv_unit.instantiate("Living Room");

        assert_eq!(line.room, "Living Room");
        assert_eq!(line.category, "Furniture");
        assert_eq!(line.quantity, 1.0);
        assert_eq!(line.length, 0.0);
        assert_eq!(line.selected_material(), Some("Laminate"));
        assert_eq!(line.add_ons.selected_names(), Vec::<String>::new());
        assert!(!line.add_ons.is_empty());
        assert_eq!(line.amount, 0.0);
    }

    #[test]
    fn test_instantiate_without_menus() {
        let entry = RateCardItem::new("Services", "Site Cleaning", UnitOfMeasure::Count, 5000.0);
        let line = entry.instantiate("Whole House");
        assert!(line.material.is_none());
        assert!(line.add_ons.is_empty());
        assert_eq!(line.amount, 5000.0);
    }

    #[test]
    fn test_rate_card_browsing() {
        let card = RateCard::sample();
        assert_eq!(card.categories(), vec!["Decorative", "Furniture", "Wall Work"]);
        assert_eq!(card.items_in_category("Furniture").len(), 3);

        let filter = RateCardFilter {
            search: Some("WALL".to_string()),
            ..Default::default()
        };
        let names: Vec<&str> = card.filter(&filter).iter().map(|e| e.item.as_str()).collect();
        assert_eq!(names, vec!["POP Wall", "Wall Painting"]);

        let filter = RateCardFilter {
            unit_of_measure: Some(UnitOfMeasure::Count),
            ..Default::default()
        };
        assert!(card.filter(&filter).is_empty());
    }

    #[test]
    fn test_rate_card_add_remove() {
        let mut card = RateCard::new("Custom");
        card.add_item(RateCardItem::new("Doors", "Main Door", UnitOfMeasure::Count, 25000.0));
        assert!(card.find_item("main door").is_some());
        assert!(card.remove_item("MAIN DOOR").is_some());
        assert!(card.remove_item("Main Door").is_none());
    }

    #[test]
    fn test_rate_card_item_wire_format() {
        let json = r#"{"category": "Furniture", "item": "TV Unit", "uom": "SFT", "rate": "1200",
                       "material_options": "Laminate, Veneer", "add_ons": "Lights", "addon_prices": "Lights:300"}"#;
        let entry: RateCardItem = serde_json::from_str(json).unwrap();
        assert_eq!(entry.unit_of_measure, UnitOfMeasure::Area);
        assert_eq!(entry.rate, 1200.0);
        assert_eq!(entry.material_prices_raw, "");
        assert_eq!(build_add_ons(&entry)["Lights"].rate_per_unit, 300.0);
    }

    #[test]
    fn test_null_menus_load_as_empty() {
        let json = r#"{"category": null, "item": "Chimney", "uom": "NOS", "rate": 18000,
                       "material_options": null, "material_prices": null, "add_ons": null, "addon_prices": null}"#;
        let entry: RateCardItem = serde_json::from_str(json).unwrap();
        assert_eq!(entry.category, "");
        assert!(build_add_ons(&entry).is_empty());
        assert_eq!(build_material_selection(&entry), MaterialSelection::default());

        let line = entry.instantiate("Kitchen");
        assert_eq!(line.quantity, 1.0);
        assert_eq!(line.amount, 18000.0);
    }

    #[test]
    fn test_rate_card_skips_non_object_items() {
        let json = r#"{"name": "Imported", "items": [
            {"category": "Furniture", "item": "Bed", "uom": "NOS", "rate": 30000},
            null,
            "Wardrobe",
            {"category": "Wall Work", "item": "Wall Painting", "uom": "SFT", "rate": 25}
        ]}"#;
        let card: RateCard = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = card.items.iter().map(|e| e.item.as_str()).collect();
        assert_eq!(names, vec!["Bed", "Wall Painting"]);

        let card: RateCard = serde_json::from_str(r#"{"name": null, "items": null}"#).unwrap();
        assert!(card.items.is_empty());
    }
}
