//! # Quote Calculator
//!
//! Pure pricing functions. Every function here is total: malformed or
//! missing data degrades to zero or a default, never to an error or a panic.
//! Nothing is rounded; round for display only (see [`crate::currency`]).
//!
//! ## Pipeline
//!
//! ```text
//! LineItem ──► base ──► + material ──► + add-ons ──► amount
//!
//! [amount, ...] ──► room totals ──► subtotal ──► tax, discount ──► grand total
//! ```
//!
//! ## Example
//!
//! ```rust
//! use quote_core::calculator::{
//!     aggregate_room_totals, compute_discount, compute_grand_total, compute_subtotal, compute_tax,
//! };
//! use quote_core::line_item::LineItem;
//! use quote_core::units::UnitOfMeasure;
//!
//! let items = vec![
//!     LineItem::new("Kitchen", "Chimney", UnitOfMeasure::Count, 600.0),
//!     LineItem::new("Hall", "Shoe Rack", UnitOfMeasure::Count, 400.0),
//! ];
//!
//! let rooms = aggregate_room_totals(&items);
//! let subtotal = compute_subtotal(&rooms);
//! let tax = compute_tax(subtotal, 18.0);
//! let discount = compute_discount(subtotal, 10.0);
//!
//! assert_eq!(subtotal, 1000.0);
//! assert_eq!(compute_grand_total(subtotal, tax, discount), 1080.0);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::AddOnKind;
use crate::line_item::{split_names, AddOns, LineItem};
use crate::numeric::finite_or_zero;
use crate::project::ProjectSettings;
use crate::units::UnitOfMeasure;

/// Room name → sum of line-item amounts, in order of first appearance.
pub type RoomTotals = IndexMap<String, f64>;

/// Components of a line item's amount.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Base rate × billable units
    pub base: f64,
    /// Selected material's addition × billable units
    pub material: f64,
    /// Selected add-ons × billable units
    pub add_ons: f64,
    /// base + material + add_ons
    pub total: f64,
}

/// Split a line item's price into base, material and add-on components.
///
/// # Example
///
/// ```rust
/// use quote_core::calculator::price_breakdown;
/// use quote_core::line_item::{AddOnSelection, LineItem};
/// use quote_core::units::UnitOfMeasure;
///
/// let item = LineItem::new("Study", "Bookshelf", UnitOfMeasure::Length, 900.0)
///     .with_dimensions(6.0, 0.0)
///     .with_add_on("Lights", AddOnSelection::new(250.0, "LED strip lighting").selected());
///
/// let price = price_breakdown(&item);
/// assert_eq!(price.base, 5400.0);
/// assert_eq!(price.add_ons, 1500.0);
/// assert_eq!(price.total, 6900.0);
/// ```
pub fn price_breakdown(item: &LineItem) -> PriceBreakdown {
    let uom = item.unit_of_measure;
    let length = finite_or_zero(item.length);
    let height = finite_or_zero(item.height);
    let quantity = finite_or_zero(item.quantity);
    let rate = finite_or_zero(item.rate);

    let units = uom.multiplier(length, height, quantity);

    let base = rate * units;

    let material = item
        .material
        .as_ref()
        .map(|m| finite_or_zero(m.selected_addition()) * units)
        .unwrap_or(0.0);

    let add_ons = match &item.add_ons {
        AddOns::Structured(map) => map
            .values()
            .filter(|add_on| add_on.selected)
            .map(|add_on| finite_or_zero(add_on.rate_per_unit) * units)
            .sum(),
        AddOns::Legacy(raw) => legacy_add_on_cost(raw, uom, units),
    };

    PriceBreakdown {
        base,
        material,
        add_ons,
        total: base + material + add_ons,
    }
}

/// Compute a line item's amount: base + material addition + add-ons.
///
/// # Example
///
/// ```rust
/// use quote_core::calculator::compute_line_item_amount;
/// use quote_core::line_item::LineItem;
/// use quote_core::units::UnitOfMeasure;
///
/// let item = LineItem::new("Bedroom", "Wall Panel", UnitOfMeasure::Area, 100.0)
///     .with_dimensions(10.0, 5.0)
///     .with_quantity(2.0);
/// assert_eq!(compute_line_item_amount(&item), 10000.0);
/// ```
pub fn compute_line_item_amount(item: &LineItem) -> f64 {
    price_breakdown(item).total
}

/// Cost of legacy string add-ons. Only area-priced items are charged.
fn legacy_add_on_cost(raw: &str, uom: UnitOfMeasure, units: f64) -> f64 {
    if uom != UnitOfMeasure::Area {
        return 0.0;
    }
    split_names(raw)
        .iter()
        .filter_map(|name| AddOnKind::from_name(name).legacy_rate())
        .map(|rate| rate * units)
        .sum()
}

/// Sum cached line-item amounts per room.
///
/// Amounts are not recomputed; callers keep them current. Rooms appear in
/// order of their first line item, and rooms without items are absent.
pub fn aggregate_room_totals(line_items: &[LineItem]) -> RoomTotals {
    let mut totals = RoomTotals::new();
    for item in line_items {
        *totals.entry(item.room.clone()).or_insert(0.0) += finite_or_zero(item.amount);
    }
    totals
}

/// Sum of all room totals, added in map order.
pub fn compute_subtotal(room_totals: &RoomTotals) -> f64 {
    room_totals.values().sum()
}

/// `subtotal × tax_percent / 100`
pub fn compute_tax(subtotal: f64, tax_percent: f64) -> f64 {
    subtotal * tax_percent / 100.0
}

/// `subtotal × discount_percent / 100`
pub fn compute_discount(subtotal: f64, discount_percent: f64) -> f64 {
    subtotal * discount_percent / 100.0
}

/// `subtotal + tax − discount`. Not clamped; may be negative.
pub fn compute_grand_total(subtotal: f64, tax: f64, discount: f64) -> f64 {
    subtotal + tax - discount
}

/// The whole financial chain for a set of line items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuoteTotals {
    /// Per-room sums in order of first appearance
    pub room_totals: RoomTotals,
    /// Sum of room totals
    pub subtotal: f64,
    /// Tax on the subtotal
    pub tax: f64,
    /// Discount on the subtotal
    pub discount: f64,
    /// subtotal + tax − discount
    pub grand_total: f64,
}

impl QuoteTotals {
    /// Aggregate line items and apply the project's tax and discount.
    pub fn compute(line_items: &[LineItem], settings: &ProjectSettings) -> Self {
        let room_totals = aggregate_room_totals(line_items);
        let subtotal = compute_subtotal(&room_totals);
        let tax = compute_tax(subtotal, settings.tax_percent);
        let discount = compute_discount(subtotal, settings.discount_percent);
        let grand_total = compute_grand_total(subtotal, tax, discount);

        QuoteTotals {
            room_totals,
            subtotal,
            tax,
            discount,
            grand_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::{AddOnSelection, MaterialSelection};
    use pretty_assertions::assert_eq;

    fn item(uom: UnitOfMeasure, length: f64, height: f64, quantity: f64, rate: f64) -> LineItem {
        LineItem::new("Room", "Item", uom, rate)
            .with_dimensions(length, height)
            .with_quantity(quantity)
    }

    fn veneer() -> MaterialSelection {
        MaterialSelection {
            options: vec!["Laminate".into(), "Veneer".into()],
            selected: Some("Veneer".into()),
            base_material: Some("Laminate".into()),
            price_additions: IndexMap::from([("Laminate".to_string(), 0.0), ("Veneer".to_string(), 500.0)]),
        }
    }

    #[test]
    fn test_area_formula() {
        let line = item(UnitOfMeasure::Area, 10.0, 5.0, 2.0, 100.0);
        assert_eq!(compute_line_item_amount(&line), 10000.0);
    }

    #[test]
    fn test_length_formula_ignores_height() {
        let line = item(UnitOfMeasure::Length, 10.0, 99.0, 3.0, 50.0);
        assert_eq!(compute_line_item_amount(&line), 1500.0);
    }

    #[test]
    fn test_count_formula_ignores_dimensions() {
        let line = item(UnitOfMeasure::Count, 10.0, 5.0, 4.0, 250.0);
        assert_eq!(compute_line_item_amount(&line), 1000.0);
    }

    #[test]
    fn test_unknown_uom_prices_per_piece() {
        let line: LineItem =
            serde_json::from_str(r#"{"item": "Lamp", "uom": "BOX", "length": 3, "quantity": 4, "rate": 250}"#)
                .unwrap();
        assert_eq!(compute_line_item_amount(&line), 1000.0);
    }

    #[test]
    fn test_material_addition_scales_with_unit() {
        let line = item(UnitOfMeasure::Area, 10.0, 5.0, 2.0, 100.0).with_material(veneer());
        let price = price_breakdown(&line);
        assert_eq!(price.base, 10000.0);
        assert_eq!(price.material, 50000.0);
        assert_eq!(price.total, 60000.0);

        let line = item(UnitOfMeasure::Length, 10.0, 5.0, 2.0, 100.0).with_material(veneer());
        assert_eq!(price_breakdown(&line).material, 500.0 * 10.0 * 2.0);

        let line = item(UnitOfMeasure::Count, 10.0, 5.0, 2.0, 100.0).with_material(veneer());
        assert_eq!(price_breakdown(&line).material, 500.0 * 2.0);
    }

    #[test]
    fn test_unpriced_or_unselected_material_is_free() {
        let mut material = veneer();
        material.selected = Some("Marble".into());
        let line = item(UnitOfMeasure::Area, 10.0, 5.0, 2.0, 100.0).with_material(material);
        assert_eq!(compute_line_item_amount(&line), 10000.0);

        let mut material = veneer();
        material.selected = None;
        let line = item(UnitOfMeasure::Area, 10.0, 5.0, 2.0, 100.0).with_material(material);
        assert_eq!(compute_line_item_amount(&line), 10000.0);
    }

    #[test]
    fn test_structured_add_on_requires_selection() {
        let line = item(UnitOfMeasure::Area, 4.0, 3.0, 1.0, 100.0)
            .with_add_on("Lights", AddOnSelection::new(250.0, "LED strip lighting"));
        assert_eq!(price_breakdown(&line).add_ons, 0.0);

        let line = line.with_add_on("Lights", AddOnSelection::new(250.0, "LED strip lighting").selected());
        assert_eq!(price_breakdown(&line).add_ons, 3000.0);
    }

    #[test]
    fn test_structured_add_ons_use_their_own_rates() {
        let line = item(UnitOfMeasure::Count, 0.0, 0.0, 3.0, 1000.0)
            .with_add_on("Soft Close", AddOnSelection::new(75.0, "").selected())
            .with_add_on("Handles", AddOnSelection::new(40.0, "").selected())
            .with_add_on("Glass", AddOnSelection::new(900.0, ""));
        assert_eq!(price_breakdown(&line).add_ons, (75.0 + 40.0) * 3.0);
        assert_eq!(compute_line_item_amount(&line), 3000.0 + 345.0);
    }

    #[test]
    fn test_legacy_add_ons_only_on_area() {
        let mut length_item = item(UnitOfMeasure::Length, 4.0, 3.0, 1.0, 100.0);
        length_item.add_ons = AddOns::Legacy("Lights".to_string());
        assert_eq!(price_breakdown(&length_item).add_ons, 0.0);

        let mut area_item = item(UnitOfMeasure::Area, 4.0, 3.0, 1.0, 100.0);
        area_item.add_ons = AddOns::Legacy("Lights".to_string());
        assert_eq!(price_breakdown(&area_item).add_ons, 3000.0);
    }

    #[test]
    fn test_legacy_add_ons_names_are_normalized() {
        let mut line = item(UnitOfMeasure::Area, 2.0, 1.0, 1.0, 0.0);
        line.add_ons = AddOns::Legacy(" PROFILE DOOR ,lights,, Mirror".to_string());
        assert_eq!(compute_line_item_amount(&line), (150.0 + 250.0) * 2.0);
    }

    #[test]
    fn test_zero_quantity_is_zero() {
        let line = item(UnitOfMeasure::Area, 10.0, 5.0, 0.0, 100.0)
            .with_material(veneer())
            .with_add_on("Lights", AddOnSelection::new(250.0, "").selected());
        assert_eq!(compute_line_item_amount(&line), 0.0);
    }

    #[test]
    fn test_malformed_numbers_are_zero() {
        let line: LineItem = serde_json::from_str(
            r#"{"item": "Panel", "uom": "SFT", "length": "ten", "height": 5, "quantity": 2, "rate": 100}"#,
        )
        .unwrap();
        assert_eq!(compute_line_item_amount(&line), 0.0);

        let line: LineItem =
            serde_json::from_str(r#"{"item": "Panel", "uom": "NOS", "quantity": 2, "rate": "abc"}"#).unwrap();
        assert_eq!(compute_line_item_amount(&line), 0.0);
    }

    #[test]
    fn test_non_finite_fields_do_not_poison_amount() {
        let mut line = item(UnitOfMeasure::Count, 0.0, 0.0, 2.0, 100.0);
        line.length = f64::NAN;
        line.height = f64::INFINITY;
        assert_eq!(compute_line_item_amount(&line), 200.0);
    }

    #[test]
    fn test_room_totals_preserve_first_appearance() {
        let mut items = vec![
            item(UnitOfMeasure::Count, 0.0, 0.0, 1.0, 100.0),
            item(UnitOfMeasure::Count, 0.0, 0.0, 1.0, 200.0),
            item(UnitOfMeasure::Count, 0.0, 0.0, 1.0, 300.0),
        ];
        items[0].room = "Kitchen".into();
        items[1].room = "Bedroom".into();
        items[2].room = "Kitchen".into();

        let totals = aggregate_room_totals(&items);
        assert_eq!(totals.keys().collect::<Vec<_>>(), vec!["Kitchen", "Bedroom"]);
        assert_eq!(totals["Kitchen"], 400.0);
        assert_eq!(totals["Bedroom"], 200.0);
    }

    #[test]
    fn test_room_totals_use_cached_amount() {
        let mut line = item(UnitOfMeasure::Count, 0.0, 0.0, 1.0, 100.0);
        line.rate = 999.0; // not recomputed
        let totals = aggregate_room_totals(&[line]);
        assert_eq!(totals["Room"], 100.0);
    }

    #[test]
    fn test_room_totals_empty_and_pure() {
        assert!(aggregate_room_totals(&[]).is_empty());

        let items = vec![item(UnitOfMeasure::Count, 0.0, 0.0, 2.0, 50.0)];
        assert_eq!(aggregate_room_totals(&items), aggregate_room_totals(&items));
    }

    #[test]
    fn test_financial_chain() {
        let subtotal = 1000.0;
        let tax = compute_tax(subtotal, 18.0);
        let discount = compute_discount(subtotal, 10.0);
        assert_eq!(tax, 180.0);
        assert_eq!(discount, 100.0);
        assert_eq!(compute_grand_total(subtotal, tax, discount), 1080.0);
    }

    #[test]
    fn test_discount_over_hundred_goes_negative() {
        let subtotal = 1000.0;
        let discount = compute_discount(subtotal, 150.0);
        assert_eq!(compute_grand_total(subtotal, 0.0, discount), -500.0);
    }

    #[test]
    fn test_quote_totals() {
        let mut items = vec![
            item(UnitOfMeasure::Count, 0.0, 0.0, 1.0, 600.0),
            item(UnitOfMeasure::Count, 0.0, 0.0, 1.0, 400.0),
        ];
        items[1].room = "Hall".into();

        let settings = ProjectSettings {
            tax_percent: 18.0,
            discount_percent: 10.0,
        };
        let totals = QuoteTotals::compute(&items, &settings);
        assert_eq!(totals.subtotal, 1000.0);
        assert_eq!(totals.tax, 180.0);
        assert_eq!(totals.discount, 100.0);
        assert_eq!(totals.grand_total, 1080.0);
        assert_eq!(totals.room_totals.len(), 2);
    }
}
