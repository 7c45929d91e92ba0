//! # Quote Summary
//!
//! Read-only views of a project for export and dashboards: items grouped by
//! room with room totals, the quote totals, and summary statistics.
//!
//! Everything here is derived from [`Project`] and serializable, so an
//! export layer (PDF, spreadsheet, web view) can consume it directly.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::line_item::LineItem;
//! use quote_core::project::{Project, Room};
//! use quote_core::summary::QuoteSummary;
//! use quote_core::units::UnitOfMeasure;
//!
//! let mut project = Project::new("Flat 12", "Client");
//! project.add_room(Room::new("Hall", "Living")).unwrap();
//! project
//!     .add_line_item(LineItem::new("Hall", "TV Unit", UnitOfMeasure::Count, 25000.0))
//!     .unwrap();
//!
//! let summary = QuoteSummary::build(&project);
//! assert_eq!(summary.rooms[0].total, 25000.0);
//! assert_eq!(summary.stats.item_count, 1);
//! ```

use std::cmp::Ordering;
use std::fmt::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::calculator::{price_breakdown, PriceBreakdown, QuoteTotals};
use crate::currency::CurrencyFormat;
use crate::line_item::LineItem;
use crate::project::{Project, ProjectInfo, ProjectSettings};
use crate::units::UnitOfMeasure;

/// One printed row of the quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub item: String,
    pub unit_of_measure: UnitOfMeasure,
    /// "L × H", "L" or "N/A"
    pub dimensions: String,
    pub quantity: f64,
    pub rate: f64,
    pub material: Option<String>,
    pub add_ons: Vec<String>,
    pub breakdown: PriceBreakdown,
    pub amount: f64,
}

impl SummaryLine {
    fn from_item(item: &LineItem) -> Self {
        SummaryLine {
            item: item.item.clone(),
            unit_of_measure: item.unit_of_measure,
            dimensions: item.dimensions_label(),
            quantity: item.quantity,
            rate: item.rate,
            material: item.selected_material().map(str::to_string),
            add_ons: item.add_ons.selected_names(),
            breakdown: price_breakdown(item),
            amount: item.amount,
        }
    }
}

/// Items of one room and their total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSection {
    pub room: String,
    pub lines: Vec<SummaryLine>,
    pub total: f64,
}

/// Total for one unit of measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UomTotal {
    pub unit_of_measure: UnitOfMeasure,
    pub total: f64,
}

/// Ordering for per-unit totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UomSortOrder {
    #[default]
    ValueDesc,
    ValueAsc,
    Name,
}

/// A named amount, e.g. the most expensive room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub name: String,
    /// Room of the item; `None` for room highlights
    pub room: Option<String>,
    pub amount: f64,
}

/// Dashboard statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteStats {
    /// Rooms that have at least one line item
    pub room_count: usize,
    pub item_count: usize,
    pub average_room_cost: f64,
    pub average_item_cost: f64,
    /// Only reported when some room total is above 0
    pub highest_cost_room: Option<Highlight>,
    /// Only reported when some item amount is above 0
    pub highest_cost_item: Option<Highlight>,
    /// Sorted per [`UomSortOrder::ValueDesc`] unless re-sorted
    pub uom_totals: Vec<UomTotal>,
}

impl QuoteStats {
    /// Compute statistics from line items and their room totals.
    pub fn compute(line_items: &[LineItem], totals: &QuoteTotals) -> Self {
        let room_count = totals.room_totals.len();
        let item_count = line_items.len();

        let average = |count: usize| if count > 0 { totals.subtotal / count as f64 } else { 0.0 };

        // First strictly-greater maximum wins, starting from 0
        let highest_cost_room = totals
            .room_totals
            .iter()
            .fold(None::<(&String, f64)>, |best, (room, &amount)| match best {
                Some((_, top)) if amount <= top => best,
                _ if amount > 0.0 => Some((room, amount)),
                _ => best,
            })
            .map(|(room, amount)| Highlight {
                name: room.clone(),
                room: None,
                amount,
            });

        let highest_cost_item = line_items
            .iter()
            .fold(None::<&LineItem>, |best, item| match best {
                Some(top) if item.amount <= top.amount => best,
                _ if item.amount > 0.0 => Some(item),
                _ => best,
            })
            .map(|item| Highlight {
                name: item.item.clone(),
                room: Some(item.room.clone()),
                amount: item.amount,
            });

        let mut by_uom: IndexMap<UnitOfMeasure, f64> = IndexMap::new();
        for item in line_items {
            *by_uom.entry(item.unit_of_measure).or_insert(0.0) += item.amount;
        }
        let mut stats = QuoteStats {
            room_count,
            item_count,
            average_room_cost: average(room_count),
            average_item_cost: average(item_count),
            highest_cost_room,
            highest_cost_item,
            uom_totals: by_uom
                .into_iter()
                .map(|(unit_of_measure, total)| UomTotal { unit_of_measure, total })
                .collect(),
        };
        stats.sort_uom_totals(UomSortOrder::default());
        stats
    }

    /// Re-sort the per-unit totals. Sorting is stable.
    pub fn sort_uom_totals(&mut self, order: UomSortOrder) {
        let by_total = |a: &UomTotal, b: &UomTotal| a.total.partial_cmp(&b.total).unwrap_or(Ordering::Equal);
        match order {
            UomSortOrder::ValueDesc => self.uom_totals.sort_by(|a, b| by_total(b, a)),
            UomSortOrder::ValueAsc => self.uom_totals.sort_by(by_total),
            UomSortOrder::Name => self
                .uom_totals
                .sort_by(|a, b| a.unit_of_measure.code().cmp(b.unit_of_measure.code())),
        }
    }
}

/// Everything needed to print or export a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub info: ProjectInfo,
    pub settings: ProjectSettings,
    /// Rooms in order of their first line item
    pub rooms: Vec<RoomSection>,
    pub totals: QuoteTotals,
    pub stats: QuoteStats,
}

impl QuoteSummary {
    pub fn build(project: &Project) -> Self {
        let totals = project.totals();

        let mut sections: IndexMap<&str, Vec<SummaryLine>> = IndexMap::new();
        for item in &project.line_items {
            sections
                .entry(item.room.as_str())
                .or_default()
                .push(SummaryLine::from_item(item));
        }

        let rooms = sections
            .into_iter()
            .map(|(room, lines)| RoomSection {
                room: room.to_string(),
                total: totals.room_totals.get(room).copied().unwrap_or(0.0),
                lines,
            })
            .collect();

        QuoteSummary {
            info: project.info.clone(),
            settings: project.settings,
            rooms,
            stats: QuoteStats::compute(&project.line_items, &totals),
            totals,
        }
    }

    /// Plain-text quote for terminals and emails.
    pub fn render_text(&self, currency: &CurrencyFormat) -> String {
        let mut out = String::new();
        let money = |amount: f64| currency.format(amount);

        let _ = writeln!(out, "QUOTATION: {}", self.info.name);
        let _ = writeln!(out, "Client: {}", self.info.client_name);
        if !self.info.site_address.is_empty() {
            let _ = writeln!(out, "Site: {}", self.info.site_address);
        }
        if !self.info.contact_info.is_empty() {
            let _ = writeln!(out, "Contact: {}", self.info.contact_info);
        }
        let _ = writeln!(out, "Type: {}", self.info.project_type);

        for section in &self.rooms {
            let _ = writeln!(out);
            let _ = writeln!(out, "== {} ==", section.room);
            for line in &section.lines {
                let _ = writeln!(
                    out,
                    "  {:<24} {:>3}  {:<14} x{:<6} @ {:>14}  {:>16}",
                    line.item,
                    line.unit_of_measure.code(),
                    line.dimensions,
                    line.quantity,
                    money(line.rate),
                    money(line.amount),
                );
                if let Some(material) = &line.material {
                    let _ = writeln!(out, "      material: {}", material);
                }
                if !line.add_ons.is_empty() {
                    let _ = writeln!(out, "      add-ons: {}", line.add_ons.join(", "));
                }
            }
            let _ = writeln!(out, "  {:<24} {:>59}", "Room total", money(section.total));
        }

        let summary_rows = [
            ("Subtotal:".to_string(), self.totals.subtotal),
            (format!("GST ({}%):", self.settings.tax_percent), self.totals.tax),
            (format!("Discount ({}%):", self.settings.discount_percent), -self.totals.discount),
            ("Grand total:".to_string(), self.totals.grand_total),
        ];
        let _ = writeln!(out);
        for (label, amount) in summary_rows {
            let _ = writeln!(out, "{:<24}{:>16}", label, money(amount));
        }
        out
    }
}
