//! # Project Data Structures
//!
//! The `Project` struct is the root container for a quote. Projects
//! serialize to `.iqt` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, timestamps)
//! ├── info: ProjectInfo (name, client, site, contact, type)
//! ├── settings: ProjectSettings (tax %, discount %)
//! ├── rooms: Vec<Room>
//! └── line_items: Vec<LineItem> (each with its own Uuid)
//! ```
//!
//! The project is the validation boundary: the calculator accepts anything,
//! but items only enter a project after [`LineItem::validate`] passes, and
//! every add or edit recomputes the item's amount.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::line_item::LineItem;
//! use quote_core::project::{Project, Room};
//! use quote_core::units::UnitOfMeasure;
//!
//! let mut project = Project::new("Sharma Residence", "A. Sharma");
//! project.add_room(Room::new("Kitchen", "Kitchen")).unwrap();
//!
//! let id = project
//!     .add_line_item(LineItem::new("Kitchen", "Chimney", UnitOfMeasure::Count, 1000.0))
//!     .unwrap();
//!
//! let totals = project.totals();
//! assert_eq!(totals.subtotal, 1000.0);
//! assert_eq!(totals.grand_total, 1180.0); // 18% tax by default
//! # assert!(project.line_item(&id).is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculator::QuoteTotals;
use crate::errors::{QuoteError, QuoteResult};
use crate::lenient::{lenient_object_list, lenient_string};
use crate::line_item::LineItem;
use crate::numeric::lenient_f64;

/// Current schema version for .iqt files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, timestamps)
    pub meta: ProjectMetadata,

    /// Client and site details
    pub info: ProjectInfo,

    /// Tax and discount settings
    #[serde(default)]
    pub settings: ProjectSettings,

    /// Rooms, keyed by unique name
    #[serde(default, deserialize_with = "lenient_object_list")]
    pub rooms: Vec<Room>,

    /// Line items in entry order
    #[serde(default, deserialize_with = "lenient_object_list")]
    pub line_items: Vec<LineItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quote_core::project::Project;
    ///
    /// let project = Project::new("Villa Interiors", "R. Iyer");
    /// assert_eq!(project.info.client_name, "R. Iyer");
    /// assert_eq!(project.settings.tax_percent, 18.0);
    /// ```
    pub fn new(name: impl Into<String>, client_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            info: ProjectInfo {
                name: name.into(),
                client_name: client_name.into(),
                ..ProjectInfo::default()
            },
            settings: ProjectSettings::default(),
            rooms: Vec::new(),
            line_items: Vec::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    // ------------------------------------------------------------------
    // Rooms
    // ------------------------------------------------------------------

    /// Add a room. Names are trimmed and must be unique (case-insensitive).
    pub fn add_room(&mut self, mut room: Room) -> QuoteResult<()> {
        room.name = room.name.trim().to_string();
        if room.name.is_empty() {
            return Err(QuoteError::missing_field("room.name"));
        }
        if self.room(&room.name).is_some() {
            return Err(QuoteError::duplicate_room(room.name));
        }

        tracing::debug!(room = %room.name, room_type = %room.room_type, "adding room");
        self.rooms.push(room);
        self.touch();
        Ok(())
    }

    /// Remove a room and every line item in it.
    ///
    /// Returns the removed room and its line items.
    pub fn remove_room(&mut self, name: &str) -> QuoteResult<(Room, Vec<LineItem>)> {
        let index = self
            .rooms
            .iter()
            .position(|room| room.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| QuoteError::room_not_found(name))?;

        let room = self.rooms.remove(index);
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.line_items)
            .into_iter()
            .partition(|item| item.room == room.name);
        self.line_items = kept;

        tracing::debug!(room = %room.name, removed_items = removed.len(), "removed room");
        self.touch();
        Ok((room, removed))
    }

    /// Look up a room by name (case-insensitive).
    pub fn room(&self, name: &str) -> Option<&Room> {
        let name = name.trim();
        self.rooms.iter().find(|room| room.name.eq_ignore_ascii_case(name))
    }

    // ------------------------------------------------------------------
    // Line items
    // ------------------------------------------------------------------

    /// Validate, price and append a line item.
    ///
    /// The room must exist; the item's room name is normalized to the
    /// room's stored spelling. Returns the item's id.
    pub fn add_line_item(&mut self, mut item: LineItem) -> QuoteResult<Uuid> {
        item.validate()?;
        item.room = self
            .room(&item.room)
            .map(|room| room.name.clone())
            .ok_or_else(|| QuoteError::room_not_found(item.room.clone()))?;

        if self.line_item(&item.id).is_some() {
            item.id = Uuid::new_v4();
        }

        item.recompute();
        tracing::debug!(id = %item.id, room = %item.room, item = %item.item, amount = item.amount, "adding line item");

        let id = item.id;
        self.line_items.push(item);
        self.touch();
        Ok(id)
    }

    /// Edit a line item in place, then validate and reprice it.
    ///
    /// If the edited item fails validation the edit is rolled back.
    ///
    /// # Example
    ///
    /// ```rust
    /// use quote_core::line_item::LineItem;
    /// use quote_core::project::{Project, Room};
    /// use quote_core::units::UnitOfMeasure;
    ///
    /// let mut project = Project::new("Flat 4B", "Client");
    /// project.add_room(Room::new("Hall", "Living")).unwrap();
    /// let id = project
    ///     .add_line_item(LineItem::new("Hall", "Cornice", UnitOfMeasure::Length, 90.0))
    ///     .unwrap();
    ///
    /// let amount = project.update_line_item(&id, |item| item.length = 40.0).unwrap();
    /// assert_eq!(amount, 3600.0);
    /// ```
    pub fn update_line_item<F>(&mut self, id: &Uuid, edit: F) -> QuoteResult<f64>
    where
        F: FnOnce(&mut LineItem),
    {
        let index = self
            .line_items
            .iter()
            .position(|item| item.id == *id)
            .ok_or_else(|| QuoteError::line_item_not_found(id))?;

        let mut edited = self.line_items[index].clone();
        edit(&mut edited);
        edited.id = *id;
        edited.validate()?;
        edited.room = self
            .room(&edited.room)
            .map(|room| room.name.clone())
            .ok_or_else(|| QuoteError::room_not_found(edited.room.clone()))?;

        let amount = edited.recompute();
        tracing::debug!(id = %id, amount, "updated line item");

        self.line_items[index] = edited;
        self.touch();
        Ok(amount)
    }

    /// Remove a line item by id.
    pub fn remove_line_item(&mut self, id: &Uuid) -> QuoteResult<LineItem> {
        let index = self
            .line_items
            .iter()
            .position(|item| item.id == *id)
            .ok_or_else(|| QuoteError::line_item_not_found(id))?;

        let item = self.line_items.remove(index);
        tracing::debug!(id = %id, item = %item.item, "removed line item");
        self.touch();
        Ok(item)
    }

    /// Get a line item by id.
    pub fn line_item(&self, id: &Uuid) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id == *id)
    }

    /// Line items belonging to a room, in entry order.
    pub fn line_items_in_room(&self, room: &str) -> Vec<&LineItem> {
        let room = room.trim();
        self.line_items
            .iter()
            .filter(|item| item.room.eq_ignore_ascii_case(room))
            .collect()
    }

    /// Number of line items
    pub fn item_count(&self) -> usize {
        self.line_items.len()
    }

    // ------------------------------------------------------------------
    // Settings and totals
    // ------------------------------------------------------------------

    /// Replace the tax and discount settings.
    ///
    /// Out-of-range percentages are accepted and logged; see
    /// [`ProjectSettings::validate`] for a strict check.
    pub fn set_settings(&mut self, settings: ProjectSettings) {
        if let Err(e) = settings.validate() {
            tracing::warn!(error = %e, "project settings outside the usual range");
        }
        self.settings = settings;
        self.touch();
    }

    /// Bring loaded data up to the current model.
    ///
    /// Converts legacy string add-ons to the structured form and refreshes
    /// every cached amount. Returns the number of items migrated.
    pub fn normalize(&mut self) -> usize {
        let mut migrated = 0;
        for item in &mut self.line_items {
            if item.migrate_legacy_add_ons() {
                tracing::warn!(id = %item.id, item = %item.item, "converted legacy add-ons");
                migrated += 1;
            }
            item.recompute();
        }
        migrated
    }

    /// Room totals, subtotal, tax, discount and grand total.
    pub fn totals(&self) -> QuoteTotals {
        QuoteTotals::compute(&self.line_items, &self.settings)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Client and site details printed on the quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub client_name: String,
    #[serde(default)]
    pub site_address: String,
    #[serde(default)]
    pub contact_info: String,
    #[serde(default)]
    pub project_type: ProjectType,
}

/// Kind of property being quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectType {
    #[default]
    Apartment,
    Villa,
    Farmhouse,
    #[serde(rename = "Independent House")]
    IndependentHouse,
    #[serde(rename = "Office Space")]
    OfficeSpace,
    #[serde(other)]
    Other,
}

impl ProjectType {
    /// All project types in display order
    pub const ALL: [ProjectType; 6] = [
        ProjectType::Apartment,
        ProjectType::Villa,
        ProjectType::Farmhouse,
        ProjectType::IndependentHouse,
        ProjectType::OfficeSpace,
        ProjectType::Other,
    ];

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectType::Apartment => "Apartment",
            ProjectType::Villa => "Villa",
            ProjectType::Farmhouse => "Farmhouse",
            ProjectType::IndependentHouse => "Independent House",
            ProjectType::OfficeSpace => "Office Space",
            ProjectType::Other => "Other",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> QuoteResult<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "apartment" | "flat" => Ok(ProjectType::Apartment),
            "villa" => Ok(ProjectType::Villa),
            "farmhouse" => Ok(ProjectType::Farmhouse),
            "independenthouse" | "house" => Ok(ProjectType::IndependentHouse),
            "officespace" | "office" => Ok(ProjectType::OfficeSpace),
            "other" => Ok(ProjectType::Other),
            _ => Err(QuoteError::invalid_input("project_type", s, "Unknown project type")),
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A room line items are grouped under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique name within the project (e.g., "Master Bedroom")
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Kind of room (e.g., "Bedroom", "Kitchen")
    #[serde(rename = "type", alias = "room_type", default, deserialize_with = "lenient_string")]
    pub room_type: String,
}

impl Room {
    pub fn new(name: impl Into<String>, room_type: impl Into<String>) -> Self {
        Room {
            name: name.into(),
            room_type: room_type.into(),
        }
    }
}

/// Project-level pricing settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Percentage added to the subtotal (GST)
    #[serde(alias = "gst", alias = "taxPercent", default = "default_tax_percent", deserialize_with = "lenient_f64")]
    pub tax_percent: f64,

    /// Percentage subtracted from the subtotal
    #[serde(alias = "discount", alias = "discountPercent", default, deserialize_with = "lenient_f64")]
    pub discount_percent: f64,
}

/// GST rate applied when a project has none
pub const DEFAULT_TAX_PERCENT: f64 = 18.0;

fn default_tax_percent() -> f64 {
    DEFAULT_TAX_PERCENT
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            tax_percent: DEFAULT_TAX_PERCENT,
            discount_percent: 0.0,
        }
    }
}

impl ProjectSettings {
    /// Report percentages outside 0–100.
    ///
    /// The calculator applies any value, so a discount above 100% yields a
    /// negative grand total. Boundary code decides whether to enforce this.
    pub fn validate(&self) -> QuoteResult<()> {
        for (field, value) in [("tax_percent", self.tax_percent), ("discount_percent", self.discount_percent)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(QuoteError::invalid_input(
                    field,
                    value.to_string(),
                    "Percentage should be between 0 and 100",
                ));
            }
        }
        Ok(())
    }
}
