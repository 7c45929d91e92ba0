//! # quote_core - Interior-Design Quotation Engine
//!
//! `quote_core` prices interior-design work: line items grouped by room,
//! material and add-on surcharges from a rate card, and the project totals
//! (subtotal, GST, discount, grand total). All inputs and outputs are
//! JSON-serializable so the same types back the project files, the CLI and
//! any export layer.
//!
//! ## Design Philosophy
//!
//! - **Pure pricing**: [`calculator`] functions never fail and never mutate
//! - **Lenient input**: hand-typed numbers fall back to 0 instead of erroring
//! - **Validated storage**: [`project::Project`] rejects bad items at the boundary
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use quote_core::catalog::RateCard;
//! use quote_core::project::{Project, Room};
//!
//! let mut project = Project::new("Sharma Residence", "A. Sharma");
//! project.add_room(Room::new("Master Bedroom", "Bedroom")).unwrap();
//!
//! let mut wardrobe = RateCard::sample()
//!     .find_item("Wardrobe")
//!     .unwrap()
//!     .instantiate("Master Bedroom");
//! wardrobe.length = 6.0;
//! wardrobe.height = 7.0;
//! wardrobe.select_material("Veneer").unwrap();
//! project.add_line_item(wardrobe).unwrap();
//!
//! let totals = project.totals();
//! assert_eq!(totals.subtotal, 42.0 * (1500.0 + 500.0));
//! ```
//!
//! ## Modules
//!
//! - [`calculator`] - Line item amounts and quote totals
//! - [`line_item`] - Line items, material selections and add-ons
//! - [`catalog`] - Rate cards and building line items from them
//! - [`project`] - Project container, rooms and settings
//! - [`summary`] - Grouped quote view and dashboard statistics
//! - [`currency`] - Money formatting
//! - [`units`] - Units of measure
//! - [`numeric`] - Lenient number parsing
//! - [`lenient`] - Lenient readers for text, flags, lists and records
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking

pub mod calculator;
pub mod catalog;
pub mod currency;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod lenient;
pub mod line_item;
pub mod numeric;
pub mod project;
pub mod summary;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculator::{compute_line_item_amount, QuoteTotals};
pub use catalog::{RateCard, RateCardItem};
pub use errors::{QuoteError, QuoteResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use line_item::{AddOnSelection, AddOns, LineItem, MaterialSelection};
pub use project::{Project, ProjectSettings, Room};
pub use units::UnitOfMeasure;
