//! # Quotewright CLI
//!
//! Command-line interface for building interior-design quotes.
//!
//! ## Usage
//!
//! ```bash
//! # Start a project file
//! quote new sharma.iqt --name "Sharma Residence" --client "A. Sharma"
//!
//! # Add rooms and items
//! quote add-room sharma.iqt "Master Bedroom" --room-type Bedroom
//! quote add-item sharma.iqt --room "Master Bedroom" --from-catalog Wardrobe \
//!     --length 6 --height 7 --material Veneer --add-on Lights
//! quote add-item sharma.iqt --room "Master Bedroom" --item "Study Table" --uom NOS --rate 12000
//!
//! # Print the quote
//! quote quote sharma.iqt
//! quote quote sharma.iqt --json
//!
//! # Browse the rate card
//! quote catalog --category Furniture
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

mod config;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use quote_core::calculator::price_breakdown;
use quote_core::catalog::{RateCard, RateCardFilter};
use quote_core::currency::CurrencyFormat;
use quote_core::file_io::{load_project, load_rate_card, save_project, FileLock, PROJECT_EXTENSION};
use quote_core::line_item::{AddOnSelection, LineItem};
use quote_core::numeric::parse_number_or_zero;
use quote_core::project::{Project, ProjectSettings, ProjectType, Room};
use quote_core::summary::{QuoteSummary, UomSortOrder};
use quote_core::units::UnitOfMeasure;
use quote_core::{QuoteError, QuoteResult};

use config::{resolve_config, AppConfig};

/// Quotewright - interior-design quotation tool
#[derive(Parser, Debug)]
#[command(name = "quote")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file (defaults to $QUOTE_CONFIG)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new project file
    New {
        file: PathBuf,

        #[arg(long)]
        name: String,

        #[arg(long)]
        client: String,

        #[arg(long, default_value = "")]
        site: String,

        #[arg(long, default_value = "")]
        contact: String,

        /// Apartment, Villa, Farmhouse, Independent House, Office Space, Other
        #[arg(long, value_parser = parse_project_type, default_value = "Apartment")]
        project_type: ProjectType,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add a room
    AddRoom {
        file: PathBuf,
        name: String,

        #[arg(long, default_value = "")]
        room_type: String,
    },

    /// Remove a room and all of its line items
    RemoveRoom { file: PathBuf, name: String },

    /// Add a line item, blank or from the rate card
    AddItem {
        file: PathBuf,

        #[arg(long)]
        room: String,

        /// Rate-card item to copy (see `quote catalog`)
        #[arg(long, value_name = "ITEM", conflicts_with_all = ["item", "uom", "rate"])]
        from_catalog: Option<String>,

        /// Rate-card JSON file (defaults to the built-in sample card)
        #[arg(long, value_name = "FILE")]
        rate_card: Option<PathBuf>,

        /// Item name for a blank line item
        #[arg(long, required_unless_present = "from_catalog")]
        item: Option<String>,

        /// SFT, RFT or NOS
        #[arg(long, value_parser = parse_uom)]
        uom: Option<UnitOfMeasure>,

        #[arg(long)]
        rate: Option<String>,

        #[arg(long)]
        length: Option<String>,

        #[arg(long)]
        height: Option<String>,

        #[arg(long)]
        quantity: Option<String>,

        /// Material to select from the item's options
        #[arg(long)]
        material: Option<String>,

        /// Add-on to select; NAME=RATE adds a new priced add-on (repeatable)
        #[arg(long = "add-on", value_name = "NAME[=RATE]")]
        add_ons: Vec<String>,
    },

    /// Change an existing line item
    EditItem {
        file: PathBuf,

        /// Line item id or a unique prefix of it
        id: String,

        #[arg(long)]
        rate: Option<String>,

        #[arg(long)]
        length: Option<String>,

        #[arg(long)]
        height: Option<String>,

        #[arg(long)]
        quantity: Option<String>,

        #[arg(long)]
        material: Option<String>,

        /// Add-on to select (repeatable)
        #[arg(long = "add-on")]
        add_ons: Vec<String>,

        /// Add-on to deselect (repeatable)
        #[arg(long = "remove-add-on")]
        remove_add_ons: Vec<String>,
    },

    /// Remove a line item
    RemoveItem {
        file: PathBuf,

        /// Line item id or a unique prefix of it
        id: String,
    },

    /// Set tax and discount percentages
    Settings {
        file: PathBuf,

        /// GST percentage
        #[arg(long)]
        tax: Option<String>,

        #[arg(long)]
        discount: Option<String>,
    },

    /// Price a single line item from a JSON file
    Price { item: PathBuf },

    /// Print the quote
    Quote {
        file: PathBuf,

        /// Print the full summary as JSON
        #[arg(long)]
        json: bool,

        /// Order of per-unit totals: value-desc, value-asc or name
        #[arg(long, value_parser = parse_sort_order, default_value = "value-desc")]
        sort: UomSortOrder,
    },

    /// List rate-card items
    Catalog {
        #[arg(long, value_name = "FILE")]
        rate_card: Option<PathBuf>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long, value_parser = parse_uom)]
        uom: Option<UnitOfMeasure>,

        /// Case-insensitive text in the item or category name
        #[arg(long)]
        search: Option<String>,
    },
}

fn parse_uom(s: &str) -> Result<UnitOfMeasure, String> {
    UnitOfMeasure::parse_strict(s).ok_or_else(|| {
        let known: Vec<String> = UnitOfMeasure::ALL
            .iter()
            .map(|uom| format!("{} ({})", uom.code(), uom.description()))
            .collect();
        format!("unknown unit of measure '{}', expected one of: {}", s, known.join(", "))
    })
}

fn parse_project_type(s: &str) -> Result<ProjectType, String> {
    ProjectType::from_str_flexible(s).map_err(|_| {
        let known: Vec<&str> = ProjectType::ALL.iter().map(|kind| kind.display_name()).collect();
        format!("unknown project type '{}', expected one of: {}", s, known.join(", "))
    })
}

fn parse_sort_order(s: &str) -> Result<UomSortOrder, String> {
    match s {
        "value-desc" => Ok(UomSortOrder::ValueDesc),
        "value-asc" => Ok(UomSortOrder::ValueAsc),
        "name" => Ok(UomSortOrder::Name),
        other => Err(format!("unknown sort order '{}'", other)),
    }
}

fn main() {
    // RUST_LOG may come from .env
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let Ok(json) = serde_json::to_string_pretty(&e) {
            eprintln!();
            eprintln!("Error JSON:");
            eprintln!("{}", json);
        }
        std::process::exit(1);
    }
}

fn run() -> QuoteResult<()> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Commands::New {
            file,
            name,
            client,
            site,
            contact,
            project_type,
            force,
        } => {
            let file = with_project_extension(file);
            if file.exists() && !force {
                return Err(QuoteError::file_error(
                    "create",
                    file.display().to_string(),
                    "file already exists (use --force to overwrite)",
                ));
            }
            let _lock = FileLock::acquire(&file, config.lock_user())?;

            let mut project = Project::new(name, client);
            project.info.site_address = site;
            project.info.contact_info = contact;
            project.info.project_type = project_type;
            project.set_settings(config.default_settings());

            save_project(&project, &file)?;
            println!("Created {}", file.display());
        }

        Commands::AddRoom { file, name, room_type } => {
            edit_project(&file, &config, |project| {
                project.add_room(Room::new(name.clone(), room_type))?;
                println!("Added room '{}'", name.trim());
                Ok(())
            })?;
        }

        Commands::RemoveRoom { file, name } => {
            edit_project(&file, &config, |project| {
                let (room, removed) = project.remove_room(&name)?;
                println!("Removed room '{}' and {} line item(s)", room.name, removed.len());
                Ok(())
            })?;
        }

        Commands::AddItem {
            file,
            room,
            from_catalog,
            rate_card,
            item,
            uom,
            rate,
            length,
            height,
            quantity,
            material,
            add_ons,
        } => {
            let mut line = match from_catalog {
                Some(name) => {
                    let card = rate_card_from(rate_card.as_deref())?;
                    card.find_item(&name)
                        .ok_or_else(|| QuoteError::catalog_item_not_found(name.clone()))?
                        .instantiate(room.clone())
                }
                None => LineItem::new(
                    room.clone(),
                    item.unwrap_or_default(),
                    uom.unwrap_or_default(),
                    rate.as_deref().map(parse_number_or_zero).unwrap_or(0.0),
                ),
            };
            apply_fields(&mut line, None, length, height, quantity)?;
            if let Some(material) = material {
                line.select_material(&material)?;
            }
            for add_on in &add_ons {
                apply_add_on(&mut line, add_on)?;
            }

            let currency = config.currency();
            edit_project(&file, &config, |project| {
                let id = project.add_line_item(line)?;
                if let Some(added) = project.line_item(&id) {
                    println!(
                        "Added '{}' to {} ({}) id {}",
                        added.item,
                        added.room,
                        currency.format(added.amount),
                        id
                    );
                }
                Ok(())
            })?;
        }

        Commands::EditItem {
            file,
            id,
            rate,
            length,
            height,
            quantity,
            material,
            add_ons,
            remove_add_ons,
        } => {
            let currency = config.currency();
            edit_project(&file, &config, |project| {
                let id = resolve_item_id(project, &id)?;

                // Checked on a copy so the edit closure cannot fail
                let mut preview = project
                    .line_item(&id)
                    .cloned()
                    .ok_or_else(|| QuoteError::line_item_not_found(id))?;
                apply_fields(&mut preview, rate, length, height, quantity)?;
                if let Some(material) = &material {
                    preview.select_material(material)?;
                }
                for add_on in &add_ons {
                    preview.set_add_on_selected(add_on, true)?;
                }
                for add_on in &remove_add_ons {
                    preview.set_add_on_selected(add_on, false)?;
                }

                let amount = project.update_line_item(&id, |item| *item = preview)?;
                println!("Updated {} ({})", id, currency.format(amount));
                Ok(())
            })?;
        }

        Commands::RemoveItem { file, id } => {
            edit_project(&file, &config, |project| {
                let id = resolve_item_id(project, &id)?;
                let removed = project.remove_line_item(&id)?;
                println!("Removed '{}' from {}", removed.item, removed.room);
                Ok(())
            })?;
        }

        Commands::Settings { file, tax, discount } => {
            edit_project(&file, &config, |project| {
                let mut settings: ProjectSettings = project.settings;
                if let Some(tax) = tax.as_deref() {
                    settings.tax_percent = parse_number_or_zero(tax);
                }
                if let Some(discount) = discount.as_deref() {
                    settings.discount_percent = parse_number_or_zero(discount);
                }
                if let Err(e) = settings.validate() {
                    eprintln!("Warning: {}", e);
                }
                project.set_settings(settings);
                println!(
                    "GST {}%, discount {}%",
                    project.settings.tax_percent, project.settings.discount_percent
                );
                Ok(())
            })?;
        }

        Commands::Price { item } => {
            let contents = std::fs::read_to_string(&item)
                .map_err(|e| QuoteError::file_error("read", item.display().to_string(), e.to_string()))?;
            let mut line: LineItem = serde_json::from_str(&contents)?;
            line.migrate_legacy_add_ons();
            line.recompute();

            let currency = config.currency();
            let price = price_breakdown(&line);
            println!("{} ({}, {})", line.item, line.unit_of_measure, line.dimensions_label());
            println!("  Base:     {:>16}", currency.format(price.base));
            println!("  Material: {:>16}", currency.format(price.material));
            println!("  Add-ons:  {:>16}", currency.format(price.add_ons));
            println!("  Amount:   {:>16}", currency.format(price.total));
            if let Err(e) = line.validate() {
                eprintln!("Warning: {}", e);
            }
        }

        Commands::Quote { file, json, sort } => {
            let project = load_project(&file)?;
            if let Err(e) = project.settings.validate() {
                eprintln!("Warning: {}", e);
            }

            let mut summary = QuoteSummary::build(&project);
            summary.stats.sort_uom_totals(sort);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let currency = config.currency();
                print!("{}", summary.render_text(&currency));
                print_stats(&summary, &currency);
            }
        }

        Commands::Catalog {
            rate_card,
            category,
            uom,
            search,
        } => {
            let card = rate_card_from(rate_card.as_deref())?;
            let filter = RateCardFilter {
                category,
                unit_of_measure: uom,
                search,
            };
            let currency = config.currency();

            println!("{}", card.name);
            for entry in card.filter(&filter) {
                println!(
                    "  {:<12} {:<20} {:>3} {:>14}",
                    entry.category,
                    entry.item,
                    entry.unit_of_measure.code(),
                    currency.format(entry.rate)
                );
                if !entry.material_options_raw.trim().is_empty() {
                    println!("      materials: {}", entry.material_options_raw);
                }
                if !entry.add_ons_raw.trim().is_empty() && !entry.add_ons_raw.trim().eq_ignore_ascii_case("none") {
                    println!("      add-ons:   {}", entry.add_ons_raw);
                }
            }
        }
    }

    Ok(())
}

/// Lock, load, edit and save a project file.
fn edit_project<F>(path: &Path, config: &AppConfig, edit: F) -> QuoteResult<()>
where
    F: FnOnce(&mut Project) -> QuoteResult<()>,
{
    let _lock = FileLock::acquire(path, config.lock_user())?;
    let mut project = load_project(path)?;
    edit(&mut project)?;
    save_project(&project, path)
}

/// Give an extensionless path the project file extension.
fn with_project_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(PROJECT_EXTENSION);
    }
    path
}

fn rate_card_from(path: Option<&Path>) -> QuoteResult<RateCard> {
    match path {
        Some(path) => load_rate_card(path),
        None => Ok(RateCard::sample()),
    }
}

/// Apply numeric overrides typed on the command line.
///
/// A dimension the item's unit does not price is rejected rather than
/// stored and silently ignored.
fn apply_fields(
    line: &mut LineItem,
    rate: Option<String>,
    length: Option<String>,
    height: Option<String>,
    quantity: Option<String>,
) -> QuoteResult<()> {
    let uom = line.unit_of_measure;
    if let Some(value) = length.as_deref().filter(|_| !uom.uses_length()) {
        return Err(QuoteError::invalid_input(
            "length",
            value,
            format!("{} items are not priced by length", uom.code()),
        ));
    }
    if let Some(value) = height.as_deref().filter(|_| !uom.uses_height()) {
        return Err(QuoteError::invalid_input(
            "height",
            value,
            format!("{} items are not priced by height", uom.code()),
        ));
    }

    let parse = |value: Option<String>| value.as_deref().map(parse_number_or_zero);

    if let Some(rate) = parse(rate) {
        line.rate = rate;
    }
    if let Some(length) = parse(length) {
        line.length = length;
    }
    if let Some(height) = parse(height) {
        line.height = height;
    }
    if let Some(quantity) = parse(quantity) {
        line.quantity = quantity;
    }
    line.recompute();
    line.validate()
}

/// `NAME` selects an existing add-on; `NAME=RATE` adds a new selected one.
fn apply_add_on(line: &mut LineItem, arg: &str) -> QuoteResult<()> {
    match arg.split_once('=') {
        Some((name, rate)) => {
            let name = name.trim();
            let rate = parse_number_or_zero(rate);
            if name.is_empty() {
                return Err(QuoteError::invalid_input("add_ons", arg, "Add-on name is empty"));
            }
            let description = format!("{} ({} per unit)", name, rate);
            *line = line
                .clone()
                .with_add_on(name, AddOnSelection::new(rate, description).selected());
            Ok(())
        }
        None => line.set_add_on_selected(arg, true),
    }
}

/// Find a line item by full id or unique id prefix.
fn resolve_item_id(project: &Project, needle: &str) -> QuoteResult<Uuid> {
    let needle = needle.trim().to_lowercase();
    let mut matches = project
        .line_items
        .iter()
        .filter(|item| item.id.to_string().starts_with(&needle));

    match (matches.next(), matches.next()) {
        (Some(item), None) if !needle.is_empty() => Ok(item.id),
        (Some(_), Some(_)) => Err(QuoteError::invalid_input("id", needle, "Prefix matches more than one line item")),
        _ => Err(QuoteError::line_item_not_found(needle)),
    }
}

fn print_stats(summary: &QuoteSummary, currency: &CurrencyFormat) {
    let stats = &summary.stats;
    println!();
    println!("Rooms: {}  Items: {}", stats.room_count, stats.item_count);
    println!("Average room cost: {}", currency.format(stats.average_room_cost));
    println!("Average item cost: {}", currency.format(stats.average_item_cost));
    match &stats.highest_cost_room {
        Some(room) => println!("Highest cost room: {} ({})", room.name, currency.format(room.amount)),
        None => println!("Highest cost room: None"),
    }
    match &stats.highest_cost_item {
        Some(item) => println!(
            "Highest cost item: {} in {} ({})",
            item.name,
            item.room.as_deref().unwrap_or(""),
            currency.format(item.amount)
        ),
        None => println!("Highest cost item: None"),
    }
    for total in &stats.uom_totals {
        println!("  {:<4} {:>16}", total.unit_of_measure.code(), currency.format(total.total));
    }
}
