//! `filiere wh` command - warehouse management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use super::utils;
use crate::cli::{open_graph, GlobalOpts, OutputFormat};
use crate::core::geo::{Coordinates, Location};
use crate::core::identity::EntityId;
use crate::entities::warehouse::{WarehouseDraft, WarehousePatch};
use crate::entities::Warehouse;

#[derive(Subcommand, Debug)]
pub enum WhCommands {
    /// List warehouses
    List,

    /// Create a new warehouse
    New(NewArgs),

    /// Show a warehouse's details
    Show(ShowArgs),

    /// Update fields of a warehouse
    Set(SetArgs),

    /// Delete a warehouse
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Warehouse name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Storage capacity, must be positive
    #[arg(long)]
    pub capacity: Option<f64>,

    /// Unit of measure for the capacity
    #[arg(long)]
    pub capacity_unit: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Warehouse ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Warehouse ID
    pub id: String,

    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    #[arg(long)]
    pub capacity: Option<f64>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Warehouse ID
    pub id: String,

    /// Also delete routes ending at this warehouse
    #[arg(long)]
    pub cascade: bool,
}

#[derive(Tabled)]
struct WhRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LAT")]
    lat: String,
    #[tabled(rename = "LNG")]
    lng: String,
    #[tabled(rename = "SUPPLIERS")]
    suppliers: usize,
    #[tabled(rename = "MATERIALS")]
    materials: usize,
    #[tabled(rename = "CAPACITY")]
    capacity: String,
}

impl From<&Warehouse> for WhRow {
    fn from(wh: &Warehouse) -> Self {
        let capacity = match (wh.capacity, wh.capacity_unit.as_deref()) {
            (Some(cap), Some(unit)) => format!("{cap} {unit}"),
            (Some(cap), None) => cap.to_string(),
            (None, _) => "-".to_string(),
        };
        Self {
            id: wh.id.to_string(),
            name: wh.name.clone(),
            lat: format!("{:.4}", wh.location.coordinates.lat),
            lng: format!("{:.4}", wh.location.coordinates.lng),
            suppliers: wh.suppliers.len(),
            materials: wh.materials.len(),
            capacity,
        }
    }
}

pub fn run(cmd: WhCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WhCommands::List => run_list(global),
        WhCommands::New(args) => run_new(args, global),
        WhCommands::Show(args) => run_show(args, global),
        WhCommands::Set(args) => run_set(args, global),
        WhCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let warehouses = graph.warehouses().list();

    if warehouses.is_empty() {
        return utils::print_empty(global, "warehouses");
    }
    match global.format {
        OutputFormat::Json => utils::print_json(&warehouses),
        OutputFormat::Table => {
            let rows: Vec<WhRow> = warehouses.iter().map(WhRow::from).collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
            Ok(())
        }
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let warehouse = graph
        .add_warehouse(WarehouseDraft {
            name: args.name,
            location: Location {
                address: args.address,
                coordinates: Coordinates {
                    lat: args.lat,
                    lng: args.lng,
                },
            },
            suppliers: Vec::new(),
            materials: Vec::new(),
            capacity: args.capacity,
            capacity_unit: args.capacity_unit,
        })
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => utils::print_json_one(&warehouse),
        OutputFormat::Table => {
            utils::report_created("warehouse", &warehouse.id, &warehouse.name);
            Ok(())
        }
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    let warehouse = graph.warehouses().get(&id).into_diagnostic()?;

    if global.format == OutputFormat::Json {
        return utils::print_json_one(warehouse);
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&warehouse.id).cyan());
    println!(
        "{}: {}",
        style("Name").bold(),
        style(&warehouse.name).yellow()
    );
    if let Some(ref address) = warehouse.location.address {
        println!("{}: {}", style("Address").bold(), address);
    }
    println!(
        "{}: {:.4}, {:.4}",
        style("Coordinates").bold(),
        warehouse.location.coordinates.lat,
        warehouse.location.coordinates.lng
    );
    if let Some(capacity) = warehouse.capacity {
        let unit = warehouse.capacity_unit.as_deref().unwrap_or("");
        println!("{}: {capacity} {unit}", style("Capacity").bold());
    }
    if !warehouse.suppliers.is_empty() {
        println!();
        println!(
            "{}: {}",
            style("Suppliers").bold(),
            utils::id_cell(&warehouse.suppliers)
        );
    }
    if !warehouse.materials.is_empty() {
        println!(
            "{}: {}",
            style("Materials").bold(),
            utils::id_cell(&warehouse.materials)
        );
    }
    let routes = graph.resolver().routes_of_warehouse(&id);
    if !routes.is_empty() {
        println!(
            "{}: {}",
            style("Routes").bold(),
            routes
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Created").dim(),
        warehouse.created.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);

    let location = if args.lat.is_some() || args.lng.is_some() {
        let current = graph.warehouses().get(&id).into_diagnostic()?;
        let mut location = current.location.clone();
        if let Some(lat) = args.lat {
            location.coordinates.lat = lat;
        }
        if let Some(lng) = args.lng {
            location.coordinates.lng = lng;
        }
        Some(location)
    } else {
        None
    };

    let warehouse = graph
        .update_warehouse(
            &id,
            WarehousePatch {
                name: args.name,
                location,
                suppliers: None,
                materials: None,
                capacity: args.capacity,
                capacity_unit: None,
            },
        )
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => utils::print_json_one(&warehouse),
        OutputFormat::Table => {
            println!(
                "{} Updated warehouse {}",
                style("✓").green(),
                style(&warehouse.id).cyan()
            );
            Ok(())
        }
    }
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    graph.warehouses().get(&id).into_diagnostic()?;

    if !utils::confirm_delete(global, "warehouse", &id)? {
        return Ok(());
    }
    graph.delete_warehouse(&id, args.cascade).into_diagnostic()?;
    utils::report_deleted("warehouse", &id);
    Ok(())
}
