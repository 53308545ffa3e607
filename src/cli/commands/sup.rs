//! `filiere sup` command - supplier management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use super::utils;
use crate::cli::{open_graph, GlobalOpts, OutputFormat};
use crate::core::geo::{Coordinates, Location};
use crate::core::identity::EntityId;
use crate::entities::supplier::{SupplierDraft, SupplierPatch};
use crate::entities::Supplier;

#[derive(Subcommand, Debug)]
pub enum SupCommands {
    /// List suppliers
    List,

    /// Create a new supplier
    New(NewArgs),

    /// Show a supplier's details
    Show(ShowArgs),

    /// Update fields of a supplier
    Set(SetArgs),

    /// Delete a supplier
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Supplier name
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

    /// Material IDs supplied (repeatable)
    #[arg(long = "material", short = 'm')]
    pub materials: Vec<String>,

    /// Certifications held (repeatable)
    #[arg(long = "cert")]
    pub certifications: Vec<String>,

    /// Preferred transport mode label
    #[arg(long)]
    pub mode: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Supplier ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Supplier ID
    pub id: String,

    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Replace the material ID list (repeatable)
    #[arg(long = "material", short = 'm')]
    pub materials: Option<Vec<String>>,

    /// Preferred transport mode label
    #[arg(long)]
    pub mode: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Supplier ID
    pub id: String,

    /// Also delete routes and prune warehouse membership lists
    #[arg(long)]
    pub cascade: bool,
}

#[derive(Tabled)]
struct SupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "LAT")]
    lat: String,
    #[tabled(rename = "LNG")]
    lng: String,
    #[tabled(rename = "MATERIALS")]
    materials: String,
    #[tabled(rename = "MODE")]
    mode: String,
}

impl From<&Supplier> for SupRow {
    fn from(sup: &Supplier) -> Self {
        Self {
            id: sup.id.to_string(),
            name: sup.name.clone(),
            lat: format!("{:.4}", sup.location.coordinates.lat),
            lng: format!("{:.4}", sup.location.coordinates.lng),
            materials: utils::id_cell(&sup.materials),
            mode: sup.transport_mode.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn run(cmd: SupCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SupCommands::List => run_list(global),
        SupCommands::New(args) => run_new(args, global),
        SupCommands::Show(args) => run_show(args, global),
        SupCommands::Set(args) => run_set(args, global),
        SupCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let suppliers = graph.suppliers().list();

    if suppliers.is_empty() {
        return utils::print_empty(global, "suppliers");
    }
    match global.format {
        OutputFormat::Json => utils::print_json(&suppliers),
        OutputFormat::Table => {
            let rows: Vec<SupRow> = suppliers.iter().map(SupRow::from).collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
            Ok(())
        }
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let supplier = graph
        .add_supplier(SupplierDraft {
            name: args.name,
            location: Location {
                address: args.address,
                coordinates: Coordinates {
                    lat: args.lat,
                    lng: args.lng,
                },
            },
            materials: args.materials.iter().map(EntityId::from_raw).collect(),
            certifications: args.certifications,
            transport_mode: args.mode,
        })
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => utils::print_json_one(&supplier),
        OutputFormat::Table => {
            utils::report_created("supplier", &supplier.id, &supplier.name);
            Ok(())
        }
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    let supplier = graph.suppliers().get(&id).into_diagnostic()?;

    if global.format == OutputFormat::Json {
        return utils::print_json_one(supplier);
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&supplier.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&supplier.name).yellow());
    if let Some(ref address) = supplier.location.address {
        println!("{}: {}", style("Address").bold(), address);
    }
    println!(
        "{}: {:.4}, {:.4}",
        style("Coordinates").bold(),
        supplier.location.coordinates.lat,
        supplier.location.coordinates.lng
    );
    if let Some(ref mode) = supplier.transport_mode {
        println!("{}: {}", style("Transport mode").bold(), mode);
    }
    if !supplier.materials.is_empty() {
        println!();
        println!(
            "{} ({}):",
            style("Materials").bold(),
            supplier.materials.len()
        );
        for material in &supplier.materials {
            match graph.materials().get(material) {
                Ok(mat) => println!("  • {} ({})", mat.name, material),
                Err(_) => println!("  • {material}"),
            }
        }
    }
    if !supplier.certifications.is_empty() {
        println!();
        println!(
            "{}: {}",
            style("Certifications").bold(),
            supplier.certifications.join(", ")
        );
    }
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Created").dim(),
        supplier.created.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);

    let location = if args.lat.is_some() || args.lng.is_some() {
        let current = graph.suppliers().get(&id).into_diagnostic()?;
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

    let supplier = graph
        .update_supplier(
            &id,
            SupplierPatch {
                name: args.name,
                location,
                materials: args
                    .materials
                    .map(|m| m.iter().map(EntityId::from_raw).collect()),
                certifications: None,
                transport_mode: args.mode,
            },
        )
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => utils::print_json_one(&supplier),
        OutputFormat::Table => {
            println!(
                "{} Updated supplier {}",
                style("✓").green(),
                style(&supplier.id).cyan()
            );
            Ok(())
        }
    }
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    graph.suppliers().get(&id).into_diagnostic()?;

    if !utils::confirm_delete(global, "supplier", &id)? {
        return Ok(());
    }
    graph.delete_supplier(&id, args.cascade).into_diagnostic()?;
    utils::report_deleted("supplier", &id);
    Ok(())
}
