//! `filiere route` and `filiere classify` commands

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use super::utils;
use crate::cli::{open_graph, GlobalOpts, OutputFormat};
use crate::core::identity::EntityId;
use crate::entities::Route;

#[derive(Subcommand, Debug)]
pub enum RouteCommands {
    /// List routes
    List,

    /// Show a route's details
    Show(ShowArgs),

    /// Delete a route
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Route ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Route ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Supplier ID (origin)
    pub supplier: String,

    /// Warehouse ID (destination)
    pub warehouse: String,
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SUPPLIER")]
    supplier: String,
    #[tabled(rename = "WAREHOUSE")]
    warehouse: String,
    #[tabled(rename = "MODE")]
    mode: String,
    #[tabled(rename = "DISTANCE")]
    distance: String,
    #[tabled(rename = "COLOR")]
    color: String,
}

impl From<&Route> for RouteRow {
    fn from(route: &Route) -> Self {
        Self {
            id: route.id.to_string(),
            supplier: route.supplier_id.to_string(),
            warehouse: route.warehouse_id.to_string(),
            mode: route.transport_mode.clone(),
            distance: format!("{:.1} km", route.distance_km),
            color: route.color_hex.clone(),
        }
    }
}

pub fn run(cmd: RouteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RouteCommands::List => run_list(global),
        RouteCommands::Show(args) => run_show(args, global),
        RouteCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let routes = graph.routes().list();

    if routes.is_empty() {
        return utils::print_empty(global, "routes");
    }
    match global.format {
        OutputFormat::Json => utils::print_json(&routes),
        OutputFormat::Table => {
            let rows: Vec<RouteRow> = routes.iter().map(RouteRow::from).collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
            Ok(())
        }
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    let route = graph.routes().get(&id).into_diagnostic()?;

    if global.format == OutputFormat::Json {
        return utils::print_json_one(route);
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&route.id).cyan());
    println!("{}: {}", style("Supplier").bold(), route.supplier_id);
    println!("{}: {}", style("Warehouse").bold(), route.warehouse_id);
    println!("{}: {}", style("Mode").bold(), route.transport_mode);
    println!("{}: {:.1} km", style("Distance").bold(), route.distance_km);
    println!("{}: {}", style("Color").bold(), route.color_hex);
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Created").dim(),
        route.created.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    graph.routes().get(&id).into_diagnostic()?;

    if !utils::confirm_delete(global, "route", &id)? {
        return Ok(());
    }
    graph.delete_route(&id).into_diagnostic()?;
    utils::report_deleted("route", &id);
    Ok(())
}

/// `filiere classify <supplier> <warehouse>`
pub fn run_classify(args: ClassifyArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let supplier = EntityId::from_raw(&args.supplier);
    let warehouse = EntityId::from_raw(&args.warehouse);
    let route = graph
        .classify_route(&supplier, &warehouse)
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => utils::print_json_one(&route),
        OutputFormat::Table => {
            println!(
                "{} Route {} ({} → {})",
                style("✓").green(),
                style(&route.id).cyan(),
                route.supplier_id,
                route.warehouse_id
            );
            println!(
                "  {} over {:.1} km, color {}",
                route.transport_mode, route.distance_km, route.color_hex
            );
            Ok(())
        }
    }
}
