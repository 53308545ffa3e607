//! `filiere reconcile` command - sink warehouse aggregation

use console::style;
use miette::{IntoDiagnostic, Result};

use super::utils;
use crate::cli::{open_graph, GlobalOpts, OutputFormat};
use crate::core::identity::EntityId;
use crate::graph::AggregationTarget;

#[derive(clap::Args, Debug)]
pub struct ReconcileArgs {
    /// Aggregate into this warehouse instead of the first one
    #[arg(long)]
    pub into: Option<String>,
}

pub fn run(args: ReconcileArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    if let Some(ref id) = args.into {
        graph.set_aggregation_target(AggregationTarget::Warehouse(EntityId::from_raw(id)));
    }

    let outcome = graph.reconcile_warehouses().into_diagnostic()?;

    if global.format == OutputFormat::Json {
        return utils::print_json_one(&outcome);
    }

    match outcome.warehouse_id {
        None => println!("No warehouse to reconcile into."),
        Some(ref warehouse) if !outcome.changed() => {
            println!(
                "{} Warehouse {} already up to date",
                style("✓").green(),
                style(warehouse).cyan()
            );
        }
        Some(ref warehouse) => {
            println!(
                "{} Reconciled into {}: +{} supplier(s), +{} material(s)",
                style("✓").green(),
                style(warehouse).cyan(),
                outcome.added_suppliers.len(),
                outcome.added_materials.len()
            );
        }
    }
    Ok(())
}
