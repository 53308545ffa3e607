//! `filiere validate` command - referential integrity sweep

use console::style;
use miette::Result;

use super::utils;
use crate::cli::{open_graph, GlobalOpts, OutputFormat};

pub fn run(global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let report = graph.integrity_report();

    if global.format == OutputFormat::Json {
        return utils::print_json_one(&report);
    }

    println!(
        "{} Checked {} supplier(s), {} material(s), {} warehouse(s), {} route(s)",
        style("→").blue(),
        graph.suppliers().len(),
        graph.materials().len(),
        graph.warehouses().len(),
        graph.routes().len()
    );

    if report.is_clean() {
        println!("{} No dangling references", style("✓").green());
        return Ok(());
    }

    for dangling in &report.dangling {
        println!(
            "{} {}.{} references missing {}",
            style("✗").red(),
            style(&dangling.source).cyan(),
            dangling.field,
            style(&dangling.missing).yellow()
        );
    }
    Err(miette::miette!(
        "{} dangling reference(s) found",
        report.dangling.len()
    ))
}
