//! Shared helpers for entity subcommands

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityId;

/// Print a slice of entities as pretty JSON
pub fn print_json<T: Serialize>(items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

/// Print one entity as pretty JSON
pub fn print_json_one<T: Serialize>(item: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(item).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

/// Confirm a deletion unless `--yes` was passed
pub fn confirm_delete(global: &GlobalOpts, what: &str, id: &EntityId) -> Result<bool> {
    if global.yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(format!("Delete {what} {id}?"))
        .default(false)
        .interact()
        .into_diagnostic()
}

pub fn report_deleted(what: &str, id: &EntityId) {
    println!("{} Deleted {what} {}", style("✓").green(), style(id).cyan());
}

pub fn report_created(what: &str, id: &EntityId, name: &str) {
    println!(
        "{} Created {what} {} ({})",
        style("✓").green(),
        style(id).cyan(),
        style(name).yellow()
    );
}

/// Join an ID list for table cells, `-` when empty
pub fn id_cell(ids: &[EntityId]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Format-aware empty-list message
pub fn print_empty(global: &GlobalOpts, what: &str) -> Result<()> {
    match global.format {
        OutputFormat::Json => println!("[]"),
        OutputFormat::Table => println!("No {what} found."),
    }
    Ok(())
}
