//! `filiere mat` command - raw material management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use super::utils;
use crate::cli::{open_graph, GlobalOpts, OutputFormat};
use crate::core::identity::EntityId;
use crate::entities::material::{MaterialDraft, MaterialPatch, MaterialQuality};
use crate::entities::RawMaterial;

#[derive(Subcommand, Debug)]
pub enum MatCommands {
    /// List raw materials
    List,

    /// Create a new raw material
    New(NewArgs),

    /// Show a material's details
    Show(ShowArgs),

    /// Update fields of a material
    Set(SetArgs),

    /// Delete a material
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Material name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Material type (grain, dairy, produce, ...)
    #[arg(long, short = 't')]
    pub material_type: String,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// On-hand quantity, must be positive
    #[arg(long, short = 'q')]
    pub quantity: f64,

    /// Unit of measure for the quantity
    #[arg(long, short = 'u')]
    pub unit: String,

    /// Quality score, 0-100
    #[arg(long, default_value_t = 100.0)]
    pub score: f64,

    /// Defect rate, 0-100
    #[arg(long, default_value_t = 0.0)]
    pub defect_rate: f64,

    /// Consistency score, 0-100
    #[arg(long, default_value_t = 100.0)]
    pub consistency: f64,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Material ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Material ID
    pub id: String,

    #[arg(long, short = 'n')]
    pub name: Option<String>,

    #[arg(long, short = 'q')]
    pub quantity: Option<f64>,

    #[arg(long, short = 'u')]
    pub unit: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Material ID
    pub id: String,

    /// Also prune this ID from supplier and warehouse lists
    #[arg(long)]
    pub cascade: bool,
}

#[derive(Tabled)]
struct MatRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "TYPE")]
    material_type: String,
    #[tabled(rename = "QUANTITY")]
    quantity: String,
    #[tabled(rename = "QUALITY")]
    quality: String,
}

impl From<&RawMaterial> for MatRow {
    fn from(mat: &RawMaterial) -> Self {
        Self {
            id: mat.id.to_string(),
            name: mat.name.clone(),
            material_type: mat.material_type.clone(),
            quantity: format!("{} {}", mat.quantity, mat.unit),
            quality: format!("{:.0}", mat.quality.score),
        }
    }
}

pub fn run(cmd: MatCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MatCommands::List => run_list(global),
        MatCommands::New(args) => run_new(args, global),
        MatCommands::Show(args) => run_show(args, global),
        MatCommands::Set(args) => run_set(args, global),
        MatCommands::Delete(args) => run_delete(args, global),
    }
}

fn run_list(global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let materials = graph.materials().list();

    if materials.is_empty() {
        return utils::print_empty(global, "materials");
    }
    match global.format {
        OutputFormat::Json => utils::print_json(&materials),
        OutputFormat::Table => {
            let rows: Vec<MatRow> = materials.iter().map(MatRow::from).collect();
            println!("{}", Table::new(rows).with(Style::sharp()));
            Ok(())
        }
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let material = graph
        .add_material(MaterialDraft {
            name: args.name,
            material_type: args.material_type,
            description: args.description,
            quantity: args.quantity,
            unit: args.unit,
            quality: MaterialQuality {
                score: args.score,
                defect_rate: args.defect_rate,
                consistency_score: args.consistency,
            },
        })
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => utils::print_json_one(&material),
        OutputFormat::Table => {
            utils::report_created("material", &material.id, &material.name);
            Ok(())
        }
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    let material = graph.materials().get(&id).into_diagnostic()?;

    if global.format == OutputFormat::Json {
        return utils::print_json_one(material);
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&material.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&material.name).yellow());
    println!("{}: {}", style("Type").bold(), material.material_type);
    if let Some(ref description) = material.description {
        println!("{}: {}", style("Description").bold(), description);
    }
    println!(
        "{}: {} {}",
        style("Quantity").bold(),
        material.quantity,
        material.unit
    );
    println!(
        "{}: score {:.0}, defects {:.1}%, consistency {:.0}",
        style("Quality").bold(),
        material.quality.score,
        material.quality.defect_rate,
        material.quality.consistency_score
    );

    let suppliers = graph.resolver().suppliers_of(&id);
    if !suppliers.is_empty() {
        println!();
        println!("{} ({}):", style("Supplied by").bold(), suppliers.len());
        for supplier in suppliers {
            match graph.suppliers().get(supplier) {
                Ok(sup) => println!("  • {} ({})", sup.name, supplier),
                Err(_) => println!("  • {supplier}"),
            }
        }
    }
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Created").dim(),
        material.created.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    let material = graph
        .update_material(
            &id,
            MaterialPatch {
                name: args.name,
                material_type: None,
                description: None,
                quantity: args.quantity,
                unit: args.unit,
                quality: None,
            },
        )
        .into_diagnostic()?;

    match global.format {
        OutputFormat::Json => utils::print_json_one(&material),
        OutputFormat::Table => {
            println!(
                "{} Updated material {}",
                style("✓").green(),
                style(&material.id).cyan()
            );
            Ok(())
        }
    }
}

fn run_delete(args: DeleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut graph = open_graph(global)?;
    let id = EntityId::from_raw(&args.id);
    graph.materials().get(&id).into_diagnostic()?;

    if !utils::confirm_delete(global, "material", &id)? {
        return Ok(());
    }
    graph.delete_material(&id, args.cascade).into_diagnostic()?;
    utils::report_deleted("material", &id);
    Ok(())
}
