//! CLI module - argument parsing and command dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use crate::graph::SupplyGraph;
use crate::persistence::JsonFileStore;

pub mod commands;

#[derive(Parser, Debug)]
#[command(name = "filiere", version, about = "Supply-chain entity graph toolkit")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug)]
pub struct GlobalOpts {
    /// Data directory holding the JSON collections
    #[arg(long, global = true, env = "FILIERE_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory with empty collections
    Init,

    /// Manage suppliers
    Sup {
        #[command(subcommand)]
        cmd: commands::sup::SupCommands,
    },

    /// Manage raw materials
    Mat {
        #[command(subcommand)]
        cmd: commands::mat::MatCommands,
    },

    /// Manage warehouses
    Wh {
        #[command(subcommand)]
        cmd: commands::wh::WhCommands,
    },

    /// Inspect and delete routes
    Route {
        #[command(subcommand)]
        cmd: commands::route::RouteCommands,
    },

    /// Create or refresh the route between a supplier and a warehouse
    Classify(commands::route::ClassifyArgs),

    /// Aggregate all supplier and material IDs into the sink warehouse
    Reconcile(commands::reconcile::ReconcileArgs),

    /// Check referential integrity across all collections
    Validate,

    /// Snapshot the collections into a timestamped backup directory
    Backup,

    /// Replace the collections with a previous backup
    Restore(commands::backup::RestoreArgs),
}

/// Open the graph backed by the data directory
pub fn open_graph(global: &GlobalOpts) -> Result<SupplyGraph<JsonFileStore>> {
    let store = JsonFileStore::new(&global.data_dir);
    SupplyGraph::open(store).into_diagnostic()
}

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => commands::init::run(&cli.global),
        Commands::Sup { cmd } => commands::sup::run(cmd, &cli.global),
        Commands::Mat { cmd } => commands::mat::run(cmd, &cli.global),
        Commands::Wh { cmd } => commands::wh::run(cmd, &cli.global),
        Commands::Route { cmd } => commands::route::run(cmd, &cli.global),
        Commands::Classify(args) => commands::route::run_classify(args, &cli.global),
        Commands::Reconcile(args) => commands::reconcile::run(args, &cli.global),
        Commands::Validate => commands::validate::run(&cli.global),
        Commands::Backup => commands::backup::run_backup(&cli.global),
        Commands::Restore(args) => commands::backup::run_restore(args, &cli.global),
    }
}
