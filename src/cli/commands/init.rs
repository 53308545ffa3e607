//! `filiere init` command - seed the data directory

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::identity::EntityKind;
use crate::persistence::JsonFileStore;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let store = JsonFileStore::new(&global.data_dir);
    store.init().into_diagnostic()?;

    println!(
        "{} Initialized {}",
        style("✓").green(),
        style(global.data_dir.display()).cyan()
    );
    for kind in EntityKind::all() {
        println!("  {}", store.collection_path(kind).display());
    }
    Ok(())
}
