//! `filiere backup` and `filiere restore` commands

use std::path::PathBuf;

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::persistence::JsonFileStore;

#[derive(clap::Args, Debug)]
pub struct RestoreArgs {
    /// Backup directory to restore from
    pub backup_dir: PathBuf,
}

pub fn run_backup(global: &GlobalOpts) -> Result<()> {
    let store = JsonFileStore::new(&global.data_dir);
    let dir = store.backup().into_diagnostic()?;
    println!(
        "{} Backed up to {}",
        style("✓").green(),
        style(dir.display()).cyan()
    );
    Ok(())
}

pub fn run_restore(args: RestoreArgs, global: &GlobalOpts) -> Result<()> {
    let store = JsonFileStore::new(&global.data_dir);

    if !global.yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Overwrite {} with {}?",
                global.data_dir.display(),
                args.backup_dir.display()
            ))
            .default(false)
            .interact()
            .into_diagnostic()?;
        if !confirmed {
            return Ok(());
        }
    }

    store.restore(&args.backup_dir).into_diagnostic()?;
    println!(
        "{} Restored from {}",
        style("✓").green(),
        style(args.backup_dir.display()).cyan()
    );
    Ok(())
}
