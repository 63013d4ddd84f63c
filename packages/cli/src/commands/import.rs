use crate::config::{resolve, Config};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use formwork_editor::TreeStore;
use formwork_project::{import_into_store, save_project};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Export bundle to import
    pub bundle: PathBuf,

    /// Output file (defaults to <projectsDir>/<id>.json)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite an existing project file
    #[arg(short, long)]
    pub force: bool,
}

pub fn import(args: ImportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let json = std::fs::read_to_string(resolve(cwd, &args.bundle))?;

    // Load through a store so menu mirrors are re-synced
    let mut store = TreeStore::new("import");
    let mut document = import_into_store(&mut store, &json)?;
    document.set_tree(store.tree());

    let path = match &args.out {
        Some(out) => resolve(cwd, out),
        None => config.project_path(cwd, &document.id),
    };
    if path.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    save_project(&document, &path, config.pretty)?;
    println!(
        "{} Imported {} ({} nodes) → {}",
        "✓".green(),
        document.name().bright_white(),
        store.tree().len(),
        path.display()
    );
    Ok(())
}
