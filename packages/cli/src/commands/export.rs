use crate::config::resolve;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_project::{load_project, save_export};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Project file
    pub file: PathBuf,

    /// Output file (defaults to <file>.export.json)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

fn default_export_path(project_path: &Path) -> PathBuf {
    let stem = project_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string());
    project_path.with_file_name(format!("{}.export.json", stem))
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let path = resolve(cwd, &args.file);
    let document = load_project(&path)?;

    let out = match &args.out {
        Some(out) => resolve(cwd, out),
        None => default_export_path(&path),
    };
    save_export(&document, &out)?;

    println!(
        "{} Exported {} → {}",
        "✓".green(),
        document.name().bright_white(),
        out.display()
    );
    Ok(())
}
