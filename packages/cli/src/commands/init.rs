use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_project::DocumentKind;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Kind of document new projects start as (form, email, page)
    #[arg(short, long, default_value = "form")]
    pub kind: DocumentKind,

    /// Projects directory
    #[arg(short, long, default_value = "projects")]
    pub projects_dir: String,

    /// Root column count for new projects
    #[arg(short, long, default_value_t = 1)]
    pub root_columns: usize,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Formwork workspace...".bright_blue().bold());

    let config = Config {
        projects_dir: args.projects_dir.clone(),
        document_kind: args.kind,
        root_columns: args.root_columns.max(1),
        ..Config::default()
    };

    // Create projects directory if it doesn't exist
    let projects_dir = config.get_projects_dir(cwd);
    if !projects_dir.exists() {
        fs::create_dir_all(&projects_dir)?;
        println!("  {} Created {}/", "✓".green(), args.projects_dir);
    }

    // Write config file
    let config_json = serde_json::to_string_pretty(&config)?;
    fs::write(&config_path, config_json)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: formwork new <id>");
    println!("  2. Run: formwork apply {}/<id>.json ops.json", args.projects_dir);
    println!("  3. Run: formwork tree {}/<id>.json", args.projects_dir);

    Ok(())
}
