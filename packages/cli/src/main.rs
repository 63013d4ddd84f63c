mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, export, import, init, new, tree, ApplyArgs, ExportArgs, ImportArgs, InitArgs, NewArgs,
    TreeArgs,
};
use tracing_subscriber::EnvFilter;

/// Formwork CLI - edit form, email and page layouts as element trees
#[derive(Parser, Debug)]
#[command(name = "formwork")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at info level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write formwork.config.json into the current directory
    Init(InitArgs),

    /// Create an empty project file
    New(NewArgs),

    /// Print a project's element outline
    Tree(TreeArgs),

    /// Apply a JSON batch of mutations to a project
    Apply(ApplyArgs),

    /// Write an export bundle for a project
    Export(ExportArgs),

    /// Validate an export bundle and write it as a project file
    Import(ImportArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::New(args) => new(args, &cwd),
        Command::Tree(args) => tree(args, &cwd),
        Command::Apply(args) => apply(args, &cwd),
        Command::Export(args) => export(args, &cwd),
        Command::Import(args) => import(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
