use crate::config::{resolve, Config};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use formwork_project::{save_project, ProjectDocument};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project id (also seeds node ids)
    pub id: String,

    /// Document title (defaults to the id)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output file (defaults to <projectsDir>/<id>.json)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    if args.id.trim().is_empty() {
        return Err(anyhow!("Project id cannot be empty"));
    }

    let path = match &args.out {
        Some(out) => resolve(cwd, out),
        None => config.project_path(cwd, &args.id),
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

    let title = args.title.as_deref().unwrap_or(&args.id);
    let document = ProjectDocument::new(&args.id, config.new_settings(title));
    save_project(&document, &path, config.pretty)?;

    println!(
        "{} Created {} {} → {}",
        "✓".green(),
        document.settings.document_kind.as_str(),
        args.id.bright_white(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_project::load_project;

    #[test]
    fn test_new_writes_empty_project() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let args = NewArgs {
            id: "contact".to_string(),
            title: Some("Contact us".to_string()),
            out: None,
            force: false,
        };
        new(args, &cwd).unwrap();

        let doc = load_project(&dir.path().join("projects/contact.json")).unwrap();
        assert_eq!(doc.id, "contact");
        assert_eq!(doc.settings.title, "Contact us");
        assert!(doc.elements.is_empty());
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();
        let make = || NewArgs {
            id: "contact".to_string(),
            title: None,
            out: None,
            force: false,
        };

        new(make(), &cwd).unwrap();
        assert!(new(make(), &cwd).is_err());
    }
}
