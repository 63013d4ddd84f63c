use crate::config::{resolve, Config};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_editor::{parse_batch, MutationOutcome, TreeStore};
use formwork_project::{load_project, save_project};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Project file
    pub file: PathBuf,

    /// JSON array of mutations
    pub ops: PathBuf,

    /// Report outcomes without saving
    #[arg(long)]
    pub dry_run: bool,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let path = resolve(cwd, &args.file);
    let mut document = load_project(&path)?;

    let ops = std::fs::read_to_string(resolve(cwd, &args.ops))?;
    let batch = parse_batch(&ops)?;

    println!(
        "{}",
        format!("🔧 Applying {} mutations to {}", batch.len(), document.name())
            .bright_blue()
            .bold()
    );

    let mut store = TreeStore::with_tree(&document.id, document.tree())?;
    let mut applied_count = 0;
    let mut rejected_count = 0;

    for (index, mutation) in batch.into_iter().enumerate() {
        let name = mutation.name();
        match store.apply(mutation) {
            MutationOutcome::Applied { created, removed, .. } => {
                applied_count += 1;
                println!(
                    "  {} #{} {} (+{} / -{})",
                    "✓".green(),
                    index,
                    name,
                    created.len(),
                    removed.len()
                );
            }
            MutationOutcome::Rejected(reason) => {
                rejected_count += 1;
                println!("  {} #{} {} - {}", "✗".red(), index, name, reason);
            }
        }
    }

    println!();
    if rejected_count > 0 {
        println!(
            "{} {} applied, {} rejected",
            "⚠️".yellow(),
            applied_count,
            rejected_count
        );
    } else {
        println!("{} {} applied", "✅".green(), applied_count);
    }

    if args.dry_run {
        println!("{}", "Dry run: nothing written".dimmed());
        return Ok(());
    }

    document.set_tree(store.tree());
    save_project(&document, &path, config.pretty)?;
    println!("  {} Saved {}", "✓".green(), path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_project::{DocumentSettings, ProjectDocument};

    fn setup() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let doc = ProjectDocument::new("signup", DocumentSettings::default());
        save_project(&doc, &dir.path().join("signup.json"), true).unwrap();
        std::fs::write(
            dir.path().join("ops.json"),
            r#"[
                { "op": "addNode", "kind": "email" },
                { "op": "addNodeAtStart", "kind": "text" },
                { "op": "removeNode", "nodeId": "ghost" }
            ]"#,
        )
        .unwrap();

        (dir, cwd)
    }

    #[test]
    fn test_apply_saves_result() {
        let (dir, cwd) = setup();
        let args = ApplyArgs {
            file: PathBuf::from("signup.json"),
            ops: PathBuf::from("ops.json"),
            dry_run: false,
        };
        apply(args, &cwd).unwrap();

        let doc = load_project(&dir.path().join("signup.json")).unwrap();
        let kinds: Vec<_> = doc.elements.iter().map(|n| n.kind().as_str()).collect();
        assert_eq!(kinds, vec!["text", "email"]);
    }

    #[test]
    fn test_dry_run_leaves_file() {
        let (dir, cwd) = setup();
        let args = ApplyArgs {
            file: PathBuf::from("signup.json"),
            ops: PathBuf::from("ops.json"),
            dry_run: true,
        };
        apply(args, &cwd).unwrap();

        let doc = load_project(&dir.path().join("signup.json")).unwrap();
        assert!(doc.elements.is_empty());
    }
}
