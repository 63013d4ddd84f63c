use crate::config::resolve;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use formwork_model::{ChildList, Node, Tree};
use formwork_project::load_project;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Project file
    pub file: PathBuf,

    /// Print ids next to labels
    #[arg(long)]
    pub ids: bool,
}

pub fn tree(args: TreeArgs, cwd: &str) -> Result<()> {
    let document = load_project(&resolve(cwd, &args.file))?;
    let tree = document.tree();

    println!(
        "{} {} ({} nodes, {} root columns)",
        "🌲".green(),
        document.name().bright_white().bold(),
        tree.len(),
        tree.root_columns
    );

    for line in outline(&tree, args.ids) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per node (and per empty slot), indented by depth
pub fn outline(tree: &Tree, with_ids: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for node in &tree.elements {
        outline_node(node, 1, with_ids, &mut lines);
    }
    lines
}

fn outline_node(node: &Node, depth: usize, with_ids: bool, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let id = if with_ids {
        format!(" {}", node.id.to_string().dimmed())
    } else {
        String::new()
    };
    lines.push(format!(
        "{}{} [{}] w{}{}",
        indent,
        node.label,
        node.kind().as_str().cyan(),
        node.width.units(),
        id
    ));

    match node.content.child_list() {
        Some(ChildList::Dense(children)) => {
            for child in children {
                outline_node(child, depth + 1, with_ids, lines);
            }
        }
        Some(ChildList::Slots(slots)) => {
            for (index, slot) in slots.iter().enumerate() {
                match slot {
                    Some(child) => outline_node(child, depth + 1, with_ids, lines),
                    None => lines.push(format!(
                        "{}  {}",
                        indent,
                        format!("(empty slot {})", index).dimmed()
                    )),
                }
            }
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_editor::TreeStore;
    use formwork_model::ElementKind;

    #[test]
    fn test_outline_shows_holes() {
        colored::control::set_override(false);

        let mut store = TreeStore::new("outline");
        let grid = store
            .add_node(ElementKind::Columns, None)
            .created_id()
            .cloned()
            .unwrap();
        let second = store.tree().elements[0].children().nth(1).unwrap().id.clone();
        store.remove_node(&second);
        store.add_node(ElementKind::Text, None);

        let lines = outline(store.tree(), false);
        assert_eq!(
            lines,
            vec![
                "  Columns [columns] w12",
                "    Group [group] w6",
                "    (empty slot 1)",
                "  Text Field [text] w12",
            ]
        );
        assert!(store.find(&grid).is_some());
    }
}
