//! Tests for mutation sequences and tree-wide properties
//!
//! This tests:
//! - Acyclicity of moves
//! - Slot cardinality across operations
//! - Menu mirror consistency
//! - Duplicate disjointness and removal counts
//! - End-to-end editing scenarios

use formwork_editor::{Mutation, MutationOutcome, RejectReason, TreeStore};
use formwork_model::{Content, ElementKind, Node, NodeId, Tree};
use std::collections::HashSet;
use std::sync::Arc;

fn created(outcome: &MutationOutcome) -> NodeId {
    outcome.created_id().cloned().expect("Expected a created node")
}

fn child_ids(store: &TreeStore, id: &NodeId) -> Vec<NodeId> {
    store
        .find(id)
        .expect("Expected node")
        .children()
        .map(|c| c.id.clone())
        .collect()
}

/// Every slot container's entry count matches its declared count
fn assert_slot_cardinality(tree: &Tree) {
    tree.walk(&mut |node: &Node| match &node.content {
        Content::Columns(columns) => assert_eq!(columns.slots.len(), columns.column_count()),
        Content::Rows(rows) => assert_eq!(rows.slots.len(), rows.row_count()),
        _ => {}
    });
}

/// Every menu's mirror matches its button children
fn assert_mirrors_in_sync(tree: &Tree) {
    tree.walk(&mut |node: &Node| {
        if let Content::Menu(menu) = &node.content {
            assert!(menu.mirror_in_sync(), "Menu {} has a stale mirror", node.id);
        }
    });
}

fn assert_unique_ids(tree: &Tree) {
    assert!(tree.duplicate_id().is_none());
}

#[test]
fn test_move_into_descendant_is_rejected() {
    let mut store = TreeStore::new("test");
    let outer = created(&store.add_node(ElementKind::Group, None));
    let middle = created(&store.add_node(ElementKind::Group, Some(&outer)));
    let inner = created(&store.add_node(ElementKind::Group, Some(&middle)));
    let before = store.snapshot();

    for target in [&middle, &inner] {
        let outcome = store.move_node_to_container(&outer, target);
        assert_eq!(outcome.rejection(), Some(&RejectReason::CycleDetected));
    }

    let grid = created(&store.add_node(ElementKind::Columns, Some(&inner)));
    let before_slot = store.snapshot();
    let outcome = store.move_node_to_slot(&middle, &grid, 0);
    assert_eq!(outcome.rejection(), Some(&RejectReason::CycleDetected));

    assert!(!Arc::ptr_eq(&before, &before_slot));
    assert!(Arc::ptr_eq(&before_slot, &store.snapshot()));
}

#[test]
fn test_slot_cardinality_holds_through_sequence() {
    let mut store = TreeStore::new("test");
    let grid = created(&store.add_node(ElementKind::Columns, None));
    let rows = created(&store.add_node(ElementKind::Rows, None));
    let groups = child_ids(&store, &grid);

    let text = created(&store.add_node_to_slot(ElementKind::Text, &rows, 1));
    assert_slot_cardinality(store.tree());

    store.move_node_to_slot(&groups[0], &rows, 0);
    assert_slot_cardinality(store.tree());

    store.move_node_to_container(&text, &grid);
    assert_slot_cardinality(store.tree());

    store.move_up(&groups[1], Some(&grid));
    store.move_down(&text, Some(&grid));
    store.remove_node(&groups[1]);
    store.duplicate_node(&groups[0]);
    assert_slot_cardinality(store.tree());
    assert_unique_ids(store.tree());
}

#[test]
fn test_mirror_consistency_after_menu_edits() {
    let mut store = TreeStore::new("test");
    let menu = created(&store.add_node(ElementKind::Menu, None));
    let other = created(&store.add_node(ElementKind::Menu, None));
    let buttons = child_ids(&store, &menu);

    store.add_node(ElementKind::Divider, Some(&menu));
    assert_mirrors_in_sync(store.tree());

    store.move_node_to_container(&buttons[0], &other);
    assert_mirrors_in_sync(store.tree());

    store.insert_before(&buttons[2], &buttons[1], Some(&menu));
    assert_mirrors_in_sync(store.tree());

    store.move_down(&buttons[2], Some(&menu));
    store.duplicate_node(&other);
    store.remove_node(&buttons[1]);
    assert_mirrors_in_sync(store.tree());
}

#[test]
fn test_duplicate_produces_disjoint_ids() {
    let mut store = TreeStore::new("test");
    let grid = created(&store.add_node(ElementKind::Columns, None));
    let first_group = child_ids(&store, &grid)[0].clone();
    let menu = created(&store.add_node(ElementKind::Menu, Some(&first_group)));
    let before: HashSet<NodeId> = store.tree().ids().into_iter().collect();

    let copy = created(&store.duplicate_node(&grid));
    let original = store.find(&grid).unwrap().clone();
    let clone = store.find(&copy).unwrap().clone();

    let clone_ids: HashSet<NodeId> = clone.ids().into_iter().collect();
    assert!(clone_ids.is_disjoint(&before));
    assert_eq!(clone.size(), original.size());
    assert_unique_ids(store.tree());
    assert!(store.find(&menu).is_some());
}

#[test]
fn test_removal_cardinality() {
    let mut store = TreeStore::new("test");
    let grid = created(&store.add_node(ElementKind::Columns, None));
    let first_group = child_ids(&store, &grid)[0].clone();
    store.add_node(ElementKind::Menu, Some(&first_group));
    store.add_node(ElementKind::Text, None);

    let before = store.tree().len();
    let subtree = store.find(&grid).unwrap().size();
    assert_eq!(subtree, 7);

    store.remove_node(&grid);
    assert_eq!(store.tree().len(), before - subtree);
}

#[test]
fn test_hole_versus_splice() {
    let mut store = TreeStore::new("test");
    let grid = created(&store.add_node(ElementKind::Columns, None));
    let group = created(&store.add_node(ElementKind::Group, None));
    let a = created(&store.add_node(ElementKind::Text, Some(&group)));
    let b = created(&store.add_node(ElementKind::Text, Some(&group)));

    let slots_before = child_ids(&store, &grid);
    store.remove_node(&slots_before[0]);
    store.remove_node(&a);

    match &store.find(&grid).unwrap().content {
        Content::Columns(columns) => {
            assert_eq!(columns.slots.len(), 2);
            assert!(columns.slots.is_hole(0));
        }
        _ => panic!("Expected columns"),
    }
    assert_eq!(child_ids(&store, &group), vec![b]);
}

#[test]
fn test_columns_scenario() {
    let mut store = TreeStore::new("test");
    let grid = created(&store.add_node(ElementKind::Columns, None));
    for group in child_ids(&store, &grid) {
        store.remove_node(&group);
    }

    let text = created(&store.add_node_to_slot(ElementKind::Text, &grid, 0));
    match &store.find(&grid).unwrap().content {
        Content::Columns(columns) => {
            assert_eq!(columns.slots.get(0).unwrap().width.units(), 6);
            assert!(columns.slots.is_hole(1));
        }
        _ => panic!("Expected columns"),
    }

    assert!(store.move_node_to_slot(&text, &grid, 1).is_applied());
    match &store.find(&grid).unwrap().content {
        Content::Columns(columns) => {
            assert!(columns.slots.is_hole(0));
            assert_eq!(columns.slots.get(1).unwrap().id, text);
            assert_eq!(columns.slots.get(1).unwrap().width.units(), 6);
        }
        _ => panic!("Expected columns"),
    }
}

#[test]
fn test_menu_scenario() {
    let mut store = TreeStore::new("test");
    let menu = created(&store.add_node(ElementKind::Menu, None));
    let buttons = child_ids(&store, &menu);
    assert_eq!(buttons.len(), 3);

    store.remove_node(&buttons[1]);

    match &store.find(&menu).unwrap().content {
        Content::Menu(menu) => {
            let labels: Vec<_> = menu.mirror().iter().map(|l| l.label.as_str()).collect();
            assert_eq!(labels, vec!["Home", "Contact"]);
        }
        _ => panic!("Expected menu"),
    }
}

#[test]
fn test_duplicate_group_scenario() {
    let mut store = TreeStore::new("test");
    let group = created(&store.add_node(ElementKind::Group, None));
    let leaves = [
        created(&store.add_node(ElementKind::Text, Some(&group))),
        created(&store.add_node(ElementKind::Checkbox, Some(&group))),
    ];
    let after = created(&store.add_node(ElementKind::Divider, None));

    let copy = created(&store.duplicate_node(&group));

    let roots: Vec<_> = store.tree().elements.iter().map(|n| n.id.clone()).collect();
    assert_eq!(roots, vec![group.clone(), copy.clone(), after]);

    let clone = store.find(&copy).unwrap();
    assert_eq!(clone.label, "Group (Copy)");

    let clone_children: Vec<&Node> = clone.children().collect();
    assert_eq!(clone_children.len(), 2);
    assert_eq!(clone_children[0].label, "Text Field");
    assert_eq!(clone_children[1].label, "Checkbox");
    for (child, leaf) in clone_children.iter().zip(&leaves) {
        assert_ne!(&child.id, leaf);
    }
}

#[test]
fn test_rejected_batch_entries_do_not_stop_later_ones() {
    let mut store = TreeStore::new("test");
    let outcomes = store.apply_all(vec![
        Mutation::AddNode {
            kind: ElementKind::Group,
            parent_id: None,
        },
        Mutation::RemoveNode {
            node_id: NodeId::from("ghost"),
        },
        Mutation::AddNodeAtStart {
            kind: ElementKind::Image,
        },
    ]);

    let applied: Vec<bool> = outcomes.iter().map(MutationOutcome::is_applied).collect();
    assert_eq!(applied, vec![true, false, true]);
    assert_eq!(store.version(), 2);
    assert_eq!(store.tree().elements[0].kind(), ElementKind::Image);
}

#[test]
fn test_move_chain_then_remove() {
    let mut store = TreeStore::new("test");
    let first = created(&store.add_node(ElementKind::Group, None));
    let second = created(&store.add_node(ElementKind::Group, None));
    let text = created(&store.add_node(ElementKind::Text, Some(&second)));

    // Move second into first, then delete first
    assert!(store.move_node_to_container(&second, &first).is_applied());
    assert_eq!(child_ids(&store, &first), vec![second.clone()]);
    store.select_node(Some(&text)).unwrap();

    store.remove_node(&first);
    assert!(store.find(&second).is_none());
    assert!(store.find(&text).is_none());
    assert!(store.selected_id().is_none());
    assert!(store.tree().is_empty());
}
